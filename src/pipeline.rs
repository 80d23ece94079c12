//! End-to-end rendering: fetch, resolve, lay out, compose.

use crate::avatar::AvatarResolver;
use crate::compositor::{compose, encode, CellStyle};
use crate::context::ServiceContext;
use crate::error::GridError;
use crate::fetcher::ContributorFetcher;
use crate::layout::GridLayout;
use crate::model::{LayoutConfig, RenderedImage, RepoId};

/// A validated render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Repository whose contributors are drawn.
    pub repo: RepoId,
    /// Upper bound on contributors.
    pub max_count: usize,
    /// Grid and output configuration.
    pub layout: LayoutConfig,
}

impl RenderRequest {
    /// Contributors to fetch: never more than a fixed grid can display.
    #[must_use]
    pub fn fetch_limit(&self) -> usize {
        match self.layout.capacity() {
            Some(capacity) => self.max_count.min(capacity),
            None => self.max_count,
        }
    }
}

/// Render the contributor grid for `request`.
///
/// # Errors
///
/// Fails on the first upstream or render error; nothing partial is produced.
#[tracing::instrument(skip_all, fields(repo = %request.repo))]
pub async fn render(
    ctx: &ServiceContext,
    request: &RenderRequest,
) -> Result<RenderedImage, GridError> {
    let layout = &request.layout;

    let fetcher = ContributorFetcher::new(ctx.contributors.as_ref());
    let contributors = fetcher.fetch(&request.repo, request.fetch_limit()).await?;

    let avatars = AvatarResolver::new(ctx.avatars.as_ref())
        .resolve_all(&contributors, layout.cell_width, layout.embeds_avatars())
        .await?;

    let grid = GridLayout::compute(
        contributors.len(),
        layout.columns,
        layout.rows,
        layout.cell_width,
        layout.gap,
        layout.border_width,
    );
    tracing::info!(
        contributors = contributors.len(),
        columns = grid.columns,
        rows = grid.rows,
        width = grid.canvas.width,
        height = grid.canvas.height,
        "composing grid"
    );

    let style = CellStyle {
        radius: layout.roundness.resolve(layout.cell_width),
        border_width: layout.border_width,
        profile_base: &ctx.profile_base,
    };
    let document = compose(&contributors, &avatars, &grid, style);
    encode(&document, &grid, layout.output_format, layout.minify)
}
