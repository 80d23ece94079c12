//! Assembles the contributor grid document and encodes it.

use crate::error::GridError;
use crate::layout::GridLayout;
use crate::model::{Contributor, OutputFormat, RenderedImage, ResolvedAvatar};
use crate::raster::rasterize;
use crate::svg::{format_number, Element};

/// Stroke color of cell borders.
pub const BORDER_COLOR: &str = "#c0c0c0";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const STYLE: &str = "a{cursor:pointer}";

/// Per-render drawing parameters shared by every cell.
#[derive(Debug, Clone, Copy)]
pub struct CellStyle<'a> {
    /// Resolved corner radius.
    pub radius: u32,
    /// Stroke width; no stroke when zero.
    pub border_width: f32,
    /// Base URL that profile links are built on.
    pub profile_base: &'a str,
}

/// Build the grid document: one linked, avatar-filled cell per contributor.
///
/// `avatars[i]` must belong to `contributors[i]`.
#[must_use]
pub fn compose(
    contributors: &[Contributor],
    avatars: &[ResolvedAvatar],
    grid: &GridLayout,
    style: CellStyle<'_>,
) -> Element {
    debug_assert_eq!(contributors.len(), avatars.len());

    let width = format_number(grid.canvas.width);
    let height = format_number(grid.canvas.height);

    let cells = contributors
        .iter()
        .zip(avatars)
        .enumerate()
        .take(grid.cell_count())
        .map(|(index, (contributor, avatar))| cell(index, contributor, avatar, grid, style));

    Element::new("svg")
        .attr("xmlns", SVG_NS)
        .attr("xmlns:xlink", XLINK_NS)
        .attr("width", width.clone())
        .attr("height", height.clone())
        .attr("viewBox", format!("0 0 {width} {height}"))
        .child(Element::new("style").text(STYLE))
        .children(cells)
}

#[allow(clippy::cast_precision_loss)]
fn cell(
    index: usize,
    contributor: &Contributor,
    avatar: &ResolvedAvatar,
    grid: &GridLayout,
    style: CellStyle<'_>,
) -> Element {
    let (x, y) = grid.position(index);
    let size = grid.cell_width as f32;
    let pattern_id = format!("i{index}");

    let pattern = Element::new("pattern")
        .attr("id", pattern_id.clone())
        .attr("patternUnits", "userSpaceOnUse")
        .num("x", x)
        .num("y", y)
        .num("width", size)
        .num("height", size)
        .child(
            Element::new("image")
                .attr("href", avatar.href())
                .num("width", size)
                .num("height", size),
        );

    let mut rect = Element::new("rect")
        .num("x", x)
        .num("y", y)
        .num("width", size)
        .num("height", size)
        .attr("rx", style.radius.to_string())
        .attr("fill", format!("url(#{pattern_id})"));
    if style.border_width > 0.0 {
        rect = rect.attr("stroke", BORDER_COLOR).num("stroke-width", style.border_width);
    }

    Element::new("a")
        .attr("href", format!("{}/{}", style.profile_base, contributor.login))
        .child(Element::new("title").text(contributor.login.clone()))
        .child(Element::new("defs").child(pattern))
        .child(rect)
}

/// Encode a composed document in the requested format.
///
/// # Errors
///
/// Returns [`GridError::Render`] if rasterization fails.
pub fn encode(
    document: &Element,
    grid: &GridLayout,
    format: OutputFormat,
    minify: bool,
) -> Result<RenderedImage, GridError> {
    let bytes = match format {
        OutputFormat::Svg if minify => document.to_compact_string().into_bytes(),
        OutputFormat::Svg => document.to_pretty_string().into_bytes(),
        OutputFormat::Png => rasterize(&document.to_compact_string(), grid.canvas)?,
    };
    Ok(RenderedImage { bytes, content_type: format.content_type() })
}
