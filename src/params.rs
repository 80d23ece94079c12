//! Request parameter parsing and validation shared by the CLI and HTTP entry points.

use std::str::FromStr;

use serde::Deserialize;

use crate::config::DefaultsConfig;
use crate::error::GridError;
use crate::model::{LayoutConfig, OutputFormat, RepoId, Roundness};
use crate::pipeline::RenderRequest;

/// Grid parameters as supplied by a caller; unset values fall back to config defaults.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GridOptions {
    /// Repository in `owner/name` form.
    pub repo: Option<String>,
    /// Maximum contributors; negative values mean none.
    pub max: Option<i64>,
    /// Gap between cells.
    pub gap: Option<u32>,
    /// Cell width.
    pub width: Option<u32>,
    /// Cells per row.
    pub columns: Option<u32>,
    /// Fixed row count.
    pub rows: Option<u32>,
    /// Corner radius.
    pub roundness: Option<Roundness>,
    /// Border stroke width.
    pub border_width: Option<f32>,
    /// Inline avatars.
    pub embed: Option<bool>,
    /// Output format.
    pub format: Option<OutputFormat>,
    /// Compact SVG output.
    pub minify: Option<bool>,
}

impl GridOptions {
    /// Merge with defaults and validate into a render request.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Validation`] if the repository is missing or
    /// malformed, or a dimension is out of range.
    pub fn into_request(self, defaults: &DefaultsConfig) -> Result<RenderRequest, GridError> {
        let repo = self
            .repo
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| GridError::Validation("`repo` parameter is required".to_string()))?;
        let repo: RepoId = repo.parse().map_err(GridError::Validation)?;

        let columns = positive("columns", self.columns.unwrap_or(defaults.columns))?;
        let cell_width = positive("width", self.width.unwrap_or(defaults.width))?;
        let rows = self.rows.or(defaults.rows).map(|r| positive("rows", r)).transpose()?;

        let border_width = self.border_width.unwrap_or(defaults.border_width);
        if !border_width.is_finite() || border_width < 0.0 {
            return Err(GridError::Validation(format!(
                "borderWidth must be a non-negative number, got {border_width}"
            )));
        }

        let max = self.max.unwrap_or(defaults.max).max(0);
        let max_count = usize::try_from(max).unwrap_or(usize::MAX);

        Ok(RenderRequest {
            repo,
            max_count,
            layout: LayoutConfig {
                gap: self.gap.unwrap_or(defaults.gap),
                cell_width,
                columns,
                rows,
                roundness: self.roundness.unwrap_or(defaults.roundness),
                border_width,
                embed_avatars: self.embed.unwrap_or(defaults.embed),
                output_format: self.format.unwrap_or(defaults.format),
                minify: self.minify.unwrap_or(defaults.minify),
            },
        })
    }
}

fn positive(name: &str, value: u32) -> Result<u32, GridError> {
    if value == 0 {
        Err(GridError::Validation(format!("{name} must be at least 1")))
    } else {
        Ok(value)
    }
}

/// Raw query-string parameters of the HTTP endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    repo: Option<String>,
    max: Option<String>,
    gap: Option<String>,
    width: Option<String>,
    columns: Option<String>,
    rows: Option<String>,
    roundness: Option<String>,
    #[serde(alias = "borderWidth")]
    border_width: Option<String>,
    #[serde(alias = "ssr")]
    embed: Option<String>,
    #[serde(alias = "type")]
    format: Option<String>,
    minify: Option<String>,
}

impl TryFrom<GridQuery> for GridOptions {
    type Error = GridError;

    fn try_from(q: GridQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            repo: q.repo,
            max: field("max", q.max)?,
            gap: field("gap", q.gap)?,
            width: field("width", q.width)?,
            columns: field("columns", q.columns)?,
            rows: field("rows", q.rows)?,
            roundness: field("roundness", q.roundness)?,
            border_width: field("borderWidth", q.border_width)?,
            embed: q.embed.as_deref().map(|v| flag("ssr", v)).transpose()?,
            format: field("format", q.format)?,
            minify: q.minify.as_deref().map(|v| flag("minify", v)).transpose()?,
        })
    }
}

/// Parse an optional query value; blank counts as unset.
fn field<T>(name: &str, raw: Option<String>) -> Result<Option<T>, GridError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| GridError::Validation(format!("Invalid {name} '{value}': {e}"))),
    }
}

fn flag(name: &str, raw: &str) -> Result<bool, GridError> {
    match raw.trim() {
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => {
            let message = format!("Invalid {name} '{other}': expected true or false");
            Err(GridError::Validation(message))
        }
    }
}
