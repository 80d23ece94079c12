//! Domain types: repositories, contributors, grid configuration, and output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for RepoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((owner, name)) if is_segment(owner) && is_segment(name) => {
                let (owner, name) = (owner.to_string(), name.to_string());
                Ok(Self { owner, name })
            }
            _ => Err(format!("Repository must be in 'owner/name' form, got '{s}'")),
        }
    }
}

fn is_segment(part: &str) -> bool {
    !part.is_empty() && !part.contains('/')
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A contributor as ranked by the upstream API (most contributions first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Account login, unique within one listing.
    pub login: String,
    /// Avatar image URL as published upstream.
    pub avatar_url: String,
}

/// Corner radius of each avatar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoundnessRepr", into = "String")]
pub enum Roundness {
    /// A literal radius in pixels.
    Px(u32),
    /// Radius equal to the cell width, giving circular avatars.
    Full,
}

impl Roundness {
    /// Resolve to a pixel radius for the given cell width.
    #[must_use]
    pub fn resolve(self, cell_width: u32) -> u32 {
        match self {
            Self::Px(px) => px,
            Self::Full => cell_width,
        }
    }
}

impl FromStr for Roundness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full" | "yes" => Ok(Self::Full),
            other => match other.parse::<u32>() {
                Ok(px) if px > 0 => Ok(Self::Px(px)),
                _ => Err(unsupported_roundness(other)),
            },
        }
    }
}

fn unsupported_roundness(value: impl fmt::Display) -> String {
    format!("Unsupported roundness '{value}'. Use a positive pixel radius or 'full'")
}

impl fmt::Display for Roundness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}"),
            Self::Full => f.write_str("full"),
        }
    }
}

impl From<Roundness> for String {
    fn from(r: Roundness) -> Self {
        r.to_string()
    }
}

/// Config files may spell roundness as a bare number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoundnessRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<RoundnessRepr> for Roundness {
    type Error = String;

    fn try_from(repr: RoundnessRepr) -> Result<Self, Self::Error> {
        match repr {
            RoundnessRepr::Number(0) => Err(unsupported_roundness(0)),
            RoundnessRepr::Number(px) => Ok(Self::Px(px)),
            RoundnessRepr::Text(s) => s.parse(),
        }
    }
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// SVG markup.
    #[serde(alias = "vector")]
    Svg,
    /// Rasterized PNG.
    #[serde(alias = "raster")]
    Png,
}

impl OutputFormat {
    /// MIME type of rendered output in this format.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }

    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "svg" | "vector" => Ok(Self::Svg),
            "png" | "raster" => Ok(Self::Png),
            other => Err(format!("Unsupported format '{other}'. Valid: svg, png")),
        }
    }
}

/// Grid configuration for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Spacing between cells in pixels.
    pub gap: u32,
    /// Width and height of each avatar cell in pixels.
    pub cell_width: u32,
    /// Cells per row.
    pub columns: u32,
    /// Fixed row count; derived from the contributor count when `None`.
    pub rows: Option<u32>,
    /// Corner radius of each cell.
    pub roundness: Roundness,
    /// Stroke width around each cell.
    pub border_width: f32,
    /// Inline avatar bytes instead of linking to them.
    pub embed_avatars: bool,
    /// Output format.
    pub output_format: OutputFormat,
    /// Serialize SVG without inter-element whitespace.
    pub minify: bool,
}

impl LayoutConfig {
    /// Whether avatars must be fetched and inlined.
    ///
    /// Rasterizing cannot follow remote links, so PNG output always embeds.
    #[must_use]
    pub fn embeds_avatars(&self) -> bool {
        self.embed_avatars || self.output_format == OutputFormat::Png
    }

    /// Number of cells a fixed grid can show, if rows are fixed.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        let rows = self.rows?;
        Some((self.columns as usize).saturating_mul(rows as usize))
    }
}

/// An avatar ready to be referenced from the document, aligned with its contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAvatar {
    /// A `data:` URI carrying the image bytes.
    Inline(String),
    /// A remote URL, already sized for the cell.
    Linked(String),
}

impl ResolvedAvatar {
    /// The value to place in the image reference.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Inline(uri) | Self::Linked(uri) => uri,
        }
    }
}

/// Final encoded image and its MIME type.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// Encoded bytes (UTF-8 markup for SVG).
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
}
