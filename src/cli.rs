//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};

use crate::model::{OutputFormat, Roundness};
use crate::params::GridOptions;

/// Render a repository's contributors as a grid of linked avatars.
#[derive(Parser, Debug)]
#[command(name = "contribgrid", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one grid image to a file or stdout.
    Render(RenderArgs),
    /// Serve grid images over HTTP.
    Serve(ServeArgs),
}

/// Arguments of `contribgrid render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Repository in `owner/name` form.
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Maximum number of contributors.
    #[arg(short, long, allow_negative_numbers = true)]
    pub max: Option<i64>,

    /// Gap between avatars in pixels.
    #[arg(short, long)]
    pub gap: Option<u32>,

    /// Avatar width and height in pixels.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Avatars per row.
    #[arg(short, long)]
    pub columns: Option<u32>,

    /// Fixed number of rows (caps the contributor count).
    #[arg(long)]
    pub rows: Option<u32>,

    /// Corner radius in pixels, or `full` for circles.
    #[arg(long)]
    pub roundness: Option<Roundness>,

    /// Border stroke width in pixels.
    #[arg(long)]
    pub border_width: Option<f32>,

    /// Inline avatar images in the output.
    #[arg(long, overrides_with = "no_embed")]
    pub embed: bool,

    /// Link to remote avatar images instead of inlining them.
    #[arg(long)]
    pub no_embed: bool,

    /// Output format: svg, png.
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Pretty-print SVG output.
    #[arg(long)]
    pub no_minify: bool,

    /// Output file path, or `-` for stdout (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

impl RenderArgs {
    /// Collect the grid parameters that were set on the command line.
    #[must_use]
    pub fn grid_options(&self) -> GridOptions {
        let embed = if self.embed {
            Some(true)
        } else if self.no_embed {
            Some(false)
        } else {
            None
        };

        GridOptions {
            repo: self.repo.clone(),
            max: self.max,
            gap: self.gap,
            width: self.width,
            columns: self.columns,
            rows: self.rows,
            roundness: self.roundness,
            border_width: self.border_width,
            embed,
            format: self.format,
            minify: self.no_minify.then_some(false),
        }
    }
}

/// Arguments of `contribgrid serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (defaults to the config file's `server.addr`).
    #[arg(short, long)]
    pub addr: Option<String>,
}
