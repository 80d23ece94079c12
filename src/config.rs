//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{OutputFormat, Roundness};

/// Identifying `User-Agent` sent with every upstream request.
pub const DEFAULT_USER_AGENT: &str = "contribgrid (+https://github.com/contribgrid/contribgrid)";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Upstream API configuration.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Default grid parameters (used when a request leaves them unset).
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API token.
    pub token: Option<String>,
    /// REST API base URL.
    pub api_base: String,
    /// Web base URL used for profile links.
    pub web_base: String,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.github.com".to_string(),
            web_base: "https://github.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Default grid parameters from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Maximum number of contributors.
    pub max: i64,
    /// Gap between cells.
    pub gap: u32,
    /// Cell width.
    pub width: u32,
    /// Cells per row.
    pub columns: u32,
    /// Fixed row count.
    pub rows: Option<u32>,
    /// Corner radius.
    pub roundness: Roundness,
    /// Border stroke width.
    pub border_width: f32,
    /// Inline avatars.
    pub embed: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Compact SVG serialization.
    pub minify: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max: 100,
            gap: 6,
            width: 40,
            columns: 21,
            rows: None,
            roundness: Roundness::Px(5),
            border_width: 0.0,
            embed: true,
            format: OutputFormat::Svg,
            minify: true,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: String,
    /// `Cache-Control` max-age in seconds.
    pub cache_max_age: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: "127.0.0.1:3000".to_string(), cache_max_age: 3600 }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the API token, preferring environment variables.
    #[must_use]
    pub fn github_token(&self) -> Option<String> {
        let env = |key: &str| std::env::var(key).ok();
        first_token([env("GITHUB_TOKEN"), env("GITHUB_APP_TOKEN"), self.github.token.clone()])
    }
}

/// The first candidate that is set and not blank.
fn first_token(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates.into_iter().flatten().find(|t| !t.trim().is_empty())
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `CONTRIBGRID_CONFIG` environment variable
/// 3. `~/.config/contribgrid/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("CONTRIBGRID_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/contribgrid/config.toml")
    } else {
        PathBuf::from("contribgrid.toml")
    }
}
