//! Unified error type for contribgrid.

use thiserror::Error;

/// Errors that can occur while rendering a contributor grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// A request parameter was missing or malformed.
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// An upstream API returned an error response or an unusable body.
    #[error("Upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code (0 for replayed failures).
        status: u16,
        /// Error message from the upstream service.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Rasterization or image encoding failed.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl GridError {
    /// Whether this error came from talking to an upstream service.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Network(_))
    }
}
