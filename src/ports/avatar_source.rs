//! Avatar download port.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Port name used in cassettes.
pub const PORT: &str = "avatar_source";

/// Raw avatar image as served upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarBytes {
    /// Image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// `Content-Type` reported by the server, if any.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Boxed future type returned by [`AvatarSource::fetch_avatar`].
pub type AvatarFuture<'a> =
    Pin<Box<dyn Future<Output = Result<AvatarBytes, GridError>> + Send + 'a>>;

/// Downloads avatar images by URL.
pub trait AvatarSource: Send + Sync {
    /// Fetch the image at `url`.
    fn fetch_avatar(&self, url: &str) -> AvatarFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
