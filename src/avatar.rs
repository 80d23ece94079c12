//! Avatar resolution: inline `data:` URIs or sized remote links.

use base64::Engine;
use futures::future::try_join_all;

use crate::error::GridError;
use crate::model::{Contributor, ResolvedAvatar};
use crate::ports::{AvatarBytes, AvatarSource};

/// MIME type assumed when an avatar response carries no `Content-Type`.
const FALLBACK_CONTENT_TYPE: &str = "image/png";

/// Append the avatar size parameter to an avatar URL.
#[must_use]
pub fn sized_avatar_url(url: &str, size: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}s={size}")
}

/// Wrap avatar bytes in a base64 `data:` URI.
#[must_use]
pub fn data_uri(avatar: &AvatarBytes) -> String {
    let content_type = avatar
        .content_type
        .as_deref()
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or(FALLBACK_CONTENT_TYPE);
    let encoded = base64::engine::general_purpose::STANDARD.encode(&avatar.data);
    format!("data:{content_type};base64,{encoded}")
}

/// Resolves contributor avatars for a given cell size.
pub struct AvatarResolver<'a> {
    source: &'a dyn AvatarSource,
}

impl<'a> AvatarResolver<'a> {
    /// Create a resolver that downloads through the given source when embedding.
    #[must_use]
    pub fn new(source: &'a dyn AvatarSource) -> Self {
        Self { source }
    }

    /// Resolve one avatar per contributor, in contributor order.
    ///
    /// Without embedding this is a pure URL rewrite. With embedding every
    /// avatar is downloaded concurrently and inlined.
    ///
    /// # Errors
    ///
    /// Any failed download fails the whole resolution.
    pub async fn resolve_all(
        &self,
        contributors: &[Contributor],
        size: u32,
        embed: bool,
    ) -> Result<Vec<ResolvedAvatar>, GridError> {
        let urls = contributors.iter().map(|c| sized_avatar_url(&c.avatar_url, size));

        if !embed {
            return Ok(urls.map(ResolvedAvatar::Linked).collect());
        }

        tracing::debug!(count = contributors.len(), size, "embedding avatars");
        let downloads = try_join_all(urls.map(|url| self.source.fetch_avatar(&url))).await?;
        Ok(downloads.iter().map(|avatar| ResolvedAvatar::Inline(data_uri(avatar))).collect())
    }
}
