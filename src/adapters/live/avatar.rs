//! Live adapter that downloads avatar images over HTTP.

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;

use crate::error::GridError;
use crate::ports::avatar_source::{AvatarBytes, AvatarFuture, AvatarSource};

/// Downloads avatars with a plain `GET`.
pub struct HttpAvatars {
    client: Client,
    user_agent: String,
}

impl HttpAvatars {
    /// Create a new avatar source sharing the given client.
    #[must_use]
    pub fn new(client: Client, user_agent: impl Into<String>) -> Self {
        Self { client, user_agent: user_agent.into() }
    }
}

impl AvatarSource for HttpAvatars {
    fn fetch_avatar(&self, url: &str) -> AvatarFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self.client.get(&url).header(USER_AGENT, &self.user_agent).send().await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(GridError::Upstream {
                    status: status.as_u16(),
                    message: format!("avatar {url}: {message}"),
                });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let data = response.bytes().await?.to_vec();

            tracing::debug!(%url, bytes = data.len(), "fetched avatar");
            Ok(AvatarBytes { data, content_type })
        })
    }
}
