//! Live adapter for the GitHub repository contributors API.

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

use crate::config::GitHubConfig;
use crate::error::GridError;
use crate::model::{Contributor, RepoId};
use crate::ports::contributor_source::{ContributorSource, PageFuture};

/// Live contributor source that calls `GET /repos/{owner}/{repo}/contributors`.
pub struct GitHubContributors {
    client: Client,
    api_base: String,
    user_agent: String,
    token: Option<String>,
}

impl GitHubContributors {
    /// Create a new source from API settings and an optional bearer token.
    #[must_use]
    pub fn new(client: Client, github: &GitHubConfig, token: Option<String>) -> Self {
        Self {
            client,
            api_base: github.api_base.trim_end_matches('/').to_string(),
            user_agent: github.user_agent.clone(),
            token,
        }
    }

    fn page_url(&self, repo: &RepoId) -> String {
        format!("{}/repos/{}/{}/contributors", self.api_base, repo.owner, repo.name)
    }
}

impl ContributorSource for GitHubContributors {
    fn fetch_page(&self, repo: &RepoId, page: u32, per_page: usize) -> PageFuture<'_> {
        let url = self.page_url(repo);
        Box::pin(async move {
            tracing::debug!(%url, page, per_page, "requesting contributors page");

            let mut request = self
                .client
                .get(&url)
                .query(&[("per_page", per_page.to_string()), ("page", page.to_string())])
                .header(USER_AGENT, &self.user_agent)
                .header(ACCEPT, "application/vnd.github+json");
            if let Some(ref token) = self.token {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }

            let response = request.send().await?;
            let status = response.status();

            // Contributor listings for empty repositories come back as 204.
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Vec::new());
            }

            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(GridError::Upstream { status: status.as_u16(), message: response_text });
            }

            serde_json::from_str::<Vec<Contributor>>(&response_text).map_err(|e| {
                GridError::Upstream {
                    status: status.as_u16(),
                    message: format!("Failed to parse contributors page {page}: {e}"),
                }
            })
        })
    }
}
