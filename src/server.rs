//! HTTP entry point: `GET /?repo=owner/name&...` returns the rendered grid.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::config::DefaultsConfig;
use crate::context::ServiceContext;
use crate::error::GridError;
use crate::params::{GridOptions, GridQuery};
use crate::pipeline;

/// Shared state of the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Port adapters.
    pub ctx: Arc<ServiceContext>,
    /// Defaults for unset query parameters.
    pub defaults: Arc<DefaultsConfig>,
    /// `Cache-Control` max-age for rendered images.
    pub cache_max_age: u32,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(contributors)).route("/health", get(health)).with_state(state)
}

/// Bind `addr` and serve until the process exits.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, state: AppState) -> Result<(), GridError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn contributors(
    State(state): State<AppState>,
    query: Result<Query<GridQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let started = Instant::now();
    let Query(query) = query?;
    let request = GridOptions::try_from(query)?.into_request(&state.defaults)?;

    let image = pipeline::render(&state.ctx, &request).await?;

    tracing::info!(
        repo = %request.repo,
        content_type = image.content_type,
        bytes = image.bytes.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "rendered contributors"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, image.content_type.to_string()),
            (header::CACHE_CONTROL, format!("public, max-age={}", state.cache_max_age)),
        ],
        image.bytes,
    )
        .into_response())
}

/// Errors as surfaced to HTTP clients.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request parameters.
    BadRequest(String),
    /// Upstream API failure.
    BadGateway(String),
    /// Rendering or other internal failure.
    Internal(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        tracing::warn!(error = %message, "malformed query string");
        AppError::BadRequest(message)
    }
}

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::Validation(msg) => {
                tracing::warn!(error = %msg, "validation error");
                AppError::BadRequest(msg)
            }
            err if err.is_upstream() => {
                tracing::error!(error = %err, "upstream fetch failed");
                AppError::BadGateway(err.to_string())
            }
            err => {
                tracing::error!(error = %err, "render failed");
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contributor, RepoId};
    use crate::ports::avatar_source::AvatarFuture;
    use crate::ports::contributor_source::PageFuture;
    use crate::ports::{AvatarSource, ContributorSource};

    fn contributor(login: &str) -> Contributor {
        let avatar_url = format!("https://avatars.example.com/{login}?v=4");
        Contributor { login: login.to_string(), avatar_url }
    }

    struct TwoContributors;

    impl ContributorSource for TwoContributors {
        fn fetch_page(&self, _repo: &RepoId, page: u32, _per_page: usize) -> PageFuture<'_> {
            let contributors = match page {
                1 => vec![contributor("user1"), contributor("user2")],
                _ => Vec::new(),
            };
            Box::pin(async move { Ok(contributors) })
        }
    }

    struct Unreachable;

    impl AvatarSource for Unreachable {
        fn fetch_avatar(&self, url: &str) -> AvatarFuture<'_> {
            let message = format!("cannot reach {url}");
            Box::pin(async move { Err(GridError::Upstream { status: 503, message }) })
        }
    }

    fn state() -> AppState {
        AppState {
            ctx: Arc::new(ServiceContext {
                contributors: Box::new(TwoContributors),
                avatars: Box::new(Unreachable),
                profile_base: "https://github.com".into(),
            }),
            defaults: Arc::new(DefaultsConfig::default()),
            cache_max_age: 3600,
        }
    }

    fn query(uri: &str) -> Result<Query<GridQuery>, QueryRejection> {
        Query::try_from_uri(&uri.parse().unwrap())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_repo_is_400_with_json_error() {
        let err = contributors(State(state()), query("/")).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "`repo` parameter is required");
    }

    #[tokio::test]
    async fn undecodable_query_is_400_with_json_error() {
        for uri in ["/?repo=octo/demo&repo=octo/other", "/?repo=octo/demo&ssr=false&embed=true"] {
            let err = contributors(State(state()), query(uri)).await.unwrap_err();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = body_json(response).await;
            assert!(body["error"].as_str().unwrap().contains("duplicate field"), "{uri}: {body}");
        }
    }

    #[tokio::test]
    async fn renders_svg_with_headers() {
        let uri = "/?repo=octo/demo&columns=2&width=50&gap=10&ssr=false";
        let response = contributors(State(state()), query(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let svg = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(svg.contains(r#"width="110""#));
        assert!(svg.contains("https://github.com/user2"));
    }

    #[tokio::test]
    async fn avatar_failure_is_502() {
        // Embedding is on by default, so the unreachable avatar source is hit.
        let err = contributors(State(state()), query("/?repo=octo/demo")).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_json(response).await["error"].as_str().unwrap().contains("cannot reach"));
    }

    #[test]
    fn render_errors_are_500() {
        let response = AppError::from(GridError::Render("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
