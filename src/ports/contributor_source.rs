//! Contributor listing port for the upstream code-hosting API.

use std::future::Future;
use std::pin::Pin;

use crate::error::GridError;
use crate::model::{Contributor, RepoId};

/// Port name used in cassettes.
pub const PORT: &str = "contributor_source";

/// Boxed future type returned by [`ContributorSource::fetch_page`].
pub type PageFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Contributor>, GridError>> + Send + 'a>>;

/// Lists a repository's contributors one page at a time, ranked by
/// contribution count.
pub trait ContributorSource: Send + Sync {
    /// Fetch the 1-based `page` of contributors, `per_page` at a time.
    ///
    /// An empty page means the listing is exhausted.
    fn fetch_page(&self, repo: &RepoId, page: u32, per_page: usize) -> PageFuture<'_>;
}
