//! Recording adapter for the `ContributorSource` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{begin_call, complete_call};
use crate::cassette::recorder::CassetteRecorder;
use crate::model::RepoId;
use crate::ports::contributor_source::{ContributorSource, PageFuture, PORT};

/// Records contributor page fetches while delegating to an inner implementation.
pub struct RecordingContributorSource {
    inner: Box<dyn ContributorSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingContributorSource {
    /// Creates a new recording source wrapping the given implementation.
    pub fn new(inner: Box<dyn ContributorSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ContributorSource for RecordingContributorSource {
    fn fetch_page(&self, repo: &RepoId, page: u32, per_page: usize) -> PageFuture<'_> {
        let input = json!({ "repo": repo.to_string(), "page": page, "per_page": per_page });
        let seq = begin_call(&self.recorder, PORT, "fetch_page", &input);
        let pending = self.inner.fetch_page(repo, page, per_page);
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = pending.await;
            complete_call(&recorder, seq, &result);
            result
        })
    }
}
