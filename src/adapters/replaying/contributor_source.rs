//! Replaying adapter for the `ContributorSource` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::model::{Contributor, RepoId};
use crate::ports::contributor_source::{ContributorSource, PageFuture, PORT};

/// Serves recorded contributor pages from a cassette.
pub struct ReplayingContributorSource {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingContributorSource {
    /// Create a replaying source backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ContributorSource for ReplayingContributorSource {
    fn fetch_page(&self, _repo: &RepoId, _page: u32, _per_page: usize) -> PageFuture<'_> {
        let output = next_output(&self.replayer, PORT, "fetch_page");
        Box::pin(async move { output.and_then(replay_result::<Vec<Contributor>>) })
    }
}
