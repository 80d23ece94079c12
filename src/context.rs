//! Service context that bundles all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::Client;

use crate::adapters::live::avatar::HttpAvatars;
use crate::adapters::live::github::GitHubContributors;
use crate::adapters::recording::avatar_source::RecordingAvatarSource;
use crate::adapters::recording::contributor_source::RecordingContributorSource;
use crate::adapters::replaying::avatar_source::ReplayingAvatarSource;
use crate::adapters::replaying::contributor_source::ReplayingContributorSource;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::GitHubConfig;
use crate::error::GridError;
use crate::ports::{AvatarSource, ContributorSource};

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Contributor listing port.
    pub contributors: Box<dyn ContributorSource>,
    /// Avatar download port.
    pub avatars: Box<dyn AvatarSource>,
    /// Base URL for contributor profile links.
    pub profile_base: String,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// The context that produced this session must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<std::path::PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapters still have references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context against the configured API.
    ///
    /// The token is resolved by the caller and passed in explicitly.
    #[must_use]
    pub fn live(github: &GitHubConfig, token: Option<String>) -> Self {
        if token.is_none() {
            tracing::warn!(
                "no API token configured; requests are unauthenticated and rate limited"
            );
        }
        let client = Client::new();
        Self {
            contributors: Box::new(GitHubContributors::new(client.clone(), github, token)),
            avatars: Box::new(HttpAvatars::new(client, github.user_agent.clone())),
            profile_base: profile_base(github),
        }
    }

    /// Create a recording context that wraps live adapters with a recorder.
    #[must_use]
    pub fn recording(github: &GitHubConfig, token: Option<String>) -> (Self, RecordingSession) {
        let live_ctx = Self::live(github, token);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = std::path::PathBuf::from(".contribgrid/cassettes").join(&timestamp);

        let commit = get_commit_hash();
        let path = output_dir.join("session.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-session"),
            &commit,
        )));

        let ctx = Self {
            contributors: Box::new(RecordingContributorSource::new(
                live_ctx.contributors,
                Arc::clone(&recorder),
            )),
            avatars: Box::new(RecordingAvatarSource::new(live_ctx.avatars, Arc::clone(&recorder))),
            profile_base: live_ctx.profile_base,
        };
        let session = RecordingSession { recorder };

        (ctx, session)
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path, github: &GitHubConfig) -> Result<Self, GridError> {
        let replayer = load_cassette(path)
            .map_err(|e| GridError::Config(format!("Failed to load cassette: {e}")))?;
        let replayer = Arc::new(Mutex::new(replayer));
        Ok(Self {
            contributors: Box::new(ReplayingContributorSource::new(Arc::clone(&replayer))),
            avatars: Box::new(ReplayingAvatarSource::new(replayer)),
            profile_base: profile_base(github),
        })
    }
}

fn profile_base(github: &GitHubConfig) -> String {
    github.web_base.trim_end_matches('/').to_string()
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
