//! Replaying adapter for the `AvatarSource` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::avatar_source::{AvatarBytes, AvatarFuture, AvatarSource, PORT};

/// Serves recorded avatar downloads from a cassette.
pub struct ReplayingAvatarSource {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingAvatarSource {
    /// Create a replaying source backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl AvatarSource for ReplayingAvatarSource {
    fn fetch_avatar(&self, _url: &str) -> AvatarFuture<'_> {
        let output = next_output(&self.replayer, PORT, "fetch_avatar");
        Box::pin(async move { output.and_then(replay_result::<AvatarBytes>) })
    }
}
