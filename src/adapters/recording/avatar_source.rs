//! Recording adapter for the `AvatarSource` port.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{begin_call, complete_call};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::avatar_source::{AvatarFuture, AvatarSource, PORT};

/// Records avatar downloads while delegating to an inner implementation.
pub struct RecordingAvatarSource {
    inner: Box<dyn AvatarSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingAvatarSource {
    /// Creates a new recording source wrapping the given implementation.
    pub fn new(inner: Box<dyn AvatarSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl AvatarSource for RecordingAvatarSource {
    fn fetch_avatar(&self, url: &str) -> AvatarFuture<'_> {
        let seq = begin_call(&self.recorder, PORT, "fetch_avatar", &json!({ "url": url }));
        let pending = self.inner.fetch_avatar(url);
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = pending.await;
            complete_call(&recorder, seq, &result);
            result
        })
    }
}
