//! Recording adapters that capture interactions to cassettes.

pub mod avatar_source;
pub mod contributor_source;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Reserve a cassette slot for a call that is about to be issued.
pub(crate) fn begin_call<I: Serialize>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
) -> u64 {
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.begin(port, method, input_json)
}

/// Record a `Result<T, E>` into its reserved slot using the Ok/Err JSON convention.
pub(crate) fn complete_call<T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    seq: u64,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
{
    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize Ok value");
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.complete(seq, output_json);
}
