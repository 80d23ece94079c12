//! Replaying adapters that serve recorded interactions from cassettes.

pub mod avatar_source;
pub mod contributor_source;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::GridError;

/// Retrieve the next recorded output for a given port and method.
///
/// Called when a request is issued, not when it is awaited, so concurrent
/// calls consume the cassette in issue order.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, GridError> {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output.clone())
        .map_err(|message| GridError::Upstream { status: 0, message })
}

/// Deserialize a replayed output as `Result<T, GridError>`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, GridError> {
    let decode = |value: serde_json::Value| {
        serde_json::from_value(value).map_err(|e| GridError::Upstream {
            status: 0,
            message: format!("Malformed cassette output: {e}"),
        })
    };

    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        let message = err_val.as_str().unwrap_or("replayed error").to_string();
        return Err(GridError::Upstream { status: 0, message });
    }
    if let Some(ok_val) = output.get("Ok").or_else(|| output.get("ok")) {
        return decode(ok_val.clone());
    }
    decode(output)
}
