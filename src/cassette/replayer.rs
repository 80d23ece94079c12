//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut sorted = cassette.interactions.clone();
        sorted.sort_by_key(|i| i.seq);

        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in sorted {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction);
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette has no (more) interactions for the
    /// given port/method combination.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let interaction = queue.get(*cursor).ok_or_else(|| {
            format!(
                "Cassette exhausted: all {} interactions for {port}::{method} have been consumed",
                queue.len()
            )
        })?;
        *cursor += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, page: u32) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: "fetch".into(),
            input: json!({"page": page}),
            output: json!({"Ok": []}),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        let recorded_at = Utc::now();
        Cassette { name: "test".into(), recorded_at, commit: "abc".into(), interactions }
    }

    #[test]
    fn replay_in_seq_order_per_port() {
        let cassette = make_cassette(vec![
            interaction(2, "contributor_source", 2),
            interaction(1, "avatar_source", 0),
            interaction(0, "contributor_source", 1),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);

        let first = replayer.next_interaction("contributor_source", "fetch").unwrap();
        assert_eq!(first.input["page"], 1);
        let second = replayer.next_interaction("contributor_source", "fetch").unwrap();
        assert_eq!(second.input["page"], 2);
        assert_eq!(replayer.next_interaction("avatar_source", "fetch").unwrap().seq, 1);
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![interaction(0, "contributor_source", 1)]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert!(replayer.next_interaction("contributor_source", "fetch").is_ok());
        let err = replayer.next_interaction("contributor_source", "fetch").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_port_errors() {
        let cassette = make_cassette(vec![]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("unknown", "method").unwrap_err();
        assert!(err.contains("no interactions recorded"));
    }
}
