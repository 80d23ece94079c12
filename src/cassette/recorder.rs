//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records interactions and writes them as a YAML cassette file.
///
/// Calls are recorded in two steps: [`begin`](Self::begin) when the call is
/// issued and [`complete`](Self::complete) when its result arrives. Sequence
/// numbers therefore follow issue order even when concurrent calls finish
/// out of order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Reserve the next sequence slot for a call that has just been issued.
    pub fn begin(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
    ) -> u64 {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output: serde_json::Value::Null,
        });
        seq
    }

    /// Store the result of the call recorded at `seq`.
    pub fn complete(&mut self, seq: u64, output: serde_json::Value) {
        let slot = usize::try_from(seq).ok().and_then(|i| self.interactions.get_mut(i));
        if let Some(interaction) = slot {
            interaction.output = output;
        }
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn out_of_order_completion_keeps_issue_order() {
        let dir = std::env::temp_dir().join("contribgrid_cassette_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording", "deadbeef");
        let page2 = recorder.begin("contributor_source", "fetch_page", json!({"page": 2}));
        let page3 = recorder.begin("contributor_source", "fetch_page", json!({"page": 3}));
        assert_eq!((page2, page3), (0, 1));

        recorder.complete(page3, json!({"Ok": []}));
        recorder.complete(page2, json!({"Ok": [{"login": "octocat", "avatar_url": "u"}]}));

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("contributor_source"));
        assert!(content.contains("octocat"));

        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[0].input, json!({"page": 2}));
        assert_eq!(cassette.interactions[0].output["Ok"][0]["login"], "octocat");
        assert_eq!(cassette.interactions[1].output, json!({"Ok": []}));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
