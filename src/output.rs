//! Output file naming and writing.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::GridError;
use crate::model::{OutputFormat, RepoId};

/// Where rendered bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output.
    Stdout,
    /// A file path.
    File(PathBuf),
}

/// Generate an output filename for a repository's grid.
#[must_use]
pub fn auto_filename(repo: &RepoId, format: OutputFormat) -> String {
    let owner = sanitize_for_filename(&repo.owner, 40);
    let name = sanitize_for_filename(&repo.name, 40);
    format!("{owner}-{name}-contributors.{}", format.extension())
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "repo".to_string()
    } else {
        result
    }
}

/// Resolve the output target: `-` for stdout, an explicit path, or an auto-generated name.
#[must_use]
pub fn resolve_output(explicit: Option<&str>, repo: &RepoId, format: OutputFormat) -> OutputTarget {
    match explicit {
        Some("-") => OutputTarget::Stdout,
        Some(p) => OutputTarget::File(PathBuf::from(p)),
        None => OutputTarget::File(PathBuf::from(auto_filename(repo, format))),
    }
}

/// Write rendered bytes to the target.
///
/// # Errors
///
/// Returns an error if the file or stdout cannot be written.
pub fn write_output(bytes: &[u8], target: &OutputTarget) -> Result<(), GridError> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
        OutputTarget::File(path) => write_file(bytes, path),
    }
}

fn write_file(bytes: &[u8], path: &Path) -> Result<(), GridError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).map_err(GridError::Io)
}
