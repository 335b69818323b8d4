//! Error conversion utilities for CLI.
//!
//! Converts dirpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use dirpack_core::SelectionError;
use std::path::Path;

/// Converts `SelectionError` to user-friendly anyhow error with context
pub fn convert_selection_error(err: SelectionError, root: &Path) -> anyhow::Error {
    match err {
        SelectionError::SourceNotFound { path } => {
            anyhow!("Source directory not found: {}", path.display())
        }
        SelectionError::NotADirectory { path } => {
            anyhow!(
                "Source is not a directory: {}\n\
                 HINT: Pass the directory that contains the file instead.",
                path.display()
            )
        }
        SelectionError::Pattern { pattern, reason } => {
            anyhow!(
                "Invalid pattern '{pattern}': {reason}\n\
                 HINT: Quote the pattern so the shell does not expand it."
            )
        }
        SelectionError::Walk(walk_err) if walk_err.loop_ancestor().is_some() => {
            anyhow!(
                "Symbolic link loop below '{}': {}\n\
                 HINT: Drop --follow-symlinks to skip links instead.",
                root.display(),
                walk_err
            )
        }
        SelectionError::Sink { name, reason } => {
            anyhow!(
                "Cannot add '{name}' to the archive: {reason}\n\
                 HINT: Archives cannot hold two entries with the same name; check --prefix."
            )
        }
        SelectionError::InvalidConfig { reason } => anyhow!("Invalid options: {reason}"),
        _ => anyhow::Error::from(err).context(format!("Error selecting from '{}'", root.display())),
    }
}

/// Adds context to a selection result
pub fn add_selection_context<T>(
    result: Result<T, SelectionError>,
    root: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_selection_error(e, root))
}
