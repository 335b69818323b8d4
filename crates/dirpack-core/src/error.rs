//! Error types for selection operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `SelectionError`.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Errors that can occur while selecting entries for a container.
#[derive(Error, Debug)]
pub enum SelectionError {
    /// Reading a directory or file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Traversal root does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing root.
        path: PathBuf,
    },

    /// Traversal root exists but is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending root.
        path: PathBuf,
    },

    /// Directory traversal failed below the root.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A directory entry name is not valid UTF-8.
    #[error("entry name is not valid UTF-8: {path}")]
    InvalidName {
        /// Full path of the entry.
        path: PathBuf,
    },

    /// Glob or regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The container refused an entry.
    #[error("cannot add '{name}': {reason}")]
    Sink {
        /// Local name of the rejected entry.
        name: String,
        /// Reason given by the container.
        reason: String,
    },

    /// Selection configuration is inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },
}

impl SelectionError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error was caused by filesystem access.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::SelectionError;
    /// use std::path::PathBuf;
    ///
    /// let err = SelectionError::SourceNotFound {
    ///     path: PathBuf::from("/missing"),
    /// };
    /// assert!(err.is_io());
    /// assert!(!err.is_pattern_error());
    /// ```
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::SourceNotFound { .. }
                | Self::NotADirectory { .. }
                | Self::Walk(_)
                | Self::InvalidName { .. }
        )
    }

    /// Returns `true` if a glob or regex was malformed.
    #[must_use]
    pub const fn is_pattern_error(&self) -> bool {
        matches!(self, Self::Pattern { .. })
    }

    /// Returns the filesystem path involved in the error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::SourceNotFound { path }
            | Self::NotADirectory { path }
            | Self::InvalidName { path } => Some(path),
            Self::Walk(err) => err.path(),
            _ => None,
        }
    }
}
