//! Configuration for selection operations.

use crate::Result;
use crate::SelectionError;
use std::path::Path;
use std::path::PathBuf;

/// Which directory entries are registered as placeholders in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryPolicy {
    /// Every selected directory becomes an empty-directory placeholder.
    #[default]
    All,

    /// Only directories with no children on disk become placeholders.
    ///
    /// Non-empty directories are implied by the files below them.
    EmptyOnly,
}

/// How symbolic links met during traversal are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Skip links and record a warning in the report.
    #[default]
    Skip,

    /// Walk through links as if they were their targets.
    ///
    /// Link loops surface as [`SelectionError::Walk`].
    Follow,
}

/// Configuration shared by all selection entry-points.
///
/// # Examples
///
/// ```
/// use dirpack_core::DirectoryPolicy;
/// use dirpack_core::SelectionConfig;
/// use dirpack_core::SymlinkPolicy;
///
/// let config = SelectionConfig::default()
///     .with_directories(DirectoryPolicy::EmptyOnly)
///     .with_symlinks(SymlinkPolicy::Follow)
///     .with_max_depth(Some(4));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Directory placeholder policy.
    ///
    /// Default: [`DirectoryPolicy::All`].
    pub directories: DirectoryPolicy,

    /// Symbolic link policy.
    ///
    /// Default: [`SymlinkPolicy::Skip`].
    pub symlinks: SymlinkPolicy,

    /// Deepest level a recursive walk descends to (1 = direct children).
    ///
    /// `None` means unlimited. Flat walks always stop at depth 1.
    ///
    /// Default: `None`.
    pub max_depth: Option<usize>,

    /// Filesystem paths never handed to the sink, compared with the walked
    /// path (the walk root joined with the relative name).
    ///
    /// Used to keep an archive that is being written inside the walked
    /// tree out of itself.
    ///
    /// Default: empty.
    pub excluded: Vec<PathBuf>,
}

impl SelectionConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory placeholder policy.
    #[must_use]
    pub fn with_directories(mut self, policy: DirectoryPolicy) -> Self {
        self.directories = policy;
        self
    }

    /// Sets the symbolic link policy.
    #[must_use]
    pub fn with_symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    /// Sets the recursion depth cap.
    #[must_use]
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Adds a path to [`excluded`](Self::excluded).
    #[must_use]
    pub fn with_excluded(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// Returns `true` if `path` was excluded.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|excluded| excluded == path)
    }

    /// Returns `true` if symbolic links are followed.
    #[must_use]
    pub fn follow_symlinks(&self) -> bool {
        self.symlinks == SymlinkPolicy::Follow
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_depth` is `Some(0)`, which would select
    /// nothing at all.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(SelectionError::InvalidConfig {
                reason: "max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
