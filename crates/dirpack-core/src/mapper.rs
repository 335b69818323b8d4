//! Mapping of relative paths to container entry names.

use crate::path;

/// Normalized local-path prefix under which selected entries are stored.
///
/// Leading slashes are dropped, separators are normalized, and an empty
/// prefix, `/`, or `.` means "no prefix": entries then keep their relative
/// path unchanged.
///
/// # Examples
///
/// ```
/// use dirpack_core::LocalPrefix;
///
/// let prefix = LocalPrefix::new("/to/path//");
/// assert_eq!(prefix.as_str(), "to/path/");
/// assert_eq!(prefix.map("empty dir/"), "to/path/empty dir/");
///
/// let root = LocalPrefix::new("/");
/// assert!(root.is_empty());
/// assert_eq!(root.map("text file.txt"), "text file.txt");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalPrefix {
    /// Empty, or the prefix with exactly one trailing slash.
    prefix: String,
}

impl LocalPrefix {
    /// Normalizes `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let normalized = path::normalize_separators(prefix);
        let trimmed = path::trim_slashes(&normalized);
        if trimmed.is_empty() || trimmed == "." {
            return Self::default();
        }
        Self {
            prefix: format!("{trimmed}/"),
        }
    }

    /// The normalized prefix, empty or ending in `/`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` when entries map to their relative path unchanged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Builds the local name of `relative_path`.
    ///
    /// Directory names keep their trailing `/`; file names never gain one.
    #[must_use]
    pub fn map(&self, relative_path: &str) -> String {
        let mut name = String::with_capacity(self.prefix.len() + relative_path.len());
        name.push_str(&self.prefix);
        name.push_str(relative_path);
        name
    }
}

impl From<&str> for LocalPrefix {
    fn from(prefix: &str) -> Self {
        Self::new(prefix)
    }
}

impl From<String> for LocalPrefix {
    fn from(prefix: String) -> Self {
        Self::new(&prefix)
    }
}

impl From<&String> for LocalPrefix {
    fn from(prefix: &String) -> Self {
        Self::new(prefix)
    }
}

impl std::fmt::Display for LocalPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix)
    }
}
