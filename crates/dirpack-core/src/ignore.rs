//! Ignore-list filtering with subtree pruning.
//!
//! An [`IgnoreSet`] holds relative names that must not reach the container.
//! [`IgnoreFilter`] wraps any entry source and drops every entry named in
//! the set; when the dropped entry is a directory, everything below it is
//! dropped too, however deep the wrapped walk goes. Wrapping a
//! [`Walk`](crate::walker::Walk) also stops the walk from reading the
//! dropped directory at all.

use crate::Result;
use crate::path;
use crate::walker::FileSystemEntry;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

/// How ignore strings are compared with relative names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IgnoreMatch {
    /// The whole relative name must equal the ignore string.
    #[default]
    Exact,

    /// The relative name may also end with the ignore string at a segment
    /// boundary, so `list.txt` ignores `category/list.txt`.
    PathSuffix,
}

/// Set of relative names to leave out of a selection.
///
/// Ignore strings use the relative-name form of the walker. A string with a
/// trailing `/` names a directory only; without it, the string names a file
/// or a directory at that path. Backslashes, doubled slashes, and leading
/// slashes are normalized away on insertion.
///
/// # Examples
///
/// ```
/// use dirpack_core::ignore::IgnoreSet;
///
/// let ignore = IgnoreSet::new(["empty dir/", "Текстовый документ.txt"]);
/// assert_eq!(ignore.len(), 2);
/// assert!(ignore.contains("empty dir/"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    /// Names matching files and directories alike.
    any: BTreeSet<String>,
    /// Names matching directories only, stored without trailing slash.
    directories: BTreeSet<String>,
    mode: IgnoreMatch,
}

impl IgnoreSet {
    /// Creates a set from ignore strings using exact matching.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for entry in entries {
            set.insert(entry.as_ref());
        }
        set
    }

    /// Sets the matching mode.
    #[must_use]
    pub fn with_match(mut self, mode: IgnoreMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Matching mode.
    #[must_use]
    pub const fn match_mode(&self) -> IgnoreMatch {
        self.mode
    }

    /// Adds an ignore string. Empty strings are dropped.
    pub fn insert(&mut self, entry: &str) {
        let normalized = path::normalize_separators(entry);
        let normalized = normalized.trim_start_matches('/');
        if let Some(directory) = normalized.strip_suffix('/') {
            if !directory.is_empty() {
                self.directories.insert(directory.to_string());
            }
        } else if !normalized.is_empty() {
            self.any.insert(normalized.to_string());
        }
    }

    /// Returns `true` if the set holds `entry` (after normalization).
    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        let normalized = path::normalize_separators(entry);
        let normalized = normalized.trim_start_matches('/');
        normalized.strip_suffix('/').map_or_else(
            || self.any.contains(normalized),
            |directory| self.directories.contains(directory),
        )
    }

    /// Number of ignore strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.any.len() + self.directories.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.any.is_empty() && self.directories.is_empty()
    }

    /// Returns `true` if `entry` is named by this set.
    #[must_use]
    pub fn matches(&self, entry: &FileSystemEntry) -> bool {
        let name = entry.relative_path_trimmed();
        let is_directory = entry.is_directory();

        if self.names(name, is_directory) {
            return true;
        }

        match self.mode {
            IgnoreMatch::Exact => false,
            IgnoreMatch::PathSuffix => name
                .match_indices('/')
                .any(|(idx, _)| self.names(&name[idx + 1..], is_directory)),
        }
    }

    fn names(&self, name: &str, is_directory: bool) -> bool {
        self.any.contains(name) || (is_directory && self.directories.contains(name))
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnoreSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Entry source that suppresses ignored entries and their subtrees.
///
/// Errors from the wrapped source are passed through unless they concern a
/// path inside a dropped directory.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ignore::IgnoreFilter;
/// use dirpack_core::ignore::IgnoreSet;
/// use dirpack_core::walker::DirectoryWalker;
///
/// let walk = DirectoryWalker::recursive("./project").walk()?;
/// let filter = IgnoreFilter::new(walk, IgnoreSet::new(["target/", ".git/"]));
/// for entry in filter {
///     println!("{}", entry?.relative_path());
/// }
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub struct IgnoreFilter<I> {
    source: I,
    ignore: IgnoreSet,
    /// Relative names (with trailing slash) of directories already dropped.
    pruned: BTreeSet<String>,
    /// Filesystem paths of the same directories.
    pruned_paths: Vec<PathBuf>,
    /// Tells the source not to descend into the directory it just yielded.
    skip_subtree: Option<fn(&mut I)>,
}

impl<I> IgnoreFilter<I> {
    /// Wraps `source`, dropping entries named in `ignore`.
    pub fn new(source: I, ignore: IgnoreSet) -> Self {
        Self {
            source,
            ignore,
            pruned: BTreeSet::new(),
            pruned_paths: Vec::new(),
            skip_subtree: None,
        }
    }

    /// Like [`new`](Self::new), calling `skip_subtree` on the source right
    /// after it yields a directory that gets dropped.
    pub fn with_subtree_skip(source: I, ignore: IgnoreSet, skip_subtree: fn(&mut I)) -> Self {
        Self {
            skip_subtree: Some(skip_subtree),
            ..Self::new(source, ignore)
        }
    }

    /// The ignore set in use.
    #[must_use]
    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore
    }

    fn is_pruned(&self, entry: &FileSystemEntry) -> bool {
        if self.pruned.is_empty() {
            return false;
        }
        let name = entry.relative_path_trimmed();
        name.match_indices('/')
            .any(|(idx, _)| self.pruned.contains(&name[..=idx]))
    }

    fn is_pruned_path(&self, path: &Path) -> bool {
        self.pruned_paths.iter().any(|dir| path.starts_with(dir))
    }

    fn prune(&mut self, entry: &FileSystemEntry) {
        tracing::debug!(directory = entry.relative_path(), "pruning ignored subtree");
        if let Some(skip_subtree) = self.skip_subtree {
            skip_subtree(&mut self.source);
        }
        self.pruned.insert(entry.relative_path().to_string());
        self.pruned_paths.push(entry.path().to_path_buf());
    }
}

impl<I> Iterator for IgnoreFilter<I>
where
    I: Iterator<Item = Result<FileSystemEntry>>,
{
    type Item = Result<FileSystemEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.source.next()? {
                Ok(entry) => entry,
                Err(err) if err.path().is_some_and(|p| self.is_pruned_path(p)) => {
                    tracing::debug!(error = %err, "dropping error inside ignored subtree");
                    continue;
                }
                Err(err) => return Some(Err(err)),
            };

            if self.is_pruned(&entry) {
                continue;
            }

            if self.ignore.matches(&entry) {
                if entry.is_directory() {
                    self.prune(&entry);
                } else {
                    tracing::trace!(entry = entry.relative_path(), "ignoring entry");
                }
                continue;
            }

            return Some(Ok(entry));
        }
    }
}

impl<I: std::fmt::Debug> std::fmt::Debug for IgnoreFilter<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgnoreFilter")
            .field("source", &self.source)
            .field("ignore", &self.ignore)
            .field("pruned", &self.pruned)
            .finish_non_exhaustive()
    }
}
