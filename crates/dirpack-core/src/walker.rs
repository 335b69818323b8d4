//! Directory tree walking.
//!
//! [`DirectoryWalker`] turns a root directory into a lazy sequence of
//! [`FileSystemEntry`] values, either for the direct children of the root
//! ([`WalkMode::Flat`]) or for every descendant ([`WalkMode::Recursive`]).
//! The root itself is never yielded. Entries are visited depth-first with
//! siblings sorted by file name, so repeated walks of an unchanged tree
//! produce the same sequence.

use crate::Result;
use crate::SelectionError;
use crate::config::SelectionConfig;
use crate::ignore::IgnoreFilter;
use crate::ignore::IgnoreSet;
use crate::path;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// How deep a walk descends below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Direct children only. Subdirectories are yielded but not entered.
    Flat,

    /// Every descendant at every depth, directories included.
    Recursive,
}

/// Kind of a walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,

    /// Directory.
    Directory,

    /// Symbolic link that was not followed.
    Symlink,

    /// FIFO, socket, or device node. Never read.
    Other,
}

/// One entry produced by a walk.
///
/// # Examples
///
/// ```
/// use dirpack_core::walker::EntryKind;
/// use dirpack_core::walker::FileSystemEntry;
///
/// let entry = FileSystemEntry::new("docs/", EntryKind::Directory, "/srv/docs");
/// assert!(entry.is_directory());
/// assert_eq!(entry.depth(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemEntry {
    relative_path: String,
    kind: EntryKind,
    path: PathBuf,
}

impl FileSystemEntry {
    /// Creates an entry from its parts.
    ///
    /// `relative_path` is expected in the crate's relative-name form: `/`
    /// separators, no leading slash, trailing slash for directories.
    pub fn new(relative_path: impl Into<String>, kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind,
            path: path.into(),
        }
    }

    /// Relative name below the walk root.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Relative name without the directory marker.
    #[must_use]
    pub fn relative_path_trimmed(&self) -> &str {
        self.relative_path.trim_end_matches('/')
    }

    /// Full filesystem path, used to read file content.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns `true` for directories.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Number of path segments below the root (direct children have depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        path::depth(&self.relative_path)
    }

    /// Returns `true` if this entry lies strictly below the directory named
    /// by `directory` (a relative name with trailing slash).
    #[must_use]
    pub fn is_within(&self, directory: &str) -> bool {
        directory.ends_with('/')
            && self.relative_path.len() > directory.len()
            && self.relative_path.starts_with(directory)
    }
}

/// Any producer of walked entries.
///
/// Implemented for every iterator over `Result<FileSystemEntry>`: a raw
/// [`Walk`], an [`IgnoreFilter`] wrapping one, or a caller-built sequence.
pub trait EntrySource: Iterator<Item = Result<FileSystemEntry>> {
    /// Wraps this source in an [`IgnoreFilter`].
    fn ignoring(self, ignore: IgnoreSet) -> IgnoreFilter<Self>
    where
        Self: Sized,
    {
        IgnoreFilter::new(self, ignore)
    }
}

impl<I> EntrySource for I where I: Iterator<Item = Result<FileSystemEntry>> {}

/// Walks a directory tree in flat or recursive mode.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::walker::DirectoryWalker;
///
/// for entry in DirectoryWalker::recursive("./project").walk()? {
///     let entry = entry?;
///     println!("{}", entry.relative_path());
/// }
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
    mode: WalkMode,
    follow_symlinks: bool,
    max_depth: Option<usize>,
}

impl DirectoryWalker {
    /// Creates a walker for `root` in the given mode.
    pub fn new(root: impl Into<PathBuf>, mode: WalkMode) -> Self {
        Self {
            root: root.into(),
            mode,
            follow_symlinks: false,
            max_depth: None,
        }
    }

    /// Creates a walker over the direct children of `root`.
    pub fn flat(root: impl Into<PathBuf>) -> Self {
        Self::new(root, WalkMode::Flat)
    }

    /// Creates a walker over every descendant of `root`.
    pub fn recursive(root: impl Into<PathBuf>) -> Self {
        Self::new(root, WalkMode::Recursive)
    }

    /// Applies the symlink policy and depth cap of `config`.
    #[must_use]
    pub fn with_config(mut self, config: &SelectionConfig) -> Self {
        self.follow_symlinks = config.follow_symlinks();
        self.max_depth = config.max_depth;
        self
    }

    /// Walk root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk mode.
    #[must_use]
    pub const fn mode(&self) -> WalkMode {
        self.mode
    }

    /// Starts the walk.
    ///
    /// The root is checked eagerly; everything below it is read lazily as
    /// the returned iterator is advanced.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist, is not a directory, or
    /// cannot be inspected.
    pub fn walk(self) -> Result<Walk> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SelectionError::SourceNotFound {
                    path: self.root.clone(),
                }
            } else {
                SelectionError::io(&self.root, e)
            }
        })?;
        if !metadata.is_dir() {
            return Err(SelectionError::NotADirectory { path: self.root });
        }

        let max_depth = match self.mode {
            WalkMode::Flat => 1,
            WalkMode::Recursive => self.max_depth.unwrap_or(usize::MAX),
        };

        let inner = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        tracing::debug!(
            root = %self.root.display(),
            mode = ?self.mode,
            follow_symlinks = self.follow_symlinks,
            "starting walk"
        );

        Ok(Walk {
            root: self.root,
            inner,
        })
    }
}

/// Lazy, single-pass sequence of entries produced by [`DirectoryWalker::walk`].
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Walk {
    /// Walk root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stops the walk from descending into the directory it yielded last.
    pub fn skip_current_dir(&mut self) {
        self.inner.skip_current_dir();
    }

    /// Wraps this walk in an [`IgnoreFilter`] that never reads below a
    /// dropped directory.
    ///
    /// Shadows [`EntrySource::ignoring`], which cannot reach into the walk.
    #[must_use]
    pub fn ignoring(self, ignore: IgnoreSet) -> IgnoreFilter<Self> {
        IgnoreFilter::with_subtree_skip(self, ignore, Self::skip_current_dir)
    }

    fn build_entry(&self, entry: &walkdir::DirEntry) -> Result<FileSystemEntry> {
        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        };

        let relative = path::relative_name(&self.root, entry.path(), kind == EntryKind::Directory)?;
        Ok(FileSystemEntry::new(relative, kind, entry.path()))
    }
}

impl Iterator for Walk {
    type Item = Result<FileSystemEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(SelectionError::Walk(e))),
        };
        Some(self.build_entry(&entry))
    }
}

impl std::fmt::Debug for Walk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walk").field("root", &self.root).finish_non_exhaustive()
    }
}
