//! Selection pipeline.
//!
//! A [`Selector`] owns an [`EntrySink`] and runs one pipeline per call:
//!
//! ```text
//! walker -> (ignore filter)? -> (pattern)? -> prefix mapping -> sink
//! ```
//!
//! Every entry-point is independent. Patterns are compiled and the root is
//! checked before the first entry reaches the sink, so a malformed pattern
//! or a missing root leaves the sink untouched. A read failure mid-walk
//! aborts the call; entries already handed to the sink stay there.

use crate::Result;
use crate::SelectionError;
use crate::config::DirectoryPolicy;
use crate::config::SelectionConfig;
use crate::mapper::LocalPrefix;
use crate::pattern::Pattern;
use crate::report::SelectionReport;
use crate::sink::EntrySink;
use crate::walker::DirectoryWalker;
use crate::walker::EntryKind;
use crate::walker::EntrySource;
use crate::walker::FileSystemEntry;
use crate::walker::WalkMode;
use std::path::Path;
use std::time::Instant;

/// Runs selection entry-points against a sink.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::MemorySink;
/// use dirpack_core::Selector;
///
/// let mut selector = Selector::new(MemorySink::new());
/// let report = selector.add_files_from_glob_recursive("./assets", "**.{png,svg}", "static")?;
/// println!("selected {} files", report.files_added);
///
/// for name in selector.sink().names() {
///     println!("{name}");
/// }
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
#[derive(Debug)]
pub struct Selector<S> {
    sink: S,
    config: SelectionConfig,
}

impl<S: EntrySink> Selector<S> {
    /// Creates a selector with the default configuration.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            config: SelectionConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SelectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// The sink receiving entries.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the selector, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Adds the direct children of `root`.
    ///
    /// Subdirectories become placeholders but are not entered.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be walked, a file cannot be read,
    /// or the sink refuses an entry.
    pub fn add_dir(
        &mut self,
        root: impl AsRef<Path>,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport> {
        self.select(root.as_ref(), WalkMode::Flat, None, &prefix.into())
    }

    /// Adds every descendant of `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be walked, a file cannot be read,
    /// or the sink refuses an entry.
    pub fn add_dir_recursive(
        &mut self,
        root: impl AsRef<Path>,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport> {
        self.select(root.as_ref(), WalkMode::Recursive, None, &prefix.into())
    }

    /// Adds every entry produced by `source`.
    ///
    /// `source` may be a raw [`Walk`](crate::walker::Walk), an
    /// [`IgnoreFilter`](crate::ignore::IgnoreFilter) wrapping one, or any
    /// other iterator of entries. Its depth is whatever it was built with.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by `source`, a file read error, or
    /// a sink error.
    pub fn add_files_from_iter<I>(
        &mut self,
        source: I,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport>
    where
        I: IntoIterator<Item = Result<FileSystemEntry>>,
        I::IntoIter: EntrySource,
    {
        self.config.validate()?;
        let prefix = prefix.into();
        tracing::debug!(prefix = prefix.as_str(), "selecting from entry source");
        self.run(source.into_iter(), None, &prefix)
    }

    /// Adds the direct children of `root` whose relative path matches `glob`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] before walking if `glob` is
    /// malformed; otherwise as [`add_dir`](Self::add_dir).
    pub fn add_files_from_glob(
        &mut self,
        root: impl AsRef<Path>,
        glob: &str,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport> {
        let pattern = Pattern::glob(glob)?;
        self.select(root.as_ref(), WalkMode::Flat, Some(&pattern), &prefix.into())
    }

    /// Adds every descendant of `root` whose relative path matches `glob`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] before walking if `glob` is
    /// malformed; otherwise as [`add_dir_recursive`](Self::add_dir_recursive).
    pub fn add_files_from_glob_recursive(
        &mut self,
        root: impl AsRef<Path>,
        glob: &str,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport> {
        let pattern = Pattern::glob(glob)?;
        self.select(
            root.as_ref(),
            WalkMode::Recursive,
            Some(&pattern),
            &prefix.into(),
        )
    }

    /// Adds the direct children of `root` whose relative path contains a
    /// match of `regex`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] before walking if `regex` is
    /// malformed; otherwise as [`add_dir`](Self::add_dir).
    pub fn add_files_from_regex(
        &mut self,
        root: impl AsRef<Path>,
        regex: &str,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport> {
        let pattern = Pattern::regex(regex)?;
        self.select(root.as_ref(), WalkMode::Flat, Some(&pattern), &prefix.into())
    }

    /// Adds every descendant of `root` whose relative path contains a match
    /// of `regex`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] before walking if `regex` is
    /// malformed; otherwise as [`add_dir_recursive`](Self::add_dir_recursive).
    pub fn add_files_from_regex_recursive(
        &mut self,
        root: impl AsRef<Path>,
        regex: &str,
        prefix: impl Into<LocalPrefix>,
    ) -> Result<SelectionReport> {
        let pattern = Pattern::regex(regex)?;
        self.select(
            root.as_ref(),
            WalkMode::Recursive,
            Some(&pattern),
            &prefix.into(),
        )
    }

    /// Registers `source` under `prefix`.
    ///
    /// Same as [`add_files_from_iter`](Self::add_files_from_iter) with the
    /// arguments swapped.
    ///
    /// # Errors
    ///
    /// As [`add_files_from_iter`](Self::add_files_from_iter).
    pub fn insert<I>(&mut self, prefix: impl Into<LocalPrefix>, source: I) -> Result<SelectionReport>
    where
        I: IntoIterator<Item = Result<FileSystemEntry>>,
        I::IntoIter: EntrySource,
    {
        self.add_files_from_iter(source, prefix)
    }

    fn select(
        &mut self,
        root: &Path,
        mode: WalkMode,
        pattern: Option<&Pattern>,
        prefix: &LocalPrefix,
    ) -> Result<SelectionReport> {
        self.config.validate()?;
        tracing::debug!(
            root = %root.display(),
            ?mode,
            pattern = pattern.map(|p| p.spec().as_str()),
            prefix = prefix.as_str(),
            "selecting entries"
        );

        let walk = DirectoryWalker::new(root, mode)
            .with_config(&self.config)
            .walk()?;
        self.run(walk, pattern, prefix)
    }

    fn run<I>(
        &mut self,
        entries: I,
        pattern: Option<&Pattern>,
        prefix: &LocalPrefix,
    ) -> Result<SelectionReport>
    where
        I: Iterator<Item = Result<FileSystemEntry>>,
    {
        let start = Instant::now();
        let mut report = SelectionReport::new();

        for entry in entries {
            let entry = entry?;

            if pattern.is_some_and(|p| !p.matches_entry(&entry)) {
                continue;
            }

            self.emit(&entry, prefix, &mut report)?;
        }

        report.duration = start.elapsed();
        tracing::debug!(
            files = report.files_added,
            directories = report.directories_added,
            skipped = report.entries_skipped,
            "selection complete"
        );
        Ok(report)
    }

    fn emit(
        &mut self,
        entry: &FileSystemEntry,
        prefix: &LocalPrefix,
        report: &mut SelectionReport,
    ) -> Result<()> {
        if self.config.is_excluded(entry.path()) {
            let warning = format!("skipped excluded path: {}", entry.relative_path());
            tracing::warn!(entry = entry.relative_path(), "skipping excluded path");
            report.record_skip(Some(warning));
            return Ok(());
        }

        match entry.kind() {
            EntryKind::Symlink => {
                let warning = format!("skipped symbolic link: {}", entry.relative_path());
                tracing::warn!(entry = entry.relative_path(), "skipping symbolic link");
                report.record_skip(Some(warning));
            }
            EntryKind::Other => {
                let warning = format!("skipped special file: {}", entry.relative_path());
                tracing::warn!(entry = entry.relative_path(), "skipping special file");
                report.record_skip(Some(warning));
            }
            EntryKind::Directory => {
                if self.config.directories == DirectoryPolicy::EmptyOnly
                    && !is_empty_directory(entry.path())?
                {
                    report.record_skip(None);
                    return Ok(());
                }
                let local_name = prefix.map(entry.relative_path());
                tracing::trace!(local_name = local_name.as_str(), "adding empty directory");
                self.sink.add_empty_directory(&local_name)?;
                report.record_directory(local_name);
            }
            EntryKind::File => {
                let content = std::fs::read(entry.path())
                    .map_err(|e| SelectionError::io(entry.path(), e))?;
                let size = content.len() as u64;
                let local_name = prefix.map(entry.relative_path());
                tracing::trace!(local_name = local_name.as_str(), size, "adding file");
                self.sink.add_file(&local_name, content)?;
                report.record_file(local_name, size);
            }
        }
        Ok(())
    }
}

fn is_empty_directory(path: &Path) -> Result<bool> {
    let mut children = std::fs::read_dir(path).map_err(|e| SelectionError::io(path, e))?;
    Ok(children.next().is_none())
}
