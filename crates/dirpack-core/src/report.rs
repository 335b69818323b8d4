//! Selection operation reporting.

use std::time::Duration;

/// Report of one or more selection calls.
///
/// # Examples
///
/// ```
/// use dirpack_core::SelectionReport;
///
/// let mut report = SelectionReport::default();
/// report.record_file("docs/readme.txt", 120);
/// report.record_directory("docs/");
///
/// assert_eq!(report.total_entries(), 2);
/// assert_eq!(report.bytes_read, 120);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    /// Number of files handed to the sink.
    pub files_added: usize,

    /// Number of directory placeholders handed to the sink.
    pub directories_added: usize,

    /// Total bytes of file content read from the source tree.
    pub bytes_read: u64,

    /// Entries passed over (unfollowed symlinks, non-empty directories
    /// under `DirectoryPolicy::EmptyOnly`).
    pub entries_skipped: usize,

    /// Warnings generated during selection.
    pub warnings: Vec<String>,

    /// Local names handed to the sink, in emission order.
    pub local_names: Vec<String>,

    /// Wall-clock duration of the selection.
    pub duration: Duration,
}

impl SelectionReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file handed to the sink.
    pub fn record_file(&mut self, local_name: impl Into<String>, bytes: u64) {
        self.files_added += 1;
        self.bytes_read = self.bytes_read.saturating_add(bytes);
        self.local_names.push(local_name.into());
    }

    /// Records a directory placeholder handed to the sink.
    pub fn record_directory(&mut self, local_name: impl Into<String>) {
        self.directories_added += 1;
        self.local_names.push(local_name.into());
    }

    /// Records a skipped entry, with an optional warning.
    pub fn record_skip(&mut self, warning: Option<String>) {
        self.entries_skipped += 1;
        if let Some(warning) = warning {
            self.warnings.push(warning);
        }
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of entries handed to the sink.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }

    /// Folds another report into this one.
    ///
    /// ```
    /// use dirpack_core::SelectionReport;
    ///
    /// let mut first = SelectionReport::default();
    /// first.record_file("a", 1);
    /// let mut second = SelectionReport::default();
    /// second.record_file("b", 2);
    ///
    /// first.merge(second);
    /// assert_eq!(first.files_added, 2);
    /// assert_eq!(first.local_names, vec!["a", "b"]);
    /// ```
    pub fn merge(&mut self, other: Self) {
        self.files_added += other.files_added;
        self.directories_added += other.directories_added;
        self.bytes_read = self.bytes_read.saturating_add(other.bytes_read);
        self.entries_skipped += other.entries_skipped;
        self.warnings.extend(other.warnings);
        self.local_names.extend(other.local_names);
        self.duration += other.duration;
    }
}
