//! Containers that receive selected entries.
//!
//! The selection pipeline emits one [`AddRequest`] per surviving entry and
//! hands it to an [`EntrySink`]. What the sink does with it (buffer it,
//! write a zip entry, append to a tar stream) is up to the sink, including
//! how it treats a name it has already seen.

pub mod tar;
pub mod zip;

pub use self::tar::TarSink;
pub use self::zip::ZipSink;

use crate::Result;
use std::collections::BTreeMap;

/// A single entry to register in a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    /// Name inside the container. Directories end with `/`.
    pub local_name: String,

    /// Whether this is an empty-directory placeholder.
    pub is_directory: bool,

    /// File content; `None` for directories.
    pub content: Option<Vec<u8>>,
}

impl AddRequest {
    /// Creates a file request.
    pub fn file(local_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            local_name: local_name.into(),
            is_directory: false,
            content: Some(content),
        }
    }

    /// Creates an empty-directory placeholder request.
    pub fn directory(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            is_directory: true,
            content: None,
        }
    }
}

/// Receiver of selected entries.
///
/// # Examples
///
/// ```
/// use dirpack_core::AddRequest;
/// use dirpack_core::EntrySink;
/// use dirpack_core::MemorySink;
///
/// let mut sink = MemorySink::new();
/// sink.add(AddRequest::file("a.txt", b"hello".to_vec()))?;
/// sink.add(AddRequest::directory("empty/"))?;
///
/// assert_eq!(sink.get("a.txt"), Some(&b"hello"[..]));
/// assert!(sink.is_directory("empty/"));
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub trait EntrySink {
    /// Stores a file under `local_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container refuses or fails to store it.
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()>;

    /// Registers an empty directory under `local_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container refuses or fails to store it.
    fn add_empty_directory(&mut self, local_name: &str) -> Result<()>;

    /// Dispatches a request to [`add_file`](Self::add_file) or
    /// [`add_empty_directory`](Self::add_empty_directory).
    ///
    /// # Errors
    ///
    /// Propagates the error of the dispatched call.
    fn add(&mut self, request: AddRequest) -> Result<()> {
        if request.is_directory {
            self.add_empty_directory(&request.local_name)
        } else {
            self.add_file(&request.local_name, request.content.unwrap_or_default())
        }
    }
}

impl<S: EntrySink + ?Sized> EntrySink for &mut S {
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()> {
        (**self).add_file(local_name, content)
    }

    fn add_empty_directory(&mut self, local_name: &str) -> Result<()> {
        (**self).add_empty_directory(local_name)
    }
}

impl<S: EntrySink + ?Sized> EntrySink for Box<S> {
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()> {
        (**self).add_file(local_name, content)
    }

    fn add_empty_directory(&mut self, local_name: &str) -> Result<()> {
        (**self).add_empty_directory(local_name)
    }
}

/// In-memory container keyed by local name.
///
/// Adding a name that is already present replaces the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    entries: BTreeMap<String, Option<Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of the file stored as `local_name`.
    #[must_use]
    pub fn get(&self, local_name: &str) -> Option<&[u8]> {
        self.entries.get(local_name)?.as_deref()
    }

    /// Returns `true` if anything is stored as `local_name`.
    #[must_use]
    pub fn contains(&self, local_name: &str) -> bool {
        self.entries.contains_key(local_name)
    }

    /// Returns `true` if `local_name` is a directory placeholder.
    #[must_use]
    pub fn is_directory(&self, local_name: &str) -> bool {
        matches!(self.entries.get(local_name), Some(None))
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consumes the sink, returning name → content (`None` for directories).
    #[must_use]
    pub fn into_entries(self) -> BTreeMap<String, Option<Vec<u8>>> {
        self.entries
    }
}

impl EntrySink for MemorySink {
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()> {
        self.entries.insert(local_name.to_string(), Some(content));
        Ok(())
    }

    fn add_empty_directory(&mut self, local_name: &str) -> Result<()> {
        self.entries.insert(local_name.to_string(), None);
        Ok(())
    }
}
