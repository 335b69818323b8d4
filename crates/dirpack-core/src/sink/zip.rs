//! ZIP container adapter.

use crate::Result;
use crate::SelectionError;
use crate::sink::EntrySink;
use std::collections::HashSet;
use std::io::Seek;
use std::io::Write;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes selected entries into a ZIP archive.
///
/// ZIP entries cannot be replaced in place, so a second entry with an
/// already-written name is rejected with [`SelectionError::Sink`].
///
/// # Examples
///
/// ```
/// use dirpack_core::EntrySink;
/// use dirpack_core::ZipSink;
/// use std::io::Cursor;
///
/// let mut sink = ZipSink::new(Cursor::new(Vec::new()));
/// sink.add_file("hello.txt", b"hello".to_vec())?;
/// sink.add_empty_directory("empty/")?;
/// let bytes = sink.finish()?.into_inner();
/// assert!(!bytes.is_empty());
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub struct ZipSink<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    written: HashSet<String>,
}

impl<W: Write + Seek> ZipSink<W> {
    /// Creates a sink with deflate compression at level 6.
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: options_for_level(6),
            written: HashSet::new(),
        }
    }

    /// Sets the compression level: `0` stores entries, `1`-`9` deflates.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidConfig`] for levels above 9.
    pub fn with_compression_level(mut self, level: u8) -> Result<Self> {
        if level > 9 {
            return Err(SelectionError::InvalidConfig {
                reason: format!("compression level must be 0-9, got {level}"),
            });
        }
        self.options = options_for_level(level);
        Ok(self)
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.written.len()
    }

    /// Returns `true` if nothing was written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    /// Writes the central directory and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive trailer cannot be written.
    pub fn finish(self) -> Result<W> {
        self.zip.finish().map_err(|e| SelectionError::Sink {
            name: String::new(),
            reason: format!("failed to finish ZIP archive: {e}"),
        })
    }

    fn claim(&mut self, local_name: &str) -> Result<()> {
        if !self.written.insert(local_name.to_string()) {
            return Err(sink_error(local_name, "duplicate entry name"));
        }
        Ok(())
    }
}

impl<W: Write + Seek> EntrySink for ZipSink<W> {
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()> {
        self.claim(local_name)?;
        self.zip
            .start_file(local_name, self.options)
            .map_err(|e| sink_error(local_name, format!("failed to start file: {e}")))?;
        self.zip
            .write_all(&content)
            .map_err(|e| sink_error(local_name, format!("failed to write content: {e}")))?;
        Ok(())
    }

    fn add_empty_directory(&mut self, local_name: &str) -> Result<()> {
        self.claim(local_name)?;
        self.zip
            .add_directory(local_name, self.options)
            .map_err(|e| sink_error(local_name, format!("failed to add directory: {e}")))?;
        Ok(())
    }
}

impl<W: Write + Seek> std::fmt::Debug for ZipSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSink")
            .field("entries", &self.written.len())
            .finish_non_exhaustive()
    }
}

fn options_for_level(level: u8) -> SimpleFileOptions {
    if level == 0 {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level)))
    }
}

fn sink_error(local_name: &str, reason: impl Into<String>) -> SelectionError {
    SelectionError::Sink {
        name: local_name.to_string(),
        reason: reason.into(),
    }
}
