//! TAR container adapter.

use crate::Result;
use crate::SelectionError;
use crate::sink::EntrySink;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;
use tar::Builder;
use tar::EntryType;
use tar::Header;

/// Writes selected entries into a TAR stream.
///
/// TAR is append-only: a repeated name is written again and readers that
/// unpack in order keep the last copy.
///
/// # Examples
///
/// ```
/// use dirpack_core::EntrySink;
/// use dirpack_core::TarSink;
///
/// let mut sink = TarSink::gzip(Vec::new(), 6)?;
/// sink.add_file("notes/todo.txt", b"ship it".to_vec())?;
/// let compressed = sink.finish_gzip()?;
/// assert!(!compressed.is_empty());
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub struct TarSink<W: Write> {
    builder: Builder<W>,
    mtime: u64,
    entries: usize,
}

impl<W: Write> TarSink<W> {
    /// Creates an uncompressed TAR sink.
    pub fn new(writer: W) -> Self {
        let mtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        Self {
            builder: Builder::new(writer),
            mtime,
            entries: 0,
        }
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` if nothing was written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Writes the end-of-archive marker and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailer cannot be written.
    pub fn finish(self) -> Result<W> {
        self.builder.into_inner().map_err(|e| SelectionError::Sink {
            name: String::new(),
            reason: format!("failed to finish TAR archive: {e}"),
        })
    }

    fn header(&self, entry_type: EntryType, mode: u32, size: u64) -> Header {
        let mut header = Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_mode(mode);
        header.set_mtime(self.mtime);
        header.set_size(size);
        header.set_cksum();
        header
    }
}

impl<W: Write> TarSink<GzEncoder<W>> {
    /// Creates a gzip-compressed TAR sink.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidConfig`] for levels above 9.
    pub fn gzip(writer: W, level: u8) -> Result<Self> {
        if level > 9 {
            return Err(SelectionError::InvalidConfig {
                reason: format!("compression level must be 0-9, got {level}"),
            });
        }
        let encoder = GzEncoder::new(writer, Compression::new(u32::from(level)));
        Ok(Self::new(encoder))
    }

    /// Finishes both the TAR stream and the gzip encoder.
    ///
    /// # Errors
    ///
    /// Returns an error if either trailer cannot be written.
    pub fn finish_gzip(self) -> Result<W> {
        let encoder = self.finish()?;
        encoder.finish().map_err(|e| SelectionError::Sink {
            name: String::new(),
            reason: format!("failed to finish gzip stream: {e}"),
        })
    }
}

impl<W: Write> EntrySink for TarSink<W> {
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()> {
        let mut header = self.header(EntryType::Regular, 0o644, content.len() as u64);
        self.builder
            .append_data(&mut header, local_name, content.as_slice())
            .map_err(|e| SelectionError::Sink {
                name: local_name.to_string(),
                reason: format!("failed to append file: {e}"),
            })?;
        self.entries += 1;
        Ok(())
    }

    fn add_empty_directory(&mut self, local_name: &str) -> Result<()> {
        let mut header = self.header(EntryType::Directory, 0o755, 0);
        self.builder
            .append_data(&mut header, local_name, std::io::empty())
            .map_err(|e| SelectionError::Sink {
                name: local_name.to_string(),
                reason: format!("failed to append directory: {e}"),
            })?;
        self.entries += 1;
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for TarSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarSink")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn entries_of<R: Read>(reader: R) -> Vec<(String, bool, Vec<u8>)> {
        let mut archive = tar::Archive::new(reader);
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry.path().unwrap().to_string_lossy().into_owned();
                let is_dir = entry.header().entry_type().is_dir();
                let mut content = Vec::new();
                entry.read_to_end(&mut content).unwrap();
                (name, is_dir, content)
            })
            .collect()
    }

    #[test]
    fn test_tar_sink_round_trip() {
        let mut sink = TarSink::new(Vec::new());
        sink.add_file("path/text file.txt", b"text file".to_vec()).unwrap();
        sink.add_empty_directory("path/empty dir/").unwrap();
        assert_eq!(sink.len(), 2);

        let entries = entries_of(sink.finish().unwrap().as_slice());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "path/text file.txt");
        assert!(!entries[0].1);
        assert_eq!(entries[0].2, b"text file");
        assert!(entries[1].1);
    }

    #[test]
    fn test_tar_sink_appends_duplicates() {
        let mut sink = TarSink::new(Vec::new());
        sink.add_file("a.txt", b"1".to_vec()).unwrap();
        sink.add_file("a.txt", b"2".to_vec()).unwrap();
        let entries = entries_of(sink.finish().unwrap().as_slice());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].2, b"2");
    }

    #[test]
    fn test_tar_sink_gzip() {
        let mut sink = TarSink::gzip(Vec::new(), 9).unwrap();
        sink.add_file("Текстовый документ.txt", vec![b'x'; 4096]).unwrap();
        let compressed = sink.finish_gzip().unwrap();
        assert!(compressed.len() < 4096);

        let entries = entries_of(GzDecoder::new(compressed.as_slice()));
        assert_eq!(entries[0].0, "Текстовый документ.txt");
        assert_eq!(entries[0].2.len(), 4096);
    }

    #[test]
    fn test_tar_sink_rejects_bad_level() {
        assert!(TarSink::gzip(Vec::new(), 12).is_err());
    }
}
