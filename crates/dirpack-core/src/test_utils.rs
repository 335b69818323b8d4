//! Test utilities for building source trees.
//!
//! A [`TreeFixture`] is an explicit description of a directory tree (a
//! mapping from relative path to optional content) that tests write into a
//! scratch directory of their choice.
//!
//! # Panics
//!
//! Nothing here panics; I/O failures are returned to the caller.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// Description of a directory tree.
///
/// Keys ending in `/` are directories, everything else is a file. Parent
/// directories are created implicitly.
///
/// # Examples
///
/// ```
/// use dirpack_core::test_utils::TreeFixture;
///
/// let fixture = TreeFixture::new()
///     .with_file("src/main.rs", "fn main() {}")
///     .with_dir("target/");
///
/// let dir = std::env::temp_dir().join("dirpack-doc-fixture");
/// fixture.write_to(&dir)?;
/// assert!(dir.join("src/main.rs").is_file());
/// # std::fs::remove_dir_all(&dir)?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFixture {
    entries: BTreeMap<String, Option<Vec<u8>>>,
}

impl TreeFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, relative_path: &str, content: impl AsRef<[u8]>) -> Self {
        self.entries
            .insert(relative_path.to_string(), Some(content.as_ref().to_vec()));
        self
    }

    /// Adds a directory. A trailing `/` is appended if missing.
    #[must_use]
    pub fn with_dir(mut self, relative_path: &str) -> Self {
        let name = if relative_path.ends_with('/') {
            relative_path.to_string()
        } else {
            format!("{relative_path}/")
        };
        self.entries.insert(name, None);
        self
    }

    /// The reference tree: a hidden file, non-ASCII names, empty directories
    /// at several depths, and two parallel picture subtrees.
    #[must_use]
    pub fn sample() -> Self {
        Self::new()
            .with_file(".hidden", "Hidden file")
            .with_file("text file.txt", "Text file")
            .with_file("Текстовый документ.txt", "Текстовый документ")
            .with_dir("empty dir/")
            .with_dir("empty dir2/ещё пустой каталог/")
            .with_file("catalog/New File", "New Catalog File")
            .with_file("catalog/New File 2", "New Catalog File 2")
            .with_dir("catalog/Empty Dir/")
            .with_file("category/list.txt", "Category list")
            .with_file("category/Pictures/128x160/Car/01.jpg", "File 01.jpg")
            .with_file("category/Pictures/128x160/Car/02.jpg", "File 02.jpg")
            .with_file("category/Pictures/240x320/Car/01.jpg", "File 01.jpg")
            .with_file("category/Pictures/240x320/Car/02.jpg", "File 02.jpg")
    }

    /// Described entries: relative path → content (`None` for directories).
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, Option<Vec<u8>>> {
        &self.entries
    }

    /// Relative paths of all described entries.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Content of the file at `relative_path`.
    #[must_use]
    pub fn content(&self, relative_path: &str) -> Option<&[u8]> {
        self.entries.get(relative_path)?.as_deref()
    }

    /// Materializes the tree below `root`, creating `root` if needed.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from creating directories or writing files.
    pub fn write_to(&self, root: &Path) -> io::Result<()> {
        std::fs::create_dir_all(root)?;
        for (name, content) in &self.entries {
            let target = root.join(name.trim_end_matches('/'));
            match content {
                None => std::fs::create_dir_all(&target)?,
                Some(bytes) => {
                    if let Some(parent) = target.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&target, bytes)?;
                }
            }
        }
        Ok(())
    }
}
