//! Filesystem selection engine for building archives from directory trees.
//!
//! `dirpack-core` walks a directory (flat or recursively), filters the
//! walked entries by an ignore list, a glob, or a regular expression, maps
//! each survivor to a name under a caller-chosen prefix, and hands it to a
//! container through the [`EntrySink`] trait. Empty directories survive as
//! placeholders and non-ASCII names pass through unchanged.
//!
//! # Examples
//!
//! ```no_run
//! use dirpack_core::MemorySink;
//! use dirpack_core::Selector;
//! use dirpack_core::walker::DirectoryWalker;
//! use dirpack_core::IgnoreSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut selector = Selector::new(MemorySink::new());
//!
//! // Everything below ./site, stored under "public/".
//! selector.add_dir_recursive("./site", "public")?;
//!
//! // Only the JPEGs, at any depth.
//! selector.add_files_from_regex_recursive("./photos", r"(?i)\.jpe?g$", "photos")?;
//!
//! // A walk with whole subtrees pruned.
//! let walk = DirectoryWalker::recursive("./project").walk()?;
//! selector.insert("src", walk.ignoring(IgnoreSet::new(["target/", ".git/"])))?;
//!
//! println!("{} entries", selector.sink().len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod ignore;
pub mod mapper;
pub mod path;
pub mod pattern;
pub mod report;
pub mod selector;
pub mod sink;
#[doc(hidden)]
pub mod test_utils;
pub mod walker;

pub use config::DirectoryPolicy;
pub use config::SelectionConfig;
pub use config::SymlinkPolicy;
pub use error::Result;
pub use error::SelectionError;
pub use ignore::IgnoreFilter;
pub use ignore::IgnoreMatch;
pub use ignore::IgnoreSet;
pub use mapper::LocalPrefix;
pub use pattern::Pattern;
pub use pattern::PatternSpec;
pub use report::SelectionReport;
pub use selector::Selector;
pub use sink::AddRequest;
pub use sink::EntrySink;
pub use sink::MemorySink;
pub use sink::TarSink;
pub use sink::ZipSink;
pub use walker::DirectoryWalker;
pub use walker::EntryKind;
pub use walker::FileSystemEntry;
pub use walker::WalkMode;
