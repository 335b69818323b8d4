//! Inclusion patterns over relative paths.
//!
//! A [`PatternSpec`] names either a glob or a regular expression; compiling
//! it yields a [`Pattern`], the predicate applied to every walked entry.
//! Globs describe the whole relative path. Regular expressions only need
//! to be found somewhere inside it.
//!
//! Patterns say nothing about depth: whether `**` reaches below the first
//! level depends on whether the walk beneath the pattern is recursive.

mod glob;
mod regexp;

pub use glob::translate_glob;
pub use regexp::parse_regex;

use crate::Result;
use crate::SelectionError;
use crate::walker::FileSystemEntry;
use regex::Regex;

/// Uncompiled pattern as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSpec {
    /// Shell-style glob, see [`translate_glob`].
    Glob(String),

    /// Regular expression, see [`parse_regex`].
    Regex(String),
}

impl PatternSpec {
    /// Creates a glob spec.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Creates a regex spec.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(pattern.into())
    }

    /// Pattern text as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Glob(pattern) | Self::Regex(pattern) => pattern,
        }
    }

    /// Compiles the spec.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] for malformed syntax.
    pub fn compile(&self) -> Result<Pattern> {
        Pattern::compile(self.clone())
    }
}

/// Compiled inclusion predicate.
///
/// # Examples
///
/// ```
/// use dirpack_core::pattern::Pattern;
///
/// let glob = Pattern::glob("**.{txt,jpg}")?;
/// assert!(glob.is_match("text file.txt"));
/// assert!(glob.is_match("category/list.txt"));
/// assert!(!glob.is_match("catalog/New File"));
///
/// let regex = Pattern::regex(r"~\.(txt|jpe?g)$~i")?;
/// assert!(regex.is_match("category/Pictures/240x320/Car/01.jpg"));
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    spec: PatternSpec,
    regex: Regex,
}

impl Pattern {
    /// Compiles a glob.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] for malformed glob syntax.
    pub fn glob(pattern: &str) -> Result<Self> {
        Self::compile(PatternSpec::glob(pattern))
    }

    /// Compiles a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Pattern`] for malformed regex syntax.
    pub fn regex(pattern: &str) -> Result<Self> {
        Self::compile(PatternSpec::regex(pattern))
    }

    fn compile(spec: PatternSpec) -> Result<Self> {
        let regex = match &spec {
            PatternSpec::Glob(glob) => {
                let translated = translate_glob(glob)?;
                Regex::new(&translated).map_err(|e| SelectionError::Pattern {
                    pattern: glob.clone(),
                    reason: e.to_string(),
                })?
            }
            PatternSpec::Regex(pattern) => parse_regex(pattern)?,
        };
        Ok(Self { spec, regex })
    }

    /// The spec this pattern was compiled from.
    #[must_use]
    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    /// Tests a relative path.
    #[must_use]
    pub fn is_match(&self, relative_path: &str) -> bool {
        self.regex.is_match(relative_path)
    }

    /// Tests a walked entry.
    ///
    /// Directories are tested by their relative name; a glob may also match
    /// a directory by the name without its trailing `/`, so `*` selects
    /// `empty dir/` the way a shell glob would.
    #[must_use]
    pub fn matches_entry(&self, entry: &FileSystemEntry) -> bool {
        if self.is_match(entry.relative_path()) {
            return true;
        }
        matches!(self.spec, PatternSpec::Glob(_))
            && entry.is_directory()
            && self.is_match(entry.relative_path_trimmed())
    }
}
