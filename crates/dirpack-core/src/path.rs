//! Path normalization helpers.
//!
//! Relative paths produced by this crate always use `/` separators, never
//! start with `/`, and end with `/` exactly when they name a directory.
//! Caller-supplied strings (prefixes, ignore entries) are brought into the
//! same shape with the functions below.

use crate::Result;
use crate::SelectionError;
use std::path::Component;
use std::path::Path;

/// Converts `\` separators to `/` and collapses repeated slashes.
///
/// # Examples
///
/// ```
/// use dirpack_core::path::normalize_separators;
///
/// assert_eq!(normalize_separators(r"to\path"), "to/path");
/// assert_eq!(normalize_separators("a//b///c/"), "a/b/c/");
/// ```
#[must_use]
pub fn normalize_separators(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_slash = false;
    for ch in s.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(ch);
    }
    out
}

/// Strips every leading and trailing `/`.
///
/// ```
/// use dirpack_core::path::trim_slashes;
///
/// assert_eq!(trim_slashes("/to/path/"), "to/path");
/// assert_eq!(trim_slashes("///"), "");
/// ```
#[must_use]
pub fn trim_slashes(s: &str) -> &str {
    s.trim_matches('/')
}

/// Builds the relative name of `path` below `root`.
///
/// Components are joined with `/` and a trailing `/` is appended for
/// directories. Names are copied as-is; anything that is not valid UTF-8 is
/// rejected rather than transcoded.
///
/// # Errors
///
/// Returns [`SelectionError::InvalidName`] if `path` is not below `root`,
/// equals `root`, or contains a non-UTF-8 component.
///
/// # Examples
///
/// ```
/// use dirpack_core::path::relative_name;
/// use std::path::Path;
///
/// let root = Path::new("/srv/data");
/// let name = relative_name(root, Path::new("/srv/data/docs/readme.txt"), false)?;
/// assert_eq!(name, "docs/readme.txt");
///
/// let name = relative_name(root, Path::new("/srv/data/docs"), true)?;
/// assert_eq!(name, "docs/");
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub fn relative_name(root: &Path, path: &Path, is_directory: bool) -> Result<String> {
    let invalid = || SelectionError::InvalidName {
        path: path.to_path_buf(),
    };

    let relative = path.strip_prefix(root).map_err(|_| invalid())?;

    let mut name = String::new();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            return Err(invalid());
        };
        let part = part.to_str().ok_or_else(invalid)?;
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(part);
    }

    if name.is_empty() {
        return Err(invalid());
    }
    if is_directory {
        name.push('/');
    }
    Ok(name)
}

/// Returns the number of segments in a relative name (`a/b/` has depth 2).
#[must_use]
pub fn depth(relative: &str) -> usize {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators(""), "");
        assert_eq!(normalize_separators("/"), "/");
        assert_eq!(normalize_separators("//a"), "/a");
        assert_eq!(normalize_separators(r"a\\b"), "a/b");
        assert_eq!(normalize_separators("текст/файл"), "текст/файл");
    }

    #[test]
    fn test_relative_name_nested() {
        let root = Path::new("/root");
        assert_eq!(
            relative_name(root, Path::new("/root/a/b/c.txt"), false).unwrap(),
            "a/b/c.txt"
        );
        assert_eq!(
            relative_name(root, Path::new("/root/empty dir"), true).unwrap(),
            "empty dir/"
        );
    }

    #[test]
    fn test_relative_name_non_ascii() {
        let root = Path::new("/root");
        assert_eq!(
            relative_name(root, Path::new("/root/Текстовый документ.txt"), false).unwrap(),
            "Текстовый документ.txt"
        );
    }

    #[test]
    fn test_relative_name_rejects_root_itself() {
        let root = Path::new("/root");
        let err = relative_name(root, root, true).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidName { .. }));
    }

    #[test]
    fn test_relative_name_rejects_outside_root() {
        let root = Path::new("/root");
        assert!(relative_name(root, Path::new("/other/file"), false).is_err());
    }

    #[test]
    fn test_depth() {
        assert_eq!(depth("file.txt"), 1);
        assert_eq!(depth("dir/"), 1);
        assert_eq!(depth("a/b/c.jpg"), 3);
        assert_eq!(depth("a/b/"), 2);
    }
}
