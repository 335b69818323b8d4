//! Regular expression parsing.
//!
//! Patterns are accepted in two spellings:
//! - plain `regex` syntax, with inline flags such as `(?i)`;
//! - delimited form `<d>body<d>flags`, e.g. `~\.(txt|jpe?g)$~i`, where the
//!   delimiter is one of `/ ~ # % @ ! +` and flags are drawn from
//!   `i m s x u U`.
//!
//! A pattern that merely starts with a delimiter character but does not
//! end with `<d>` plus valid flags is taken as plain syntax.

use crate::Result;
use crate::SelectionError;
use regex::Regex;
use regex::RegexBuilder;

const DELIMITERS: &[char] = &['/', '~', '#', '%', '@', '!', '+'];
const FLAGS: &[char] = &['i', 'm', 's', 'x', 'u', 'U'];

/// Compiles `pattern` into a [`Regex`].
///
/// # Errors
///
/// Returns [`SelectionError::Pattern`] if the expression does not compile.
///
/// # Examples
///
/// ```
/// use dirpack_core::pattern::parse_regex;
///
/// let re = parse_regex(r"~\.(txt|jpe?g)$~i")?;
/// assert!(re.is_match("photos/IMG_01.JPG"));
///
/// let re = parse_regex(r"\.txt$")?;
/// assert!(!re.is_match("notes.TXT"));
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub fn parse_regex(pattern: &str) -> Result<Regex> {
    let (body, flags) = split_delimited(pattern).unwrap_or((pattern, ""));

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            _ => builder.unicode(true),
        };
    }

    builder.build().map_err(|e| SelectionError::Pattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Splits a delimited pattern into body and flags.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let delimiter = pattern.chars().next().filter(|c| DELIMITERS.contains(c))?;
    let close = pattern.rfind(delimiter)?;
    let open_len = delimiter.len_utf8();
    if close < open_len {
        return None;
    }

    let flags = &pattern[close + open_len..];
    if !flags.chars().all(|c| FLAGS.contains(&c)) {
        return None;
    }

    Some((&pattern[open_len..close], flags))
}
