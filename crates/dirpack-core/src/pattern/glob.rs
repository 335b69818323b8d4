//! Glob to regular expression translation.
//!
//! Supported syntax:
//! - `*` matches any run of characters except `/`
//! - `**` matches any run of characters including `/`; `**/` also matches
//!   no directory at all
//! - `?` matches one character except `/`
//! - `[abc]`, `[a-z]`, `[!abc]` / `[^abc]` character classes
//! - `{a,b,c}` alternation, nestable
//! - `\x` matches `x` literally
//!
//! The translated expression is anchored at both ends: a glob always
//! describes the whole relative path, never a part of it.

use crate::Result;
use crate::SelectionError;
use std::iter::Peekable;
use std::str::Chars;

/// Translates `glob` into an anchored regular expression.
///
/// # Errors
///
/// Returns [`SelectionError::Pattern`] for an unclosed `{` or `[`, or a
/// trailing `\`.
///
/// # Examples
///
/// ```
/// use dirpack_core::pattern::translate_glob;
///
/// assert_eq!(translate_glob("*.txt")?, r"^[^/]*\.txt$");
/// assert_eq!(translate_glob("**.{txt,jpg}")?, r"^.*\.(?:txt|jpg)$");
/// # Ok::<(), dirpack_core::SelectionError>(())
/// ```
pub fn translate_glob(glob: &str) -> Result<String> {
    Translator::new(glob).run()
}

struct Translator<'a> {
    glob: &'a str,
    chars: Peekable<Chars<'a>>,
    out: String,
    /// One slot per open `{`, recording whether it opened at a segment start.
    braces: Vec<bool>,
    at_segment_start: bool,
}

impl<'a> Translator<'a> {
    fn new(glob: &'a str) -> Self {
        let mut out = String::with_capacity(glob.len() * 2 + 2);
        out.push('^');
        Self {
            glob,
            chars: glob.chars().peekable(),
            out,
            braces: Vec::new(),
            at_segment_start: true,
        }
    }

    fn error(&self, reason: &str) -> SelectionError {
        SelectionError::Pattern {
            pattern: self.glob.to_string(),
            reason: reason.to_string(),
        }
    }

    fn run(mut self) -> Result<String> {
        while let Some(ch) = self.chars.next() {
            let segment_start = self.at_segment_start;
            self.at_segment_start = false;

            match ch {
                '*' => self.star(segment_start),
                '?' => self.out.push_str("[^/]"),
                '[' => self.class()?,
                '{' => {
                    self.braces.push(segment_start);
                    self.out.push_str("(?:");
                    self.at_segment_start = segment_start;
                }
                ',' if !self.braces.is_empty() => {
                    self.out.push('|');
                    self.at_segment_start = self.braces.last().copied().unwrap_or(false);
                }
                '}' if !self.braces.is_empty() => {
                    self.braces.pop();
                    self.out.push(')');
                }
                '\\' => {
                    let escaped = self
                        .chars
                        .next()
                        .ok_or_else(|| self.error("trailing backslash"))?;
                    self.literal(escaped);
                }
                '/' => {
                    self.out.push('/');
                    self.at_segment_start = true;
                }
                other => self.literal(other),
            }
        }

        if !self.braces.is_empty() {
            return Err(self.error("unclosed '{'"));
        }

        self.out.push('$');
        Ok(self.out)
    }

    fn star(&mut self, segment_start: bool) {
        if self.chars.peek() != Some(&'*') {
            self.out.push_str("[^/]*");
            return;
        }

        while self.chars.peek() == Some(&'*') {
            self.chars.next();
        }

        if segment_start && self.chars.peek() == Some(&'/') {
            self.chars.next();
            self.out.push_str("(?:.*/)?");
            self.at_segment_start = true;
        } else {
            self.out.push_str(".*");
        }
    }

    fn class(&mut self) -> Result<()> {
        let mut class = String::from("[");
        let mut first = true;

        if matches!(self.chars.peek(), Some('!' | '^')) {
            self.chars.next();
            class.push_str("^/");
        }

        loop {
            let ch = self
                .chars
                .next()
                .ok_or_else(|| self.error("unclosed '['"))?;
            match ch {
                ']' if !first => break,
                '\\' | '[' | ']' | '&' | '~' | '^' => {
                    class.push('\\');
                    class.push(ch);
                }
                _ => class.push(ch),
            }
            first = false;
        }

        class.push(']');
        self.out.push_str(&class);
        Ok(())
    }

    fn literal(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_single_star() {
        assert_eq!(translate_glob("*").unwrap(), "^[^/]*$");
        assert_eq!(translate_glob("a/*.rs").unwrap(), r"^a/[^/]*\.rs$");
    }

    #[test]
    fn test_translate_double_star() {
        assert_eq!(translate_glob("**").unwrap(), "^.*$");
        assert_eq!(translate_glob("**/*.rs").unwrap(), r"^(?:.*/)?[^/]*\.rs$");
        assert_eq!(translate_glob("src/**/mod.rs").unwrap(), r"^src/(?:.*/)?mod\.rs$");
        assert_eq!(translate_glob("a**b").unwrap(), "^a.*b$");
    }

    #[test]
    fn test_translate_braces() {
        assert_eq!(translate_glob("{a,b,c}").unwrap(), "^(?:a|b|c)$");
        assert_eq!(
            translate_glob("*.{jp{e,}g,png}").unwrap(),
            r"^[^/]*\.(?:jp(?:e|)g|png)$"
        );
    }

    #[test]
    fn test_translate_literal_braces_and_commas() {
        assert_eq!(translate_glob("a,b").unwrap(), "^a,b$");
        assert_eq!(translate_glob("a}").unwrap(), r"^a\}$");
    }

    #[test]
    fn test_translate_question_mark() {
        assert_eq!(translate_glob("file?.txt").unwrap(), r"^file[^/]\.txt$");
    }

    #[test]
    fn test_translate_classes() {
        assert_eq!(translate_glob("[abc]").unwrap(), "^[abc]$");
        assert_eq!(translate_glob("[!abc]").unwrap(), "^[^/abc]$");
        assert_eq!(translate_glob("[]a]").unwrap(), r"^[\]a]$");
        assert_eq!(translate_glob("[0-9]").unwrap(), "^[0-9]$");
    }

    #[test]
    fn test_translate_escapes() {
        assert_eq!(translate_glob(r"\*").unwrap(), r"^\*$");
        assert_eq!(translate_glob("a+b (1).txt").unwrap(), r"^a\+b \(1\)\.txt$");
    }

    #[test]
    fn test_translate_errors() {
        assert!(translate_glob("{a,b").unwrap_err().is_pattern_error());
        assert!(translate_glob("[abc").unwrap_err().is_pattern_error());
        assert!(translate_glob("abc\\").unwrap_err().is_pattern_error());
    }

    #[test]
    fn test_translate_non_ascii() {
        assert_eq!(translate_glob("Текст*").unwrap(), "^Текст[^/]*$");
    }
}
