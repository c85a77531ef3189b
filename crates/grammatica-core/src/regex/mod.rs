//! Regex compilation and matching (C2).
//!
//! [`Regex`] is an immutable compiled pattern, shareable across threads.
//! [`Matcher`] borrows a [`CharBuffer`] mutably for the duration of a single
//! match attempt and is never shared.

mod ast;
mod compiler;
mod matcher;

pub use ast::{CharSet, Node, RepeatMode};
pub use compiler::RegexError;
pub use matcher::MatchResult;

use crate::buffer::CharBuffer;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    root: Node,
    case_insensitive: bool,
    pattern: String,
}

impl Regex {
    pub fn compile(pattern: &str, case_insensitive: bool) -> std::result::Result<Regex, RegexError> {
        let mut root = compiler::parse_pattern(pattern)?;
        if case_insensitive {
            root = root.to_ascii_lowercase();
        }
        Ok(Regex { root, case_insensitive, pattern: pattern.to_string() })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Binds this pattern to a buffer for one matching session.
    pub fn matcher<'r, 'b>(&'r self, buffer: &'b mut CharBuffer) -> Matcher<'r, 'b> {
        Matcher { regex: self, buffer }
    }
}

pub struct Matcher<'r, 'b> {
    regex: &'r Regex,
    buffer: &'b mut CharBuffer,
}

impl Matcher<'_, '_> {
    /// Returns the `skip`-th longest match length starting at the buffer's
    /// current position, or `-1` if there is no such alternative.
    pub fn try_match(&mut self, skip: usize) -> Result<i64> {
        Ok(self.try_match_full(skip)?.length)
    }

    pub fn try_match_full(&mut self, skip: usize) -> Result<MatchResult> {
        matcher::try_match(&self.regex.root, self.buffer, 0, skip, self.regex.case_insensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn longest(pattern: &str, input: &str) -> i64 {
        let re = Regex::compile(pattern, false).unwrap();
        let mut buf = CharBuffer::from_str(input);
        let mut m = re.matcher(&mut buf);
        m.try_match(0).unwrap()
    }

    #[test]
    fn literal_string() {
        assert_eq!(longest("abc", "abcd"), 3);
        assert_eq!(longest("abc", "abx"), -1);
    }

    #[test]
    fn dot_matches_anything() {
        assert_eq!(longest("a.c", "abc"), 3);
        assert_eq!(longest("a.c", "a\nc"), 3);
    }

    #[test]
    fn char_class_and_ranges() {
        assert_eq!(longest("[a-c]+", "abcd"), 3);
        assert_eq!(longest("[^a-c]+", "xyzabc"), 3);
    }

    #[test]
    fn predefined_classes() {
        assert_eq!(longest(r"\d+", "123abc"), 3);
        assert_eq!(longest(r"\w+", "foo_1 bar"), 5);
        assert_eq!(longest(r"\s+", "   x"), 3);
    }

    #[test]
    fn alternation_backtracking_s2() {
        // Pattern `a(bc|b)c`. "abcc" matches length 4 via the `bc` branch.
        assert_eq!(longest("a(bc|b)c", "abcc"), 4);
        // "abc" matches length 3 only via the `b` branch (skip=1 relative
        // to the primary attempt).
        assert_eq!(longest("a(bc|b)c", "abc"), 3);
        // "ab" matches neither branch to completion.
        assert_eq!(longest("a(bc|b)c", "ab"), -1);
    }

    #[test]
    fn repeat_modes() {
        assert_eq!(longest("a*", "aaab"), 3);
        assert_eq!(longest("a*?", "aaab"), 0);
        assert_eq!(longest("a{2,4}", "aaaaa"), 4);
        assert_eq!(longest("a{2,}", "aaaaa"), 5);
    }

    #[test]
    fn case_insensitive_lowercases_at_compile_time() {
        let re = Regex::compile("ABC", true).unwrap();
        assert_eq!(re.pattern(), "ABC");
        let mut buf = CharBuffer::from_str("abc");
        assert_eq!(re.matcher(&mut buf).try_match(0).unwrap(), 3);
    }

    #[test]
    fn anchors_are_rejected() {
        assert_eq!(Regex::compile("^abc", false), Err(RegexError::UnsupportedSpecial('^', 0)));
        assert_eq!(Regex::compile("abc$", false), Err(RegexError::UnsupportedSpecial('$', 3)));
    }

    #[test]
    fn unterminated_group_is_an_error() {
        assert!(matches!(Regex::compile("(abc", false), Err(RegexError::UnterminatedPattern(_))));
    }

    #[test]
    fn skip_returns_strictly_shorter_or_none_s2_property() {
        let re = Regex::compile("a(bc|b)c?", false).unwrap();
        let mut buf = CharBuffer::from_str("abc");
        let mut m = re.matcher(&mut buf);
        let mut prev = m.try_match(0).unwrap();
        assert!(prev >= 0);
        let mut skip = 1;
        loop {
            let len = m.try_match(skip).unwrap();
            if len < 0 {
                break;
            }
            assert!(len < prev, "skip={skip} returned {len} which is not shorter than {prev}");
            prev = len;
            skip += 1;
            if skip > 10 {
                break;
            }
        }
    }
}
