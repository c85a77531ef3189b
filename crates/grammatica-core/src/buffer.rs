//! Streaming character buffer over a text source.
//!
//! `CharBuffer` wraps any `Read` implementation, decoding UTF-8 incrementally
//! and exposing unbounded look-ahead via [`CharBuffer::peek`] plus bounded
//! consumption via [`CharBuffer::read`]. Line/column tracking follows the
//! "next character to consume" convention: after reading N characters the
//! counters describe the position of whatever character `peek(0)` would now
//! return.
//!
//! The buffer retains a window of already-consumed characters (at least 16,
//! per the design) so that [`CharBuffer::substring`] can look backward, e.g.
//! to recover the matched image of a just-scanned token. Once the window
//! grows past one block (1024 characters) past `pos`, the prefix is trimmed.

use std::io::Read;

use crate::error::{Error, Result};

const BLOCK_SIZE: usize = 1024;
const RETAINED_HISTORY: usize = 16;

pub struct CharBuffer {
    content: Vec<char>,
    /// Global index of `content[0]`; advances every time a prefix is trimmed.
    base: usize,
    /// Index into `content` of the next character to consume.
    pos: usize,
    next_line: u32,
    next_column: u32,
    reader: Option<Box<dyn Read>>,
    pending_bytes: Vec<u8>,
}

impl CharBuffer {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self {
            content: Vec::new(),
            base: 0,
            pos: 0,
            next_line: 1,
            next_column: 1,
            reader: Some(reader),
            pending_bytes: Vec::new(),
        }
    }

    pub fn from_str(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            content: text.chars().collect(),
            base: 0,
            pos: 0,
            next_line: 1,
            next_column: 1,
            reader: None,
            pending_bytes: Vec::new(),
        }
    }

    pub fn line(&self) -> u32 {
        self.next_line
    }

    pub fn column(&self) -> u32 {
        self.next_column
    }

    /// Global character index of the next character to consume. Stable
    /// across trimming (unlike `pos`, which is relative to `base`).
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn eof(&self) -> bool {
        self.reader.is_none() && self.pos >= self.content.len()
    }

    /// Returns the character at `pos + offset`, or `None` at end of input.
    pub fn peek(&mut self, offset: usize) -> Result<Option<char>> {
        self.ensure_filled(offset + 1)?;
        Ok(self.content.get(self.pos + offset).copied())
    }

    /// Consumes up to `n` characters, returning fewer at EOF and `None` if
    /// no characters remain at all.
    pub fn read(&mut self, n: usize) -> Result<Option<String>> {
        self.ensure_filled(n)?;
        let available = self.content.len() - self.pos;
        if available == 0 {
            return Ok(None);
        }
        let take = available.min(n);
        let slice = &self.content[self.pos..self.pos + take];
        let mut out = String::with_capacity(take);
        for &ch in slice {
            out.push(ch);
            if ch == '\n' {
                self.next_line += 1;
                self.next_column = 1;
            } else {
                self.next_column += 1;
            }
        }
        self.pos += take;
        self.trim_if_needed();
        Ok(Some(out))
    }

    /// Looks back into the retained window. `index` is a global character
    /// index as returned by [`CharBuffer::position`]; returns `None` if the
    /// requested range has already been trimmed away or runs past what has
    /// been buffered.
    pub fn substring(&self, index: usize, len: usize) -> Option<String> {
        if index < self.base {
            return None;
        }
        let local_start = index - self.base;
        let local_end = local_start + len;
        if local_end > self.content.len() {
            return None;
        }
        Some(self.content[local_start..local_end].iter().collect())
    }

    fn ensure_filled(&mut self, min_chars: usize) -> Result<()> {
        while self.content.len() - self.pos < min_chars && self.reader.is_some() {
            self.fill_block()?;
        }
        Ok(())
    }

    fn fill_block(&mut self) -> Result<()> {
        let mut raw = vec![0u8; BLOCK_SIZE];
        let read = match self.reader.as_mut().expect("reader present").read(&mut raw) {
            Ok(n) => n,
            Err(err) => {
                self.reader = None;
                return Err(Error::Io(err));
            }
        };
        if read == 0 {
            // Flush whatever is left as replacement characters; a
            // well-formed UTF-8 source never leaves a dangling tail, but an
            // incomplete sequence at true EOF is still decoded rather than
            // silently dropped.
            if !self.pending_bytes.is_empty() {
                let lossy = String::from_utf8_lossy(&self.pending_bytes).into_owned();
                self.content.extend(lossy.chars());
                self.pending_bytes.clear();
            }
            self.reader = None;
            return Ok(());
        }
        self.pending_bytes.extend_from_slice(&raw[..read]);
        let (valid_len, decoded) = match std::str::from_utf8(&self.pending_bytes) {
            Ok(s) => (self.pending_bytes.len(), s.to_owned()),
            Err(err) => {
                let valid_len = err.valid_up_to();
                let decoded =
                    std::str::from_utf8(&self.pending_bytes[..valid_len]).expect("valid prefix").to_owned();
                (valid_len, decoded)
            }
        };
        self.content.extend(decoded.chars());
        self.pending_bytes.drain(..valid_len);
        Ok(())
    }

    fn trim_if_needed(&mut self) {
        if self.pos <= BLOCK_SIZE {
            return;
        }
        let keep_from = self.pos.saturating_sub(RETAINED_HISTORY);
        if keep_from == 0 {
            return;
        }
        self.content.drain(..keep_from);
        self.base += keep_from;
        self.pos -= keep_from;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(s: &str) -> CharBuffer {
        CharBuffer::from_str(s)
    }

    #[test]
    fn peek_does_not_consume() {
        let mut b = buf("ab");
        assert_eq!(b.peek(0).unwrap(), Some('a'));
        assert_eq!(b.peek(1).unwrap(), Some('b'));
        assert_eq!(b.peek(2).unwrap(), None);
        assert_eq!(b.read(1).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn read_matches_prior_peeks() {
        let mut b = buf("hello world");
        let peeked: String = (0..5).map(|i| b.peek(i).unwrap().unwrap()).collect();
        let read = b.read(5).unwrap().unwrap();
        assert_eq!(peeked, read);
    }

    #[test]
    fn line_column_track_newlines() {
        let mut b = buf("foo\nbar");
        assert_eq!((b.line(), b.column()), (1, 1));
        b.read(4).unwrap(); // consumes "foo\n"
        assert_eq!((b.line(), b.column()), (2, 1));
        b.read(2).unwrap(); // consumes "ba"
        assert_eq!((b.line(), b.column()), (2, 3));
    }

    #[test]
    fn carriage_return_is_not_a_line_terminator() {
        let mut b = buf("a\rb");
        b.read(3).unwrap();
        assert_eq!((b.line(), b.column()), (1, 4));
    }

    #[test]
    fn read_past_eof_returns_partial_then_none() {
        let mut b = buf("ab");
        assert_eq!(b.read(5).unwrap(), Some("ab".to_string()));
        assert_eq!(b.read(1).unwrap(), None);
    }

    #[test]
    fn substring_looks_back_within_retained_history() {
        let mut b = buf("abcdef");
        b.read(3).unwrap();
        assert_eq!(b.substring(0, 3), Some("abc".to_string()));
        assert_eq!(b.substring(1, 2), Some("bc".to_string()));
    }

    #[test]
    fn reader_backed_buffer_trims_and_tracks_position() {
        let text = "x".repeat(3000);
        let cursor = std::io::Cursor::new(text.clone().into_bytes());
        let mut b = CharBuffer::new(Box::new(cursor));
        let mut consumed = 0usize;
        while let Some(chunk) = b.read(256).unwrap() {
            consumed += chunk.chars().count();
        }
        assert_eq!(consumed, text.len());
        assert!(b.eof());
    }

    #[test]
    fn io_error_discards_reader_and_becomes_eof() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("boom"))
            }
        }
        let mut b = CharBuffer::new(Box::new(FailingReader));
        assert!(b.peek(0).is_err());
        assert!(b.eof());
        assert_eq!(b.read(1).unwrap(), None);
    }
}
