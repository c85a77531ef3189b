//! Tokenizer (C3): repeatedly produces the longest-match token at the
//! current buffer position from a mixed set of literal and regex patterns.

use crate::buffer::CharBuffer;
use crate::error::{Diagnostic, Diagnostics, ErrorStage, Location, Result, Severity, TextRange};
use crate::token::{PatternKind, Token, TokenId, TokenIndex, TokenPattern};

/// Reserved id for the synthetic "unexpected character" recovery token.
/// Grammar authors are expected to choose their own ids starting at 0.
pub const UNEXPECTED_CHAR_TOKEN_ID: TokenId = -1;

pub struct Tokenizer {
    patterns: Vec<TokenPattern>,
    buffer: CharBuffer,
    keep_token_list: bool,
    tokens: Vec<Token>,
    last_index: Option<TokenIndex>,
    diagnostics: Diagnostics,
}

impl Tokenizer {
    pub fn new(buffer: CharBuffer) -> Self {
        Self {
            patterns: Vec::new(),
            buffer,
            keep_token_list: false,
            tokens: Vec::new(),
            last_index: None,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_keep_token_list(mut self, keep: bool) -> Self {
        self.keep_token_list = keep;
        self
    }

    pub fn add_pattern(&mut self, pattern: TokenPattern) {
        self.patterns.push(pattern);
    }

    pub fn get_pattern_description(&self, id: TokenId) -> Option<String> {
        self.patterns.iter().find(|p| p.id == id).map(TokenPattern::description)
    }

    /// Rebinds the tokenizer to a fresh buffer, discarding any kept token
    /// list and lex diagnostics from the previous run.
    pub fn reset(&mut self, buffer: CharBuffer) {
        self.buffer = buffer;
        self.tokens.clear();
        self.last_index = None;
        self.diagnostics = Diagnostics::new();
    }

    pub fn line(&self) -> u32 {
        self.buffer.line()
    }

    pub fn column(&self) -> u32 {
        self.buffer.column()
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn kept_tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Produces the next non-ignored, non-error token, or `None` at EOF.
    pub fn next(&mut self) -> Result<Option<Token>> {
        loop {
            if self.buffer.peek(0)?.is_none() {
                return Ok(None);
            }
            let (token, pattern_idx) = self.scan_one()?;
            if self.keep_token_list {
                self.link_token(token.clone());
            }
            if pattern_idx >= self.patterns.len() {
                // Recovery token from a zero-length-match position: already
                // logged by `scan_one`, never surfaced to the parser.
                continue;
            }
            let pattern = &self.patterns[pattern_idx];
            let ignored = pattern.ignored;
            let error = pattern.error;
            let error_message = pattern.error_message.clone();

            if error {
                self.diagnostics.push(Diagnostic::new(
                    ErrorStage::Syntax,
                    Severity::Error,
                    error_message.unwrap_or_else(|| format!("invalid token '{}'", token.image)),
                    token.range,
                    Location { line: token.start_line, column: token.start_column },
                ));
                continue;
            }
            if ignored {
                continue;
            }
            return Ok(Some(token));
        }
    }

    fn link_token(&mut self, token: Token) {
        let idx = self.tokens.len();
        let mut token = token;
        token.prev = self.last_index;
        self.tokens.push(token);
        if let Some(prev) = self.last_index {
            self.tokens[prev].next = Some(idx);
        }
        self.last_index = Some(idx);
    }

    fn scan_one(&mut self) -> Result<(Token, usize)> {
        let start_line = self.buffer.line();
        let start_column = self.buffer.column();
        let start_pos = self.buffer.position();

        let mut best_len: i64 = -1;
        let mut best_idx: usize = 0;
        for i in 0..self.patterns.len() {
            let len = self.try_pattern(i)?;
            if len > best_len {
                best_len = len;
                best_idx = i;
            }
        }

        if best_len <= 0 {
            let bad = self.buffer.read(1)?.unwrap_or_default();
            let end_line = self.buffer.line();
            let end_column = self.buffer.column();
            let range = TextRange::new(start_pos as u32, (start_pos + bad.chars().count()) as u32);
            self.diagnostics.push(Diagnostic::new(
                ErrorStage::Syntax,
                Severity::Error,
                format!("unexpected character '{bad}'"),
                range,
                Location { line: start_line, column: start_column },
            ));
            let token = Token {
                pattern_id: UNEXPECTED_CHAR_TOKEN_ID,
                name: "UNEXPECTED_CHAR".to_string(),
                image: bad,
                range,
                start_line,
                start_column,
                end_line,
                end_column,
                prev: None,
                next: None,
            };
            // Loop again at the call site rather than surfacing this
            // token: `next()` special-cases a `None`-pattern index by
            // retrying, signalled via `best_idx == self.patterns.len()`.
            return Ok((token, self.patterns.len()));
        }

        let image = self.buffer.read(best_len as usize)?.expect("matched length available");
        let end_line = self.buffer.line();
        let end_column = self.buffer.column();
        let pattern = &self.patterns[best_idx];
        let range = TextRange::new(start_pos as u32, (start_pos + image.chars().count()) as u32);
        let token = Token {
            pattern_id: pattern.id,
            name: pattern.name.clone(),
            image,
            range,
            start_line,
            start_column,
            end_line,
            end_column,
            prev: None,
            next: None,
        };
        Ok((token, best_idx))
    }

    fn try_pattern(&mut self, index: usize) -> Result<i64> {
        match &self.patterns[index].kind {
            PatternKind::String(image) => Ok(match_literal(image, &mut self.buffer)?),
            PatternKind::Regex(regex) => {
                let mut m = regex.matcher(&mut self.buffer);
                m.try_match(0)
            }
        }
    }
}

fn match_literal(image: &str, buffer: &mut CharBuffer) -> Result<i64> {
    for (i, expected) in image.chars().enumerate() {
        match buffer.peek(i)? {
            Some(c) if c == expected => continue,
            _ => return Ok(-1),
        }
    }
    Ok(image.chars().count() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    const INT: TokenId = 1;
    const ID: TokenId = 2;
    const WS: TokenId = 3;

    fn s1_tokenizer(input: &str) -> Tokenizer {
        let mut t = Tokenizer::new(CharBuffer::from_str(input));
        t.add_pattern(TokenPattern::regex(INT, "INT", Regex::compile(r"[0-9]+", false).unwrap()));
        t.add_pattern(TokenPattern::regex(ID, "ID", Regex::compile(r"[A-Za-z_][A-Za-z0-9_]*", false).unwrap()));
        t.add_pattern(
            TokenPattern::regex(WS, "WS", Regex::compile(r"[ \t\n]+", false).unwrap()).ignored(),
        );
        t
    }

    #[test]
    fn s1_tokenize_integer_identifier() {
        let mut t = s1_tokenizer("foo 42\nbar");
        let tok = t.next().unwrap().unwrap();
        assert_eq!((tok.pattern_id, tok.image.as_str(), tok.start_line, tok.start_column), (ID, "foo", 1, 1));
        let tok = t.next().unwrap().unwrap();
        assert_eq!((tok.pattern_id, tok.image.as_str(), tok.start_line, tok.start_column), (INT, "42", 1, 5));
        let tok = t.next().unwrap().unwrap();
        assert_eq!((tok.pattern_id, tok.image.as_str(), tok.start_line, tok.start_column), (ID, "bar", 2, 1));
        assert!(t.next().unwrap().is_none());
    }

    #[test]
    fn longest_match_wins_over_earlier_shorter_pattern() {
        let mut t = Tokenizer::new(CharBuffer::from_str("fool"));
        t.add_pattern(TokenPattern::string(1, "FOO", "foo"));
        t.add_pattern(TokenPattern::regex(2, "WORD", Regex::compile("[a-z]+", false).unwrap()));
        let tok = t.next().unwrap().unwrap();
        assert_eq!((tok.pattern_id, tok.image.as_str()), (2, "fool"));
    }

    #[test]
    fn tie_prefers_earlier_added_pattern() {
        let mut t = Tokenizer::new(CharBuffer::from_str("foo"));
        t.add_pattern(TokenPattern::string(1, "FOO_LIT", "foo"));
        t.add_pattern(TokenPattern::regex(2, "WORD", Regex::compile("[a-z]+", false).unwrap()));
        let tok = t.next().unwrap().unwrap();
        assert_eq!(tok.pattern_id, 1);
    }

    #[test]
    fn unmatchable_character_is_skipped_with_diagnostic() {
        let mut t = Tokenizer::new(CharBuffer::from_str("a#b"));
        t.add_pattern(TokenPattern::regex(ID, "ID", Regex::compile("[a-z]+", false).unwrap()));
        let first = t.next().unwrap().unwrap();
        assert_eq!(first.image, "a");
        let second = t.next().unwrap().unwrap();
        assert_eq!(second.image, "b");
        assert!(t.next().unwrap().is_none());
        let diags = t.take_diagnostics();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn error_pattern_logs_and_is_not_surfaced() {
        let mut t = Tokenizer::new(CharBuffer::from_str("ok !!! more"));
        t.add_pattern(TokenPattern::regex(ID, "ID", Regex::compile("[a-z]+", false).unwrap()));
        t.add_pattern(
            TokenPattern::regex(99, "BANG", Regex::compile(r"!+", false).unwrap())
                .error("'!' sequences are not allowed here"),
        );
        t.add_pattern(TokenPattern::regex(WS, "WS", Regex::compile(" +", false).unwrap()).ignored());
        let first = t.next().unwrap().unwrap();
        assert_eq!(first.image, "ok");
        let second = t.next().unwrap().unwrap();
        assert_eq!(second.image, "more");
        assert!(t.next().unwrap().is_none());
        let diags = t.take_diagnostics();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn keep_token_list_links_every_token() {
        let mut t = s1_tokenizer("foo 42").with_keep_token_list(true);
        while t.next().unwrap().is_some() {}
        let kept = t.kept_tokens();
        assert_eq!(kept.len(), 3); // ID, WS(ignored), INT
        assert_eq!(kept[1].pattern_id, WS);
        assert_eq!(kept[0].next, Some(1));
        assert_eq!(kept[2].prev, Some(1));
    }

    #[test]
    fn pattern_description_quotes_literals_and_names_regexes() {
        let mut t = Tokenizer::new(CharBuffer::from_str(""));
        t.add_pattern(TokenPattern::string(1, "COMMA", ","));
        t.add_pattern(TokenPattern::regex(2, "IDENT", Regex::compile("[a-z]+", false).unwrap()));
        assert_eq!(t.get_pattern_description(1), Some("\",\"".to_string()));
        assert_eq!(t.get_pattern_description(2), Some("<IDENT>".to_string()));
    }
}
