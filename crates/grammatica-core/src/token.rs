//! Token patterns and the parse-tree leaf type (part of C3).

use crate::error::TextRange;
use crate::regex::Regex;

pub type TokenId = i32;

#[derive(Debug, Clone)]
pub enum PatternKind {
    String(String),
    Regex(Regex),
}

/// A single lexical rule: either a literal string or a compiled regex,
/// with the two ignore semantics described in the design — `ignored`
/// tokens are consumed but never surfaced to the parser, `error` tokens
/// surface a synthetic diagnostic carrying `error_message`.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    pub id: TokenId,
    pub name: String,
    pub kind: PatternKind,
    pub ignored: bool,
    pub error: bool,
    pub error_message: Option<String>,
}

impl TokenPattern {
    pub fn string(id: TokenId, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: PatternKind::String(image.into()),
            ignored: false,
            error: false,
            error_message: None,
        }
    }

    pub fn regex(id: TokenId, name: impl Into<String>, regex: Regex) -> Self {
        Self {
            id,
            name: name.into(),
            kind: PatternKind::Regex(regex),
            ignored: false,
            error: false,
            error_message: None,
        }
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = true;
        self.error_message = Some(message.into());
        self
    }

    /// `"image"` for a literal pattern, `<pattern-name>` for a regex one —
    /// used to describe expected tokens in a look-ahead set.
    pub fn description(&self) -> String {
        match &self.kind {
            PatternKind::String(image) => format!("\"{image}\""),
            PatternKind::Regex(_) => format!("<{}>", self.name),
        }
    }
}

pub type TokenIndex = usize;

/// A scanned lexeme. `prev`/`next` are populated only when the tokenizer is
/// configured with `keep_token_list`, chaining every token — including
/// ignored and error tokens — into a doubly-linked list via indices into
/// the tokenizer's owned token vector.
#[derive(Debug, Clone)]
pub struct Token {
    pub pattern_id: TokenId,
    pub name: String,
    pub image: String,
    pub range: TextRange,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub prev: Option<TokenIndex>,
    pub next: Option<TokenIndex>,
}
