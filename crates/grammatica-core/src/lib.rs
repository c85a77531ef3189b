//! Runtime for data-driven lexing and LL(k) parsing: grammars are handed
//! to [`Tokenizer`]/[`Parser`] as values at runtime rather than generated
//! from a `.grammar` file at build time.
//!
//! Modules roughly follow the pipeline a source file travels through:
//! [`buffer`] (characters) -> [`regex`]/[`token`] (lexical rules) ->
//! [`tokenizer`] (tokens) -> [`grammar`]/[`lookahead`] (static analysis of
//! the grammar shape) -> [`parser`] (the parse tree).

pub mod buffer;
pub mod error;
pub mod grammar;
pub mod lookahead;
pub mod parser;
pub mod regex;
pub mod token;
pub mod tokenizer;
pub mod tree;

pub use buffer::CharBuffer;
pub use error::{Diagnostic, Diagnostics, Error, ErrorStage, Location, Result, Severity, TextRange};
pub use grammar::{Alternative, Element, ElementKind, LookAheadSet, ProductionId, ProductionPattern, Sequence};
pub use lookahead::LookAheadAnalyzer;
pub use parser::{Analyzer, NullAnalyzer, ParseOutcome, Parser};
pub use regex::Regex;
pub use token::{PatternKind, Token, TokenId, TokenIndex, TokenPattern};
pub use tokenizer::Tokenizer;
pub use tree::{NodeId, NodeKind, ParseTree, ParseTreeNode};
