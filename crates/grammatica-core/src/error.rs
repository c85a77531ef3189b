//! Error and diagnostic types shared by the buffer, regex, tokenizer and
//! parser layers.
//!
//! Two distinct notions of failure exist side by side, mirroring §7 of the
//! design: *fatal* errors (`Error`) abort whatever operation raised them
//! immediately (I/O failure on the underlying reader, fuel exhaustion), while
//! *diagnostics* (`Diagnostic`/`Diagnostics`) are recoverable findings that
//! accumulate in a log and are only turned into a thrown error at the end of
//! a pass (`parse`, `prepare`, `initialize`, `validate`).

use std::fmt;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use thiserror::Error;

/// A half-open byte-offset range into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn at(pos: u32) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 1-based line/column, reflecting the position of the first character of
/// a `TextRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Which pass produced a diagnostic. Matches the error kinds enumerated in
/// the design: lexical/syntactic errors are `Syntax`, analyzer-callback
/// failures are `Analyze`, resolver/validator findings are `Semantic`, and
/// static grammar defects caught during `prepare` are `Grammar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStage {
    #[default]
    Syntax,
    Analyze,
    Semantic,
    Grammar,
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStage::Syntax => write!(f, "syntax"),
            ErrorStage::Analyze => write!(f, "analyze"),
            ErrorStage::Semantic => write!(f, "semantic"),
            ErrorStage::Grammar => write!(f, "grammar"),
        }
    }
}

/// A single recoverable finding, attributable to a source span.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub stage: ErrorStage,
    pub severity: Severity,
    pub message: String,
    pub range: TextRange,
    pub location: Location,
    /// For `SyntaxError`-shaped diagnostics: human descriptions of each
    /// token the look-ahead set would have accepted at this point.
    pub expected: Vec<String>,
}

impl Diagnostic {
    pub fn new(
        stage: ErrorStage,
        severity: Severity,
        message: impl Into<String>,
        range: TextRange,
        location: Location,
    ) -> Self {
        Self {
            stage,
            severity,
            message: message.into(),
            range,
            location,
            expected: Vec::new(),
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }
}

/// An ordered log of diagnostics, accumulated across a pass and thrown
/// together at the end rather than aborting on the first finding.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    /// Render every diagnostic as a source-annotated report using
    /// `annotate-snippets`, in the order they were logged.
    pub fn render(&self, filename: &str, source: &str) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let renderer = Renderer::plain();
        let mut output = String::new();
        for (i, diag) in self.0.iter().enumerate() {
            let start = diag.range.start as usize;
            let end = if diag.range.is_empty() {
                (start + 1).min(source.len())
            } else {
                (diag.range.end as usize).min(source.len())
            };
            let message = if diag.expected.is_empty() {
                diag.message.clone()
            } else {
                format!("{}, expected one of: {}", diag.message, diag.expected.join(", "))
            };
            let level = match diag.severity {
                Severity::Error => Level::ERROR,
                Severity::Warning => Level::WARNING,
            };
            let snippet = Snippet::source(source)
                .path(filename)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(start..end).label(&message));
            let report: Vec<Group> = vec![level.primary_title(&message).element(snippet)];
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&renderer.render(&report).to_string());
        }
        output
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Fatal failures: conditions that abort the operation that raised them
/// outright, as opposed to `Diagnostics` findings which accumulate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error reading source: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} diagnostic(s) reported")]
    Diagnostics(Diagnostics),

    #[error("grammar is invalid: {0} error(s) found during prepare")]
    Grammar(Diagnostics),

    #[error("parser execution fuel exhausted (grammar may be left-recursive)")]
    FuelExhausted,

    #[error("parser recursion limit exceeded")]
    RecursionLimitExceeded,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.len())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
