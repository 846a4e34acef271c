//! Syntax diagnostics produced by the CST parser.
//!
//! Parsing never fails. Every local grammar violation is recorded as a
//! [`SyntaxError`] next to the tree, and the parser resumes at the next
//! plausible boundary.

use serde::Serialize;
use thiserror::Error;

/// A half-open byte range `start..end` into the message source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    pub const fn point(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// One-based line and column of `start` within `source`.
    ///
    /// Columns count characters, not bytes.
    pub fn line_column(&self, source: &str) -> (usize, usize) {
        let consumed = source.get(..self.start).unwrap_or(source);
        let line = consumed.chars().filter(|&c| c == '\n').count() + 1;
        let column = match consumed.rfind('\n') {
            Some(pos) => consumed.get(pos + 1..).map_or(1, |s| s.chars().count() + 1),
            None => consumed.chars().count() + 1,
        };
        (line, column)
    }
}

/// The kind of a syntax diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxErrorKind {
    /// A token that must not be empty was empty (`{}`, `$` without a name).
    EmptyToken,
    /// A backslash followed by a character that cannot be escaped.
    BadEscape,
    /// An `.input` declaration whose operand is not a variable.
    BadInputExpression,
    /// A `.match` selector that is not an expression.
    BadSelector,
    /// Content left over where the grammar expects the message to end.
    ExtraContent,
    /// A generic grammar violation.
    ParseError,
    /// A required piece of syntax is missing (a closing brace, `=`, `{{`).
    MissingSyntax,
}

impl SyntaxErrorKind {
    /// Stable kebab-case identifier, as shown to tooling.
    pub const fn as_str(self) -> &'static str {
        match self {
            SyntaxErrorKind::EmptyToken => "empty-token",
            SyntaxErrorKind::BadEscape => "bad-escape",
            SyntaxErrorKind::BadInputExpression => "bad-input-expression",
            SyntaxErrorKind::BadSelector => "bad-selector",
            SyntaxErrorKind::ExtraContent => "extra-content",
            SyntaxErrorKind::ParseError => "parse-error",
            SyntaxErrorKind::MissingSyntax => "missing-syntax",
        }
    }
}

/// A recoverable syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at {}..{}{}", .span.start, .span.end, expected_suffix(.expected))]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
    /// The token the parser expected, when there was a single obvious one.
    pub expected: Option<String>,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            expected: None,
        }
    }

    pub fn missing(span: Span, expected: impl Into<String>) -> Self {
        Self {
            kind: SyntaxErrorKind::MissingSyntax,
            span,
            expected: Some(expected.into()),
        }
    }
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn expected_suffix(expected: &Option<String>) -> String {
    match expected {
        Some(token) => format!(", expected '{token}'"),
        None => String::new(),
    }
}
