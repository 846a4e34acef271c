//! Data-model diagnostics.

use serde::Serialize;
use thiserror::Error;

use crate::parser::{Span, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataModelErrorKind {
    /// A variable declared twice, or declared after it was already used.
    DuplicateDeclaration,
    /// The same option name given twice on one expression or markup.
    DuplicateOption,
    /// A variant with the same keys as an earlier one.
    DuplicateVariant,
    /// A variant whose key count differs from the selector count.
    KeyMismatch,
    /// No variant consisting only of `*` keys.
    MissingFallback,
    /// A selector with no annotation, directly or through its declaration.
    MissingSelectorAnnotation,
}

impl DataModelErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DataModelErrorKind::DuplicateDeclaration => "duplicate-declaration",
            DataModelErrorKind::DuplicateOption => "duplicate-option",
            DataModelErrorKind::DuplicateVariant => "duplicate-variant",
            DataModelErrorKind::KeyMismatch => "key-mismatch",
            DataModelErrorKind::MissingFallback => "missing-fallback",
            DataModelErrorKind::MissingSelectorAnnotation => "missing-selector-annotation",
        }
    }
}

impl std::fmt::Display for DataModelErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural problem found while building or validating a message.
///
/// The span is absent for messages that were not built from source.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}{}", detail_suffix(.detail))]
pub struct DataModelError {
    pub kind: DataModelErrorKind,
    pub span: Option<Span>,
    /// The offending name, when there is one.
    pub detail: Option<String>,
}

impl DataModelError {
    pub fn new(kind: DataModelErrorKind, span: Option<Span>) -> Self {
        Self {
            kind,
            span,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

/// Any diagnostic attached to a parsed message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(untagged)]
pub enum Diagnostic {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    DataModel(#[from] DataModelError),
}

impl Diagnostic {
    /// Stable kebab-case identifier of the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::Syntax(error) => error.kind.as_str(),
            Diagnostic::DataModel(error) => error.kind.as_str(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Diagnostic::Syntax(error) => Some(error.span),
            Diagnostic::DataModel(error) => error.span,
        }
    }
}
