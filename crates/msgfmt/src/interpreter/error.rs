//! Error types for message resolution.

use strsim::levenshtein;
use thiserror::Error;

/// A problem found while resolving a message.
///
/// Resolution never stops at these: each one is reported to the caller's
/// error sink and the affected expression renders as a fallback. The
/// `fallback` field holds the source text that fallback displays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// A variable that is neither declared nor present in the input.
    #[error("unresolved variable {fallback}")]
    UnresolvedVariable { name: String, fallback: String },

    /// A function name the registry does not know.
    #[error("unknown function ':{name}'{}", suggestion_suffix(.suggestions))]
    MissingFunction {
        name: String,
        fallback: String,
        suggestions: Vec<String>,
    },

    /// A function rejected its operand.
    #[error("bad input for ':{function}' in {{{fallback}}}: {message}")]
    BadInput {
        function: String,
        fallback: String,
        message: String,
    },

    /// A function rejected one of its options.
    #[error("bad option for ':{function}' in {{{fallback}}}: {message}")]
    BadOption {
        function: String,
        fallback: String,
        message: String,
    },

    /// An annotation using a reserved sigil, or unparseable placeholder text.
    #[error("unsupported annotation in {{{fallback}}}")]
    UnsupportedAnnotation { fallback: String },

    /// A reserved statement such as `.when`.
    #[error("unsupported statement .{keyword}")]
    UnsupportedStatement { keyword: String, fallback: String },

    /// No variant matched the selector values.
    #[error("no variant matched")]
    NoMatch { fallback: String },

    /// A selector whose value does not support key matching.
    #[error("{{{fallback}}} cannot be used as a selector")]
    NotSelectable { fallback: String },
}

impl MessageError {
    /// Stable kebab-case identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageError::UnresolvedVariable { .. } => "unresolved-var",
            MessageError::MissingFunction { .. } => "missing-func",
            MessageError::BadInput { .. } => "bad-input",
            MessageError::BadOption { .. } => "bad-option",
            MessageError::UnsupportedAnnotation { .. } => "unsupported-annotation",
            MessageError::UnsupportedStatement { .. } => "unsupported-statement",
            MessageError::NoMatch { .. } => "no-match",
            MessageError::NotSelectable { .. } => "not-selectable",
        }
    }

    /// Source text of the fallback this error produced.
    pub fn fallback(&self) -> &str {
        match self {
            MessageError::UnresolvedVariable { fallback, .. }
            | MessageError::MissingFunction { fallback, .. }
            | MessageError::BadInput { fallback, .. }
            | MessageError::BadOption { fallback, .. }
            | MessageError::UnsupportedAnnotation { fallback }
            | MessageError::UnsupportedStatement { fallback, .. }
            | MessageError::NoMatch { fallback }
            | MessageError::NotSelectable { fallback } => fallback,
        }
    }
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}", suggestions.join(", "))
    }
}

/// Compute typo suggestions using Levenshtein distance.
///
/// - distance <= 1 for names <= 3 chars
/// - distance <= 2 for longer names
/// - Limit to 3 suggestions, sorted by distance
pub fn compute_suggestions<'a>(name: &str, available: impl Iterator<Item = &'a str>) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
