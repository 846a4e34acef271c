use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::MarkupKind;

/// One piece of formatted output.
///
/// Concatenating the `value` of every part (and nothing for markup) gives the
/// formatted string; fallbacks contribute `{source}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    Text {
        value: String,
    },
    String {
        source: String,
        value: String,
    },
    Number {
        source: String,
        locale: String,
        value: String,
    },
    #[serde(rename = "datetime")]
    DateTime {
        source: String,
        locale: String,
        value: String,
    },
    Markup {
        kind: MarkupKind,
        name: String,
        source: String,
        options: BTreeMap<String, String>,
    },
    Unknown {
        source: String,
        value: String,
    },
    Fallback {
        source: String,
    },
}

impl MessagePart {
    /// The text this part contributes to the formatted string.
    pub fn text(&self) -> String {
        match self {
            MessagePart::Text { value }
            | MessagePart::String { value, .. }
            | MessagePart::Number { value, .. }
            | MessagePart::DateTime { value, .. }
            | MessagePart::Unknown { value, .. } => value.clone(),
            MessagePart::Markup { .. } => String::new(),
            MessagePart::Fallback { source } => format!("{{{source}}}"),
        }
    }
}
