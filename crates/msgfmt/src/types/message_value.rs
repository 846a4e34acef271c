//! Resolved values produced by message resolution.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use fixed_decimal::Decimal;
use icu_calendar::Iso;
use icu_datetime::input::DateTime;
use icu_locale_core::Locale;

use crate::interpreter::plural_category;
use crate::model::MarkupKind;
use crate::types::{MessagePart, Value};

/// A resolved value.
///
/// Every resolved node of a pattern becomes one of these. Values know how to
/// render themselves, how to split into [`MessagePart`]s, and how to match a
/// variant key during selection.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
    /// Literal pattern text.
    Text(String),
    String(StringValue),
    Number(NumberValue),
    DateTime(DateTimeValue),
    Markup(MarkupValue),
    /// An input value no function has claimed, such as a boolean or record.
    Unknown(UnknownValue),
    /// Stand-in for anything that failed to resolve.
    Fallback(FallbackValue),
}

impl MessageValue {
    /// Create a fallback value for the given source text.
    pub fn fallback(source: impl Into<String>) -> Self {
        MessageValue::Fallback(FallbackValue {
            source: source.into(),
        })
    }

    /// Stable type tag of this value.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageValue::Text(_) => "text",
            MessageValue::String(_) => "string",
            MessageValue::Number(_) => "number",
            MessageValue::DateTime(_) => "datetime",
            MessageValue::Markup(_) => "markup",
            MessageValue::Unknown(_) => "unknown",
            MessageValue::Fallback(_) => "fallback",
        }
    }

    /// Surface text of the expression this value came from.
    pub fn source(&self) -> Option<&str> {
        match self {
            MessageValue::Text(_) => None,
            MessageValue::String(value) => Some(&value.source),
            MessageValue::Number(value) => Some(&value.source),
            MessageValue::DateTime(value) => Some(&value.source),
            MessageValue::Markup(value) => Some(&value.source),
            MessageValue::Unknown(value) => Some(&value.source),
            MessageValue::Fallback(value) => Some(&value.source),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, MessageValue::Fallback(_))
    }

    /// Whether this value can be used as a selector.
    pub fn is_selectable(&self) -> bool {
        matches!(self, MessageValue::String(_) | MessageValue::Number(_))
    }

    /// Whether this value accepts `key` during variant selection.
    ///
    /// Strings match by equality. Numbers match their exact value first and
    /// then their plural category, unless selection is `exact`. Every other
    /// value matches nothing.
    pub fn match_select_key(&self, key: &str) -> bool {
        match self {
            MessageValue::String(value) => value.value == key,
            MessageValue::Number(value) => value.match_select_key(key),
            _ => false,
        }
    }

    /// Split into output parts, flattening markup children between their
    /// open and close parts.
    pub fn to_parts(&self) -> Vec<MessagePart> {
        match self {
            MessageValue::Text(text) => vec![MessagePart::Text {
                value: text.clone(),
            }],
            MessageValue::String(value) => vec![MessagePart::String {
                source: value.source.clone(),
                value: value.value.clone(),
            }],
            MessageValue::Number(value) => vec![MessagePart::Number {
                source: value.source.clone(),
                locale: value.locale.to_string(),
                value: value.formatted.clone(),
            }],
            MessageValue::DateTime(value) => vec![MessagePart::DateTime {
                source: value.source.clone(),
                locale: value.locale.to_string(),
                value: value.formatted.clone(),
            }],
            MessageValue::Markup(markup) => markup.to_parts(),
            MessageValue::Unknown(value) => vec![MessagePart::Unknown {
                source: value.source.clone(),
                value: value.value.to_string(),
            }],
            MessageValue::Fallback(value) => vec![MessagePart::Fallback {
                source: value.source.clone(),
            }],
        }
    }
}

impl Display for MessageValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MessageValue::Text(text) => f.write_str(text),
            MessageValue::String(value) => f.write_str(&value.value),
            MessageValue::Number(value) => f.write_str(&value.formatted),
            MessageValue::DateTime(value) => f.write_str(&value.formatted),
            MessageValue::Markup(markup) => {
                for child in &markup.children {
                    write!(f, "{child}")?;
                }
                Ok(())
            }
            MessageValue::Unknown(value) => write!(f, "{}", value.value),
            MessageValue::Fallback(value) => write!(f, "{{{}}}", value.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    pub source: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownValue {
    pub source: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackValue {
    pub source: String,
}

// =============================================================================
// Numbers
// =============================================================================

/// A raw numeric value, before any formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grouping {
    #[default]
    Auto,
    Always,
    Never,
    Min2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
}

/// How a number matches variant keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberSelect {
    /// Exact value, then cardinal plural category.
    #[default]
    Plural,
    /// Exact value, then ordinal plural category.
    Ordinal,
    /// Exact value only.
    Exact,
}

/// Formatting options carried by a number.
///
/// A number passed through `:number` twice keeps the options of the first
/// call unless the second overrides them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberOptions {
    pub minimum_integer_digits: Option<i16>,
    pub minimum_fraction_digits: Option<i16>,
    pub maximum_fraction_digits: Option<i16>,
    pub minimum_significant_digits: Option<i16>,
    pub maximum_significant_digits: Option<i16>,
    pub grouping: Grouping,
    pub style: NumberStyle,
    pub select: NumberSelect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberValue {
    pub source: String,
    pub locale: Locale,
    pub number: Number,
    pub options: NumberOptions,
    /// The number after rounding and padding; absent for NaN and infinities.
    pub decimal: Option<Decimal>,
    pub formatted: String,
}

impl NumberValue {
    /// Plural category of this number, or `None` for `select=exact`.
    pub fn plural_category(&self) -> Option<&'static str> {
        let ordinal = match self.options.select {
            NumberSelect::Plural => false,
            NumberSelect::Ordinal => true,
            NumberSelect::Exact => return None,
        };
        Some(match &self.decimal {
            Some(decimal) => plural_category(&self.locale, decimal, ordinal),
            None => "other",
        })
    }

    fn match_select_key(&self, key: &str) -> bool {
        if self.number.to_string() == key {
            return true;
        }
        self.plural_category() == Some(key)
    }
}

// =============================================================================
// Date-times
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeStyle {
    Short,
    Medium,
    Long,
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeOptions {
    pub date_style: Option<DateTimeStyle>,
    pub time_style: Option<DateTimeStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeValue {
    pub source: String,
    pub locale: Locale,
    pub value: DateTime<Iso>,
    pub options: DateTimeOptions,
    pub formatted: String,
}

// =============================================================================
// Markup
// =============================================================================

/// A resolved markup element.
///
/// After pairing, an open element holds everything up to its close as
/// `children`; close and standalone elements have none.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupValue {
    pub source: String,
    pub kind: MarkupKind,
    pub name: String,
    pub options: BTreeMap<String, String>,
    pub children: Vec<MessageValue>,
}

impl MarkupValue {
    /// A childless copy, used to reopen an element after a misnested close.
    pub fn reopened(&self) -> Self {
        Self {
            source: self.source.clone(),
            kind: self.kind,
            name: self.name.clone(),
            options: self.options.clone(),
            children: Vec::new(),
        }
    }

    /// A close part for a paired element is synthesized from its open.
    fn part(&self, kind: MarkupKind) -> MessagePart {
        let (source, options) = match (self.kind, kind) {
            (MarkupKind::Open, MarkupKind::Close) => (format!("-{}", self.name), BTreeMap::new()),
            _ => (self.source.clone(), self.options.clone()),
        };
        MessagePart::Markup {
            kind,
            name: self.name.clone(),
            source,
            options,
        }
    }

    fn to_parts(&self) -> Vec<MessagePart> {
        if self.kind != MarkupKind::Open {
            return vec![self.part(self.kind)];
        }
        let mut parts = vec![self.part(MarkupKind::Open)];
        parts.extend(self.children.iter().flat_map(MessageValue::to_parts));
        parts.push(self.part(MarkupKind::Close));
        parts
    }
}
