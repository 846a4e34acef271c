//! Function registry for expression annotations.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use icu_locale_core::{Locale, locale};
use thiserror::Error;

use crate::interpreter::{datetime, number};
use crate::types::{MessageValue, Number, StringValue};

/// What a function knows about the expression it was called for.
#[derive(Debug, Clone, Copy)]
pub struct FunctionContext<'a> {
    /// Requested locales, most preferred first.
    pub locales: &'a [Locale],
    /// Surface text of the calling expression, used as the value's source.
    pub source: &'a str,
}

impl FunctionContext<'_> {
    /// The most preferred locale, or `en` when none was given.
    pub fn locale(&self) -> Locale {
        self.locales.first().cloned().unwrap_or(locale!("en"))
    }
}

/// An error raised by a function implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("{0}")]
    BadInput(String),
    #[error("option '{name}': {message}")]
    BadOption { name: String, message: String },
}

impl FunctionError {
    pub fn bad_option(name: &str, message: impl Into<String>) -> Self {
        FunctionError::BadOption {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Function signature.
///
/// Takes:
/// - `context`: locales and the calling expression's source
/// - `options`: resolved option values, keyed by name
/// - `operand`: the resolved operand, if the expression has one
///
/// Implementations must not have side effects; a value may be resolved more
/// than once across calls.
pub type MessageFunction = Arc<
    dyn Fn(&FunctionContext<'_>, &FunctionOptions, Option<&MessageValue>) -> Result<MessageValue, FunctionError>
        + Send
        + Sync,
>;

/// Resolved options passed to a function.
///
/// Option values arrive as resolved values; literal options are strings.
/// The typed getters cast string values and report [`FunctionError::BadOption`]
/// when a value cannot be cast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionOptions {
    values: BTreeMap<String, MessageValue>,
}

impl FunctionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: MessageValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&MessageValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The option rendered as a string.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.values.get(name).map(ToString::to_string)
    }

    /// The option as an integer, from a number value or an integer string.
    pub fn get_integer(&self, name: &str) -> Result<Option<i64>, FunctionError> {
        let Some(value) = self.values.get(name) else {
            return Ok(None);
        };
        let parsed = match value {
            MessageValue::Number(number) => match number.number {
                Number::Integer(n) => Some(n),
                Number::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                    Some(f as i64)
                }
                Number::Float(_) => None,
            },
            MessageValue::String(string) => string.value.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| FunctionError::bad_option(name, format!("not an integer: {value}")))
    }

    /// The option as a boolean, from `true` or `false`.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, FunctionError> {
        match self.get_string(name).as_deref() {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(FunctionError::bad_option(
                name,
                format!("not a boolean: {other}"),
            )),
        }
    }
}

/// A registry of named functions.
///
/// `FunctionRegistry::default()` holds the built-in functions:
/// `string`, `number`, `integer`, `datetime`, `date` and `time`.
/// `FunctionRegistry::new()` is empty.
///
/// # Example
///
/// ```
/// use msgfmt::{FunctionRegistry, MessageValue, StringValue};
///
/// let mut functions = FunctionRegistry::default();
/// functions.insert("upper", |ctx, _options, operand| {
///     let text = operand.map(ToString::to_string).unwrap_or_default();
///     Ok(MessageValue::String(StringValue {
///         source: ctx.source.to_string(),
///         value: text.to_uppercase(),
///     }))
/// });
/// assert!(functions.contains("upper"));
/// ```
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, MessageFunction>,
}

impl FunctionRegistry {
    /// Create a registry with no functions.
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    /// Register or replace a function.
    pub fn insert<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&FunctionContext<'_>, &FunctionOptions, Option<&MessageValue>) -> Result<MessageValue, FunctionError>
            + Send
            + Sync
            + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&MessageFunction> {
        self.functions.get(name)
    }

    /// Check if a function is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.insert("string", string);
        registry.insert("number", number::number);
        registry.insert("integer", number::integer);
        registry.insert("datetime", datetime::datetime);
        registry.insert("date", datetime::date);
        registry.insert("time", datetime::time);
        registry
    }
}

impl Debug for FunctionRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// `:string` renders its operand as text and selects by string equality.
fn string(
    ctx: &FunctionContext<'_>,
    _options: &FunctionOptions,
    operand: Option<&MessageValue>,
) -> Result<MessageValue, FunctionError> {
    let value = match operand {
        Some(MessageValue::String(string)) => string.value.clone(),
        Some(MessageValue::Markup(_)) => {
            return Err(FunctionError::BadInput("markup is not a string".to_string()));
        }
        // The plain value, not its localized rendering.
        Some(MessageValue::Number(number)) => number.number.to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    Ok(MessageValue::String(StringValue {
        source: ctx.source.to_string(),
        value,
    }))
}
