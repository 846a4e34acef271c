//! Compiled messages ready for formatting.
//!
//! `MessageFormat` is the user-facing API: it parses a message once, keeps
//! its diagnostics, and formats it against any number of scopes.

use bon::Builder;
use icu_locale_core::{Locale, locale};

use crate::interpreter::{FunctionRegistry, MessageError, Scope, resolve};
use crate::model::{Diagnostic, Message};
use crate::types::{MessagePart, MessageValue};

/// A parsed message bound to locales and a function registry.
///
/// A `MessageFormat` is immutable once built and can be shared across
/// threads; every format call uses its own resolution state.
///
/// # Example
///
/// ```
/// use icu_locale_core::locale;
/// use msgfmt::{MessageFormat, params};
///
/// let mf = MessageFormat::new(
///     locale!("en"),
///     ".input {$count :number}\n.match {$count}\none {{You have one message}}\n* {{You have {$count} messages}}",
/// );
/// assert!(mf.diagnostics().is_empty());
/// assert_eq!(mf.format(&params! { "count" => 1 }), "You have one message");
/// assert_eq!(mf.format(&params! { "count" => 1200 }), "You have 1,200 messages");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct MessageFormat {
    /// Message source text.
    source: String,

    /// Locales for formatting and plural rules, most preferred first.
    #[builder(default = vec![locale!("en")])]
    locales: Vec<Locale>,

    /// Functions available to annotations. Defaults to the built-ins.
    #[builder(default)]
    functions: FunctionRegistry,

    /// Parsed message and its syntax and data-model diagnostics.
    #[builder(skip = Parsed::new(&source))]
    parsed: Parsed,
}

#[derive(Debug, Clone)]
struct Parsed {
    message: Message,
    diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    fn new(source: &str) -> Self {
        let (message, diagnostics) = crate::parse(source);
        Self {
            message,
            diagnostics,
        }
    }
}

impl MessageFormat {
    /// Parse `source` for a single locale with the built-in functions.
    pub fn new(locale: Locale, source: &str) -> Self {
        MessageFormat::builder()
            .source(source)
            .locales(vec![locale])
            .build()
    }

    /// The message source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// The parsed data model.
    pub fn message(&self) -> &Message {
        &self.parsed.message
    }

    /// Syntax and data-model diagnostics, in source order per tier.
    ///
    /// A message with diagnostics can still be formatted; broken parts
    /// render as fallbacks.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.parsed.diagnostics
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Resolve the message into values, reporting errors to `on_error`.
    pub fn resolve(
        &self,
        scope: &Scope,
        mut on_error: impl FnMut(MessageError),
    ) -> Vec<MessageValue> {
        resolve(
            &self.parsed.message,
            scope,
            &self.functions,
            &self.locales,
            &mut on_error,
        )
    }

    /// Format to a string, ignoring resolution errors.
    ///
    /// Errors are still logged through `tracing`.
    pub fn format(&self, scope: &Scope) -> String {
        self.format_with_errors(scope, |_| {})
    }

    /// Format to a string, reporting resolution errors to `on_error`.
    pub fn format_with_errors(&self, scope: &Scope, on_error: impl FnMut(MessageError)) -> String {
        self.resolve(scope, on_error)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Format to typed parts, ignoring resolution errors.
    ///
    /// Markup is flattened: an open part, the parts of its children, then a
    /// close part.
    pub fn format_to_parts(&self, scope: &Scope) -> Vec<MessagePart> {
        self.resolve(scope, |_| {})
            .iter()
            .flat_map(MessageValue::to_parts)
            .collect()
    }
}
