//! Resolution context for tracking state during a single resolve call.

use std::collections::HashMap;

use icu_locale_core::Locale;

use crate::interpreter::FunctionRegistry;
use crate::interpreter::error::MessageError;
use crate::model::Declaration;
use crate::types::{MessageValue, Value};

/// Caller-supplied input values, keyed by variable name.
pub type Scope = HashMap<String, Value>;

/// Resolution context carrying state through one resolve call.
///
/// The context tracks:
/// - The caller's input scope
/// - The message's declarations and the values resolved from them so far
/// - The locales and functions available to expressions
/// - The error sink every resolution error is reported to
///
/// The declaration cache is the only mutable state; a context is never
/// shared between resolve calls.
pub struct ResolveContext<'a> {
    scope: &'a Scope,
    declarations: &'a [Declaration],
    functions: &'a FunctionRegistry,
    locales: &'a [Locale],
    /// Resolved declaration values, keyed by declaration index.
    cache: HashMap<usize, MessageValue>,
    on_error: &'a mut dyn FnMut(MessageError),
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        scope: &'a Scope,
        declarations: &'a [Declaration],
        functions: &'a FunctionRegistry,
        locales: &'a [Locale],
        on_error: &'a mut dyn FnMut(MessageError),
    ) -> Self {
        Self {
            scope,
            declarations,
            functions,
            locales,
            cache: HashMap::new(),
            on_error,
        }
    }

    pub fn scope(&self) -> &'a Scope {
        self.scope
    }

    pub fn declarations(&self) -> &'a [Declaration] {
        self.declarations
    }

    pub fn functions(&self) -> &'a FunctionRegistry {
        self.functions
    }

    pub fn locales(&self) -> &'a [Locale] {
        self.locales
    }

    /// Index of the last declaration named `name` among the first `visible`.
    pub fn find_declaration(&self, name: &str, visible: usize) -> Option<usize> {
        self.declarations
            .get(..visible)
            .unwrap_or(self.declarations)
            .iter()
            .rposition(|declaration| declaration.name() == Some(name))
    }

    pub fn cached(&self, index: usize) -> Option<&MessageValue> {
        self.cache.get(&index)
    }

    pub fn cache(&mut self, index: usize, value: MessageValue) {
        self.cache.insert(index, value);
    }

    /// Report an error to the caller's sink.
    pub fn report(&mut self, error: MessageError) {
        tracing::warn!(kind = error.kind(), %error, "message resolution error");
        (self.on_error)(error);
    }
}
