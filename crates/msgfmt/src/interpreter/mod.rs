//! Message resolution.
//!
//! This module provides the engine that takes a parsed message and produces
//! resolved values. It resolves declarations, calls annotation functions,
//! selects variants based on input values, and pairs markup.

mod context;
mod datetime;
mod error;
mod evaluator;
mod markup;
mod number;
mod plural;
mod registry;

use icu_locale_core::Locale;

pub use context::{ResolveContext, Scope};
pub use error::{MessageError, compute_suggestions};
pub use evaluator::resolve_message;
pub use markup::pair_markup;
pub use plural::plural_category;
pub use registry::{
    FunctionContext, FunctionError, FunctionOptions, FunctionRegistry, MessageFunction,
};

use crate::model::Message;
use crate::types::MessageValue;

/// Resolve `message` against `scope`, reporting errors to `on_error`.
///
/// Never fails: every problem becomes a fallback value in the output and an
/// entry passed to `on_error`.
///
/// # Example
///
/// ```
/// use msgfmt::interpreter::{FunctionRegistry, MessageError, resolve};
/// use msgfmt::{params, parse};
///
/// let (message, diagnostics) = parse("Hello, {$name}!");
/// assert!(diagnostics.is_empty());
///
/// let mut errors = Vec::new();
/// let values = resolve(
///     &message,
///     &params! { "name" => "Ada" },
///     &FunctionRegistry::default(),
///     &[],
///     &mut |error: MessageError| errors.push(error),
/// );
/// let text: String = values.iter().map(ToString::to_string).collect();
/// assert_eq!(text, "Hello, Ada!");
/// assert!(errors.is_empty());
/// ```
pub fn resolve(
    message: &Message,
    scope: &Scope,
    functions: &FunctionRegistry,
    locales: &[Locale],
    on_error: &mut dyn FnMut(MessageError),
) -> Vec<MessageValue> {
    let mut ctx = ResolveContext::new(scope, message.declarations(), functions, locales, on_error);
    resolve_message(message, &mut ctx)
}
