//! Resolution engine for parsed messages.
//!
//! This module walks the semantic tree against a caller-supplied scope. It
//! resolves declarations lazily, looks up dotted variable names, calls
//! annotation functions, selects a variant, and pairs markup. Every failure
//! is reported through the context's error sink and replaced by a fallback
//! value; resolution itself never fails.

use std::collections::BTreeMap;

use crate::interpreter::datetime::datetime_value;
use crate::interpreter::error::{MessageError, compute_suggestions};
use crate::interpreter::markup::pair_markup;
use crate::interpreter::number::number_value;
use crate::interpreter::registry::{FunctionContext, FunctionError, FunctionOptions};
use crate::interpreter::{ResolveContext, Scope};
use crate::model::{
    Annotation, Declaration, Expression, FunctionAnnotation, Markup, MarkupKind, Message, Operand,
    PatternElement, SelectMessage, VariantKey,
};
use crate::types::{
    MarkupValue, MessageValue, Number, NumberOptions, StringValue, UnknownValue, Value,
};

/// Resolve a message into a sequence of values.
///
/// Unsupported statements are reported once each, then the pattern (or the
/// selected variant's pattern) is resolved and its markup paired.
pub fn resolve_message(message: &Message, ctx: &mut ResolveContext<'_>) -> Vec<MessageValue> {
    for declaration in message.declarations() {
        if let Declaration::UnsupportedStatement(statement) = declaration {
            ctx.report(MessageError::UnsupportedStatement {
                keyword: statement.keyword.clone(),
                fallback: format!(".{}", statement.keyword),
            });
        }
    }

    let values = match message {
        Message::Pattern(pattern_message) => resolve_pattern(&pattern_message.pattern, ctx),
        Message::Select(select) => match select_variant(select, ctx) {
            Some(index) => resolve_pattern(&select.variants[index].value, ctx),
            None => {
                let fallback = "\u{FFFD}".to_string();
                ctx.report(MessageError::NoMatch {
                    fallback: fallback.clone(),
                });
                vec![MessageValue::fallback(fallback)]
            }
        },
    };
    pair_markup(values)
}

fn resolve_pattern(pattern: &[PatternElement], ctx: &mut ResolveContext<'_>) -> Vec<MessageValue> {
    let visible = ctx.declarations().len();
    pattern
        .iter()
        .map(|element| match element {
            PatternElement::Text(text) => MessageValue::Text(text.clone()),
            PatternElement::Expression(expression) => resolve_expression(expression, visible, ctx),
            PatternElement::Markup(markup) => resolve_markup(markup, visible, ctx),
        })
        .collect()
}

// =============================================================================
// Selection
// =============================================================================

/// Find the first variant whose keys all match, in declaration order.
///
/// Selector values are resolved once. A selector that resolved to a fallback
/// or to a value that cannot be selected on only matches catchall keys.
fn select_variant(select: &SelectMessage, ctx: &mut ResolveContext<'_>) -> Option<usize> {
    let visible = ctx.declarations().len();
    let mut selectors = Vec::with_capacity(select.selectors.len());
    for selector in &select.selectors {
        let value = resolve_expression(selector, visible, ctx);
        if !value.is_fallback() && !value.is_selectable() {
            ctx.report(MessageError::NotSelectable {
                fallback: selector.fallback_source(),
            });
        }
        selectors.push(value);
    }

    let index = select.variants.iter().position(|variant| {
        variant
            .keys
            .iter()
            .zip(&selectors)
            .all(|(key, selector)| match key {
                VariantKey::Catchall => true,
                VariantKey::Literal(literal) => {
                    selector.match_select_key(&literal.value)
                }
            })
    });
    tracing::trace!(?index, selectors = selectors.len(), "selected variant");
    index
}

// =============================================================================
// Expressions
// =============================================================================

/// Resolve an expression that can see the first `visible` declarations.
fn resolve_expression(
    expression: &Expression,
    visible: usize,
    ctx: &mut ResolveContext<'_>,
) -> MessageValue {
    match &expression.annotation {
        None => match &expression.operand {
            Some(operand) => resolve_operand(operand, visible, ctx),
            None => MessageValue::fallback(expression.fallback_source()),
        },
        Some(Annotation::Function(function)) => {
            resolve_function(expression, function, visible, ctx)
        }
        Some(Annotation::Unsupported(_)) => {
            let fallback = expression.fallback_source();
            ctx.report(MessageError::UnsupportedAnnotation {
                fallback: fallback.clone(),
            });
            MessageValue::fallback(fallback)
        }
    }
}

fn resolve_function(
    expression: &Expression,
    function: &FunctionAnnotation,
    visible: usize,
    ctx: &mut ResolveContext<'_>,
) -> MessageValue {
    let source = expression.fallback_source();

    let operand = match &expression.operand {
        Some(operand) => {
            let value = resolve_operand(operand, visible, ctx);
            if value.is_fallback() {
                return value;
            }
            Some(value)
        }
        None => None,
    };

    let Some(implementation) = ctx.functions().get(&function.name).cloned() else {
        let suggestions = compute_suggestions(&function.name, ctx.functions().names());
        ctx.report(MessageError::MissingFunction {
            name: function.name.clone(),
            fallback: source.clone(),
            suggestions,
        });
        return MessageValue::fallback(source);
    };

    let mut options = FunctionOptions::new();
    for option in &function.options {
        let value = resolve_operand(&option.value, visible, ctx);
        if !value.is_fallback() {
            options.insert(option.name.clone(), value);
        }
    }

    let function_ctx = FunctionContext {
        locales: ctx.locales(),
        source: &source,
    };
    match implementation(&function_ctx, &options, operand.as_ref()) {
        Ok(value) => value,
        Err(error) => {
            let (function_name, fallback) = (function.name.clone(), source.clone());
            ctx.report(match error {
                FunctionError::BadInput(message) => MessageError::BadInput {
                    function: function_name,
                    fallback,
                    message,
                },
                error @ FunctionError::BadOption { .. } => MessageError::BadOption {
                    function: function_name,
                    fallback,
                    message: error.to_string(),
                },
            });
            MessageValue::fallback(source)
        }
    }
}

fn resolve_operand(operand: &Operand, visible: usize, ctx: &mut ResolveContext<'_>) -> MessageValue {
    match operand {
        Operand::Literal(literal) => MessageValue::String(StringValue {
            source: operand.fallback_source(),
            value: literal.value.clone(),
        }),
        Operand::Variable(variable) => resolve_variable(&variable.name, visible, ctx),
    }
}

/// Resolve a variable reference.
///
/// Declarations are checked first, exact names only; a declaration's value
/// is resolved on first use and cached for the rest of the call. Otherwise
/// the name is looked up in the caller's scope with dotted-prefix matching.
fn resolve_variable(name: &str, visible: usize, ctx: &mut ResolveContext<'_>) -> MessageValue {
    if let Some(index) = ctx.find_declaration(name, visible) {
        if let Some(value) = ctx.cached(index) {
            return value.clone();
        }
        let declarations = ctx.declarations();
        let value = match declarations.get(index).and_then(Declaration::value) {
            Some(expression) => resolve_expression(expression, index, ctx),
            None => MessageValue::fallback(format!("${name}")),
        };
        ctx.cache(index, value.clone());
        return value;
    }

    let source = format!("${name}");
    match lookup(ctx.scope(), name) {
        Some(value) => input_value(value, &source, ctx),
        None => {
            ctx.report(MessageError::UnresolvedVariable {
                name: name.to_string(),
                fallback: source.clone(),
            });
            MessageValue::fallback(source)
        }
    }
}

/// Look up a dotted name in a scope.
///
/// An exact key always wins. Otherwise the longest prefix that names a key
/// is taken and the rest of the path is looked up inside its value.
fn lookup<'v, S>(scope: &'v S, name: &str) -> Option<&'v Value>
where
    S: Lookup,
{
    if let Some(value) = scope.get_value(name) {
        return Some(value);
    }
    let mut end = name.len();
    while let Some(dot) = name.get(..end).and_then(|prefix| prefix.rfind('.')) {
        let prefix = name.get(..dot)?;
        if let Some(value) = scope.get_value(prefix) {
            let rest = name.get(dot + 1..)?;
            return value.as_map().and_then(|map| lookup(map, rest));
        }
        end = dot;
    }
    None
}

/// Anything variables can be looked up in.
trait Lookup {
    fn get_value(&self, key: &str) -> Option<&Value>;
}

impl Lookup for Scope {
    fn get_value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Lookup for BTreeMap<String, Value> {
    fn get_value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Wrap an input value as a resolved value with default formatting.
fn input_value(value: &Value, source: &str, ctx: &ResolveContext<'_>) -> MessageValue {
    let function_ctx = FunctionContext {
        locales: ctx.locales(),
        source,
    };
    match value {
        Value::Number(n) => MessageValue::Number(number_value(
            source,
            function_ctx.locale(),
            Number::Integer(*n),
            NumberOptions::default(),
        )),
        Value::Float(f) => MessageValue::Number(number_value(
            source,
            function_ctx.locale(),
            Number::Float(*f),
            NumberOptions::default(),
        )),
        Value::String(s) => MessageValue::String(StringValue {
            source: source.to_string(),
            value: s.clone(),
        }),
        Value::DateTime(dt) => datetime_value(&function_ctx, dt),
        Value::Bool(_) | Value::Map(_) => MessageValue::Unknown(UnknownValue {
            source: source.to_string(),
            value: value.clone(),
        }),
    }
}

// =============================================================================
// Markup
// =============================================================================

fn resolve_markup(markup: &Markup, visible: usize, ctx: &mut ResolveContext<'_>) -> MessageValue {
    let mut options = BTreeMap::new();
    for option in &markup.options {
        let value = resolve_operand(&option.value, visible, ctx);
        if !value.is_fallback() {
            options.insert(option.name.clone(), value.to_string());
        }
    }
    let sigil = match markup.kind {
        MarkupKind::Open => '+',
        MarkupKind::Close => '-',
        MarkupKind::Standalone => '#',
    };
    MessageValue::Markup(MarkupValue {
        source: format!("{sigil}{}", markup.name),
        kind: markup.kind,
        name: markup.name.clone(),
        options,
        children: Vec::new(),
    })
}
