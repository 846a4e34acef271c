//! Structural checks on the semantic tree.

use std::collections::HashSet;

use super::error::{DataModelError, DataModelErrorKind};
use super::types::{
    Annotation, Declaration, Expression, FunctionOption, Message, Operand, PatternElement,
    SelectMessage, VariantKey,
};
use crate::parser::Span;

/// Source spans of built nodes, indexed like the nodes themselves.
#[derive(Debug, Default)]
pub(crate) struct NodeSpans {
    pub declarations: Vec<Span>,
    pub selectors: Vec<Span>,
    pub select: Option<Span>,
}

impl NodeSpans {
    fn declaration(&self, index: usize) -> Option<Span> {
        self.declarations.get(index).copied()
    }

    fn selector(&self, index: usize) -> Option<Span> {
        self.selectors.get(index).copied()
    }
}

/// Validate a message that was constructed in code.
///
/// Messages produced by [`super::build`] are already validated; this is for
/// adapters that assemble [`Message`] values directly.
pub fn validate(message: &Message) -> Vec<DataModelError> {
    let spans = NodeSpans::default();
    let mut errors = Vec::new();
    check_declarations(message.declarations(), &spans, &mut errors);
    for declaration in message.declarations() {
        if let Some(value) = declaration.value() {
            check_expression_options(value, &mut errors);
        }
    }
    match message {
        Message::Pattern(pattern_message) => {
            for element in &pattern_message.pattern {
                check_element_options(element, &mut errors);
            }
        }
        Message::Select(select) => {
            for selector in &select.selectors {
                check_expression_options(selector, &mut errors);
            }
            check_variant_keys(select, &mut errors);
            for variant in &select.variants {
                for element in &variant.value {
                    check_element_options(element, &mut errors);
                }
            }
            check_selectors(select, &spans, &mut errors);
        }
    }
    errors
}

/// Duplicate and self-referencing declarations.
///
/// A declaration is a duplicate when its name was declared before, or when
/// an earlier declaration (or its own expression, for `.local`) already
/// referenced that name.
pub(crate) fn check_declarations(
    declarations: &[Declaration],
    spans: &NodeSpans,
    errors: &mut Vec<DataModelError>,
) {
    let mut declared: HashSet<&str> = HashSet::new();
    let mut referenced: HashSet<String> = HashSet::new();
    for (index, declaration) in declarations.iter().enumerate() {
        let (name, value) = match declaration {
            Declaration::Input { name, value } => {
                // The input's own operand names the external variable.
                let mut refs = expression_variables(value);
                refs.retain(|r| r != name);
                (name.as_str(), refs)
            }
            Declaration::Local { name, value } => (name.as_str(), expression_variables(value)),
            Declaration::UnsupportedStatement(statement) => {
                referenced.extend(statement.expressions.iter().flat_map(expression_variables));
                continue;
            }
        };
        let self_reference = matches!(declaration, Declaration::Local { .. })
            && value.iter().any(|r| r == name);
        if declared.contains(name) || referenced.contains(name) || self_reference {
            errors.push(
                DataModelError::new(
                    DataModelErrorKind::DuplicateDeclaration,
                    spans.declaration(index),
                )
                .with_detail(format!("${name}")),
            );
        }
        declared.insert(name);
        referenced.extend(value);
    }
}

/// Selector annotations and the catchall variant.
pub(crate) fn check_selectors(
    select: &SelectMessage,
    spans: &NodeSpans,
    errors: &mut Vec<DataModelError>,
) {
    for (index, selector) in select.selectors.iter().enumerate() {
        if !is_annotated(selector, &select.declarations) {
            errors.push(DataModelError::new(
                DataModelErrorKind::MissingSelectorAnnotation,
                spans.selector(index),
            ));
        }
    }
    if !select.variants.iter().any(|variant| variant.is_catchall()) {
        errors.push(DataModelError::new(
            DataModelErrorKind::MissingFallback,
            spans.select,
        ));
    }
}

/// Whether `expression` has an annotation, directly or through the
/// declaration its variable operand refers to.
fn is_annotated(expression: &Expression, declarations: &[Declaration]) -> bool {
    if expression.annotation.is_some() {
        return true;
    }
    let Some(Operand::Variable(variable)) = &expression.operand else {
        return false;
    };
    let Some(index) = declarations
        .iter()
        .rposition(|d| d.name() == Some(variable.name.as_str()))
    else {
        return false;
    };
    match declarations.get(index) {
        Some(Declaration::Input { value, .. }) => value.annotation.is_some(),
        Some(Declaration::Local { value, .. }) => {
            is_annotated(value, declarations.get(..index).unwrap_or_default())
        }
        _ => false,
    }
}

fn check_variant_keys(select: &SelectMessage, errors: &mut Vec<DataModelError>) {
    let mut seen: Vec<&[VariantKey]> = Vec::new();
    for variant in &select.variants {
        if variant.keys.len() != select.selectors.len() {
            errors.push(DataModelError::new(DataModelErrorKind::KeyMismatch, None));
        } else if seen.contains(&variant.keys.as_slice()) {
            errors.push(DataModelError::new(DataModelErrorKind::DuplicateVariant, None));
        } else {
            seen.push(&variant.keys);
        }
    }
}

fn check_element_options(element: &PatternElement, errors: &mut Vec<DataModelError>) {
    match element {
        PatternElement::Text(_) => {}
        PatternElement::Expression(expression) => check_expression_options(expression, errors),
        PatternElement::Markup(markup) => check_options(&markup.options, errors),
    }
}

fn check_expression_options(expression: &Expression, errors: &mut Vec<DataModelError>) {
    if let Some(function) = expression.function() {
        check_options(&function.options, errors);
    }
}

fn check_options(options: &[FunctionOption], errors: &mut Vec<DataModelError>) {
    let mut names = HashSet::new();
    for option in options {
        if !names.insert(option.name.as_str()) {
            errors.push(
                DataModelError::new(DataModelErrorKind::DuplicateOption, None)
                    .with_detail(option.name.clone()),
            );
        }
    }
}

/// Names of every variable an expression refers to, options included.
pub(crate) fn expression_variables(expression: &Expression) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(Operand::Variable(variable)) = &expression.operand {
        names.push(variable.name.clone());
    }
    if let Some(Annotation::Function(function)) = &expression.annotation {
        for option in &function.options {
            if let Operand::Variable(variable) = &option.value {
                names.push(variable.name.clone());
            }
        }
    }
    names
}
