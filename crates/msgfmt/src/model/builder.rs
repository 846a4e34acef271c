//! Builds the semantic tree from a CST.
//!
//! The builder walks the CST once. Problems it can repair locally (duplicate
//! options, mismatched or duplicate variant keys) are repaired and reported;
//! junk is turned into unsupported expressions so that it resolves to a
//! fallback value. The remaining checks run in [`super::validate`].

use std::collections::HashSet;

use super::error::{DataModelError, DataModelErrorKind};
use super::types::{
    Annotation, Declaration, Expression, FunctionAnnotation, FunctionOption, Literal, Markup,
    MarkupKind, Message, Operand, Pattern, PatternElement, PatternMessage, SelectMessage,
    UnsupportedAnnotation, UnsupportedStatement, Variant, VariableRef, VariantKey,
};
use super::validate::{NodeSpans, check_declarations, check_selectors};
use crate::parser::cst;

/// Convert a CST into a [`Message`], collecting data-model errors.
///
/// Syntax errors already present on the CST are not repeated here.
pub fn build(cst: &cst::Message) -> (Message, Vec<DataModelError>) {
    let mut builder = ModelBuilder::default();
    let message = builder.message(cst);
    tracing::debug!(errors = builder.errors.len(), "built message data model");
    (message, builder.errors)
}

#[derive(Default)]
struct ModelBuilder {
    errors: Vec<DataModelError>,
    spans: NodeSpans,
}

impl ModelBuilder {
    fn message(&mut self, cst: &cst::Message) -> Message {
        let declarations = self.declarations(&cst.declarations);
        check_declarations(&declarations, &self.spans, &mut self.errors);

        match &cst.body {
            cst::Body::Pattern(pattern) => Message::Pattern(PatternMessage {
                declarations,
                pattern: self.pattern(pattern),
            }),
            cst::Body::Select(select) => {
                self.spans.select = Some(select.span);
                let selectors: Vec<Expression> = select
                    .selectors
                    .iter()
                    .map(|selector| {
                        self.spans.selectors.push(selector.span());
                        self.placeholder_expression(selector)
                    })
                    .collect();
                let variants = self.variants(&select.variants, selectors.len());
                let message = SelectMessage {
                    declarations,
                    selectors,
                    variants,
                };
                check_selectors(&message, &self.spans, &mut self.errors);
                Message::Select(message)
            }
        }
    }

    fn declarations(&mut self, declarations: &[cst::Declaration]) -> Vec<Declaration> {
        let mut built = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            let converted = match declaration {
                cst::Declaration::Input { value, .. } => self.input(value),
                // A broken value still shadows the input of the same name.
                cst::Declaration::Local { target, value, .. } if !target.name.is_empty() => {
                    Some(Declaration::Local {
                        name: target.name.clone(),
                        value: self.placeholder_expression(value),
                    })
                }
                cst::Declaration::Local { .. } => None,
                cst::Declaration::Reserved(statement) => {
                    Some(Declaration::UnsupportedStatement(UnsupportedStatement {
                        keyword: statement.keyword.clone(),
                        body: statement.body.clone(),
                        expressions: statement
                            .expressions
                            .iter()
                            .map(|e| self.placeholder_expression(e))
                            .collect(),
                    }))
                }
                // Already reported as a syntax error.
                cst::Declaration::Junk(_) => None,
            };
            if let Some(converted) = converted {
                self.spans.declarations.push(declaration.span());
                built.push(converted);
            }
        }
        built
    }

    /// `.input` requires a variable operand; anything else is dropped.
    fn input(&mut self, value: &cst::Placeholder) -> Option<Declaration> {
        let cst::Placeholder::Expression(expression) = value else {
            return None;
        };
        let Some(cst::Operand::Variable(variable)) = &expression.operand else {
            return None;
        };
        if variable.name.is_empty() {
            return None;
        }
        Some(Declaration::Input {
            name: variable.name.clone(),
            value: self.expression(expression),
        })
    }

    fn variants(&mut self, variants: &[cst::Variant], selector_count: usize) -> Vec<Variant> {
        let mut built: Vec<Variant> = Vec::with_capacity(variants.len());
        for variant in variants {
            if variant.keys.len() != selector_count {
                self.errors.push(DataModelError::new(
                    DataModelErrorKind::KeyMismatch,
                    Some(variant.span),
                ));
                continue;
            }
            let keys: Vec<VariantKey> = variant
                .keys
                .iter()
                .map(|key| match key {
                    cst::Key::Literal(literal) => VariantKey::Literal(Literal::new(&literal.value)),
                    cst::Key::Catchall(_) => VariantKey::Catchall,
                })
                .collect();
            if built.iter().any(|existing| existing.keys == keys) {
                self.errors.push(DataModelError::new(
                    DataModelErrorKind::DuplicateVariant,
                    Some(variant.span),
                ));
                continue;
            }
            built.push(Variant {
                keys,
                value: self.pattern(&variant.value),
            });
        }
        built
    }

    fn pattern(&mut self, pattern: &cst::Pattern) -> Pattern {
        pattern
            .body
            .iter()
            .map(|element| match element {
                cst::PatternElement::Text(text) => PatternElement::Text(text.value.clone()),
                cst::PatternElement::Placeholder(cst::Placeholder::Markup(markup)) => {
                    PatternElement::Markup(self.markup(markup))
                }
                cst::PatternElement::Placeholder(placeholder) => {
                    PatternElement::Expression(self.placeholder_expression(placeholder))
                }
            })
            .collect()
    }

    /// Convert a placeholder that must act as an expression.
    ///
    /// Junk and misplaced markup become unsupported expressions carrying
    /// their source text, so they resolve to a fallback.
    fn placeholder_expression(&mut self, placeholder: &cst::Placeholder) -> Expression {
        match placeholder {
            cst::Placeholder::Expression(expression) => self.expression(expression),
            cst::Placeholder::Markup(markup) => unsupported(&markup_source(markup)),
            cst::Placeholder::Junk(junk) => unsupported(strip_braces(&junk.source)),
        }
    }

    fn expression(&mut self, expression: &cst::Expression) -> Expression {
        let operand = expression.operand.as_ref().map(operand);
        let annotation = expression.annotation.as_ref().map(|annotation| match annotation {
            cst::Annotation::Function(function) => Annotation::Function(FunctionAnnotation {
                name: function.name.clone(),
                options: self.options(&function.options),
            }),
            cst::Annotation::Reserved(reserved) => {
                Annotation::Unsupported(UnsupportedAnnotation {
                    source: reserved.source.clone(),
                })
            }
        });
        Expression {
            operand,
            annotation,
        }
    }

    fn markup(&mut self, markup: &cst::Markup) -> Markup {
        Markup {
            kind: match markup.sigil {
                cst::MarkupSigil::Open => MarkupKind::Open,
                cst::MarkupSigil::Close => MarkupKind::Close,
                cst::MarkupSigil::Standalone => MarkupKind::Standalone,
            },
            name: markup.name.clone(),
            options: self.options(&markup.options),
        }
    }

    /// Convert options, keeping the first of any duplicated name.
    fn options(&mut self, options: &[cst::CstOption]) -> Vec<FunctionOption> {
        let mut seen = HashSet::new();
        let mut built = Vec::with_capacity(options.len());
        for option in options {
            if !seen.insert(option.name.as_str()) {
                self.errors.push(
                    DataModelError::new(DataModelErrorKind::DuplicateOption, Some(option.span))
                        .with_detail(option.name.clone()),
                );
                continue;
            }
            built.push(FunctionOption {
                name: option.name.clone(),
                value: operand(&option.value),
            });
        }
        built
    }
}

fn operand(operand: &cst::Operand) -> Operand {
    match operand {
        cst::Operand::Literal(literal) => Operand::Literal(Literal::new(&literal.value)),
        cst::Operand::Variable(variable) => Operand::Variable(VariableRef {
            name: variable.name.clone(),
        }),
    }
}

fn unsupported(source: &str) -> Expression {
    Expression {
        operand: None,
        annotation: Some(Annotation::Unsupported(UnsupportedAnnotation {
            source: source.to_string(),
        })),
    }
}

fn strip_braces(source: &str) -> &str {
    let inner = source.strip_prefix('{').unwrap_or(source);
    inner.strip_suffix('}').unwrap_or(inner)
}

fn markup_source(markup: &cst::Markup) -> String {
    let sigil = match markup.sigil {
        cst::MarkupSigil::Open => '+',
        cst::MarkupSigil::Close => '-',
        cst::MarkupSigil::Standalone => '#',
    };
    format!("{sigil}{}", markup.name)
}
