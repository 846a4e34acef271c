//! Semantic message tree.
//!
//! Built from the CST by [`super::build`], or constructed directly by
//! adapters. Values are immutable once built and can be shared across
//! threads for concurrent resolution.

use serde::Serialize;

use crate::parser::is_unquoted_literal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Message {
    Pattern(PatternMessage),
    Select(SelectMessage),
}

impl Message {
    pub fn declarations(&self) -> &[Declaration] {
        match self {
            Message::Pattern(message) => &message.declarations,
            Message::Select(message) => &message.declarations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMessage {
    pub declarations: Vec<Declaration>,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectMessage {
    pub declarations: Vec<Declaration>,
    pub selectors: Vec<Expression>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Declaration {
    /// `.input {$name ...}`: annotates an external variable.
    Input { name: String, value: Expression },
    /// `.local $name = {...}`
    Local { name: String, value: Expression },
    /// A reserved statement this engine does not interpret.
    UnsupportedStatement(UnsupportedStatement),
}

impl Declaration {
    /// The declared variable name, if this declaration binds one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Input { name, .. } | Declaration::Local { name, .. } => Some(name),
            Declaration::UnsupportedStatement(_) => None,
        }
    }

    pub fn value(&self) -> Option<&Expression> {
        match self {
            Declaration::Input { value, .. } | Declaration::Local { value, .. } => Some(value),
            Declaration::UnsupportedStatement(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedStatement {
    /// Keyword without the leading dot.
    pub keyword: String,
    pub body: String,
    pub expressions: Vec<Expression>,
}

/// Ordered pattern elements; output parts follow this order exactly.
pub type Pattern = Vec<PatternElement>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternElement {
    Text(String),
    Expression(Expression),
    Markup(Markup),
}

/// An operand, an annotation, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub operand: Option<Operand>,
    pub annotation: Option<Annotation>,
}

impl Expression {
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            operand: Some(Operand::Variable(VariableRef { name: name.into() })),
            annotation: None,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            operand: Some(Operand::Literal(Literal {
                value: value.into(),
            })),
            annotation: None,
        }
    }

    /// Attach a function annotation.
    pub fn with_function(mut self, name: impl Into<String>, options: Vec<FunctionOption>) -> Self {
        self.annotation = Some(Annotation::Function(FunctionAnnotation {
            name: name.into(),
            options,
        }));
        self
    }

    /// The text shown inside `{...}` when this expression falls back.
    ///
    /// The operand wins when present; otherwise the annotation is used.
    pub fn fallback_source(&self) -> String {
        match (&self.operand, &self.annotation) {
            (Some(operand), _) => operand.fallback_source(),
            (None, Some(Annotation::Function(function))) => format!(":{}", function.name),
            (None, Some(Annotation::Unsupported(unsupported))) => unsupported.source.clone(),
            (None, None) => "\u{FFFD}".to_string(),
        }
    }

    pub fn function(&self) -> Option<&FunctionAnnotation> {
        match &self.annotation {
            Some(Annotation::Function(function)) => Some(function),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operand {
    Literal(Literal),
    Variable(VariableRef),
}

impl Operand {
    pub fn fallback_source(&self) -> String {
        match self {
            Operand::Literal(literal) => format!("|{}|", escape_literal(&literal.value)),
            Operand::Variable(variable) => format!("${}", variable.name),
        }
    }
}

/// A decoded literal value; quoting is a syntax concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    pub value: String,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Whether the literal needs `|...|` quotes in source form.
    pub fn needs_quotes(&self) -> bool {
        !is_unquoted_literal(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Annotation {
    Function(FunctionAnnotation),
    Unsupported(UnsupportedAnnotation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionAnnotation {
    pub name: String,
    pub options: Vec<FunctionOption>,
}

/// A reserved-sigil annotation, or unparseable placeholder text.
///
/// Resolving one always yields a fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedAnnotation {
    pub source: String,
}

/// A `name=value` option on a function or markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionOption {
    pub name: String,
    pub value: Operand,
}

impl FunctionOption {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Operand::Literal(Literal::new(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkupKind {
    Open,
    Close,
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Markup {
    pub kind: MarkupKind,
    pub name: String,
    /// Always empty for close markup.
    pub options: Vec<FunctionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub keys: Vec<VariantKey>,
    pub value: Pattern,
}

impl Variant {
    pub fn is_catchall(&self) -> bool {
        self.keys.iter().all(|key| matches!(key, VariantKey::Catchall))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKey {
    Literal(Literal),
    /// `*`
    Catchall,
}

/// Escape `\` and `|` for use inside a quoted literal.
pub(crate) fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
