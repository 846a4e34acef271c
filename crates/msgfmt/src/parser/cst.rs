//! Concrete syntax tree for messages.
//!
//! Every node keeps the byte [`Span`] it was parsed from, and string values
//! are already unescaped. Malformed regions are kept as [`Junk`] so that the
//! tree always covers the whole input.

use super::error::{Span, SyntaxError};

/// A parsed message, with every syntax error found along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub span: Span,
    pub declarations: Vec<Declaration>,
    pub body: Body,
    pub errors: Vec<SyntaxError>,
}

/// What follows the declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A single pattern, unquoted for simple messages or `{{...}}`.
    Pattern(Pattern),
    /// A `.match` block.
    Select(Select),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `.input {$name ...}`
    Input { span: Span, value: Placeholder },
    /// `.local $name = {...}`
    Local {
        span: Span,
        target: VariableRef,
        value: Placeholder,
    },
    /// Any other `.keyword`, kept verbatim.
    Reserved(ReservedStatement),
    Junk(Junk),
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Input { span, .. } | Declaration::Local { span, .. } => *span,
            Declaration::Reserved(statement) => statement.span,
            Declaration::Junk(junk) => junk.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservedStatement {
    pub span: Span,
    /// Keyword without the leading dot.
    pub keyword: String,
    /// Raw body text between the keyword and the first expression.
    pub body: String,
    pub expressions: Vec<Placeholder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub span: Span,
    pub selectors: Vec<Placeholder>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub span: Span,
    pub keys: Vec<Key>,
    pub value: Pattern,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Literal(Literal),
    Catchall(Span),
}

impl Key {
    pub fn span(&self) -> Span {
        match self {
            Key::Literal(literal) => literal.span,
            Key::Catchall(span) => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub span: Span,
    /// True for `{{...}}` patterns.
    pub quoted: bool,
    pub body: Vec<PatternElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    Text(Text),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub span: Span,
    /// Unescaped text.
    pub value: String,
}

/// Anything inside `{...}` in a pattern or declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    Expression(Expression),
    Markup(Markup),
    Junk(Junk),
}

impl Placeholder {
    pub fn span(&self) -> Span {
        match self {
            Placeholder::Expression(expression) => expression.span,
            Placeholder::Markup(markup) => markup.span,
            Placeholder::Junk(junk) => junk.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub span: Span,
    pub operand: Option<Operand>,
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Variable(VariableRef),
}

impl Operand {
    pub fn span(&self) -> Span {
        match self {
            Operand::Literal(literal) => literal.span,
            Operand::Variable(variable) => variable.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub span: Span,
    /// Whether the literal was written as `|...|`.
    pub quoted: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    pub span: Span,
    /// Name without the `$` sigil.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Function(FunctionRef),
    Reserved(ReservedAnnotation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRef {
    pub span: Span,
    /// Name without the `:` sigil, including any namespace (`ns:name`).
    pub name: String,
    pub options: Vec<CstOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservedAnnotation {
    pub span: Span,
    pub sigil: char,
    /// Verbatim source of the annotation, sigil included.
    pub source: String,
}

/// A `name=value` option.
#[derive(Debug, Clone, PartialEq)]
pub struct CstOption {
    pub span: Span,
    pub name: String,
    pub value: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupSigil {
    /// `{+name}`
    Open,
    /// `{-name}`
    Close,
    /// `{#name}`
    Standalone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    pub span: Span,
    pub sigil: MarkupSigil,
    pub name: String,
    pub options: Vec<CstOption>,
}

/// Source text the parser could not make sense of.
#[derive(Debug, Clone, PartialEq)]
pub struct Junk {
    pub span: Span,
    pub source: String,
}
