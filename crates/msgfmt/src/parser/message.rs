//! Error-tolerant message parser.
//!
//! The parser walks the source with an explicit cursor. Token lexing is
//! delegated to the winnow parsers in [`super::lexer`]; everything structural
//! (declarations, patterns, placeholders, variants) is handled here so that a
//! local failure can be recorded and skipped instead of aborting the parse.

use std::mem;

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_till;

use super::cst::{
    Annotation, Body, CstOption, Declaration, Expression, FunctionRef, Junk, Key, Literal, Markup,
    MarkupSigil, Message, Operand, Pattern, PatternElement, Placeholder, ReservedAnnotation,
    ReservedStatement, Select, Text, Variant, VariableRef,
};
use super::error::{Span, SyntaxError, SyntaxErrorKind};
use super::lexer::{
    ESCAPABLE, RESERVED_SIGILS, identifier, is_name_start, is_unquoted_start, is_ws, keyword,
    name, unquoted_literal, ws,
};

/// Parse a message into a concrete syntax tree.
///
/// This never fails: malformed input produces [`Junk`] nodes and entries in
/// [`Message::errors`].
pub fn parse_cst(source: &str) -> Message {
    let message = MessageParser::new(source).message();
    tracing::debug!(
        len = source.len(),
        errors = message.errors.len(),
        "parsed message syntax"
    );
    message
}

struct MessageParser<'s> {
    source: &'s str,
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'s> MessageParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            errors: Vec::new(),
        }
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    fn rest(&self) -> &'s str {
        self.source.get(self.pos..).unwrap_or("")
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn starts_with(&self, token: &str) -> bool {
        self.rest().starts_with(token)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn slice(&self, span: Span) -> &'s str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Run a token lexer at the cursor, advancing past the token on success.
    fn lex<O, P>(&mut self, mut lexer: P) -> Option<O>
    where
        P: Parser<&'s str, O, ErrMode<ContextError>>,
    {
        let mut rest = self.rest();
        let token = lexer.parse_next(&mut rest).ok()?;
        self.pos = self.source.len() - rest.len();
        Some(token)
    }

    /// Skip whitespace, returning whether any was present.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        let _ = self.lex(ws);
        self.pos > start
    }

    fn error(&mut self, kind: SyntaxErrorKind, span: Span) {
        self.errors.push(SyntaxError::new(kind, span));
    }

    fn missing(&mut self, expected: &str) {
        self.errors
            .push(SyntaxError::missing(Span::point(self.pos), expected));
    }

    /// Returns the keyword at the cursor without consuming it.
    fn peek_keyword(&self) -> Option<&'s str> {
        let mut rest = self.rest();
        keyword.parse_next(&mut rest).ok()
    }

    // =========================================================================
    // Message
    // =========================================================================

    fn message(mut self) -> Message {
        let trimmed = self.rest().trim_start_matches(is_ws);
        let (declarations, body) = if trimmed.starts_with('.') || trimmed.starts_with("{{") {
            self.complex_message()
        } else {
            (Vec::new(), Body::Pattern(self.pattern(false)))
        };
        Message {
            span: Span::new(0, self.source.len()),
            declarations,
            body,
            errors: self.errors,
        }
    }

    fn complex_message(&mut self) -> (Vec<Declaration>, Body) {
        self.skip_ws();
        let mut declarations = Vec::new();
        while self.peek() == Some('.') && self.peek_keyword() != Some("match") {
            declarations.push(self.declaration());
            self.skip_ws();
        }

        let body = if self.peek_keyword() == Some("match") {
            Body::Select(self.select())
        } else if self.starts_with("{{") {
            Body::Pattern(self.pattern(true))
        } else {
            self.missing("{{");
            Body::Pattern(Pattern {
                span: Span::point(self.pos),
                quoted: true,
                body: Vec::new(),
            })
        };

        self.skip_ws();
        if !self.at_end() {
            let span = Span::new(self.pos, self.source.len());
            self.error(SyntaxErrorKind::ExtraContent, span);
            self.pos = self.source.len();
        }
        (declarations, body)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn declaration(&mut self) -> Declaration {
        let start = self.pos;
        let Some(word) = self.lex(keyword) else {
            // A lone dot, or a dot followed by something that is not a name.
            self.bump();
            let _ = self.lex(take_till(0.., |c: char| is_ws(c) || c == '{'));
            let span = Span::new(start, self.pos);
            self.error(SyntaxErrorKind::ParseError, span);
            return Declaration::Junk(Junk {
                span,
                source: self.slice(span).to_string(),
            });
        };

        match word {
            "input" => self.input_declaration(start),
            "local" => self.local_declaration(start),
            other => Declaration::Reserved(self.reserved_statement(start, other)),
        }
    }

    fn input_declaration(&mut self, start: usize) -> Declaration {
        self.skip_ws();
        let value = self.declaration_value();
        let is_variable = matches!(
            &value,
            Placeholder::Expression(Expression {
                operand: Some(Operand::Variable(_)),
                ..
            })
        );
        if !is_variable && !matches!(value, Placeholder::Junk(_)) {
            self.error(SyntaxErrorKind::BadInputExpression, value.span());
        }
        Declaration::Input {
            span: Span::new(start, self.pos),
            value,
        }
    }

    fn local_declaration(&mut self, start: usize) -> Declaration {
        if !self.skip_ws() {
            self.missing(" ");
        }
        let target = if self.peek() == Some('$') {
            self.variable()
        } else {
            self.missing("$");
            VariableRef {
                span: Span::point(self.pos),
                name: String::new(),
            }
        };
        self.skip_ws();
        if self.peek() == Some('=') {
            self.bump();
        } else {
            self.missing("=");
        }
        self.skip_ws();
        let value = self.declaration_value();
        if let Placeholder::Markup(markup) = &value {
            self.error(SyntaxErrorKind::ParseError, markup.span);
        }
        Declaration::Local {
            span: Span::new(start, self.pos),
            target,
            value,
        }
    }

    /// The `{...}` expression that a declaration binds.
    fn declaration_value(&mut self) -> Placeholder {
        if self.peek() == Some('{') && !self.starts_with("{{") {
            self.placeholder()
        } else {
            self.missing("{");
            Placeholder::Junk(Junk {
                span: Span::point(self.pos),
                source: String::new(),
            })
        }
    }

    fn reserved_statement(&mut self, start: usize, keyword: &str) -> ReservedStatement {
        self.skip_ws();
        let body_start = self.pos;
        let mut body_end = self.pos;
        while let Some(c) = self.peek() {
            match c {
                '{' | '}' | '.' => break,
                '|' => {
                    let _ = self.quoted_literal();
                }
                '\\' => {
                    let mut scratch = String::new();
                    self.escape(&mut scratch);
                }
                _ => {
                    self.bump();
                }
            }
            if !is_ws(c) {
                body_end = self.pos;
            }
        }
        let body = self.slice(Span::new(body_start, body_end)).to_string();

        let mut expressions = Vec::new();
        loop {
            let save = self.pos;
            self.skip_ws();
            if self.peek() == Some('{') && !self.starts_with("{{") {
                expressions.push(self.placeholder());
            } else {
                self.pos = save;
                break;
            }
        }
        if expressions.is_empty() {
            self.missing("{");
        }
        ReservedStatement {
            span: Span::new(start, self.pos),
            keyword: keyword.to_string(),
            body,
            expressions,
        }
    }
}

// Split so that each impl block stays readable.
impl MessageParser<'_> {
    // =========================================================================
    // Select
    // =========================================================================

    fn select(&mut self) -> Select {
        let start = self.pos;
        let _ = self.lex(keyword);

        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('{') && !self.starts_with("{{") {
                let selector = self.placeholder();
                if !matches!(selector, Placeholder::Expression(_)) {
                    self.error(SyntaxErrorKind::BadSelector, selector.span());
                }
                selectors.push(selector);
            } else if self.peek_keyword() == Some("match") {
                let _ = self.lex(keyword);
            } else {
                break;
            }
        }
        if selectors.is_empty() {
            self.missing("{");
        }

        let mut variants = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() {
                break;
            }
            if let Some(variant) = self.variant() {
                variants.push(variant);
            }
        }
        if variants.is_empty() {
            self.missing("*");
        }

        Select {
            span: Span::new(start, self.pos),
            selectors,
            variants,
        }
    }

    /// Parse one variant, or skip a malformed region and return `None`.
    fn variant(&mut self) -> Option<Variant> {
        let start = self.pos;
        if self.starts_with("when") && self.rest().get(4..).is_some_and(|r| r.starts_with(is_ws)) {
            self.pos += 4;
            self.skip_ws();
        }

        let mut keys = Vec::new();
        loop {
            let key = match self.peek() {
                Some('*') => {
                    let key_start = self.pos;
                    self.bump();
                    Key::Catchall(Span::new(key_start, self.pos))
                }
                Some('|') => Key::Literal(self.quoted_literal()),
                Some(c) if is_unquoted_start(c) => match self.unquoted_literal() {
                    Some(literal) => Key::Literal(literal),
                    None => break,
                },
                _ => break,
            };
            keys.push(key);
            self.skip_ws();
        }

        if self.starts_with("{{") {
            if keys.is_empty() {
                self.error(SyntaxErrorKind::EmptyToken, Span::point(self.pos));
            }
            let value = self.pattern(true);
            return Some(Variant {
                span: Span::new(start, self.pos),
                keys,
                value,
            });
        }

        if keys.is_empty() {
            // Nothing recognizable: skip past the next quoted pattern.
            let skip = self.rest().find("}}").map_or(self.rest().len(), |i| i + 2);
            let span = Span::new(self.pos, self.pos + skip);
            self.error(SyntaxErrorKind::ParseError, span);
            self.pos = span.end;
            return None;
        }

        self.missing("{{");
        Some(Variant {
            span: Span::new(start, self.pos),
            keys,
            value: Pattern {
                span: Span::point(self.pos),
                quoted: true,
                body: Vec::new(),
            },
        })
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    fn pattern(&mut self, quoted: bool) -> Pattern {
        let start = self.pos;
        if quoted {
            self.pos += 2;
        }

        let mut body = Vec::new();
        let mut text = String::new();
        let mut text_start = self.pos;

        loop {
            if self.at_end() {
                if quoted {
                    self.missing("}}");
                }
                break;
            }
            if quoted && self.starts_with("}}") {
                break;
            }
            match self.peek() {
                Some('{') => {
                    flush_text(&mut body, &mut text, Span::new(text_start, self.pos));
                    body.push(PatternElement::Placeholder(self.placeholder()));
                    text_start = self.pos;
                }
                Some('}') => {
                    let brace = self.pos;
                    self.bump();
                    self.error(SyntaxErrorKind::ParseError, Span::new(brace, self.pos));
                    text.push('}');
                }
                Some('\\') => self.escape(&mut text),
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
                None => break,
            }
        }
        flush_text(&mut body, &mut text, Span::new(text_start, self.pos));

        if quoted && self.starts_with("}}") {
            self.pos += 2;
        }
        Pattern {
            span: Span::new(start, self.pos),
            quoted,
            body,
        }
    }

    /// Consume a backslash escape at the cursor into `out`.
    ///
    /// Invalid escapes keep the backslash and leave the following character
    /// for the caller.
    fn escape(&mut self, out: &mut String) {
        let start = self.pos;
        self.bump();
        match self.peek() {
            Some(c) if ESCAPABLE.contains(&c) => {
                self.bump();
                out.push(c);
            }
            next => {
                let end = self.pos + next.map_or(0, char::len_utf8);
                self.error(SyntaxErrorKind::BadEscape, Span::new(start, end));
                out.push('\\');
            }
        }
    }

    // =========================================================================
    // Placeholders
    // =========================================================================

    fn placeholder(&mut self) -> Placeholder {
        let start = self.pos;
        self.bump();
        self.skip_ws();
        match (self.peek(), self.peek_second()) {
            (Some('-'), Some(next)) if next.is_ascii_digit() => self.expression(start),
            (Some('+' | '-' | '#'), _) => self.markup(start),
            _ => self.expression(start),
        }
    }

    fn expression(&mut self, start: usize) -> Placeholder {
        let operand = match self.peek() {
            Some('$') => Some(Operand::Variable(self.variable())),
            Some('|') => Some(Operand::Literal(self.quoted_literal())),
            Some(c) if is_unquoted_start(c) => self.unquoted_literal().map(Operand::Literal),
            _ => None,
        };

        let spaced = operand.is_none() || self.skip_ws();
        let annotation = match self.peek() {
            Some(':') => {
                if !spaced {
                    self.missing(" ");
                }
                Some(Annotation::Function(self.function()))
            }
            Some(c) if RESERVED_SIGILS.contains(&c) => {
                if !spaced {
                    self.missing(" ");
                }
                Some(Annotation::Reserved(self.reserved_annotation()))
            }
            _ => None,
        };
        self.skip_ws();

        if let Some(junk) = self.close_placeholder(start) {
            return Placeholder::Junk(junk);
        }
        let span = Span::new(start, self.pos);
        if operand.is_none() && annotation.is_none() {
            self.error(SyntaxErrorKind::EmptyToken, span);
            return Placeholder::Junk(Junk {
                span,
                source: self.slice(span).to_string(),
            });
        }
        Placeholder::Expression(Expression {
            span,
            operand,
            annotation,
        })
    }

    fn markup(&mut self, start: usize) -> Placeholder {
        let sigil = match self.bump() {
            Some('+') => MarkupSigil::Open,
            Some('-') => MarkupSigil::Close,
            _ => MarkupSigil::Standalone,
        };
        let name_start = self.pos;
        let name = match self.lex(identifier) {
            Some(name) => name.to_string(),
            None => {
                self.error(SyntaxErrorKind::EmptyToken, Span::point(name_start));
                String::new()
            }
        };
        let options_start = self.pos;
        let options = self.options();
        if sigil == MarkupSigil::Close && !options.is_empty() {
            self.error(
                SyntaxErrorKind::ExtraContent,
                Span::new(options_start, self.pos),
            );
        }
        self.skip_ws();
        if sigil == MarkupSigil::Standalone && self.peek() == Some('/') {
            self.bump();
            self.skip_ws();
        }

        if let Some(junk) = self.close_placeholder(start) {
            return Placeholder::Junk(junk);
        }
        Placeholder::Markup(Markup {
            span: Span::new(start, self.pos),
            sigil,
            name,
            options: if sigil == MarkupSigil::Close {
                Vec::new()
            } else {
                options
            },
        })
    }

    /// Consume the closing `}` of a placeholder opened at `start`.
    ///
    /// Returns junk covering the whole placeholder when unexpected content
    /// precedes the brace. A placeholder cut off by the end of input is kept.
    fn close_placeholder(&mut self, start: usize) -> Option<Junk> {
        match self.peek() {
            Some('}') => {
                self.bump();
                None
            }
            None => {
                self.missing("}");
                None
            }
            Some(_) => {
                let bad_start = self.pos;
                let end = self
                    .rest()
                    .find('}')
                    .map_or(self.source.len(), |i| self.pos + i + 1);
                self.error(SyntaxErrorKind::ParseError, Span::new(bad_start, end));
                self.pos = end;
                let span = Span::new(start, end);
                Some(Junk {
                    span,
                    source: self.slice(span).to_string(),
                })
            }
        }
    }

    fn function(&mut self) -> FunctionRef {
        let start = self.pos;
        self.bump();
        let name = match self.lex(identifier) {
            Some(name) => name.to_string(),
            None => {
                self.error(SyntaxErrorKind::EmptyToken, Span::point(self.pos));
                String::new()
            }
        };
        let options = self.options();
        FunctionRef {
            span: Span::new(start, self.pos),
            name,
            options,
        }
    }

    fn reserved_annotation(&mut self) -> ReservedAnnotation {
        let start = self.pos;
        let sigil = self.bump().unwrap_or('!');
        let mut end = self.pos;
        while let Some(c) = self.peek() {
            match c {
                '{' | '}' => break,
                '|' => {
                    let _ = self.quoted_literal();
                }
                '\\' => {
                    let mut scratch = String::new();
                    self.escape(&mut scratch);
                }
                _ => {
                    self.bump();
                }
            }
            if !is_ws(c) {
                end = self.pos;
            }
        }
        let span = Span::new(start, end);
        ReservedAnnotation {
            span,
            sigil,
            source: self.slice(span).to_string(),
        }
    }

    /// Whitespace-separated `name=value` options.
    fn options(&mut self) -> Vec<CstOption> {
        let mut options = Vec::new();
        loop {
            let save = self.pos;
            if !self.skip_ws() || !self.peek().is_some_and(is_name_start) {
                self.pos = save;
                break;
            }
            let start = self.pos;
            let name = self.lex(identifier).unwrap_or_default().to_string();
            self.skip_ws();
            if self.peek() == Some('=') {
                self.bump();
            } else {
                self.missing("=");
                break;
            }
            self.skip_ws();
            let value = match self.peek() {
                Some('$') => Operand::Variable(self.variable()),
                Some('|') => Operand::Literal(self.quoted_literal()),
                Some(c) if is_unquoted_start(c) => match self.unquoted_literal() {
                    Some(literal) => Operand::Literal(literal),
                    None => {
                        self.error(SyntaxErrorKind::EmptyToken, Span::point(self.pos));
                        break;
                    }
                },
                _ => {
                    self.error(SyntaxErrorKind::EmptyToken, Span::point(self.pos));
                    break;
                }
            };
            options.push(CstOption {
                span: Span::new(start, self.pos),
                name,
                value,
            });
        }
        options
    }

    // =========================================================================
    // Operands
    // =========================================================================

    fn variable(&mut self) -> VariableRef {
        let start = self.pos;
        self.bump();
        let name = match self.lex(name) {
            Some(name) => name.to_string(),
            None => {
                self.error(SyntaxErrorKind::EmptyToken, Span::new(start, self.pos));
                String::new()
            }
        };
        VariableRef {
            span: Span::new(start, self.pos),
            name,
        }
    }

    fn quoted_literal(&mut self) -> Literal {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    self.missing("|");
                    break;
                }
                Some('|') => {
                    self.bump();
                    break;
                }
                Some('\\') => self.escape(&mut value),
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
        Literal {
            span: Span::new(start, self.pos),
            quoted: true,
            value,
        }
    }

    fn unquoted_literal(&mut self) -> Option<Literal> {
        let start = self.pos;
        let value = self.lex(unquoted_literal)?;
        Some(Literal {
            span: Span::new(start, self.pos),
            quoted: false,
            value: value.to_string(),
        })
    }
}

/// Push the buffered text as a [`Text`] element, if there is any.
fn flush_text(body: &mut Vec<PatternElement>, text: &mut String, span: Span) {
    if !text.is_empty() {
        body.push(PatternElement::Text(Text {
            span,
            value: mem::take(text),
        }));
    }
}
