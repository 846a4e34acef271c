//! Source form of the semantic tree.
//!
//! `Display` for [`Message`] produces text that parses back to an equal
//! message. Formatting is canonical: one declaration per line, selectors on
//! the `.match` line, one variant per line.

use std::fmt::{self, Display, Formatter, Write};

use super::types::{
    Annotation, Declaration, Expression, FunctionOption, Literal, Markup, MarkupKind, Message,
    Operand, PatternElement, Variant, VariantKey, escape_literal,
};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for declaration in self.declarations() {
            writeln!(f, "{declaration}")?;
        }
        match self {
            Message::Pattern(message) => {
                if message.declarations.is_empty() && !needs_quoting(&message.pattern) {
                    write_pattern(f, &message.pattern)
                } else {
                    f.write_str("{{")?;
                    write_pattern(f, &message.pattern)?;
                    f.write_str("}}")
                }
            }
            Message::Select(message) => {
                f.write_str(".match")?;
                for selector in &message.selectors {
                    write!(f, " {selector}")?;
                }
                for variant in &message.variants {
                    write!(f, "\n{variant}")?;
                }
                Ok(())
            }
        }
    }
}

/// Whether a pattern would be read as a complex message if left unquoted.
fn needs_quoting(pattern: &[PatternElement]) -> bool {
    match pattern.first() {
        Some(PatternElement::Text(text)) => text
            .trim_start_matches([' ', '\t', '\r', '\n', '\u{3000}'])
            .starts_with('.'),
        _ => false,
    }
}

fn write_pattern(f: &mut Formatter<'_>, pattern: &[PatternElement]) -> fmt::Result {
    for element in pattern {
        match element {
            PatternElement::Text(text) => {
                for c in text.chars() {
                    if matches!(c, '\\' | '{' | '}') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
            }
            PatternElement::Expression(expression) => write!(f, "{expression}")?,
            PatternElement::Markup(markup) => write!(f, "{markup}")?,
        }
    }
    Ok(())
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Input { value, .. } => write!(f, ".input {value}"),
            Declaration::Local { name, value } => write!(f, ".local ${name} = {value}"),
            Declaration::UnsupportedStatement(statement) => {
                write!(f, ".{}", statement.keyword)?;
                if !statement.body.is_empty() {
                    write!(f, " {}", statement.body)?;
                }
                for expression in &statement.expressions {
                    write!(f, " {expression}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        if let Some(operand) = &self.operand {
            write!(f, "{operand}")?;
            if self.annotation.is_some() {
                f.write_char(' ')?;
            }
        }
        match &self.annotation {
            Some(Annotation::Function(function)) => {
                write!(f, ":{}", function.name)?;
                write_options(f, &function.options)?;
            }
            Some(Annotation::Unsupported(unsupported)) => f.write_str(&unsupported.source)?,
            None => {}
        }
        f.write_char('}')
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sigil = match self.kind {
            MarkupKind::Open => '+',
            MarkupKind::Close => '-',
            MarkupKind::Standalone => '#',
        };
        write!(f, "{{{sigil}{}", self.name)?;
        write_options(f, &self.options)?;
        f.write_char('}')
    }
}

fn write_options(f: &mut Formatter<'_>, options: &[FunctionOption]) -> fmt::Result {
    for option in options {
        write!(f, " {}={}", option.name, option.value)?;
    }
    Ok(())
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(literal) => write!(f, "{literal}"),
            Operand::Variable(variable) => write!(f, "${}", variable.name),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.needs_quotes() {
            write!(f, "|{}|", escape_literal(&self.value))
        } else {
            f.write_str(&self.value)
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for key in &self.keys {
            match key {
                VariantKey::Literal(literal) => write!(f, "{literal} ")?,
                VariantKey::Catchall => f.write_str("* ")?,
            }
        }
        f.write_str("{{")?;
        write_pattern(f, &self.value)?;
        f.write_str("}}")
    }
}
