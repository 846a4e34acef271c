//! Token-level lexers built on winnow.
//!
//! These only recognize tokens; structure and error recovery live in
//! [`super::message`], which runs them against the unconsumed input.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Characters that may be escaped with a backslash in text and literals.
pub(super) const ESCAPABLE: [char; 4] = ['\\', '{', '}', '|'];

/// Sigils that introduce a reserved annotation.
pub(super) const RESERVED_SIGILS: [char; 9] = ['!', '%', '^', '&', '*', '<', '>', '?', '~'];

pub(super) fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{3000}')
}

pub(super) fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(super) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '.' | '_')
}

/// Whether `c` can begin an unquoted literal.
pub(super) fn is_unquoted_start(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// Optional whitespace.
pub(super) fn ws<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., is_ws).parse_next(input)
}

/// A name: letter or `_`, then letters, digits, `-`, `.`, `_`.
pub(super) fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .parse_next(input)
}

/// A function or markup identifier, optionally namespaced (`ns:name`).
pub(super) fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (name, opt(preceded(':', name)))
        .take()
        .parse_next(input)
}

/// A number literal: `-?(0|[1-9][0-9]*)(.[0-9]+)?([eE][-+]?[0-9]+)?`.
pub(super) fn number_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        alt(('0'.void(), (one_of('1'..='9'), digit0).void())),
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

/// An unquoted literal: a number literal or a name.
pub(super) fn unquoted_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((number_literal, name)).parse_next(input)
}

/// A statement keyword such as `.input`, returned without the dot.
pub(super) fn keyword<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded('.', name).parse_next(input)
}

/// Whether `value` can be written without `|...|` quotes.
pub fn is_unquoted_literal(value: &str) -> bool {
    let mut rest = value;
    unquoted_literal.parse_next(&mut rest).is_ok() && rest.is_empty()
}

/// Whether `value` is a valid name.
pub fn is_valid_name(value: &str) -> bool {
    let mut rest = value;
    name.parse_next(&mut rest).is_ok() && rest.is_empty()
}
