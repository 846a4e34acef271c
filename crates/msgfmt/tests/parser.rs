//! Integration tests for the CST parser.

use msgfmt::parser::cst::{
    Annotation, Body, Declaration, Key, MarkupSigil, Operand, PatternElement, Placeholder,
};
use msgfmt::parser::{Span, SyntaxErrorKind, parse_cst};
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<SyntaxErrorKind> {
    parse_cst(source).errors.iter().map(|e| e.kind).collect()
}

fn pattern_body(source: &str) -> Vec<PatternElement> {
    match parse_cst(source).body {
        Body::Pattern(pattern) => pattern.body,
        Body::Select(_) => panic!("expected a pattern body"),
    }
}

// =============================================================================
// Simple messages
// =============================================================================

#[test]
fn empty_source_is_an_empty_pattern() {
    let message = parse_cst("");
    assert!(message.errors.is_empty());
    assert!(message.declarations.is_empty());
    assert_eq!(message.span, Span::new(0, 0));
    assert!(pattern_body("").is_empty());
}

#[test]
fn text_and_placeholders_alternate() {
    let body = pattern_body("Hello, {$name}!");
    assert_eq!(body.len(), 3);
    let PatternElement::Placeholder(Placeholder::Expression(expression)) = &body[1] else {
        panic!("expected an expression placeholder");
    };
    assert_eq!(expression.span, Span::new(7, 14));
    let Some(Operand::Variable(variable)) = &expression.operand else {
        panic!("expected a variable operand");
    };
    assert_eq!(variable.name, "name");
}

#[test]
fn escapes_are_decoded_in_text() {
    let body = pattern_body(r"a \{b\} \\ c");
    let PatternElement::Text(text) = &body[0] else {
        panic!("expected text");
    };
    assert_eq!(text.value, r"a {b} \ c");
}

#[test]
fn bad_escape_keeps_the_backslash() {
    let message = parse_cst(r"a \n b");
    assert_eq!(message.errors.len(), 1);
    assert_eq!(message.errors[0].kind, SyntaxErrorKind::BadEscape);
    assert_eq!(message.errors[0].span, Span::new(2, 4));
    let Body::Pattern(pattern) = &message.body else {
        panic!("expected pattern");
    };
    let PatternElement::Text(text) = &pattern.body[0] else {
        panic!("expected text");
    };
    assert_eq!(text.value, r"a \n b");
}

#[test]
fn stray_close_brace_is_a_parse_error() {
    assert_eq!(kinds("a } b"), vec![SyntaxErrorKind::ParseError]);
}

#[test]
fn empty_placeholder_is_an_empty_token() {
    assert_eq!(kinds("a {} b"), vec![SyntaxErrorKind::EmptyToken]);
    assert!(matches!(
        &pattern_body("a {} b")[1],
        PatternElement::Placeholder(Placeholder::Junk(_))
    ));
}

#[test]
fn function_with_options() {
    let body = pattern_body("{$n :number minimumFractionDigits=2 style=$s}");
    let PatternElement::Placeholder(Placeholder::Expression(expression)) = &body[0] else {
        panic!("expected an expression placeholder");
    };
    let Some(Annotation::Function(function)) = &expression.annotation else {
        panic!("expected a function annotation");
    };
    assert_eq!(function.name, "number");
    let names: Vec<&str> = function.options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["minimumFractionDigits", "style"]);
    assert!(matches!(&function.options[1].value, Operand::Variable(v) if v.name == "s"));
}

#[test]
fn namespaced_function_names() {
    let body = pattern_body("{|x| :ns:fn}");
    let PatternElement::Placeholder(Placeholder::Expression(expression)) = &body[0] else {
        panic!("expected an expression placeholder");
    };
    assert!(matches!(
        &expression.annotation,
        Some(Annotation::Function(f)) if f.name == "ns:fn"
    ));
}

#[test]
fn reserved_annotation_keeps_its_source() {
    let body = pattern_body("{$x !reserved |a b| }");
    let PatternElement::Placeholder(Placeholder::Expression(expression)) = &body[0] else {
        panic!("expected an expression placeholder");
    };
    let Some(Annotation::Reserved(reserved)) = &expression.annotation else {
        panic!("expected a reserved annotation");
    };
    assert_eq!(reserved.sigil, '!');
    assert_eq!(reserved.source, "!reserved |a b|");
}

#[test]
fn negative_number_literal_is_not_markup() {
    let body = pattern_body("{-12.5}");
    assert!(matches!(
        &body[0],
        PatternElement::Placeholder(Placeholder::Expression(e))
            if matches!(&e.operand, Some(Operand::Literal(l)) if l.value == "-12.5")
    ));
}

#[test]
fn markup_kinds() {
    let body = pattern_body("{+b class=big}x{-b}{#br /}");
    let sigils: Vec<MarkupSigil> = body
        .iter()
        .filter_map(|element| match element {
            PatternElement::Placeholder(Placeholder::Markup(markup)) => Some(markup.sigil),
            _ => None,
        })
        .collect();
    assert_eq!(
        sigils,
        vec![MarkupSigil::Open, MarkupSigil::Close, MarkupSigil::Standalone]
    );
    assert!(parse_cst("{+b class=big}x{-b}{#br /}").errors.is_empty());
}

#[test]
fn options_on_close_markup_are_extra_content() {
    assert_eq!(kinds("{-b class=big}"), vec![SyntaxErrorKind::ExtraContent]);
}

// =============================================================================
// Complex messages
// =============================================================================

#[test]
fn declarations_then_quoted_pattern() {
    let message = parse_cst(".input {$n :number}\n.local $m = {$n}\n{{{$m}}}");
    assert!(message.errors.is_empty());
    assert_eq!(message.declarations.len(), 2);
    assert!(matches!(&message.declarations[0], Declaration::Input { .. }));
    assert!(matches!(
        &message.declarations[1],
        Declaration::Local { target, .. } if target.name == "m"
    ));
    let Body::Pattern(pattern) = &message.body else {
        panic!("expected pattern");
    };
    assert!(pattern.quoted);
}

#[test]
fn input_requires_a_variable_operand() {
    assert_eq!(
        kinds(".input {|x| :string}\n{{x}}"),
        vec![SyntaxErrorKind::BadInputExpression]
    );
}

#[test]
fn missing_quoted_pattern() {
    let message = parse_cst(".local $x = {1}");
    assert_eq!(message.errors.len(), 1);
    assert_eq!(message.errors[0].kind, SyntaxErrorKind::MissingSyntax);
    assert_eq!(message.errors[0].expected.as_deref(), Some("{{"));
}

#[test]
fn content_after_the_body_is_extra() {
    let message = parse_cst("{{done}} trailing");
    assert_eq!(message.errors.len(), 1);
    assert_eq!(message.errors[0].kind, SyntaxErrorKind::ExtraContent);
    assert_eq!(message.errors[0].span, Span::new(9, 17));
}

#[test]
fn reserved_statement_is_preserved() {
    let message = parse_cst(".when body text {$x} {$y}\n{{ok}}");
    assert!(message.errors.is_empty());
    let Declaration::Reserved(statement) = &message.declarations[0] else {
        panic!("expected a reserved statement");
    };
    assert_eq!(statement.keyword, "when");
    assert_eq!(statement.body, "body text");
    assert_eq!(statement.expressions.len(), 2);
}

#[test]
fn match_with_variants() {
    let message = parse_cst(".match {$n :number}\none {{one}}\n|two words| {{two}}\n* {{other}}");
    assert!(message.errors.is_empty());
    let Body::Select(select) = &message.body else {
        panic!("expected select");
    };
    assert_eq!(select.selectors.len(), 1);
    assert_eq!(select.variants.len(), 3);
    assert!(matches!(&select.variants[1].keys[0], Key::Literal(l) if l.value == "two words"));
    assert!(matches!(&select.variants[2].keys[0], Key::Catchall(_)));
}

#[test]
fn legacy_when_before_keys_is_dropped() {
    let message = parse_cst(".match {$n :number}\nwhen one {{one}}\nwhen * {{other}}");
    assert!(message.errors.is_empty());
    let Body::Select(select) = &message.body else {
        panic!("expected select");
    };
    assert_eq!(select.variants.len(), 2);
    assert_eq!(select.variants[0].keys.len(), 1);
}

#[test]
fn markup_selector_is_a_bad_selector() {
    assert_eq!(
        kinds(".match {+b}\n* {{x}}"),
        vec![SyntaxErrorKind::BadSelector]
    );
}

#[test]
fn variant_without_pattern_is_missing_syntax() {
    let message = parse_cst(".match {$n :number}\n* ");
    assert_eq!(message.errors.len(), 1);
    assert_eq!(message.errors[0].expected.as_deref(), Some("{{"));
}

#[test]
fn error_positions_convert_to_lines_and_columns() {
    let source = ".local $x = {1}\n{{a } b}}";
    let message = parse_cst(source);
    assert_eq!(message.errors.len(), 1);
    assert_eq!(message.errors[0].span.line_column(source), (2, 5));
}

// =============================================================================
// Totality
// =============================================================================

proptest! {
    #[test]
    fn parser_never_panics_and_spans_stay_in_bounds(
        source in "[{}|$.:+#\\\\*=! a-z0-9\n\u{e9}-]{0,48}"
    ) {
        let message = parse_cst(&source);
        prop_assert_eq!(message.span, Span::new(0, source.len()));
        for error in &message.errors {
            prop_assert!(error.span.start <= error.span.end);
            prop_assert!(error.span.end <= source.len());
        }
    }

    #[test]
    fn keyword_heavy_input_never_panics(
        parts in prop::collection::vec(
            prop::sample::select(vec![
                ".input", ".local", ".match", ".when", " ", "\n", "{", "}", "{{", "}}",
                "$x", "=", ":number", "|q|", "*", "one", "\\", "{+b}", "{-b}",
            ]),
            0..24,
        )
    ) {
        let source = parts.concat();
        let message = parse_cst(&source);
        for error in &message.errors {
            prop_assert!(error.span.end <= source.len());
        }
    }
}
