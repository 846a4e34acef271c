//! Integration tests for markup resolution and pairing.

use icu_locale_core::locale;
use msgfmt::model::MarkupKind;
use msgfmt::{MessageFormat, MessageValue, Scope, params};

fn resolve(source: &str, scope: &Scope) -> Vec<MessageValue> {
    MessageFormat::new(locale!("en"), source).resolve(scope, |_| {})
}

/// Render as `name[child, ...]` so tree shapes read at a glance.
fn shape(values: &[MessageValue]) -> String {
    values
        .iter()
        .map(|value| match value {
            MessageValue::Markup(markup) if markup.kind == MarkupKind::Open => {
                format!("{}[{}]", markup.name, shape(&markup.children))
            }
            MessageValue::Markup(markup) if markup.kind == MarkupKind::Close => {
                format!("/{}", markup.name)
            }
            MessageValue::Markup(markup) => format!("#{}", markup.name),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[test]
fn open_and_close_pair_into_a_tree() {
    let values = resolve("{+b}bold{$x}{-b}plain", &params! { "x" => "text" });
    assert_eq!(shape(&values), "b[bold, text], plain");
}

#[test]
fn nested_markup() {
    let values = resolve("{+b}a{+i}b{-i}c{-b}", &params! {});
    assert_eq!(shape(&values), "b[a, i[b], c]");
}

#[test]
fn misnested_close_reopens_a_copy() {
    let values = resolve("{+b}foo{+a}bar{-b}baz{-a}", &params! {});
    assert_eq!(shape(&values), "b[foo, a[bar]], a[baz]");
}

#[test]
fn reopened_copy_keeps_its_options() {
    let values = resolve(
        "{+b}x{+link href=$url}y{-b}z{-link}",
        &params! { "url" => "https://example.com" },
    );
    let MessageValue::Markup(reopened) = &values[1] else {
        panic!("expected markup");
    };
    assert_eq!(reopened.name, "link");
    assert_eq!(
        reopened.options.get("href").map(String::as_str),
        Some("https://example.com")
    );
}

#[test]
fn unclosed_open_absorbs_the_rest() {
    let values = resolve("a{+b}c{$x}", &params! { "x" => "d" });
    assert_eq!(shape(&values), "a, b[c, d]");
}

#[test]
fn unmatched_close_stays_in_place() {
    let values = resolve("a{-b}c", &params! {});
    assert_eq!(shape(&values), "a, /b, c");
}

#[test]
fn standalone_markup_has_no_children() {
    let values = resolve("line{#br}next", &params! {});
    assert_eq!(shape(&values), "line, #br, next");
}

#[test]
fn markup_contributes_no_text() {
    let mf = MessageFormat::new(locale!("en"), "{+b}foo{+a}bar{-b}baz{-a}{#br}");
    assert_eq!(mf.format(&params! {}), "foobarbaz");
}

#[test]
fn markup_options_with_missing_variables_are_dropped() {
    let mf = MessageFormat::new(locale!("en"), "{+link href=$missing target=blank}x{-link}");
    let mut errors = Vec::new();
    let values = mf.resolve(&params! {}, |error| errors.push(error.kind()));
    let MessageValue::Markup(link) = &values[0] else {
        panic!("expected markup");
    };
    assert_eq!(link.options.len(), 1);
    assert_eq!(link.options.get("target").map(String::as_str), Some("blank"));
    assert_eq!(errors, vec!["unresolved-var"]);
}

#[test]
fn markup_is_paired_inside_the_selected_variant() {
    let source = ".input {$n :number}\n.match {$n}\none {{{+b}one{-b}}}\n* {{{+i}{$n}{-i}}}";
    let values = resolve(source, &params! { "n" => 3 });
    assert_eq!(shape(&values), "i[3]");
}

#[test]
fn markup_as_an_operand_falls_back() {
    let mf = MessageFormat::new(locale!("en"), ".local $x = {+b}\n{{{$x}}}");
    assert_eq!(mf.diagnostics()[0].kind(), "parse-error");
    let mut errors = Vec::new();
    let text = mf.format_with_errors(&params! {}, |error| errors.push(error.kind()));
    assert_eq!(text, "{+b}");
    assert_eq!(errors, vec!["unsupported-annotation"]);
}

#[test]
fn broken_local_still_shadows_the_input() {
    let mf = MessageFormat::new(locale!("en"), ".local $x = {+b}\n{{{$x}}}");
    let mut errors = Vec::new();
    let text = mf.format_with_errors(&params! { "x" => "input" }, |error| errors.push(error));
    assert_eq!(text, "{+b}");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind(), "unsupported-annotation");
    assert_eq!(errors[0].fallback(), "+b");
}
