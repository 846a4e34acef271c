//! Integration tests for structured output and serialized diagnostics.

use icu_locale_core::locale;
use msgfmt::{MessageFormat, MessagePart, params};
use serde_json::json;

#[test]
fn parts_cover_every_value_kind() {
    let mf = MessageFormat::new(
        locale!("en"),
        "Hello {$name}, you have {$n :number} {+b class=hot}new{-b} messages{$missing}",
    );
    let parts = mf.format_to_parts(&params! { "name" => "Ada", "n" => 1200 });
    let json = serde_json::to_value(&parts).expect("parts serialize");
    assert_eq!(
        json,
        json!([
            { "type": "text", "value": "Hello " },
            { "type": "string", "source": "$name", "value": "Ada" },
            { "type": "text", "value": ", you have " },
            { "type": "number", "source": "$n", "locale": "en", "value": "1,200" },
            { "type": "text", "value": " " },
            { "type": "markup", "kind": "open", "name": "b", "source": "+b", "options": { "class": "hot" } },
            { "type": "text", "value": "new" },
            { "type": "markup", "kind": "close", "name": "b", "source": "-b", "options": {} },
            { "type": "text", "value": " messages" },
            { "type": "fallback", "source": "$missing" },
        ])
    );
}

#[test]
fn parts_concatenate_to_the_formatted_string() {
    let mf = MessageFormat::new(
        locale!("en"),
        "{+b}foo{+a}bar{-b}baz{-a} {$n :number} {$missing} {|lit|}",
    );
    let scope = params! { "n" => 2.5 };
    let from_parts: String = mf.format_to_parts(&scope).iter().map(MessagePart::text).collect();
    assert_eq!(from_parts, mf.format(&scope));
    assert_eq!(from_parts, "foobarbaz 2.5 {$missing} lit");
}

#[test]
fn repaired_markup_flattens_in_order() {
    let mf = MessageFormat::new(locale!("en"), "{+b}foo{+a}bar{-b}baz{-a}");
    let shape: Vec<String> = mf
        .format_to_parts(&params! {})
        .iter()
        .map(|part| match part {
            MessagePart::Markup { source, .. } => source.clone(),
            other => other.text(),
        })
        .collect();
    assert_eq!(
        shape,
        vec!["+b", "foo", "+a", "bar", "-a", "-b", "+a", "baz", "-a"]
    );
}

#[test]
fn date_time_parts_are_tagged() {
    let mf = MessageFormat::new(locale!("en"), "{$d :date dateStyle=long}");
    let parts = mf.format_to_parts(&params! { "d" => "2024-03-05" });
    let json = serde_json::to_value(&parts).expect("parts serialize");
    assert_eq!(json[0]["type"], "datetime");
    assert_eq!(json[0]["locale"], "en");
    assert!(json[0]["value"].as_str().is_some_and(|v| v.contains("2024")));
}

#[test]
fn simple_parts_snapshot() {
    let mf = MessageFormat::new(locale!("en"), "Hi {$name}!");
    let parts = mf.format_to_parts(&params! { "name" => "Ada" });
    let json = serde_json::to_string(&parts).expect("parts serialize");
    insta::assert_snapshot!(json, @r#"[{"type":"text","value":"Hi "},{"type":"string","source":"$name","value":"Ada"},{"type":"text","value":"!"}]"#);
}

#[test]
fn diagnostics_serialize_for_tooling() {
    let mf = MessageFormat::new(locale!("en"), ".local $x = {1}\n.local $x = {2}\n{{{$x}");
    let json = serde_json::to_value(mf.diagnostics()).expect("diagnostics serialize");
    assert_eq!(
        json,
        json!([
            { "kind": "missing-syntax", "span": { "start": 38, "end": 38 }, "expected": "}}" },
            { "kind": "duplicate-declaration", "span": { "start": 16, "end": 31 }, "detail": "$x" },
        ])
    );
}
