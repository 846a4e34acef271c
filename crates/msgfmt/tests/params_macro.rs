use std::collections::BTreeMap;

use icu_calendar::Iso;
use icu_datetime::input::DateTime;
use icu_locale_core::locale;
use msgfmt::{MessageFormat, Scope, Value, params};

fn format(source: &str, scope: &Scope) -> String {
    MessageFormat::new(locale!("en"), source).format(scope)
}

#[test]
fn empty_scope_leaves_variables_unresolved() {
    let p = params! {};
    assert!(p.is_empty());
    assert_eq!(format("Hi {$name}", &p), "Hi {$name}");
}

#[test]
fn numbers_become_formattable_values() {
    let p = params! { "count" => 1500, "ratio" => 0.25_f64, "small" => 7_u32 };
    assert_eq!(p["count"], Value::Number(1500));
    assert_eq!(p["ratio"], Value::Float(0.25));
    assert_eq!(
        format("{$count} {$ratio :number style=percent} {$small :number minimumIntegerDigits=2}", &p),
        "1,500 25% 07"
    );
}

#[test]
fn booleans_render_as_text_but_do_not_format_as_numbers() {
    let p = params! { "admin" => true };
    assert_eq!(p["admin"], Value::Bool(true));
    assert_eq!(format("{$admin}", &p), "true");
    assert_eq!(format("{$admin :number}", &p), "{$admin}");
}

#[test]
fn records_are_reachable_through_dotted_names() {
    let mut user = BTreeMap::new();
    user.insert("name".to_string(), Value::from("Ada"));
    let p = params! {
        "user" => user,
        "n" => 1500,
    };
    assert_eq!(
        p["user"].as_map().and_then(|m| m.get("name")),
        Some(&Value::String("Ada".to_string()))
    );
    assert_eq!(format("{$user.name} has {$n :number} points", &p), "Ada has 1,500 points");
}

#[test]
fn a_flat_dotted_key_wins_over_a_record() {
    let mut user = BTreeMap::new();
    user.insert("name".to_string(), Value::from("nested"));
    let p = params! { "user" => user, "user.name" => "flat" };
    assert_eq!(format("{$user.name}", &p), "flat");
}

#[test]
fn date_times_are_accepted() {
    let when: DateTime<Iso> = "2024-03-05T10:30:00".parse().expect("valid date-time");
    let p = params! { "when" => when };
    assert!(matches!(p["when"], Value::DateTime(_)));
    assert!(format("{$when :date dateStyle=long}", &p).contains("March"));
}

#[test]
fn keys_can_be_expressions() {
    let key = "dynamic";
    let p = params! { key => "value", format!("n{}", 1) => 1, };
    assert_eq!(format("{$dynamic}-{$n1}", &p), "value-1");
}
