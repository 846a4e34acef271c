//! Integration tests for the built-in functions and the registry API.

use icu_calendar::Iso;
use icu_datetime::input::DateTime;
use icu_locale_core::{Locale, locale};
use msgfmt::{
    FunctionError, FunctionOptions, FunctionRegistry, MessageError, MessageFormat, MessageValue,
    Scope, StringValue, compute_suggestions, params,
};

fn format_in(locale: Locale, source: &str, scope: &Scope) -> (String, Vec<&'static str>) {
    let mf = MessageFormat::new(locale, source);
    let mut errors = Vec::new();
    let text = mf.format_with_errors(scope, |error| errors.push(error.kind()));
    (text, errors)
}

fn format(source: &str, scope: &Scope) -> String {
    let (text, errors) = format_in(locale!("en"), source, scope);
    assert!(errors.is_empty(), "{source:?}: {errors:?}");
    text
}

fn string_option(value: &str) -> MessageValue {
    MessageValue::String(StringValue {
        source: format!("|{value}|"),
        value: value.to_string(),
    })
}

// =============================================================================
// :number and :integer
// =============================================================================

#[test]
fn number_groups_by_default() {
    assert_eq!(format("{$n :number}", &params! { "n" => 1234567 }), "1,234,567");
}

#[test]
fn number_grouping_can_be_disabled() {
    assert_eq!(
        format("{$n :number useGrouping=never}", &params! { "n" => 1234567 }),
        "1234567"
    );
    assert_eq!(
        format("{$n :number useGrouping=false}", &params! { "n" => 1234567 }),
        "1234567"
    );
}

#[test]
fn number_fraction_digits() {
    assert_eq!(
        format("{$n :number maximumFractionDigits=2}", &params! { "n" => 3.14159 }),
        "3.14"
    );
    assert_eq!(
        format("{$n :number minimumFractionDigits=2}", &params! { "n" => 5 }),
        "5.00"
    );
    assert_eq!(format("{$n :number}", &params! { "n" => 0.1234 }), "0.123");
}

#[test]
fn number_minimum_integer_digits() {
    assert_eq!(
        format("{$n :number minimumIntegerDigits=3}", &params! { "n" => 7 }),
        "007"
    );
}

#[test]
fn number_significant_digits() {
    assert_eq!(
        format("{$n :number maximumSignificantDigits=2}", &params! { "n" => 1234 }),
        "1,200"
    );
}

#[test]
fn number_percent_style() {
    assert_eq!(
        format("{$n :number style=percent}", &params! { "n" => 0.5 }),
        "50%"
    );
}

#[test]
fn number_parses_string_operands() {
    assert_eq!(format("{|42.5| :number}", &params! {}), "42.5");
    assert_eq!(format("{$n :number}", &params! { "n" => "1000" }), "1,000");
}

#[test]
fn number_options_are_inherited_and_overridden() {
    let source = ".local $a = {$n :number minimumFractionDigits=2}\n{{{$a :number} {$a :number minimumFractionDigits=0}}}";
    assert_eq!(format(source, &params! { "n" => 1 }), "1.00 1");
}

#[test]
fn number_follows_the_locale() {
    let (text, _) = format_in(locale!("de"), "{$n :number}", &params! { "n" => 1234.5 });
    assert_eq!(text, "1.234,5");
}

#[test]
fn number_rejects_unknown_option_values() {
    let (text, errors) = format_in(
        locale!("en"),
        "{$n :number useGrouping=sometimes}",
        &params! { "n" => 1 },
    );
    assert_eq!(text, "{$n}");
    assert_eq!(errors, vec!["bad-option"]);
}

#[test]
fn number_rejects_non_numeric_input() {
    let (text, errors) = format_in(locale!("en"), "{$n :number}", &params! { "n" => true });
    assert_eq!(text, "{$n}");
    assert_eq!(errors, vec!["bad-input"]);
}

#[test]
fn number_without_operand_is_bad_input() {
    let (text, errors) = format_in(locale!("en"), "{:number}", &params! {});
    assert_eq!(text, "{:number}");
    assert_eq!(errors, vec!["bad-input"]);
}

#[test]
fn integer_rounds_fractions_away() {
    assert_eq!(format("{$n :integer}", &params! { "n" => 4.7 }), "5");
    assert_eq!(format("{$n :integer}", &params! { "n" => 12345.6 }), "12,346");
    assert_eq!(format("{|-2.4| :integer}", &params! {}), "-2");
}

// =============================================================================
// :string
// =============================================================================

#[test]
fn string_renders_any_operand() {
    assert_eq!(format("{$s :string}", &params! { "s" => "text" }), "text");
    assert_eq!(format("{$n :string}", &params! { "n" => 42 }), "42");
    assert_eq!(format("{|quoted value| :string}", &params! {}), "quoted value");
}

#[test]
fn string_keeps_numbers_ungrouped() {
    assert_eq!(format("{$n :string}", &params! { "n" => 1000 }), "1000");
    assert_eq!(format("{$n :string}", &params! { "n" => 1234.5 }), "1234.5");
    let source = ".local $m = {$n :number}\n{{{$m :string}}}";
    assert_eq!(format(source, &params! { "n" => 25000 }), "25000");
}

#[test]
fn string_selection_on_numbers_uses_the_plain_value() {
    let source = ".input {$n :string}\n.match {$n}\n1000 {{exact}}\n* {{other}}";
    assert_eq!(format(source, &params! { "n" => 1000 }), "exact");
    assert_eq!(format(source, &params! { "n" => 1001 }), "other");
}

// =============================================================================
// :datetime, :date and :time
// =============================================================================

#[test]
fn date_styles() {
    let scope = params! { "d" => "2024-03-05T10:30:00" };
    let long = format("{$d :date dateStyle=long}", &scope);
    assert!(long.contains("March"), "{long}");
    assert!(long.contains("2024"), "{long}");
    assert!(!long.contains("10:30"), "{long}");

    let medium = format("{$d :date}", &scope);
    assert!(medium.contains("Mar"), "{medium}");
    assert!(!medium.contains("March"), "{medium}");
}

#[test]
fn time_only_shows_the_time() {
    let scope = params! { "d" => "2024-03-05T10:30:00" };
    let time = format("{$d :time}", &scope);
    assert!(time.contains("10:30"), "{time}");
    assert!(!time.contains("2024"), "{time}");
}

#[test]
fn datetime_shows_both_by_default() {
    let scope = params! { "d" => "2024-03-05T10:30:00" };
    let both = format("{$d :datetime}", &scope);
    assert!(both.contains("2024"), "{both}");
    assert!(both.contains("10:30"), "{both}");
}

#[test]
fn datetime_accepts_date_time_values() {
    let value: DateTime<Iso> = "2024-03-05T10:30:00".parse().expect("valid date-time");
    let scope = params! { "d" => value };
    let text = format("{$d :date dateStyle=long}", &scope);
    assert!(text.contains("March"), "{text}");
    // Unannotated date-times get the default date and time styles.
    let default = format("{$d}", &scope);
    assert!(default.contains("10:30"), "{default}");
}

#[test]
fn datetime_rejects_unparseable_strings() {
    let (text, errors) = format_in(locale!("en"), "{|yesterday| :datetime}", &params! {});
    assert_eq!(text, "{|yesterday|}");
    assert_eq!(errors, vec!["bad-input"]);
}

#[test]
fn datetime_rejects_unknown_styles() {
    let (_, errors) = format_in(
        locale!("en"),
        "{|2024-03-05| :date dateStyle=huge}",
        &params! {},
    );
    assert_eq!(errors, vec!["bad-option"]);
}

// =============================================================================
// Custom functions
// =============================================================================

#[test]
fn custom_functions_are_called() {
    let mut functions = FunctionRegistry::default();
    functions.insert("upper", |ctx, _options, operand| {
        Ok(MessageValue::String(StringValue {
            source: ctx.source.to_string(),
            value: operand
                .map(ToString::to_string)
                .unwrap_or_default()
                .to_uppercase(),
        }))
    });
    let mf = MessageFormat::builder()
        .source("Hi {$name :upper}!")
        .functions(functions)
        .build();
    assert_eq!(mf.format(&params! { "name" => "ada" }), "Hi ADA!");
}

#[test]
fn custom_functions_see_the_locales() {
    let mut functions = FunctionRegistry::new();
    functions.insert("lang", |ctx, _options, _operand| {
        Ok(MessageValue::String(StringValue {
            source: ctx.source.to_string(),
            value: ctx.locale().to_string(),
        }))
    });
    let mf = MessageFormat::builder()
        .source("{:lang}")
        .locales(vec![locale!("fr"), locale!("en")])
        .functions(functions)
        .build();
    assert_eq!(mf.format(&params! {}), "fr");
}

#[test]
fn custom_function_errors_are_reported() {
    let mut functions = FunctionRegistry::default();
    functions.insert("strict", |_ctx, options, _operand| {
        let mode = options.get_string("mode").unwrap_or_default();
        Err(FunctionError::bad_option("mode", format!("unsupported mode {mode}")))
    });
    let mf = MessageFormat::builder()
        .source("{$x :strict mode=loose}")
        .functions(functions)
        .build();
    let mut errors = Vec::new();
    let text = mf.format_with_errors(&params! { "x" => 1 }, |error| errors.push(error));
    assert_eq!(text, "{$x}");
    assert_eq!(
        errors,
        vec![MessageError::BadOption {
            function: "strict".to_string(),
            fallback: "$x".to_string(),
            message: "option 'mode': unsupported mode loose".to_string(),
        }]
    );
}

#[test]
fn registry_lists_builtins() {
    let registry = FunctionRegistry::default();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(
        names,
        vec!["date", "datetime", "integer", "number", "string", "time"]
    );
    assert_eq!(FunctionRegistry::new().names().count(), 0);
}

// =============================================================================
// Option helpers
// =============================================================================

#[test]
fn option_casts() {
    let mut options = FunctionOptions::new();
    options.insert("flag", string_option("true"));
    options.insert("count", string_option(" 12 "));
    options.insert("word", string_option("many"));

    assert_eq!(options.get_bool("flag"), Ok(Some(true)));
    assert_eq!(options.get_integer("count"), Ok(Some(12)));
    assert_eq!(options.get_integer("absent"), Ok(None));
    assert!(matches!(
        options.get_integer("word"),
        Err(FunctionError::BadOption { name, .. }) if name == "word"
    ));
    assert!(options.get_bool("word").is_err());
}

// =============================================================================
// Suggestions
// =============================================================================

#[test]
fn compute_suggestions_finds_similar_names() {
    let available = ["number", "integer", "string", "datetime"];

    let suggestions = compute_suggestions("numbr", available.into_iter());
    assert_eq!(suggestions, vec!["number"]);

    let suggestions = compute_suggestions("xyz", available.into_iter());
    assert!(suggestions.is_empty());

    // Exact names are not suggestions.
    let suggestions = compute_suggestions("string", available.into_iter());
    assert!(suggestions.is_empty());
}

#[test]
fn compute_suggestions_limits_to_three() {
    let available: Vec<String> = (0..10).map(|i| format!("item{i}")).collect();
    let suggestions = compute_suggestions("item", available.iter().map(String::as_str));
    assert_eq!(suggestions.len(), 3);
}
