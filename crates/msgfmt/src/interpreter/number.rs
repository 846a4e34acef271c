//! The `:number` and `:integer` functions.

use fixed_decimal::{Decimal, FloatPrecision};
use icu_decimal::DecimalFormatter;
use icu_decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu_locale_core::Locale;

use crate::interpreter::registry::{FunctionContext, FunctionError, FunctionOptions};
use crate::types::{
    Grouping, MessageValue, Number, NumberOptions, NumberSelect, NumberStyle, NumberValue,
};

// These ranges mirror common Intl/ECMA-402 expectations.
const MAX_FRACTION: i64 = 20;
const MAX_SIGNIFICANT: i64 = 21;
const MAX_INTEGER: i64 = 308;

/// `:number` formats its operand as a locale-aware decimal and selects by
/// plural category.
pub(crate) fn number(
    ctx: &FunctionContext<'_>,
    options: &FunctionOptions,
    operand: Option<&MessageValue>,
) -> Result<MessageValue, FunctionError> {
    let (value, mut number_options) = numeric_operand(operand)?;
    apply_options(&mut number_options, options)?;
    Ok(MessageValue::Number(number_value(
        ctx.source,
        ctx.locale(),
        value,
        number_options,
    )))
}

/// `:integer` is `:number` with fractions rounded away.
pub(crate) fn integer(
    ctx: &FunctionContext<'_>,
    options: &FunctionOptions,
    operand: Option<&MessageValue>,
) -> Result<MessageValue, FunctionError> {
    let (value, mut number_options) = numeric_operand(operand)?;
    apply_options(&mut number_options, options)?;
    number_options.minimum_fraction_digits = None;
    number_options.maximum_fraction_digits = Some(0);
    let value = match value {
        Number::Float(f) if f.is_finite() => Number::Integer(f.round() as i64),
        other => other,
    };
    Ok(MessageValue::Number(number_value(
        ctx.source,
        ctx.locale(),
        value,
        number_options,
    )))
}

/// Build a formatted number value.
pub(crate) fn number_value(
    source: &str,
    locale: Locale,
    number: Number,
    options: NumberOptions,
) -> NumberValue {
    let decimal = to_decimal(number, &options);
    let formatted = match &decimal {
        Some(decimal) => format_decimal(&locale, decimal, &options),
        None => number.to_string(),
    };
    NumberValue {
        source: source.to_string(),
        locale,
        number,
        options,
        decimal,
        formatted,
    }
}

/// Read the operand as a number, keeping options of an earlier `:number`.
fn numeric_operand(operand: Option<&MessageValue>) -> Result<(Number, NumberOptions), FunctionError> {
    match operand {
        Some(MessageValue::Number(number)) => Ok((number.number, number.options.clone())),
        Some(MessageValue::String(string)) => parse_number(&string.value)
            .map(|number| (number, NumberOptions::default()))
            .ok_or_else(|| FunctionError::BadInput(format!("not a number: {}", string.value))),
        Some(other) => Err(FunctionError::BadInput(format!(
            "not a number: {} value",
            other.kind()
        ))),
        None => Err(FunctionError::BadInput("no operand".to_string())),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::Integer(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

fn apply_options(
    number_options: &mut NumberOptions,
    options: &FunctionOptions,
) -> Result<(), FunctionError> {
    let digits = |name: &str, min: i64, max: i64| -> Result<Option<i16>, FunctionError> {
        match options.get_integer(name)? {
            None => Ok(None),
            Some(n) if (min..=max).contains(&n) => Ok(i16::try_from(n).ok()),
            Some(n) => Err(FunctionError::bad_option(
                name,
                format!("{n} is out of range {min}..={max}"),
            )),
        }
    };

    if let Some(n) = digits("minimumIntegerDigits", 1, MAX_INTEGER)? {
        number_options.minimum_integer_digits = Some(n);
    }
    if let Some(n) = digits("minimumFractionDigits", 0, MAX_FRACTION)? {
        number_options.minimum_fraction_digits = Some(n);
    }
    if let Some(n) = digits("maximumFractionDigits", 0, MAX_FRACTION)? {
        number_options.maximum_fraction_digits = Some(n);
    }
    if let Some(n) = digits("minimumSignificantDigits", 1, MAX_SIGNIFICANT)? {
        number_options.minimum_significant_digits = Some(n);
    }
    if let Some(n) = digits("maximumSignificantDigits", 1, MAX_SIGNIFICANT)? {
        number_options.maximum_significant_digits = Some(n);
    }

    if let Some(grouping) = options.get_string("useGrouping") {
        number_options.grouping = match grouping.as_str() {
            "auto" => Grouping::Auto,
            "always" | "true" => Grouping::Always,
            "never" | "false" => Grouping::Never,
            "min2" => Grouping::Min2,
            other => {
                return Err(FunctionError::bad_option(
                    "useGrouping",
                    format!("unknown value {other}"),
                ));
            }
        };
    }
    if let Some(style) = options.get_string("style") {
        number_options.style = match style.as_str() {
            "decimal" => NumberStyle::Decimal,
            "percent" => NumberStyle::Percent,
            other => {
                return Err(FunctionError::bad_option(
                    "style",
                    format!("unknown value {other}"),
                ));
            }
        };
    }
    if let Some(select) = options.get_string("select") {
        number_options.select = match select.as_str() {
            "plural" => NumberSelect::Plural,
            "ordinal" => NumberSelect::Ordinal,
            "exact" => NumberSelect::Exact,
            other => {
                return Err(FunctionError::bad_option(
                    "select",
                    format!("unknown value {other}"),
                ));
            }
        };
    }
    Ok(())
}

/// Convert to a decimal and apply digit options. Returns `None` for NaN and
/// infinities, which have no decimal form.
fn to_decimal(number: Number, options: &NumberOptions) -> Option<Decimal> {
    let percent = options.style == NumberStyle::Percent;
    let mut decimal = match number {
        Number::Integer(n) if percent => Decimal::from(n.saturating_mul(100)),
        Number::Integer(n) => Decimal::from(n),
        Number::Float(f) => {
            let f = if percent { f * 100.0 } else { f };
            if !f.is_finite() {
                return None;
            }
            Decimal::try_from_f64(f, FloatPrecision::RoundTrip).ok()?
        }
    };

    let scaled = if percent {
        number.as_f64() * 100.0
    } else {
        number.as_f64()
    };
    let magnitude = if scaled != 0.0 {
        scaled.abs().log10().floor() as i16
    } else {
        0
    };

    let (min_sig, max_sig) = match (
        options.minimum_significant_digits,
        options.maximum_significant_digits,
    ) {
        (Some(a), Some(b)) => (Some(a.min(b)), Some(b)),
        other => other,
    };

    if min_sig.is_some() || max_sig.is_some() {
        if let Some(max) = max_sig {
            decimal.round(magnitude - (max - 1));
            decimal.trim_end();
        }
        if let Some(min) = min_sig {
            decimal.pad_end(magnitude - (min - 1));
        }
    } else {
        // Intl defaults: up to three fraction digits, none for percentages.
        let default_max = if percent { 0 } else { 3 };
        let min_frac = options.minimum_fraction_digits.unwrap_or(0);
        let max_frac = options
            .maximum_fraction_digits
            .unwrap_or(default_max)
            .max(min_frac);
        if *decimal.magnitude_range().start() < -max_frac {
            decimal.round(-max_frac);
            decimal.trim_end();
        }
        decimal.pad_end(-min_frac);
    }

    if let Some(min_int) = options.minimum_integer_digits {
        decimal.pad_start(min_int);
    }
    Some(decimal)
}

fn format_decimal(locale: &Locale, decimal: &Decimal, options: &NumberOptions) -> String {
    let mut formatter_options = DecimalFormatterOptions::default();
    formatter_options.grouping_strategy = Some(match options.grouping {
        Grouping::Auto => GroupingStrategy::Auto,
        Grouping::Always => GroupingStrategy::Always,
        Grouping::Never => GroupingStrategy::Never,
        Grouping::Min2 => GroupingStrategy::Min2,
    });
    let text = match DecimalFormatter::try_new(locale.clone().into(), formatter_options) {
        Ok(formatter) => formatter.format(decimal).to_string(),
        Err(error) => {
            tracing::debug!(%locale, ?error, "no decimal format data for locale");
            decimal.to_string()
        }
    };
    match options.style {
        NumberStyle::Decimal => text,
        NumberStyle::Percent => format!("{text}%"),
    }
}
