//! The `:datetime`, `:date` and `:time` functions.

use std::str::FromStr;

use icu_calendar::Iso;
use icu_datetime::fieldsets::enums::{DateAndTimeFieldSet, DateFieldSet, TimeFieldSet};
use icu_datetime::fieldsets::{T, YMD};
use icu_datetime::input::DateTime;
use icu_datetime::options::Length;
use icu_datetime::DateTimeFormatter;
use icu_locale_core::Locale;

use crate::interpreter::registry::{FunctionContext, FunctionError, FunctionOptions};
use crate::types::{DateTimeOptions, DateTimeStyle, DateTimeValue, MessageValue};

/// Which fields a date-time function shows when no style is given.
#[derive(Clone, Copy)]
enum Fields {
    Both,
    Date,
    Time,
}

pub(crate) fn datetime(
    ctx: &FunctionContext<'_>,
    options: &FunctionOptions,
    operand: Option<&MessageValue>,
) -> Result<MessageValue, FunctionError> {
    format_with(ctx, options, operand, Fields::Both)
}

pub(crate) fn date(
    ctx: &FunctionContext<'_>,
    options: &FunctionOptions,
    operand: Option<&MessageValue>,
) -> Result<MessageValue, FunctionError> {
    format_with(ctx, options, operand, Fields::Date)
}

pub(crate) fn time(
    ctx: &FunctionContext<'_>,
    options: &FunctionOptions,
    operand: Option<&MessageValue>,
) -> Result<MessageValue, FunctionError> {
    format_with(ctx, options, operand, Fields::Time)
}

fn format_with(
    ctx: &FunctionContext<'_>,
    options: &FunctionOptions,
    operand: Option<&MessageValue>,
    fields: Fields,
) -> Result<MessageValue, FunctionError> {
    let (value, inherited) = datetime_operand(operand)?;
    let date_style = style_option(options, "dateStyle")?;
    let time_style = style_option(options, "timeStyle")?;

    let mut datetime_options = match fields {
        Fields::Both => DateTimeOptions {
            date_style: date_style.or(inherited.date_style),
            time_style: time_style.or(inherited.time_style),
        },
        Fields::Date => DateTimeOptions {
            date_style: date_style.or(inherited.date_style),
            time_style: None,
        },
        Fields::Time => DateTimeOptions {
            date_style: None,
            time_style: time_style.or(inherited.time_style),
        },
    };
    if datetime_options.date_style.is_none() && datetime_options.time_style.is_none() {
        match fields {
            Fields::Both => {
                datetime_options.date_style = Some(DateTimeStyle::Medium);
                datetime_options.time_style = Some(DateTimeStyle::Short);
            }
            Fields::Date => datetime_options.date_style = Some(DateTimeStyle::Medium),
            Fields::Time => datetime_options.time_style = Some(DateTimeStyle::Short),
        }
    }

    let locale = ctx.locale();
    let formatted = format_datetime(&locale, &value, datetime_options)
        .map_err(FunctionError::BadInput)?;
    Ok(MessageValue::DateTime(DateTimeValue {
        source: ctx.source.to_string(),
        locale,
        value,
        options: datetime_options,
        formatted,
    }))
}

/// Wrap an input date-time with the default `:datetime` styles.
pub(crate) fn datetime_value(ctx: &FunctionContext<'_>, value: &DateTime<Iso>) -> MessageValue {
    let options = DateTimeOptions {
        date_style: Some(DateTimeStyle::Medium),
        time_style: Some(DateTimeStyle::Short),
    };
    let locale = ctx.locale();
    let formatted = format_datetime(&locale, value, options).unwrap_or_else(|error| {
        tracing::debug!(%locale, %error, "no date-time format data for locale");
        format!("{value:?}")
    });
    MessageValue::DateTime(DateTimeValue {
        source: ctx.source.to_string(),
        locale,
        value: value.clone(),
        options,
        formatted,
    })
}

/// Read the operand as a date-time, keeping styles of an earlier call.
fn datetime_operand(
    operand: Option<&MessageValue>,
) -> Result<(DateTime<Iso>, DateTimeOptions), FunctionError> {
    match operand {
        Some(MessageValue::DateTime(value)) => Ok((value.value.clone(), value.options)),
        Some(MessageValue::String(string)) => parse_datetime(&string.value)
            .map(|value| (value, DateTimeOptions::default()))
            .ok_or_else(|| FunctionError::BadInput(format!("not a date-time: {}", string.value))),
        Some(other) => Err(FunctionError::BadInput(format!(
            "not a date-time: {} value",
            other.kind()
        ))),
        None => Err(FunctionError::BadInput("no operand".to_string())),
    }
}

/// Parse an ISO-8601 date-time, or a bare date at midnight.
fn parse_datetime(text: &str) -> Option<DateTime<Iso>> {
    let text = text.trim();
    DateTime::<Iso>::from_str(text)
        .or_else(|_| DateTime::<Iso>::from_str(&format!("{text}T00:00:00")))
        .ok()
}

fn style_option(
    options: &FunctionOptions,
    name: &str,
) -> Result<Option<DateTimeStyle>, FunctionError> {
    let Some(style) = options.get_string(name) else {
        return Ok(None);
    };
    match style.as_str() {
        "short" => Ok(Some(DateTimeStyle::Short)),
        "medium" => Ok(Some(DateTimeStyle::Medium)),
        "long" => Ok(Some(DateTimeStyle::Long)),
        "full" => Ok(Some(DateTimeStyle::Full)),
        other => Err(FunctionError::bad_option(
            name,
            format!("unknown style {other}"),
        )),
    }
}

fn length(style: DateTimeStyle) -> Length {
    match style {
        DateTimeStyle::Short => Length::Short,
        DateTimeStyle::Medium => Length::Medium,
        DateTimeStyle::Long | DateTimeStyle::Full => Length::Long,
    }
}

fn format_datetime(
    locale: &Locale,
    value: &DateTime<Iso>,
    options: DateTimeOptions,
) -> Result<String, String> {
    let prefs = locale.clone().into();
    match (options.date_style, options.time_style) {
        (Some(date_style), Some(time_style)) => {
            let ymd = YMD::for_length(length(date_style));
            let ymdt = match time_style {
                DateTimeStyle::Short => ymd.with_time_hm(),
                _ => ymd.with_time_hms(),
            };
            DateTimeFormatter::<DateAndTimeFieldSet>::try_new(prefs, DateAndTimeFieldSet::YMDT(ymdt))
                .map(|formatter| formatter.format(value).to_string())
                .map_err(|error| error.to_string())
        }
        (Some(date_style), None) => {
            let ymd = YMD::for_length(length(date_style));
            DateTimeFormatter::<DateFieldSet>::try_new(prefs, DateFieldSet::YMD(ymd))
                .map(|formatter| formatter.format(value).to_string())
                .map_err(|error| error.to_string())
        }
        (None, time_style) => {
            let time_style = time_style.unwrap_or(DateTimeStyle::Short);
            let fields = match time_style {
                DateTimeStyle::Short => T::hm(),
                _ => T::hms(),
            };
            let fields = fields.with_length(length(time_style));
            DateTimeFormatter::<TimeFieldSet>::try_new(prefs, TimeFieldSet::T(fields))
                .map(|formatter| formatter.format(value).to_string())
                .map_err(|error| error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_parse_at_midnight() {
        assert_eq!(
            parse_datetime("2024-03-05"),
            parse_datetime("2024-03-05T00:00:00")
        );
        assert!(parse_datetime("2024-03-05T10:30:00").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn unknown_styles_are_bad_options() {
        let mut options = FunctionOptions::new();
        options.insert(
            "dateStyle",
            MessageValue::String(crate::types::StringValue {
                source: "|huge|".to_string(),
                value: "huge".to_string(),
            }),
        );
        assert!(matches!(
            style_option(&options, "dateStyle"),
            Err(FunctionError::BadOption { .. })
        ));
    }
}
