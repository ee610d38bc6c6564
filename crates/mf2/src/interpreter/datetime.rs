//! Default `:date`, `:time` and `:datetime` formatters.
//!
//! Operands are ISO 8601 strings: `2024-06-07`, `2024-06-07T15:47:50` or,
//! for `:time` only, `15:47:50`. A bare date is taken at midnight. Dates are
//! converted to the calendar of the formatting locale.
//!
//! Each function reads a `style` option (`short`, `medium`, `long` or
//! `full`). `full` renders like `long`. `:datetime` also accepts
//! `dateStyle` as a name for the same option.

use icu_calendar::{Date, Iso};
use icu_datetime::fieldsets::{T, YMD};
use icu_datetime::options::Length;
use icu_datetime::{DateTimeFormatter, DateTimeFormatterLoadError, NoCalendarFormatter};
use icu_locale_core::Locale;
use icu_time::{DateTime, Time};

use crate::interpreter::error::FunctionError;
use crate::types::{Options, Value};

pub(crate) fn format_date(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
) -> Result<Value, FunctionError> {
    let datetime = datetime_operand("date", operand)?;
    let length = length_option(options, &["style"], Length::Short)?;
    let formatter = DateTimeFormatter::try_new(locale.into(), YMD::for_length(length))
        .map_err(|error| load_error(locale, &error))?;
    Ok(Value::String(formatter.format(&datetime.date).to_string()))
}

pub(crate) fn format_time(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
) -> Result<Value, FunctionError> {
    let time = match operand {
        Some(Value::String(text)) if !text.contains(['-', 'T']) => {
            Time::try_from_str(text.trim()).map_err(|_| {
                FunctionError::InvalidExpression(format!("'{text}' is not an ISO time"))
            })?
        }
        _ => datetime_operand("time", operand)?.time,
    };
    let length = length_option(options, &["style"], Length::Short)?;
    let formatter = NoCalendarFormatter::try_new(locale.into(), T::for_length(length))
        .map_err(|error| load_error(locale, &error))?;
    Ok(Value::String(formatter.format(&time).to_string()))
}

pub(crate) fn format_datetime(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
) -> Result<Value, FunctionError> {
    let datetime = datetime_operand("datetime", operand)?;
    let length = length_option(options, &["style", "dateStyle"], Length::Medium)?;
    let formatter =
        DateTimeFormatter::try_new(locale.into(), YMD::for_length(length).with_time_hm())
            .map_err(|error| load_error(locale, &error))?;
    Ok(Value::String(formatter.format(&datetime).to_string()))
}

/// The operand parsed as an ISO date with an optional time.
fn datetime_operand(
    function: &str,
    operand: Option<&Value>,
) -> Result<DateTime<Iso>, FunctionError> {
    let text = match operand {
        Some(Value::String(text)) => text.trim(),
        Some(other) => {
            return Err(FunctionError::OperandMismatch(format!(
                ":{function} expects an ISO 8601 string, got {other}"
            )));
        }
        None => {
            return Err(FunctionError::OperandMismatch(format!(
                ":{function} requires an operand"
            )));
        }
    };
    if let Ok(datetime) = DateTime::try_from_str(text, Iso) {
        return Ok(datetime);
    }
    let date = Date::try_from_str(text, Iso).map_err(|_| {
        FunctionError::InvalidExpression(format!("'{text}' is not an ISO date"))
    })?;
    Ok(DateTime {
        date,
        time: Time::start_of_day(),
    })
}

/// The first of `names` present in `options`, as a formatting length.
fn length_option(
    options: &Options,
    names: &[&str],
    default: Length,
) -> Result<Length, FunctionError> {
    let Some((name, value)) = names
        .iter()
        .find_map(|&name| options.get(name).map(|value| (name, value.to_string())))
    else {
        return Ok(default);
    };
    match value.as_str() {
        "short" => Ok(Length::Short),
        "medium" => Ok(Length::Medium),
        "long" | "full" => Ok(Length::Long),
        other => Err(FunctionError::InvalidExpression(format!(
            "unsupported {name} '{other}'"
        ))),
    }
}

fn load_error(locale: &Locale, error: &DateTimeFormatterLoadError) -> FunctionError {
    FunctionError::InvalidExpression(format!("no date data for locale '{locale}': {error}"))
}
