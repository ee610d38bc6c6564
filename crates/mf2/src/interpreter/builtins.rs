//! Default functions: `:string`, `:number`, `:integer`, `:date`, `:time`
//! and `:datetime`.
//!
//! These are ordinary registry entries; callers can shadow any of them with
//! [`Registry::extend`](crate::Registry::extend).
//!
//! Numeric formatters render through the locale's decimal data. Numeric
//! selectors compare keys against the plain decimal form instead, so a key
//! `1000` matches whatever the locale's grouping looks like. They return the
//! exact value first when it is one of the keys, then the plural category
//! when that is one of the keys, so a variant `1` beats a variant `one`. The
//! `select` option picks the category rules: `plural` (default), `ordinal`,
//! or `exact` for no category at all.

use icu_locale_core::Locale;

use crate::interpreter::datetime::{format_date, format_datetime, format_time};
use crate::interpreter::error::FunctionError;
use crate::interpreter::number::{NumberStyle, format_decimal};
use crate::interpreter::plural::{PluralKind, plural_category};
use crate::interpreter::registry::Registry;
use crate::types::{Options, Value};

pub(crate) fn register(registry: Registry) -> Registry {
    registry
        .with_formatter("string", format_string)
        .with_selector("string", select_string)
        .with_formatter("number", format_number)
        .with_selector("number", select_number)
        .with_formatter("integer", format_integer)
        .with_selector("integer", select_integer)
        .with_formatter("date", format_date)
        .with_formatter("time", format_time)
        .with_formatter("datetime", format_datetime)
}

fn format_string(
    operand: Option<&Value>,
    _locale: &Locale,
    _options: &Options,
) -> Result<Value, FunctionError> {
    Ok(Value::String(display(operand)))
}

fn select_string(
    operand: Option<&Value>,
    _locale: &Locale,
    _options: &Options,
    keys: &[String],
) -> Result<Vec<String>, FunctionError> {
    let text = display(operand);
    Ok(if keys.contains(&text) { vec![text] } else { Vec::new() })
}

fn display(operand: Option<&Value>) -> String {
    operand.map(ToString::to_string).unwrap_or_default()
}

fn format_number(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
) -> Result<Value, FunctionError> {
    let number = number_operand("number", operand)?;
    format_decimal(&number, locale, NumberStyle::from_options(options)?).map(Value::String)
}

fn select_number(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
    keys: &[String],
) -> Result<Vec<String>, FunctionError> {
    let number = number_operand("number", operand)?;
    select_numeric(&number.to_string(), locale, options, keys)
}

fn format_integer(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
) -> Result<Value, FunctionError> {
    let integer = Value::Number(integer_operand(operand)?);
    format_decimal(&integer, locale, NumberStyle::from_options(options)?).map(Value::String)
}

fn select_integer(
    operand: Option<&Value>,
    locale: &Locale,
    options: &Options,
    keys: &[String],
) -> Result<Vec<String>, FunctionError> {
    let integer = integer_operand(operand)?;
    select_numeric(&integer.to_string(), locale, options, keys)
}

/// The operand as a `Number` or `Float`; numeric strings are parsed.
fn number_operand(function: &str, operand: Option<&Value>) -> Result<Value, FunctionError> {
    let Some(operand) = operand else {
        return Err(FunctionError::OperandMismatch(format!(
            ":{function} requires an operand"
        )));
    };
    match operand {
        Value::Number(_) => Ok(operand.clone()),
        Value::Float(float) if float.is_finite() => Ok(operand.clone()),
        Value::Float(float) => Err(FunctionError::InvalidExpression(format!(
            "{float} is not a finite number"
        ))),
        Value::String(text) => parse_number(text.trim()).ok_or_else(|| {
            FunctionError::InvalidExpression(format!("'{text}' is not a number"))
        }),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::Number(integer));
    }
    text.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .map(Value::Float)
}

/// The operand truncated toward zero.
fn integer_operand(operand: Option<&Value>) -> Result<i64, FunctionError> {
    match number_operand("integer", operand)? {
        Value::Number(integer) => Ok(integer),
        Value::Float(float) => Ok(float.trunc() as i64),
        Value::String(text) => Err(FunctionError::InvalidExpression(format!(
            "'{text}' is not a number"
        ))),
    }
}

fn select_numeric(
    formatted: &str,
    locale: &Locale,
    options: &Options,
    keys: &[String],
) -> Result<Vec<String>, FunctionError> {
    let mut matches = Vec::new();
    if keys.iter().any(|key| key == formatted) {
        matches.push(formatted.to_string());
    }
    let kind = match options.get("select").map(ToString::to_string).as_deref() {
        None | Some("plural") => PluralKind::Cardinal,
        Some("ordinal") => PluralKind::Ordinal,
        Some("exact") => return Ok(matches),
        Some(other) => {
            return Err(FunctionError::InvalidExpression(format!(
                "unknown select type '{other}'"
            )));
        }
    };
    let category = plural_category(locale, kind, formatted)?;
    if keys.iter().any(|key| key == category) {
        matches.push(category.to_string());
    }
    Ok(matches)
}
