//! Locale-aware rendering for `:number` and `:integer`.
//!
//! Digits, separators and grouping positions come from the ICU4X decimal
//! data of the formatting locale, including a `-u-nu-` numbering system when
//! the locale names one. Formatters are cached per thread per locale and
//! grouping strategy.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_decimal::DecimalFormatter;
use icu_decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu_locale_core::Locale;

use crate::interpreter::error::FunctionError;
use crate::types::{Options, Value};

thread_local! {
    static DECIMAL_FORMATTER_CACHE: RefCell<Vec<(String, GroupingStrategy, DecimalFormatter)>> =
        const { RefCell::new(Vec::new()) };
}

/// Layout options shared by the numeric formatters.
///
/// | Option | Values |
/// |---|---|
/// | `useGrouping` | `auto` (default), `always`, `never`, `min2` |
/// | `style` | `decimal` (default), `percent` |
/// | `notation` | `standard` (default) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumberStyle {
    grouping: GroupingStrategy,
    percent: bool,
}

impl NumberStyle {
    /// Read the layout from a function's resolved options.
    ///
    /// Unrelated options are ignored.
    pub(crate) fn from_options(options: &Options) -> Result<Self, FunctionError> {
        let grouping = match option(options, "useGrouping").as_deref() {
            None | Some("auto") => GroupingStrategy::Auto,
            Some("always") => GroupingStrategy::Always,
            Some("never") => GroupingStrategy::Never,
            Some("min2") => GroupingStrategy::Min2,
            Some(other) => return Err(unsupported("useGrouping", other)),
        };
        let percent = match option(options, "style").as_deref() {
            None | Some("decimal") => false,
            Some("percent") => true,
            Some(other) => return Err(unsupported("style", other)),
        };
        if let Some(notation) = option(options, "notation")
            && notation != "standard"
        {
            return Err(unsupported("notation", &notation));
        }
        Ok(NumberStyle { grouping, percent })
    }
}

fn option(options: &Options, name: &str) -> Option<String> {
    options.get(name).map(ToString::to_string)
}

fn unsupported(name: &str, value: &str) -> FunctionError {
    FunctionError::InvalidExpression(format!("unsupported {name} '{value}'"))
}

/// Render a `Number` or `Float` for `locale`.
///
/// A percent style scales by 100 and appends `%`.
///
/// # Errors
///
/// Returns [`FunctionError::InvalidExpression`] when `value` has no decimal
/// form or no decimal data can be loaded for `locale`.
pub(crate) fn format_decimal(
    value: &Value,
    locale: &Locale,
    style: NumberStyle,
) -> Result<String, FunctionError> {
    let mut decimal = match value {
        Value::Number(integer) => Decimal::from(*integer),
        other => other.to_string().parse().map_err(|_| {
            FunctionError::InvalidExpression(format!("'{other}' is not a decimal number"))
        })?,
    };
    if style.percent {
        decimal.multiply_pow10(2);
    }

    let key = locale.to_string();
    let formatted = DECIMAL_FORMATTER_CACHE.with(|cache| -> Result<String, FunctionError> {
        let mut cache = cache.borrow_mut();
        let index = match cache.iter().position(|(cached, grouping, _)| {
            *cached == key && *grouping == style.grouping
        }) {
            Some(index) => index,
            None => {
                let options = DecimalFormatterOptions::from(style.grouping);
                let formatter = DecimalFormatter::try_new(locale.into(), options).map_err(|_| {
                    FunctionError::InvalidExpression(format!(
                        "no decimal data for locale '{key}'"
                    ))
                })?;
                cache.push((key, style.grouping, formatter));
                cache.len() - 1
            }
        };
        Ok(cache[index].2.format_to_string(&decimal))
    })?;

    Ok(if style.percent {
        formatted + "%"
    } else {
        formatted
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use icu_locale_core::locale;

    fn style(pairs: &[(&str, &str)]) -> NumberStyle {
        let options: Options = pairs
            .iter()
            .map(|&(name, value)| (name.to_string(), Value::from(value)))
            .collect();
        NumberStyle::from_options(&options).unwrap()
    }

    #[test]
    fn test_locale_separators() {
        let plain = style(&[]);
        assert_eq!(
            format_decimal(&Value::Float(1234.5), &locale!("en"), plain).unwrap(),
            "1,234.5"
        );
        assert_eq!(
            format_decimal(&Value::Float(1234.5), &locale!("de"), plain).unwrap(),
            "1.234,5"
        );
        assert_eq!(
            format_decimal(&Value::Number(-1234567), &locale!("en"), plain).unwrap(),
            "-1,234,567"
        );
    }

    #[test]
    fn test_grouping_strategies() {
        let en = locale!("en");
        assert_eq!(
            format_decimal(&Value::Number(1234567), &en, style(&[("useGrouping", "never")]))
                .unwrap(),
            "1234567"
        );
        assert_eq!(
            format_decimal(&Value::Number(1000), &en, style(&[("useGrouping", "min2")])).unwrap(),
            "1000"
        );
        assert_eq!(
            format_decimal(&Value::Number(10000), &en, style(&[("useGrouping", "min2")])).unwrap(),
            "10,000"
        );
    }

    #[test]
    fn test_percent() {
        let en = locale!("en");
        let percent = style(&[("style", "percent")]);
        assert_eq!(format_decimal(&Value::Float(0.5), &en, percent).unwrap(), "50%");
        assert_eq!(format_decimal(&Value::Float(0.125), &en, percent).unwrap(), "12.5%");
        assert_eq!(format_decimal(&Value::Number(12), &en, percent).unwrap(), "1,200%");
    }

    #[test]
    fn test_numbering_system_from_locale() {
        let thai: Locale = "th-u-nu-thai".parse().unwrap();
        assert_eq!(
            format_decimal(&Value::Number(1000007), &thai, style(&[])).unwrap(),
            "๑,๐๐๐,๐๐๗"
        );
    }

    #[test]
    fn test_unsupported_options() {
        for pairs in [
            [("useGrouping", "sometimes")],
            [("style", "currency")],
            [("notation", "compact")],
        ] {
            let options: Options = pairs
                .iter()
                .map(|&(name, value)| (name.to_string(), Value::from(value)))
                .collect();
            assert!(matches!(
                NumberStyle::from_options(&options),
                Err(FunctionError::InvalidExpression(_))
            ));
        }
        assert_eq!(style(&[("notation", "standard"), ("select", "ordinal")]), style(&[]));
    }
}
