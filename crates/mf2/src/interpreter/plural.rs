//! Plural and ordinal categories for numeric selectors.
//!
//! Rules come from the compiled ICU4X data for the formatting locale, so any
//! locale ICU4X knows is supported; unknown locales fall back to the root
//! rules, where everything is "other".
//!
//! Plural rules are cached per thread per locale and rule type to avoid
//! re-creating `PluralRules` instances on every call.

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};

use crate::interpreter::error::FunctionError;

/// Which CLDR rule set to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralKind {
    /// Quantities: "1 file", "2 files".
    Cardinal,
    /// Positions: "1st", "2nd".
    Ordinal,
}

impl PluralKind {
    fn rule_type(self) -> PluralRuleType {
        match self {
            PluralKind::Cardinal => PluralRuleType::Cardinal,
            PluralKind::Ordinal => PluralRuleType::Ordinal,
        }
    }
}

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by locale and rule type.
    static PLURAL_RULES_CACHE: RefCell<Vec<(String, PluralKind, PluralRules)>> =
        const { RefCell::new(Vec::new()) };
}

/// Get the CLDR plural category for a number written in decimal notation.
///
/// `number` keeps its visible fraction digits, so `"1"` and `"1.0"` may fall
/// in different categories.
///
/// # Errors
///
/// Returns [`FunctionError::InvalidExpression`] when `number` is not a
/// decimal number or no rules can be loaded for `locale`.
pub fn plural_category(
    locale: &Locale,
    kind: PluralKind,
    number: &str,
) -> Result<&'static str, FunctionError> {
    let decimal: Decimal = number.parse().map_err(|_| {
        FunctionError::InvalidExpression(format!("'{number}' is not a decimal number"))
    })?;
    let operands = PluralOperands::from(&decimal);

    let key = locale.to_string();
    PLURAL_RULES_CACHE.with(|cache| -> Result<&'static str, FunctionError> {
        let mut cache = cache.borrow_mut();
        let index = match cache
            .iter()
            .position(|(cached, cached_kind, _)| *cached == key && *cached_kind == kind)
        {
            Some(index) => index,
            None => {
                let rules = PluralRules::try_new(locale.clone().into(), kind.rule_type().into())
                    .map_err(|_| {
                        FunctionError::InvalidExpression(format!(
                            "no plural rules for locale '{key}'"
                        ))
                    })?;
                cache.push((key, kind, rules));
                cache.len() - 1
            }
        };
        Ok(category_str(cache[index].2.category_for(operands)))
    })
}

/// The variant key spelling of a category.
fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}
