//! Variant selection for `.match` messages.
//!
//! Each selector is asked which of the literal keys in its column it
//! matches, in order of preference. A variant is eligible when every key is
//! either matched or `*`. Eligible variants are then ordered column by
//! column, most significant selector first, and the first one wins.

use crate::interpreter::context::FormatContext;
use crate::interpreter::error::FormatError;
use crate::interpreter::evaluator::{resolve_expression, unknown_function};
use crate::interpreter::resolved::ResolvedValue;
use crate::parser::ast::{Pattern, SelectMessage, Variant, VariantKey};

/// Pick the pattern of the best matching variant.
pub(crate) fn select_variant<'a>(
    message: &'a SelectMessage,
    ctx: &mut FormatContext<'a>,
) -> Result<&'a Pattern, FormatError> {
    let mut preferences = Vec::with_capacity(message.selectors.len());
    for (index, selector) in message.selectors.iter().enumerate() {
        let ResolvedValue::Deferred {
            function,
            operand,
            options,
        } = resolve_expression(selector, ctx)?
        else {
            return Err(FormatError::UnannotatedSelector {
                selector: selector.to_string(),
            });
        };
        let select = ctx
            .registry()
            .selector(&function)
            .ok_or_else(|| unknown_function(&function, ctx.registry()))?;
        let keys = column_keys(&message.variants, index);
        let matches = select
            .select(operand.as_ref(), ctx.locale(), &options, &keys)
            .map_err(|source| FormatError::Selection {
                function: function.clone(),
                source,
            })?;
        tracing::debug!(
            selector = index,
            function = %function,
            matches = ?matches,
            "selector matched keys"
        );
        preferences.push(matches);
    }

    let winner =
        best_variant(&message.variants, &preferences).ok_or(FormatError::NoMatchingVariant)?;
    tracing::debug!(variant = winner, "selected variant");
    Ok(&message.variants[winner].value)
}

/// Literal keys at `column`, in first-occurrence order without repeats.
fn column_keys(variants: &[Variant], column: usize) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for variant in variants {
        if let Some(VariantKey::Literal(literal)) = variant.keys.get(column)
            && !keys.contains(&literal.value)
        {
            keys.push(literal.value.clone());
        }
    }
    keys
}

/// Index of the preferred variant, given each selector's ordered matches.
pub(crate) fn best_variant(variants: &[Variant], preferences: &[Vec<String>]) -> Option<usize> {
    let mut candidates: Vec<usize> = (0..variants.len())
        .filter(|&index| is_eligible(&variants[index], preferences))
        .collect();
    // Stable sorts from the last column to the first leave the first column
    // most significant.
    for (column, matches) in preferences.iter().enumerate().rev() {
        candidates.sort_by_key(|&index| rank(&variants[index].keys[column], matches));
    }
    candidates.first().copied()
}

fn is_eligible(variant: &Variant, preferences: &[Vec<String>]) -> bool {
    variant.keys.len() == preferences.len()
        && variant
            .keys
            .iter()
            .zip(preferences)
            .all(|(key, matches)| match key {
                VariantKey::Catchall => true,
                VariantKey::Literal(literal) => matches.contains(&literal.value),
            })
}

/// Position of `key` among `matches`; a catch-all ranks after every match.
fn rank(key: &VariantKey, matches: &[String]) -> usize {
    match key {
        VariantKey::Catchall => matches.len(),
        VariantKey::Literal(literal) => matches
            .iter()
            .position(|candidate| *candidate == literal.value)
            .unwrap_or(matches.len()),
    }
}
