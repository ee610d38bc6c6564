//! Error types for message formatting.

use std::error::Error;

use strsim::levenshtein;
use thiserror::Error;

/// An error that aborted formatting a message.
///
/// Variants fall into two families: resolution errors, raised while turning
/// expressions into values, and selection errors, raised while choosing the
/// variant of a `.match` message. See [`FormatError::is_resolution_error`]
/// and [`FormatError::is_selection_error`].
#[derive(Debug, Error)]
pub enum FormatError {
    /// Variable is neither declared nor present in the inputs.
    #[error("unresolved variable '${name}'")]
    UnresolvedVariable { name: String },

    /// No formatter or selector is registered under this name.
    #[error("unknown function ':{name}'{}", did_you_mean(suggestions))]
    UnknownFunction {
        name: String,
        suggestions: Vec<String>,
    },

    /// An expression with a reserved annotation was evaluated.
    #[error("unsupported expression with annotation '{annotation}'")]
    UnsupportedExpression { annotation: String },

    /// A reserved statement was found among the declarations.
    #[error("unsupported statement '.{keyword}'")]
    UnsupportedStatement { keyword: String },

    /// A formatter rejected its input.
    #[error("invalid expression in ':{function}': {source}")]
    InvalidExpression {
        function: String,
        #[source]
        source: FunctionError,
    },

    /// A formatter was given an operand of the wrong kind.
    #[error("operand mismatch in ':{function}': {message}")]
    OperandMismatch { function: String, message: String },

    /// A deferred value was annotated again with a different function.
    #[error("cannot annotate a ':{expected}' value with ':{found}'")]
    FunctionMismatch { expected: String, found: String },

    /// A declaration was reached again while it was being resolved.
    #[error("cyclic reference detected: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// Declarations nested deeper than the configured limit.
    #[error("maximum recursion depth exceeded")]
    MaxDepthExceeded,

    /// A selector function failed.
    #[error("selection failed in ':{function}': {source}")]
    Selection {
        function: String,
        #[source]
        source: FunctionError,
    },

    /// A selector resolved to a plain value instead of an annotated one.
    #[error("selector {selector} has no function annotation")]
    UnannotatedSelector { selector: String },

    /// No variant accepts the selected keys.
    #[error("no variant matches the selectors")]
    NoMatchingVariant,
}

impl FormatError {
    /// Whether this error was raised while resolving an expression.
    pub fn is_resolution_error(&self) -> bool {
        !self.is_selection_error()
    }

    /// Whether this error was raised while choosing a variant.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            FormatError::Selection { .. }
                | FormatError::UnannotatedSelector { .. }
                | FormatError::NoMatchingVariant
        )
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// An error returned by a registered formatter or selector.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The function cannot handle its options or operand value.
    #[error("{0}")]
    InvalidExpression(String),

    /// The operand is missing or of a kind the function does not accept.
    #[error("{0}")]
    OperandMismatch(String),

    /// A selector could not compare its operand against the keys.
    #[error("{0}")]
    Selection(String),

    /// Any other failure, kept as the cause.
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync>),
}

impl FunctionError {
    /// Wrap an arbitrary error as the cause of a function failure.
    pub fn other(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        FunctionError::Other(error.into())
    }
}

/// Compute "did you mean" suggestions for an unknown name.
///
/// Returns up to 3 names within a small edit distance of `name`: 1 for names
/// of three bytes or fewer, 2 otherwise. Closest names come first; ties keep
/// the order of `available`.
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut candidates: Vec<(usize, &str)> = available
        .into_iter()
        .map(|candidate| (levenshtein(name, candidate), candidate))
        .filter(|&(distance, _)| distance > 0 && distance <= max_distance)
        .collect();
    candidates.sort_by_key(|&(distance, _)| distance);
    candidates
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
