//! Lazily formatted expression values.

use crate::interpreter::error::FormatError;
use crate::types::{Options, Value};

/// The result of resolving an expression.
///
/// Annotated expressions are not formatted straight away: they stay
/// `Deferred` so a later declaration can add options, and a selector can
/// see the raw operand. They become text only through their formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// A plain value with no function attached.
    Immediate(Value),
    /// An operand waiting for its function.
    Deferred {
        function: String,
        operand: Option<Value>,
        options: Options,
    },
}

impl ResolvedValue {
    /// Attach a function annotation to this value.
    ///
    /// An immediate value becomes the operand. A deferred value keeps its
    /// operand and merges `options` over its own, later names winning.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::FunctionMismatch`] when a deferred value is
    /// annotated with a different function.
    pub fn annotate(self, function: &str, options: Options) -> Result<Self, FormatError> {
        match self {
            ResolvedValue::Immediate(value) => Ok(ResolvedValue::Deferred {
                function: function.to_string(),
                operand: Some(value),
                options,
            }),
            ResolvedValue::Deferred {
                function: existing,
                operand,
                options: mut merged,
            } => {
                if existing != function {
                    return Err(FormatError::FunctionMismatch {
                        expected: existing,
                        found: function.to_string(),
                    });
                }
                merged.extend(options);
                Ok(ResolvedValue::Deferred {
                    function: existing,
                    operand,
                    options: merged,
                })
            }
        }
    }
}
