//! Crate-level error for the parse-then-format path.

use thiserror::Error;

use crate::interpreter::FormatError;
use crate::parser::MessageError;

/// Any failure of [`MessageFormat::format_str`](crate::MessageFormat::format_str).
#[derive(Debug, Error)]
pub enum Error {
    /// The source text is not a valid message.
    #[error(transparent)]
    Message(#[from] MessageError),

    /// The message could not be formatted with the given inputs.
    #[error(transparent)]
    Format(#[from] FormatError),
}
