//! Message formatting.
//!
//! This module provides the runtime that takes a parsed [`Message`] and
//! produces a string. It resolves declarations lazily, asks registered
//! selectors to choose a variant, and hands annotated values to registered
//! formatters.
//!
//! [`Message`]: crate::Message

mod builtins;
mod context;
mod datetime;
mod error;
mod evaluator;
mod message_format;
mod number;
mod plural;
mod registry;
mod resolved;
mod select;

pub use context::DEFAULT_MAX_DEPTH;
pub use error::{FormatError, FunctionError, compute_suggestions};
pub use evaluator::format_message;
pub use message_format::MessageFormat;
pub use plural::{PluralKind, plural_category};
pub use registry::{Formatter, Registry, Selector};
pub use resolved::ResolvedValue;
