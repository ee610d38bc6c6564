//! Message syntax: parsing, validation and canonical rendering.
//!
//! Text is read by a forward-only cursor into the data model in [`ast`],
//! then checked by [`validate`] before [`parse`] returns it. Every node
//! renders back to canonical syntax through `Display`.

pub mod ast;
mod chars;
mod cursor;
pub mod error;
mod grammar;
mod render;
mod validate;
pub mod visit;

pub use ast::Message;
pub use error::{DataModelError, DeclarationConflict, MessageError, ParseError};
pub use grammar::parse_message;
pub use validate::validate;

/// Parse and validate a message.
///
/// # Errors
///
/// Returns [`MessageError::Parse`] for malformed syntax and
/// [`MessageError::DataModel`] when a semantic rule is broken.
///
/// # Example
///
/// ```
/// let message = mf2::parse("Hello, {$name}!").unwrap();
/// assert_eq!(message.to_string(), "Hello, {$name}!");
/// ```
pub fn parse(source: &str) -> Result<Message, MessageError> {
    let message = parse_message(source)?;
    validate(&message)?;
    let kind = match &message {
        Message::Pattern(_) => "pattern",
        Message::Select(_) => "select",
    };
    tracing::debug!(
        kind,
        declarations = message.declarations().len(),
        "parsed message"
    );
    Ok(message)
}
