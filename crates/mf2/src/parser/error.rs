//! Parse and validation error types.

use core::fmt;

use thiserror::Error;

/// A syntax error found while reading message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
        /// The unparsed input starting at the offending character.
        remaining: String,
    },

    /// Input ended where more was required.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },
}

impl ParseError {
    /// The `(line, column)` the error points at, both 1-based.
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::Syntax { line, column, .. }
            | ParseError::UnexpectedEof { line, column } => (*line, *column),
        }
    }
}

/// Why a declaration name is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationConflict {
    /// The name was already declared earlier.
    Repeated,
    /// A local declaration refers to itself: `.local $x = {$x}`.
    SelfReference,
    /// The name was already used as a variable by an earlier declaration.
    ImplicitRedeclaration,
}

impl fmt::Display for DeclarationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeclarationConflict::Repeated => "declared more than once",
            DeclarationConflict::SelfReference => "references itself",
            DeclarationConflict::ImplicitRedeclaration => "already used by an earlier declaration",
        };
        f.write_str(text)
    }
}

/// A well-formed message that breaks a semantic rule of the data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataModelError {
    #[error("duplicate declaration of ${name}: {conflict}")]
    DuplicateDeclaration {
        name: String,
        conflict: DeclarationConflict,
    },

    #[error("duplicate option name '{name}'")]
    DuplicateOptionName { name: String },

    #[error("selector {selector} has no function annotation")]
    MissingSelectorAnnotation { selector: String },

    #[error("variant {variant} has {found} keys, expected {expected}")]
    VariantKeyMismatch {
        expected: usize,
        found: usize,
        variant: usize,
    },

    #[error("missing fallback variant with only catch-all keys")]
    MissingFallbackVariant,

    /// Declarations refer to each other in a loop, e.g. `$a -> $b -> $a`.
    #[error("cyclic declarations: {}", chain.join(" -> "))]
    CyclicDeclaration { chain: Vec<String> },
}

/// Any error produced while turning text into a validated [`Message`].
///
/// [`Message`]: super::ast::Message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    DataModel(#[from] DataModelError),
}
