//! Forward-only scanning view over message text.
//!
//! The cursor is the only part of the crate that looks at raw characters.
//! Single characters are tested with class predicates from [`super::chars`];
//! multi-character anchors (keywords, escapes, number literals) are winnow
//! parsers run against a copy of the remaining input, so a failed match
//! never moves the cursor.

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;

use super::chars::is_whitespace;
use super::error::ParseError;

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Byte offset of the cursor within the source text.
    pub fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    /// Source text consumed since `offset`.
    pub fn since(&self, offset: usize) -> &'a str {
        &self.source[offset..self.offset()]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// The first non-whitespace character ahead, without consuming anything.
    ///
    /// Returns `None` when only whitespace remains.
    pub fn peek_after_whitespace(&self) -> Option<char> {
        self.after_whitespace().chars().next()
    }

    /// Consume one character.
    pub fn pop(&mut self) -> Result<char, ParseError> {
        let Some(c) = self.peek() else {
            return Err(self.error("unexpected end of input"));
        };
        self.rest = &self.rest[c.len_utf8()..];
        Ok(c)
    }

    /// Consume one character, which must be `expected`.
    pub fn expect(&mut self, expected: char) -> Result<char, ParseError> {
        match self.peek() {
            Some(c) if c == expected => self.pop(),
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}'"))),
        }
    }

    /// Whether the next character belongs to `class`.
    pub fn matches(&self, class: fn(char) -> bool) -> bool {
        self.peek().is_some_and(class)
    }

    pub fn matches_after_whitespace(&self, class: fn(char) -> bool) -> bool {
        self.peek_after_whitespace().is_some_and(class)
    }

    /// Whether `pattern` matches at the cursor.
    pub fn looking_at<O, P>(&self, mut pattern: P) -> bool
    where
        P: Parser<&'a str, O, ErrMode<ContextError>>,
    {
        let mut input = self.rest;
        pattern.parse_next(&mut input).is_ok()
    }

    /// Whether `pattern` matches after any whitespace at the cursor.
    pub fn looking_at_after_whitespace<O, P>(&self, mut pattern: P) -> bool
    where
        P: Parser<&'a str, O, ErrMode<ContextError>>,
    {
        let mut input = self.after_whitespace();
        !input.is_empty() && pattern.parse_next(&mut input).is_ok()
    }

    /// Consume the text matched by `pattern` and return it.
    ///
    /// On failure the cursor does not move.
    pub fn pop_matching<O, P>(&mut self, mut pattern: P) -> Result<&'a str, ParseError>
    where
        P: Parser<&'a str, O, ErrMode<ContextError>>,
    {
        let start = self.rest;
        let mut input = start;
        match pattern.parse_next(&mut input) {
            Ok(_) => {
                self.rest = input;
                Ok(&start[..start.len() - input.len()])
            }
            Err(_) => match self.peek() {
                Some(c) => Err(self.error(format!("unexpected '{c}'"))),
                None => Err(self.error("unexpected end of input")),
            },
        }
    }

    /// Consume a run of whitespace, possibly empty.
    pub fn skip_whitespace(&mut self) -> &'a str {
        let remaining = self.after_whitespace();
        let skipped = &self.rest[..self.rest.len() - remaining.len()];
        self.rest = remaining;
        skipped
    }

    /// Consume a run of whitespace that must not be empty.
    pub fn require_whitespace(&mut self) -> Result<&'a str, ParseError> {
        if !self.matches(is_whitespace) {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected whitespace, found '{c}'")),
                None => self.error("expected whitespace"),
            });
        }
        Ok(self.skip_whitespace())
    }

    /// Build an error pointing at the cursor.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = calculate_position(self.source, self.rest);
        if self.rest.is_empty() {
            ParseError::UnexpectedEof { line, column }
        } else {
            ParseError::Syntax {
                line,
                column,
                message: message.into(),
                remaining: self.rest.to_string(),
            }
        }
    }

    fn after_whitespace(&self) -> &'a str {
        self.rest.trim_start_matches(is_whitespace)
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = &original[..original.len() - remaining.len()];
    let line = consumed.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed.rfind('\n') {
        Some(pos) => consumed[pos + 1..].chars().count() + 1,
        None => consumed.chars().count() + 1,
    };
    (line, column)
}
