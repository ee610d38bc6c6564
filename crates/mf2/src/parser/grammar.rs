//! Recursive-descent rules for message syntax.
//!
//! Each rule consumes from a [`Cursor`] and returns a data model node. Rules
//! decide what to parse by peeking; there is no backtracking past a single
//! anchored match, and no error recovery.

use winnow::ascii::digit1;
use winnow::combinator::{alt, not, opt, preceded, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::ast::*;
use super::chars::{
    RESERVED_SIGILS, is_annotation_start, is_name_char, is_name_start, is_quoted, is_reserved,
    is_simple_start, is_text, is_whitespace,
};
use super::cursor::Cursor;
use super::error::ParseError;

/// Parse message text into a data model without validating it.
///
/// Text starting with `.` or `{{` is a complex message; anything else is a
/// simple message. Fails if any input is left after the message.
pub fn parse_message(source: &str) -> Result<Message, ParseError> {
    let mut cursor = Cursor::new(source);
    let message = if cursor.peek() == Some('.') || cursor.looking_at("{{") {
        complex_message(&mut cursor)?
    } else {
        simple_message(&mut cursor)?
    };
    if let Some(c) = cursor.peek() {
        return Err(cursor.error(format!("expected end of message, found '{c}'")));
    }
    Ok(message)
}

// =========================================================================
// Anchors
// =========================================================================

/// `-?(0|[1-9])\d*(\.\d+)?([eE][+-]?\d+)?`
pub(crate) fn number_literal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

/// A complete name: a name-start character followed by name characters.
pub(crate) fn name_token<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .parse_next(input)
}

/// `word` as a whole keyword, not the prefix of a longer name.
fn keyword<'s>(word: &'static str) -> impl Parser<&'s str, &'s str, ErrMode<ContextError>> {
    terminated(word, not(one_of(is_name_char)))
}

/// `\\`, `\{` or `\}` in pattern text.
fn text_escape<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    preceded('\\', one_of(['\\', '{', '}']))
        .take()
        .parse_next(input)
}

/// `\\` or `\|` in a quoted literal.
fn quoted_escape<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    preceded('\\', one_of(['\\', '|'])).take().parse_next(input)
}

/// `\\`, `\{`, `\|` or `\}` in a reserved body.
fn reserved_escape<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    preceded('\\', one_of(['\\', '{', '|', '}']))
        .take()
        .parse_next(input)
}

/// `{#` or `{/`, with at most one whitespace character after the brace.
fn markup_start<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    ('{', opt(one_of(is_whitespace)), one_of(['#', '/']))
        .take()
        .parse_next(input)
}

fn reserved_body_part_start<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((one_of(is_reserved).take(), reserved_escape, "|")).parse_next(input)
}

// =========================================================================
// Messages
// =========================================================================

/// Accumulates pattern parts, merging consecutive text.
#[derive(Default)]
struct PatternBuilder {
    parts: Vec<PatternPart>,
    text: String,
}

impl PatternBuilder {
    fn push_part(&mut self, part: PatternPart) {
        self.flush_text();
        self.parts.push(part);
    }

    /// Append a decoded escape sequence such as `\{`.
    fn push_escape(&mut self, escape: &str) {
        self.text.push_str(&escape[1..]);
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.parts
                .push(PatternPart::Text(core::mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Pattern {
        self.flush_text();
        Pattern::new(self.parts)
    }
}

fn simple_message(cursor: &mut Cursor<'_>) -> Result<Message, ParseError> {
    let mut builder = PatternBuilder::default();
    if !cursor.is_empty() {
        simple_start(cursor, &mut builder)?;
        pattern(cursor, &mut builder)?;
    }
    Ok(Message::Pattern(PatternMessage {
        declarations: Vec::new(),
        pattern: builder.finish(),
    }))
}

/// The first character of a simple message, which may not be `.`.
fn simple_start(cursor: &mut Cursor<'_>, builder: &mut PatternBuilder) -> Result<(), ParseError> {
    match cursor.peek() {
        Some('{') => builder.push_part(placeholder(cursor)?),
        Some(c) if is_simple_start(c) => {
            cursor.pop()?;
            builder.text.push(c);
        }
        _ if cursor.looking_at(text_escape) => {
            let escape = cursor.pop_matching(text_escape)?;
            builder.push_escape(escape);
        }
        Some(c) => return Err(cursor.error(format!("invalid character '{c}'"))),
        None => return Err(cursor.error("expected a pattern")),
    }
    Ok(())
}

fn complex_message(cursor: &mut Cursor<'_>) -> Result<Message, ParseError> {
    let mut declarations = Vec::new();
    while cursor.peek() == Some('.') && !cursor.looking_at(keyword(".match")) {
        declarations.push(declaration(cursor)?);
        cursor.skip_whitespace();
    }

    let message = if cursor.looking_at("{{") {
        Message::Pattern(PatternMessage {
            declarations,
            pattern: quoted_pattern(cursor)?,
        })
    } else {
        let (selectors, variants) = matcher(cursor)?;
        Message::Select(SelectMessage {
            declarations,
            selectors,
            variants,
        })
    };
    cursor.skip_whitespace();
    Ok(message)
}

// =========================================================================
// Declarations
// =========================================================================

fn declaration(cursor: &mut Cursor<'_>) -> Result<Declaration, ParseError> {
    if cursor.looking_at(keyword(".input")) {
        input_declaration(cursor)
    } else if cursor.looking_at(keyword(".local")) {
        local_declaration(cursor)
    } else {
        reserved_statement(cursor)
    }
}

/// `.input {$name ...}`
fn input_declaration(cursor: &mut Cursor<'_>) -> Result<Declaration, ParseError> {
    cursor.pop_matching(keyword(".input"))?;
    cursor.skip_whitespace();
    cursor.expect('{')?;
    cursor.skip_whitespace();
    let value = variable_expression(cursor)?;
    cursor.skip_whitespace();
    cursor.expect('}')?;
    Ok(Declaration::Input(InputDeclaration {
        name: value.arg.name.clone(),
        value,
    }))
}

/// `.local $name = {...}`
fn local_declaration(cursor: &mut Cursor<'_>) -> Result<Declaration, ParseError> {
    cursor.pop_matching(keyword(".local"))?;
    cursor.require_whitespace()?;
    let variable = variable(cursor)?;
    cursor.skip_whitespace();
    cursor.expect('=')?;
    cursor.skip_whitespace();
    Ok(Declaration::Local(LocalDeclaration {
        name: variable.name,
        value: expression(cursor)?,
    }))
}

/// `.keyword [body] {expr}+` for any keyword this grammar does not know.
fn reserved_statement(cursor: &mut Cursor<'_>) -> Result<Declaration, ParseError> {
    cursor.expect('.')?;
    let keyword = name(cursor)?;

    let mut body = None;
    if cursor.looking_at_after_whitespace(reserved_body_part_start) {
        cursor.require_whitespace()?;
        body = Some(reserved_body(cursor)?.to_string());
    }

    cursor.skip_whitespace();
    let mut expressions = vec![expression(cursor)?];
    while cursor.peek_after_whitespace() == Some('{') && !cursor.looking_at_after_whitespace("{{")
    {
        cursor.skip_whitespace();
        expressions.push(expression(cursor)?);
    }

    Ok(Declaration::Unsupported(UnsupportedStatement {
        keyword,
        body,
        expressions,
    }))
}

// =========================================================================
// Bodies
// =========================================================================

/// `{{ pattern }}`
fn quoted_pattern(cursor: &mut Cursor<'_>) -> Result<Pattern, ParseError> {
    cursor.pop_matching("{{")?;
    let mut builder = PatternBuilder::default();
    pattern(cursor, &mut builder)?;
    cursor.pop_matching("}}")?;
    Ok(builder.finish())
}

/// `.match {selector}+ variant+`
fn matcher(cursor: &mut Cursor<'_>) -> Result<(Vec<Expression>, Vec<Variant>), ParseError> {
    cursor.pop_matching(keyword(".match"))?;
    cursor.skip_whitespace();
    let mut selectors = vec![expression(cursor)?];
    while cursor.peek_after_whitespace() == Some('{') {
        cursor.skip_whitespace();
        selectors.push(expression(cursor)?);
    }

    cursor.skip_whitespace();
    let mut variants = vec![variant(cursor)?];
    while cursor.peek_after_whitespace().is_some() {
        cursor.skip_whitespace();
        variants.push(variant(cursor)?);
    }
    Ok((selectors, variants))
}

/// `key+ {{ pattern }}`
fn variant(cursor: &mut Cursor<'_>) -> Result<Variant, ParseError> {
    let mut keys = vec![variant_key(cursor)?];
    while cursor.peek_after_whitespace().is_some() && !cursor.looking_at_after_whitespace("{{") {
        cursor.require_whitespace()?;
        keys.push(variant_key(cursor)?);
    }
    cursor.skip_whitespace();
    Ok(Variant {
        keys,
        value: quoted_pattern(cursor)?,
    })
}

fn variant_key(cursor: &mut Cursor<'_>) -> Result<VariantKey, ParseError> {
    if cursor.peek() == Some('*') {
        cursor.pop()?;
        return Ok(VariantKey::Catchall);
    }
    Ok(VariantKey::Literal(literal(cursor)?))
}

// =========================================================================
// Patterns
// =========================================================================

/// Text, escapes and placeholders up to `}}` or the end of input.
fn pattern(cursor: &mut Cursor<'_>, builder: &mut PatternBuilder) -> Result<(), ParseError> {
    while !cursor.is_empty() && !cursor.looking_at("}}") {
        if let Some(c) = cursor.peek().filter(|&c| is_text(c)) {
            cursor.pop()?;
            builder.text.push(c);
        } else if cursor.looking_at(text_escape) {
            let escape = cursor.pop_matching(text_escape)?;
            builder.push_escape(escape);
        } else {
            builder.push_part(placeholder(cursor)?);
        }
    }
    Ok(())
}

fn placeholder(cursor: &mut Cursor<'_>) -> Result<PatternPart, ParseError> {
    if cursor.looking_at(markup_start) {
        Ok(PatternPart::Markup(markup(cursor)?))
    } else {
        Ok(PatternPart::Expression(expression(cursor)?))
    }
}

/// `{#name ...}`, `{#name ... /}` or `{/name ...}`
fn markup(cursor: &mut Cursor<'_>) -> Result<Markup, ParseError> {
    cursor.expect('{')?;
    cursor.skip_whitespace();
    let sigil = cursor.pop()?;
    let name = identifier(cursor)?;

    let mut options = Vec::new();
    let mut attributes = Vec::new();
    while !matches!(cursor.peek_after_whitespace(), Some('/' | '}')) {
        cursor.require_whitespace()?;
        if cursor.peek() == Some('@') {
            attributes.push(attribute(cursor)?);
        } else {
            options.push(option(cursor)?);
        }
    }
    cursor.skip_whitespace();

    let kind = if sigil == '/' {
        MarkupKind::Close
    } else if cursor.peek() == Some('/') {
        cursor.pop()?;
        MarkupKind::Standalone
    } else {
        MarkupKind::Open
    };
    cursor.expect('}')?;

    Ok(Markup {
        kind,
        name,
        options,
        attributes,
    })
}

// =========================================================================
// Expressions
// =========================================================================

/// `{ ... }` where the first token decides the expression shape.
fn expression(cursor: &mut Cursor<'_>) -> Result<Expression, ParseError> {
    cursor.expect('{')?;
    cursor.skip_whitespace();

    let expression = match cursor.peek() {
        Some('$') => Expression::Variable(variable_expression(cursor)?),
        Some(':') => Expression::Function(FunctionExpression {
            annotation: function_annotation(cursor)?,
            attributes: attributes(cursor)?,
        }),
        Some(c) if RESERVED_SIGILS.contains(&c) => {
            Expression::Unsupported(UnsupportedExpression {
                annotation: unsupported_annotation(cursor)?,
                attributes: attributes(cursor)?,
            })
        }
        _ => Expression::Literal(LiteralExpression {
            arg: literal(cursor)?,
            annotation: optional_annotation(cursor)?,
            attributes: attributes(cursor)?,
        }),
    };

    cursor.skip_whitespace();
    cursor.expect('}')?;
    Ok(expression)
}

/// `$name [annotation] [attributes]`, without the braces.
fn variable_expression(cursor: &mut Cursor<'_>) -> Result<VariableExpression, ParseError> {
    Ok(VariableExpression {
        arg: variable(cursor)?,
        annotation: optional_annotation(cursor)?,
        attributes: attributes(cursor)?,
    })
}

fn optional_annotation(cursor: &mut Cursor<'_>) -> Result<Option<Annotation>, ParseError> {
    if !cursor.matches_after_whitespace(is_annotation_start) {
        return Ok(None);
    }
    cursor.require_whitespace()?;
    if cursor.peek() == Some(':') {
        Ok(Some(Annotation::Function(function_annotation(cursor)?)))
    } else {
        Ok(Some(Annotation::Unsupported(unsupported_annotation(cursor)?)))
    }
}

/// `:identifier option*`
fn function_annotation(cursor: &mut Cursor<'_>) -> Result<FunctionAnnotation, ParseError> {
    cursor.expect(':')?;
    let name = identifier(cursor)?;
    let mut options = Vec::new();
    while cursor.matches_after_whitespace(is_name_start) {
        cursor.require_whitespace()?;
        options.push(option(cursor)?);
    }
    Ok(FunctionAnnotation { name, options })
}

/// A sigil followed by an optional reserved body, captured as written.
fn unsupported_annotation(cursor: &mut Cursor<'_>) -> Result<UnsupportedAnnotation, ParseError> {
    let start = cursor.offset();
    cursor.pop()?;
    if cursor.looking_at_after_whitespace(reserved_body_part_start) {
        cursor.skip_whitespace();
        reserved_body(cursor)?;
    }
    Ok(UnsupportedAnnotation {
        source: cursor.since(start).to_string(),
    })
}

/// Reserved parts separated by whitespace, returned verbatim.
fn reserved_body<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, ParseError> {
    let start = cursor.offset();
    reserved_body_part(cursor)?;
    while cursor.looking_at_after_whitespace(reserved_body_part_start) {
        cursor.skip_whitespace();
        reserved_body_part(cursor)?;
    }
    Ok(cursor.since(start))
}

fn reserved_body_part(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    loop {
        if cursor.matches(is_reserved) {
            cursor.pop()?;
        } else if cursor.looking_at(reserved_escape) {
            cursor.pop_matching(reserved_escape)?;
        } else if cursor.peek() == Some('|') {
            quoted_literal(cursor)?;
        } else {
            return Ok(());
        }
    }
}

fn attributes(cursor: &mut Cursor<'_>) -> Result<Vec<Attribute>, ParseError> {
    let mut attributes = Vec::new();
    while cursor.peek_after_whitespace() != Some('}') {
        cursor.require_whitespace()?;
        attributes.push(attribute(cursor)?);
    }
    Ok(attributes)
}

/// `@identifier [= value]`
fn attribute(cursor: &mut Cursor<'_>) -> Result<Attribute, ParseError> {
    cursor.expect('@')?;
    let name = identifier(cursor)?;
    if cursor.peek_after_whitespace() != Some('=') {
        return Ok(Attribute { name, value: None });
    }
    cursor.skip_whitespace();
    cursor.expect('=')?;
    cursor.skip_whitespace();
    Ok(Attribute {
        name,
        value: Some(operand(cursor)?),
    })
}

/// `identifier = value`
fn option(cursor: &mut Cursor<'_>) -> Result<NamedOption, ParseError> {
    let name = identifier(cursor)?;
    cursor.skip_whitespace();
    if cursor.peek() != Some('=') {
        return Err(cursor.error(format!("option '{name}' is missing '='")));
    }
    cursor.pop()?;
    cursor.skip_whitespace();
    Ok(NamedOption {
        name,
        value: operand(cursor)?,
    })
}

fn operand(cursor: &mut Cursor<'_>) -> Result<Operand, ParseError> {
    if cursor.peek() == Some('$') {
        Ok(Operand::Variable(variable(cursor)?))
    } else {
        Ok(Operand::Literal(literal(cursor)?))
    }
}

// =========================================================================
// Names and literals
// =========================================================================

/// `name` or `namespace:name`
fn identifier(cursor: &mut Cursor<'_>) -> Result<String, ParseError> {
    let namespace = name(cursor)?;
    if cursor.peek() != Some(':') {
        return Ok(namespace);
    }
    cursor.pop()?;
    let name = name(cursor)?;
    Ok(format!("{namespace}:{name}"))
}

fn name(cursor: &mut Cursor<'_>) -> Result<String, ParseError> {
    match cursor.peek() {
        Some(c) if is_name_start(c) => Ok(cursor.pop_matching(name_token)?.to_string()),
        Some(c) => Err(cursor.error(format!("invalid name start '{c}'"))),
        None => Err(cursor.error("expected a name")),
    }
}

fn variable(cursor: &mut Cursor<'_>) -> Result<VariableRef, ParseError> {
    if cursor.peek() != Some('$') {
        return Err(match cursor.peek() {
            Some(c) => cursor.error(format!("expected a variable, found '{c}'")),
            None => cursor.error("expected a variable"),
        });
    }
    cursor.pop()?;
    Ok(VariableRef { name: name(cursor)? })
}

fn literal(cursor: &mut Cursor<'_>) -> Result<Literal, ParseError> {
    if cursor.peek() == Some('|') {
        quoted_literal(cursor)
    } else if cursor.looking_at(number_literal) {
        Ok(Literal::new(cursor.pop_matching(number_literal)?))
    } else {
        Ok(Literal::new(name(cursor)?))
    }
}

/// `|...|` with `\\` and `\|` escapes.
fn quoted_literal(cursor: &mut Cursor<'_>) -> Result<Literal, ParseError> {
    cursor.expect('|')?;
    let mut value = String::new();
    loop {
        if cursor.looking_at(quoted_escape) {
            let escape = cursor.pop_matching(quoted_escape)?;
            value.push_str(&escape[1..]);
        } else if let Some(c) = cursor.peek().filter(|&c| is_quoted(c)) {
            cursor.pop()?;
            value.push(c);
        } else {
            break;
        }
    }
    cursor.expect('|')?;
    Ok(Literal { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_match(parser: for<'s> fn(&mut &'s str) -> ModalResult<&'s str>, text: &str) -> bool {
        let mut input = text;
        parser(&mut input).is_ok_and(|matched| matched == text)
    }

    #[test]
    fn test_number_literal_anchor() {
        for text in ["0", "-1", "42", "0123", "1.5", "1e5", "-2.5E-3"] {
            assert!(full_match(number_literal, text), "{text}");
        }
        let mut input = "1.x";
        assert_eq!(number_literal(&mut input).unwrap(), "1");
        assert_eq!(input, ".x");
        assert!(!full_match(number_literal, "-"));
        assert!(!full_match(number_literal, "abc"));
    }

    #[test]
    fn test_name_token_anchor() {
        assert!(full_match(name_token, "a-b.c_1"));
        assert!(!full_match(name_token, "1abc"));
    }
}
