//! Data model for parsed messages.
//!
//! A [`Message`] owns its whole tree. Every node is immutable after parsing
//! and renders back to canonical message syntax through `Display`
//! (see `render.rs`). The model serializes to JSON with a `"type"` tag on
//! each variant node, and bare strings for text.

use serde::{Deserialize, Serialize};

/// A complete message: either a flat pattern or a matcher over selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    Pattern(PatternMessage),
    Select(SelectMessage),
}

impl Message {
    pub fn declarations(&self) -> &[Declaration] {
        match self {
            Message::Pattern(message) => &message.declarations,
            Message::Select(message) => &message.declarations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMessage {
    pub declarations: Vec<Declaration>,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectMessage {
    pub declarations: Vec<Declaration>,
    pub selectors: Vec<Expression>,
    pub variants: Vec<Variant>,
}

/// A statement in the head of a complex message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Declaration {
    Input(InputDeclaration),
    Local(LocalDeclaration),
    Unsupported(UnsupportedStatement),
}

impl Declaration {
    /// The name bound by this declaration, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Input(input) => Some(&input.name),
            Declaration::Local(local) => Some(&local.name),
            Declaration::Unsupported(_) => None,
        }
    }
}

/// `.input {$name ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDeclaration {
    pub name: String,
    pub value: VariableExpression,
}

/// `.local $name = {...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDeclaration {
    pub name: String,
    pub value: Expression,
}

/// Any other `.keyword` statement, kept verbatim for round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedStatement {
    pub keyword: String,
    pub body: Option<String>,
    pub expressions: Vec<Expression>,
}

/// A sequence of text, expressions and markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    pub parts: Vec<PatternPart>,
}

impl Pattern {
    pub fn new(parts: Vec<PatternPart>) -> Self {
        Self { parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, PatternPart> {
        self.parts.iter()
    }
}

impl From<Vec<PatternPart>> for Pattern {
    fn from(parts: Vec<PatternPart>) -> Self {
        Self::new(parts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternPart {
    Text(String),
    Expression(Expression),
    Markup(Markup),
}

impl From<&str> for PatternPart {
    fn from(text: &str) -> Self {
        PatternPart::Text(text.to_string())
    }
}

impl From<Expression> for PatternPart {
    fn from(expression: Expression) -> Self {
        PatternPart::Expression(expression)
    }
}

impl From<Markup> for PatternPart {
    fn from(markup: Markup) -> Self {
        PatternPart::Markup(markup)
    }
}

/// A placeholder `{...}` that resolves to a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Expression {
    Literal(LiteralExpression),
    Variable(VariableExpression),
    Function(FunctionExpression),
    Unsupported(UnsupportedExpression),
}

impl Expression {
    /// The function annotation attached to this expression, if any.
    pub fn function(&self) -> Option<&FunctionAnnotation> {
        match self {
            Expression::Literal(LiteralExpression { annotation, .. })
            | Expression::Variable(VariableExpression { annotation, .. }) => match annotation {
                Some(Annotation::Function(function)) => Some(function),
                Some(Annotation::Unsupported(_)) | None => None,
            },
            Expression::Function(expr) => Some(&expr.annotation),
            Expression::Unsupported(_) => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Expression::Literal(expr) => &expr.attributes,
            Expression::Variable(expr) => &expr.attributes,
            Expression::Function(expr) => &expr.attributes,
            Expression::Unsupported(expr) => &expr.attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub arg: Literal,
    pub annotation: Option<Annotation>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableExpression {
    pub arg: VariableRef,
    pub annotation: Option<Annotation>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub annotation: FunctionAnnotation,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedExpression {
    pub annotation: UnsupportedAnnotation,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Annotation {
    Function(FunctionAnnotation),
    Unsupported(UnsupportedAnnotation),
}

/// `:name option=value ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionAnnotation {
    pub name: String,
    pub options: Vec<NamedOption>,
}

/// A reserved annotation such as `!horse`, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedAnnotation {
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRef {
    pub name: String,
}

impl VariableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The value side of an option or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operand {
    Literal(Literal),
    Variable(VariableRef),
}

/// `name=value` inside an annotation or markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOption {
    pub name: String,
    pub value: Operand,
}

/// `@name` or `@name=value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: Option<Operand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkupKind {
    Open,
    Standalone,
    Close,
}

/// `{#name}`, `{#name /}` or `{/name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "markup")]
pub struct Markup {
    pub kind: MarkupKind,
    pub name: String,
    pub options: Vec<NamedOption>,
    pub attributes: Vec<Attribute>,
}

/// One arm of a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub keys: Vec<VariantKey>,
    pub value: Pattern,
}

impl Variant {
    /// Whether every key is the catch-all `*`.
    pub fn is_fallback(&self) -> bool {
        self.keys.iter().all(|key| matches!(key, VariantKey::Catchall))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VariantKey {
    Literal(Literal),
    #[serde(rename = "*")]
    Catchall,
}
