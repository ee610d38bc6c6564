//! Canonical message syntax for data model nodes.
//!
//! Rendering is deterministic and the output parses back to an equal tree.
//! Whitespace is normalized to single spaces inside placeholders and one
//! newline between statements; literals are quoted only when they are
//! neither a name nor a number.

use core::fmt::{self, Display};

use super::ast::*;
use super::grammar::{name_token, number_literal};

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Pattern(message) => message.fmt(f),
            Message::Select(message) => message.fmt(f),
        }
    }
}

impl Display for PatternMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for declaration in &self.declarations {
            writeln!(f, "{declaration}")?;
        }
        // A leading '.' would otherwise read as a keyword.
        let starts_with_dot = matches!(
            self.pattern.parts.first(),
            Some(PatternPart::Text(text)) if text.starts_with('.')
        );
        if self.declarations.is_empty() && !starts_with_dot {
            write!(f, "{}", self.pattern)
        } else {
            write!(f, "{{{{{}}}}}", self.pattern)
        }
    }
}

impl Display for SelectMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for declaration in &self.declarations {
            writeln!(f, "{declaration}")?;
        }
        f.write_str(".match")?;
        for selector in &self.selectors {
            write!(f, " {selector}")?;
        }
        for variant in &self.variants {
            write!(f, "\n{variant}")?;
        }
        Ok(())
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Input(input) => write!(f, ".input {}", input.value),
            Declaration::Local(local) => write!(f, ".local ${} = {}", local.name, local.value),
            Declaration::Unsupported(statement) => statement.fmt(f),
        }
    }
}

impl Display for UnsupportedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.keyword)?;
        if let Some(body) = &self.body {
            write!(f, " {body}")?;
        }
        for expression in &self.expressions {
            write!(f, " {expression}")?;
        }
        Ok(())
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.keys {
            write!(f, "{key} ")?;
        }
        write!(f, "{{{{{}}}}}", self.value)
    }
}

impl Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKey::Literal(literal) => literal.fmt(f),
            VariantKey::Catchall => f.write_str("*"),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            part.fmt(f)?;
        }
        Ok(())
    }
}

impl Display for PatternPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternPart::Text(text) => write_escaped(f, text, &['\\', '{', '}']),
            PatternPart::Expression(expression) => expression.fmt(f),
            PatternPart::Markup(markup) => markup.fmt(f),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(expr) => expr.fmt(f),
            Expression::Variable(expr) => expr.fmt(f),
            Expression::Function(expr) => expr.fmt(f),
            Expression::Unsupported(expr) => expr.fmt(f),
        }
    }
}

impl Display for LiteralExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.arg)?;
        if let Some(annotation) = &self.annotation {
            write!(f, " {annotation}")?;
        }
        write_attributes(f, &self.attributes)?;
        f.write_str("}")
    }
}

impl Display for VariableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.arg)?;
        if let Some(annotation) = &self.annotation {
            write!(f, " {annotation}")?;
        }
        write_attributes(f, &self.attributes)?;
        f.write_str("}")
    }
}

impl Display for FunctionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.annotation)?;
        write_attributes(f, &self.attributes)?;
        f.write_str("}")
    }
}

impl Display for UnsupportedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.annotation)?;
        write_attributes(f, &self.attributes)?;
        f.write_str("}")
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Function(annotation) => annotation.fmt(f),
            Annotation::Unsupported(annotation) => annotation.fmt(f),
        }
    }
}

impl Display for FunctionAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name)?;
        for option in &self.options {
            write!(f, " {option}")?;
        }
        Ok(())
    }
}

impl Display for UnsupportedAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sigil = match self.kind {
            MarkupKind::Open | MarkupKind::Standalone => '#',
            MarkupKind::Close => '/',
        };
        write!(f, "{{{sigil}{}", self.name)?;
        for option in &self.options {
            write!(f, " {option}")?;
        }
        write_attributes(f, &self.attributes)?;
        if self.kind == MarkupKind::Standalone {
            f.write_str(" /")?;
        }
        f.write_str("}")
    }
}

impl Display for NamedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if let Some(value) = &self.value {
            write!(f, "={value}")?;
        }
        Ok(())
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(literal) => literal.fmt(f),
            Operand::Variable(variable) => variable.fmt(f),
        }
    }
}

impl Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_unquoted(&self.value) {
            return f.write_str(&self.value);
        }
        f.write_str("|")?;
        write_escaped(f, &self.value, &['\\', '|'])?;
        f.write_str("|")
    }
}

/// Whether `value` reads back as the same unquoted literal.
fn is_unquoted(value: &str) -> bool {
    let mut number = value;
    let mut name = value;
    (number_literal(&mut number).is_ok() && number.is_empty())
        || (name_token(&mut name).is_ok() && name.is_empty())
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &[Attribute]) -> fmt::Result {
    for attribute in attributes {
        write!(f, " {attribute}")?;
    }
    Ok(())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, escaped: &[char]) -> fmt::Result {
    for c in text.chars() {
        if escaped.contains(&c) {
            write!(f, "\\{c}")?;
        } else {
            write!(f, "{c}")?;
        }
    }
    Ok(())
}
