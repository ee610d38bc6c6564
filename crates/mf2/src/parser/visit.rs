//! Tree traversal over the data model.
//!
//! [`Visitor`] walks a borrowed tree; every method defaults to visiting the
//! node's children through the matching `walk_*` function, so an override can
//! inspect a node and still descend by calling that function itself.
//!
//! [`Transformer`] consumes a tree and rebuilds it. Methods for list elements
//! return `Option`, and returning `None` removes the element.
//!
//! ```
//! use mf2::parser::visit::Visitor;
//! use mf2::parser::ast::VariableRef;
//!
//! #[derive(Default)]
//! struct Variables(Vec<String>);
//!
//! impl Visitor for Variables {
//!     fn visit_variable(&mut self, variable: &VariableRef) {
//!         self.0.push(variable.name.clone());
//!     }
//! }
//!
//! let message = mf2::parse("{$a :number minimumFractionDigits=$b} {$c}").unwrap();
//! let mut variables = Variables::default();
//! variables.visit_message(&message);
//! assert_eq!(variables.0, ["a", "b", "c"]);
//! ```

use super::ast::*;

/// Read-only traversal, one method per node kind.
pub trait Visitor {
    fn visit_message(&mut self, message: &Message) {
        walk_message(self, message);
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        walk_declaration(self, declaration);
    }

    fn visit_selector(&mut self, selector: &Expression) {
        self.visit_expression(selector);
    }

    fn visit_variant(&mut self, variant: &Variant) {
        walk_variant(self, variant);
    }

    fn visit_variant_key(&mut self, key: &VariantKey) {
        if let VariantKey::Literal(literal) = key {
            self.visit_literal(literal);
        }
    }

    fn visit_pattern(&mut self, pattern: &Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_text(&mut self, _text: &str) {}

    fn visit_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_annotation(&mut self, annotation: &Annotation) {
        match annotation {
            Annotation::Function(function) => self.visit_function_annotation(function),
            Annotation::Unsupported(unsupported) => self.visit_unsupported_annotation(unsupported),
        }
    }

    fn visit_function_annotation(&mut self, annotation: &FunctionAnnotation) {
        walk_options(self, &annotation.options);
    }

    fn visit_unsupported_annotation(&mut self, _annotation: &UnsupportedAnnotation) {}

    fn visit_markup(&mut self, markup: &Markup) {
        walk_markup(self, markup);
    }

    fn visit_option(&mut self, option: &NamedOption) {
        self.visit_operand(&option.value);
    }

    fn visit_attribute(&mut self, attribute: &Attribute) {
        if let Some(value) = &attribute.value {
            self.visit_operand(value);
        }
    }

    fn visit_operand(&mut self, operand: &Operand) {
        match operand {
            Operand::Literal(literal) => self.visit_literal(literal),
            Operand::Variable(variable) => self.visit_variable(variable),
        }
    }

    fn visit_literal(&mut self, _literal: &Literal) {}

    fn visit_variable(&mut self, _variable: &VariableRef) {}
}

pub fn walk_message<V: Visitor + ?Sized>(visitor: &mut V, message: &Message) {
    for declaration in message.declarations() {
        visitor.visit_declaration(declaration);
    }
    match message {
        Message::Pattern(message) => visitor.visit_pattern(&message.pattern),
        Message::Select(message) => {
            for selector in &message.selectors {
                visitor.visit_selector(selector);
            }
            for variant in &message.variants {
                visitor.visit_variant(variant);
            }
        }
    }
}

pub fn walk_declaration<V: Visitor + ?Sized>(visitor: &mut V, declaration: &Declaration) {
    match declaration {
        Declaration::Input(input) => walk_variable_expression(visitor, &input.value),
        Declaration::Local(local) => visitor.visit_expression(&local.value),
        Declaration::Unsupported(statement) => {
            for expression in &statement.expressions {
                visitor.visit_expression(expression);
            }
        }
    }
}

pub fn walk_variant<V: Visitor + ?Sized>(visitor: &mut V, variant: &Variant) {
    for key in &variant.keys {
        visitor.visit_variant_key(key);
    }
    visitor.visit_pattern(&variant.value);
}

pub fn walk_pattern<V: Visitor + ?Sized>(visitor: &mut V, pattern: &Pattern) {
    for part in pattern.iter() {
        match part {
            PatternPart::Text(text) => visitor.visit_text(text),
            PatternPart::Expression(expression) => visitor.visit_expression(expression),
            PatternPart::Markup(markup) => visitor.visit_markup(markup),
        }
    }
}

pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    match expression {
        Expression::Literal(expr) => {
            visitor.visit_literal(&expr.arg);
            walk_annotation_and_attributes(visitor, expr.annotation.as_ref(), &expr.attributes);
        }
        Expression::Variable(expr) => walk_variable_expression(visitor, expr),
        Expression::Function(expr) => {
            visitor.visit_function_annotation(&expr.annotation);
            walk_attributes(visitor, &expr.attributes);
        }
        Expression::Unsupported(expr) => {
            visitor.visit_unsupported_annotation(&expr.annotation);
            walk_attributes(visitor, &expr.attributes);
        }
    }
}

pub fn walk_markup<V: Visitor + ?Sized>(visitor: &mut V, markup: &Markup) {
    walk_options(visitor, &markup.options);
    walk_attributes(visitor, &markup.attributes);
}

/// Visit a variable expression's argument, annotation and attributes.
///
/// Input declarations hold a bare [`VariableExpression`], so this is shared
/// between [`walk_expression`] and [`walk_declaration`].
pub fn walk_variable_expression<V: Visitor + ?Sized>(
    visitor: &mut V,
    expression: &VariableExpression,
) {
    visitor.visit_variable(&expression.arg);
    walk_annotation_and_attributes(visitor, expression.annotation.as_ref(), &expression.attributes);
}

fn walk_annotation_and_attributes<V: Visitor + ?Sized>(
    visitor: &mut V,
    annotation: Option<&Annotation>,
    attributes: &[Attribute],
) {
    if let Some(annotation) = annotation {
        visitor.visit_annotation(annotation);
    }
    walk_attributes(visitor, attributes);
}

fn walk_options<V: Visitor + ?Sized>(visitor: &mut V, options: &[NamedOption]) {
    for option in options {
        visitor.visit_option(option);
    }
}

fn walk_attributes<V: Visitor + ?Sized>(visitor: &mut V, attributes: &[Attribute]) {
    for attribute in attributes {
        visitor.visit_attribute(attribute);
    }
}

/// Rebuilding traversal: each method takes a node by value and returns its
/// replacement.
pub trait Transformer {
    fn transform_message(&mut self, message: Message) -> Message {
        match message {
            Message::Pattern(message) => Message::Pattern(PatternMessage {
                declarations: self.transform_declarations(message.declarations),
                pattern: self.transform_pattern(message.pattern),
            }),
            Message::Select(message) => Message::Select(SelectMessage {
                declarations: self.transform_declarations(message.declarations),
                selectors: message
                    .selectors
                    .into_iter()
                    .map(|selector| self.transform_expression(selector))
                    .collect(),
                variants: message
                    .variants
                    .into_iter()
                    .filter_map(|variant| self.transform_variant(variant))
                    .collect(),
            }),
        }
    }

    fn transform_declarations(&mut self, declarations: Vec<Declaration>) -> Vec<Declaration> {
        declarations
            .into_iter()
            .filter_map(|declaration| self.transform_declaration(declaration))
            .collect()
    }

    fn transform_declaration(&mut self, declaration: Declaration) -> Option<Declaration> {
        Some(match declaration {
            Declaration::Input(input) => {
                let value = self.transform_variable_expression(input.value);
                Declaration::Input(InputDeclaration {
                    name: value.arg.name.clone(),
                    value,
                })
            }
            Declaration::Local(local) => Declaration::Local(LocalDeclaration {
                name: local.name,
                value: self.transform_expression(local.value),
            }),
            Declaration::Unsupported(statement) => Declaration::Unsupported(UnsupportedStatement {
                keyword: statement.keyword,
                body: statement.body,
                expressions: statement
                    .expressions
                    .into_iter()
                    .map(|expression| self.transform_expression(expression))
                    .collect(),
            }),
        })
    }

    fn transform_variant(&mut self, variant: Variant) -> Option<Variant> {
        Some(Variant {
            keys: variant.keys,
            value: self.transform_pattern(variant.value),
        })
    }

    fn transform_pattern(&mut self, pattern: Pattern) -> Pattern {
        Pattern::new(
            pattern
                .parts
                .into_iter()
                .filter_map(|part| self.transform_pattern_part(part))
                .collect(),
        )
    }

    fn transform_pattern_part(&mut self, part: PatternPart) -> Option<PatternPart> {
        Some(match part {
            PatternPart::Text(text) => PatternPart::Text(text),
            PatternPart::Expression(expression) => {
                PatternPart::Expression(self.transform_expression(expression))
            }
            PatternPart::Markup(markup) => PatternPart::Markup(self.transform_markup(markup)),
        })
    }

    fn transform_expression(&mut self, expression: Expression) -> Expression {
        match expression {
            Expression::Literal(expr) => Expression::Literal(LiteralExpression {
                arg: self.transform_literal(expr.arg),
                annotation: expr
                    .annotation
                    .map(|annotation| self.transform_annotation(annotation)),
                attributes: self.transform_attributes(expr.attributes),
            }),
            Expression::Variable(expr) => {
                Expression::Variable(self.transform_variable_expression(expr))
            }
            Expression::Function(expr) => Expression::Function(FunctionExpression {
                annotation: self.transform_function_annotation(expr.annotation),
                attributes: self.transform_attributes(expr.attributes),
            }),
            Expression::Unsupported(expr) => Expression::Unsupported(UnsupportedExpression {
                annotation: expr.annotation,
                attributes: self.transform_attributes(expr.attributes),
            }),
        }
    }

    fn transform_variable_expression(
        &mut self,
        expression: VariableExpression,
    ) -> VariableExpression {
        VariableExpression {
            arg: self.transform_variable(expression.arg),
            annotation: expression
                .annotation
                .map(|annotation| self.transform_annotation(annotation)),
            attributes: self.transform_attributes(expression.attributes),
        }
    }

    fn transform_annotation(&mut self, annotation: Annotation) -> Annotation {
        match annotation {
            Annotation::Function(function) => {
                Annotation::Function(self.transform_function_annotation(function))
            }
            Annotation::Unsupported(unsupported) => Annotation::Unsupported(unsupported),
        }
    }

    fn transform_function_annotation(
        &mut self,
        annotation: FunctionAnnotation,
    ) -> FunctionAnnotation {
        FunctionAnnotation {
            name: annotation.name,
            options: self.transform_options(annotation.options),
        }
    }

    fn transform_markup(&mut self, markup: Markup) -> Markup {
        Markup {
            kind: markup.kind,
            name: markup.name,
            options: self.transform_options(markup.options),
            attributes: self.transform_attributes(markup.attributes),
        }
    }

    fn transform_options(&mut self, options: Vec<NamedOption>) -> Vec<NamedOption> {
        options
            .into_iter()
            .filter_map(|option| self.transform_option(option))
            .collect()
    }

    fn transform_option(&mut self, option: NamedOption) -> Option<NamedOption> {
        Some(NamedOption {
            name: option.name,
            value: self.transform_operand(option.value),
        })
    }

    fn transform_attributes(&mut self, attributes: Vec<Attribute>) -> Vec<Attribute> {
        attributes
            .into_iter()
            .filter_map(|attribute| self.transform_attribute(attribute))
            .collect()
    }

    fn transform_attribute(&mut self, attribute: Attribute) -> Option<Attribute> {
        Some(Attribute {
            name: attribute.name,
            value: attribute.value.map(|value| self.transform_operand(value)),
        })
    }

    fn transform_operand(&mut self, operand: Operand) -> Operand {
        match operand {
            Operand::Literal(literal) => Operand::Literal(self.transform_literal(literal)),
            Operand::Variable(variable) => Operand::Variable(self.transform_variable(variable)),
        }
    }

    fn transform_literal(&mut self, literal: Literal) -> Literal {
        literal
    }

    fn transform_variable(&mut self, variable: VariableRef) -> VariableRef {
        variable
    }
}
