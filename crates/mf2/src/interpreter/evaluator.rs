//! Message formatting: lazy resolution of expressions into text.

use icu_locale_core::Locale;

use crate::interpreter::context::{Binding, FormatContext};
use crate::interpreter::error::{FormatError, FunctionError, compute_suggestions};
use crate::interpreter::registry::Registry;
use crate::interpreter::resolved::ResolvedValue;
use crate::interpreter::select::select_variant;
use crate::parser::ast::{
    Annotation, Expression, Markup, MarkupKind, Message, NamedOption, Operand, Pattern,
    PatternPart,
};
use crate::types::{Inputs, Options, Value};

/// Format a parsed message.
///
/// Declarations are resolved on first use, so an unused declaration never
/// fails. The message is not modified and can be formatted again.
///
/// # Errors
///
/// Returns a [`FormatError`] for the first expression or selector that fails.
/// No partial output is produced.
///
/// # Example
///
/// ```
/// use mf2::{Registry, format_message, inputs, locale, parse};
///
/// let message = parse(".local $n = {2} {{n = {$n}}}").unwrap();
/// let text = format_message(&message, &locale!("en"), &inputs! {}, &Registry::new()).unwrap();
/// assert_eq!(text, "n = 2");
/// ```
pub fn format_message(
    message: &Message,
    locale: &Locale,
    inputs: &Inputs,
    registry: &Registry,
) -> Result<String, FormatError> {
    let mut ctx = FormatContext::new(locale, inputs, registry);
    format_in_context(message, &mut ctx)
}

pub(crate) fn format_in_context<'a>(
    message: &'a Message,
    ctx: &mut FormatContext<'a>,
) -> Result<String, FormatError> {
    for declaration in message.declarations() {
        ctx.declare(declaration)?;
    }
    let pattern = match message {
        Message::Pattern(message) => &message.pattern,
        Message::Select(message) => select_variant(message, ctx)?,
    };
    format_pattern(pattern, ctx)
}

fn format_pattern(pattern: &Pattern, ctx: &mut FormatContext<'_>) -> Result<String, FormatError> {
    let mut output = String::new();
    for part in pattern.iter() {
        match part {
            PatternPart::Text(text) => output.push_str(text),
            PatternPart::Expression(expression) => {
                let resolved = resolve_expression(expression, ctx)?;
                output.push_str(&format_resolved(resolved, ctx)?.to_string());
            }
            PatternPart::Markup(markup) => output.push_str(&format_markup(markup, ctx)?),
        }
    }
    Ok(output)
}

/// Resolve an expression without formatting it.
pub(crate) fn resolve_expression(
    expression: &Expression,
    ctx: &mut FormatContext<'_>,
) -> Result<ResolvedValue, FormatError> {
    match expression {
        Expression::Literal(expr) => {
            let value = ResolvedValue::Immediate(Value::String(expr.arg.value.clone()));
            annotate(value, expr.annotation.as_ref(), ctx)
        }
        Expression::Variable(expr) => {
            let value = resolve_variable(&expr.arg.name, ctx)?;
            annotate(value, expr.annotation.as_ref(), ctx)
        }
        Expression::Function(expr) => Ok(ResolvedValue::Deferred {
            function: expr.annotation.name.clone(),
            operand: None,
            options: resolve_options(&expr.annotation.options, ctx)?,
        }),
        Expression::Unsupported(expr) => Err(FormatError::UnsupportedExpression {
            annotation: expr.annotation.source.clone(),
        }),
    }
}

fn annotate(
    value: ResolvedValue,
    annotation: Option<&Annotation>,
    ctx: &mut FormatContext<'_>,
) -> Result<ResolvedValue, FormatError> {
    match annotation {
        None => Ok(value),
        Some(Annotation::Function(function)) => {
            let options = resolve_options(&function.options, ctx)?;
            value.annotate(&function.name, options)
        }
        Some(Annotation::Unsupported(annotation)) => Err(FormatError::UnsupportedExpression {
            annotation: annotation.source.clone(),
        }),
    }
}

/// Resolve `$name` through the declarations, falling back to the inputs.
fn resolve_variable(name: &str, ctx: &mut FormatContext<'_>) -> Result<ResolvedValue, FormatError> {
    let Some(binding) = ctx.binding(name) else {
        return resolve_input(name, ctx);
    };
    ctx.push_resolution(name)?;
    tracing::trace!(name, "resolving declaration");
    let resolved = match binding {
        Binding::Input(expr) => resolve_input(name, ctx)
            .and_then(|value| annotate(value, expr.annotation.as_ref(), ctx)),
        Binding::Local(expression) => resolve_expression(expression, ctx),
    };
    ctx.pop_resolution();
    resolved
}

fn resolve_input(name: &str, ctx: &FormatContext<'_>) -> Result<ResolvedValue, FormatError> {
    ctx.input(name)
        .map(|value| ResolvedValue::Immediate(value.clone()))
        .ok_or_else(|| FormatError::UnresolvedVariable {
            name: name.to_string(),
        })
}

fn resolve_options(
    options: &[NamedOption],
    ctx: &mut FormatContext<'_>,
) -> Result<Options, FormatError> {
    options
        .iter()
        .map(|option| Ok((option.name.clone(), resolve_operand(&option.value, ctx)?)))
        .collect()
}

/// Option and markup values: literals as strings, variables formatted.
fn resolve_operand(operand: &Operand, ctx: &mut FormatContext<'_>) -> Result<Value, FormatError> {
    match operand {
        Operand::Literal(literal) => Ok(Value::String(literal.value.clone())),
        Operand::Variable(variable) => {
            let resolved = resolve_variable(&variable.name, ctx)?;
            format_resolved(resolved, ctx)
        }
    }
}

fn format_resolved(
    resolved: ResolvedValue,
    ctx: &FormatContext<'_>,
) -> Result<Value, FormatError> {
    match resolved {
        ResolvedValue::Immediate(value) => Ok(value),
        ResolvedValue::Deferred {
            function,
            operand,
            options,
        } => {
            let formatter = ctx
                .registry()
                .formatter(&function)
                .ok_or_else(|| unknown_function(&function, ctx.registry()))?;
            tracing::trace!(function = %function, "formatting deferred value");
            formatter
                .format(operand.as_ref(), ctx.locale(), &options)
                .map_err(|error| match error {
                    FunctionError::OperandMismatch(message) => {
                        FormatError::OperandMismatch { function, message }
                    }
                    source => FormatError::InvalidExpression { function, source },
                })
        }
    }
}

/// Markup becomes an HTML-like tag; attributes are dropped.
fn format_markup(markup: &Markup, ctx: &mut FormatContext<'_>) -> Result<String, FormatError> {
    let mut tag = String::from("<");
    if markup.kind == MarkupKind::Close {
        tag.push('/');
    }
    tag.push_str(&markup.name);
    for option in &markup.options {
        let value = resolve_operand(&option.value, ctx)?;
        tag.push_str(&format!(" {}={value}", option.name));
    }
    if markup.kind == MarkupKind::Standalone {
        tag.push('/');
    }
    tag.push('>');
    Ok(tag)
}

pub(crate) fn unknown_function(name: &str, registry: &Registry) -> FormatError {
    FormatError::UnknownFunction {
        name: name.to_string(),
        suggestions: compute_suggestions(name, registry.function_names()),
    }
}
