//! Static checks run on every parsed message.
//!
//! Declaration rules run first (self-reference, repeated names, implicit
//! redeclaration, reference cycles), then matcher rules (selector
//! annotations, key counts, fallback variant), then duplicate option names
//! anywhere in the tree. The first violation is returned.

use std::collections::{BTreeMap, BTreeSet};

use super::ast::*;
use super::error::{DataModelError, DeclarationConflict};
use super::visit::Visitor;

/// Check a message against the data model rules without changing it.
///
/// # Errors
///
/// Returns the first [`DataModelError`] found.
pub fn validate(message: &Message) -> Result<(), DataModelError> {
    let declarations = message.declarations();
    check_self_reference(declarations)?;
    check_duplicate_declarations(declarations)?;
    check_implicit_redeclaration(declarations)?;
    check_cycles(declarations)?;

    if let Message::Select(select) = message {
        check_selector_annotations(select)?;
        check_variant_keys(select)?;
        check_fallback_variant(select)?;
    }

    let mut options = DuplicateOptions::default();
    options.visit_message(message);
    options.error.map_or(Ok(()), Err)
}

/// `.local $x = {$x ...}`
fn check_self_reference(declarations: &[Declaration]) -> Result<(), DataModelError> {
    for declaration in declarations {
        if let Declaration::Local(local) = declaration
            && let Expression::Variable(value) = &local.value
            && value.arg.name == local.name
        {
            return Err(DataModelError::DuplicateDeclaration {
                name: local.name.clone(),
                conflict: DeclarationConflict::SelfReference,
            });
        }
    }
    Ok(())
}

fn check_duplicate_declarations(declarations: &[Declaration]) -> Result<(), DataModelError> {
    let mut names = BTreeSet::new();
    for name in declarations.iter().filter_map(Declaration::name) {
        if !names.insert(name) {
            return Err(DataModelError::DuplicateDeclaration {
                name: name.to_string(),
                conflict: DeclarationConflict::Repeated,
            });
        }
    }
    Ok(())
}

/// A variable used in an option of a declaration may not be declared later.
fn check_implicit_redeclaration(declarations: &[Declaration]) -> Result<(), DataModelError> {
    let mut implicit = BTreeSet::new();
    for declaration in declarations {
        let (name, function) = match declaration {
            Declaration::Input(input) => (
                &input.name,
                annotation_function(input.value.annotation.as_ref()),
            ),
            Declaration::Local(local) => (&local.name, local.value.function()),
            Declaration::Unsupported(_) => continue,
        };
        if implicit.contains(name.as_str()) {
            return Err(DataModelError::DuplicateDeclaration {
                name: name.clone(),
                conflict: DeclarationConflict::ImplicitRedeclaration,
            });
        }
        if let Some(function) = function {
            implicit.extend(option_variables(&function.options));
        }
    }
    Ok(())
}

/// Reject declarations that reach themselves through other declarations.
///
/// Edges run from a declaration to every declared name it resolves: the
/// operand of a local value and the option variables of either kind.
fn check_cycles(declarations: &[Declaration]) -> Result<(), DataModelError> {
    let graph: BTreeMap<&str, Vec<&str>> = declarations
        .iter()
        .filter_map(|declaration| Some((declaration.name()?, references(declaration))))
        .collect();

    let mut colors = BTreeMap::new();
    for name in declarations.iter().filter_map(Declaration::name) {
        if let Some(chain) = find_cycle(name, &graph, &mut colors) {
            return Err(DataModelError::CyclicDeclaration { chain });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current path.
    Gray,
    /// Fully explored, no cycle below.
    Black,
}

/// Depth-first search from `root` with an explicit stack, so long chains of
/// declarations cannot exhaust the call stack.
fn find_cycle<'a>(
    root: &'a str,
    graph: &BTreeMap<&'a str, Vec<&'a str>>,
    colors: &mut BTreeMap<&'a str, Color>,
) -> Option<Vec<String>> {
    if colors.contains_key(root) {
        return None;
    }
    // Each frame is a declaration on the current path and its next edge.
    let mut path: Vec<(&'a str, usize)> = vec![(root, 0)];
    colors.insert(root, Color::Gray);

    while let Some((name, edge)) = path.last_mut() {
        let Some(&next) = graph.get(*name).and_then(|edges| edges.get(*edge)) else {
            colors.insert(*name, Color::Black);
            path.pop();
            continue;
        };
        *edge += 1;
        if !graph.contains_key(next) {
            continue;
        }
        match colors.get(next) {
            Some(Color::Gray) => {
                let start = path.iter().position(|&(entry, _)| entry == next)?;
                let mut chain: Vec<String> =
                    path[start..].iter().map(|&(entry, _)| entry.to_string()).collect();
                chain.push(next.to_string());
                return Some(chain);
            }
            Some(Color::Black) => {}
            None => {
                colors.insert(next, Color::Gray);
                path.push((next, 0));
            }
        }
    }
    None
}

fn references(declaration: &Declaration) -> Vec<&str> {
    match declaration {
        Declaration::Input(input) => annotation_function(input.value.annotation.as_ref())
            .map(|function| option_variables(&function.options).collect())
            .unwrap_or_default(),
        Declaration::Local(local) => {
            let operand = match &local.value {
                Expression::Variable(expr) => Some(expr.arg.name.as_str()),
                Expression::Literal(_) | Expression::Function(_) | Expression::Unsupported(_) => {
                    None
                }
            };
            let options = local
                .value
                .function()
                .into_iter()
                .flat_map(|function| option_variables(&function.options));
            operand.into_iter().chain(options).collect()
        }
        Declaration::Unsupported(_) => Vec::new(),
    }
}

fn annotation_function(annotation: Option<&Annotation>) -> Option<&FunctionAnnotation> {
    match annotation {
        Some(Annotation::Function(function)) => Some(function),
        Some(Annotation::Unsupported(_)) | None => None,
    }
}

fn option_variables(options: &[NamedOption]) -> impl Iterator<Item = &str> {
    options.iter().filter_map(|option| match &option.value {
        Operand::Variable(variable) => Some(variable.name.as_str()),
        Operand::Literal(_) => None,
    })
}

fn check_selector_annotations(message: &SelectMessage) -> Result<(), DataModelError> {
    let declared: BTreeMap<&str, &Declaration> = message
        .declarations
        .iter()
        .filter_map(|declaration| Some((declaration.name()?, declaration)))
        .collect();
    for selector in &message.selectors {
        if !is_annotated(selector, &declared) {
            return Err(DataModelError::MissingSelectorAnnotation {
                selector: selector.to_string(),
            });
        }
    }
    Ok(())
}

/// Whether an annotation is attached to `expression` or anywhere along the
/// chain of declarations it refers to.
///
/// Walks the chain iteratively; each declaration is visited at most once.
fn is_annotated(expression: &Expression, declared: &BTreeMap<&str, &Declaration>) -> bool {
    let mut current = expression;
    for _ in 0..=declared.len() {
        let expr = match current {
            Expression::Literal(expr) => return expr.annotation.is_some(),
            Expression::Function(_) | Expression::Unsupported(_) => return true,
            Expression::Variable(expr) => expr,
        };
        if expr.annotation.is_some() {
            return true;
        }
        match declared.get(expr.arg.name.as_str()) {
            Some(Declaration::Input(input)) => return input.value.annotation.is_some(),
            Some(Declaration::Local(local)) => current = &local.value,
            Some(Declaration::Unsupported(_)) | None => return false,
        }
    }
    false
}

fn check_variant_keys(message: &SelectMessage) -> Result<(), DataModelError> {
    let expected = message.selectors.len();
    for (index, variant) in message.variants.iter().enumerate() {
        if variant.keys.len() != expected {
            return Err(DataModelError::VariantKeyMismatch {
                expected,
                found: variant.keys.len(),
                variant: index,
            });
        }
    }
    Ok(())
}

fn check_fallback_variant(message: &SelectMessage) -> Result<(), DataModelError> {
    if message.variants.iter().any(Variant::is_fallback) {
        Ok(())
    } else {
        Err(DataModelError::MissingFallbackVariant)
    }
}

/// Finds the first annotation or markup that repeats an option name.
#[derive(Default)]
struct DuplicateOptions {
    error: Option<DataModelError>,
}

impl DuplicateOptions {
    fn check(&mut self, options: &[NamedOption]) {
        if self.error.is_some() {
            return;
        }
        let mut names = BTreeSet::new();
        if let Some(option) = options.iter().find(|option| !names.insert(option.name.as_str())) {
            self.error = Some(DataModelError::DuplicateOptionName {
                name: option.name.clone(),
            });
        }
    }
}

impl Visitor for DuplicateOptions {
    fn visit_function_annotation(&mut self, annotation: &FunctionAnnotation) {
        self.check(&annotation.options);
    }

    fn visit_markup(&mut self, markup: &Markup) {
        self.check(&markup.options);
    }
}
