//! Per-call state for formatting one message.

use std::collections::HashMap;

use icu_locale_core::Locale;

use crate::interpreter::error::FormatError;
use crate::interpreter::registry::Registry;
use crate::parser::ast::{Declaration, Expression, VariableExpression};
use crate::types::{Inputs, Value};

/// Default limit on nested declaration resolution.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What a declared name stands for.
#[derive(Clone, Copy)]
pub(crate) enum Binding<'a> {
    /// `.input {$name ...}`: the input value, annotated.
    Input(&'a VariableExpression),
    /// `.local $name = {...}`
    Local(&'a Expression),
}

/// State carried through the resolution of one message.
///
/// Holds the environment declarations are resolved in, plus a stack of the
/// declarations currently being resolved for cycle detection and the depth
/// limit.
pub(crate) struct FormatContext<'a> {
    locale: &'a Locale,
    inputs: &'a Inputs,
    registry: &'a Registry,
    bindings: HashMap<&'a str, Binding<'a>>,
    resolving: Vec<String>,
    max_depth: usize,
}

impl<'a> FormatContext<'a> {
    pub(crate) fn new(locale: &'a Locale, inputs: &'a Inputs, registry: &'a Registry) -> Self {
        Self {
            locale,
            inputs,
            registry,
            bindings: HashMap::new(),
            resolving: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub(crate) fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn locale(&self) -> &'a Locale {
        self.locale
    }

    pub(crate) fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub(crate) fn input(&self, name: &str) -> Option<&'a Value> {
        self.inputs.get(name)
    }

    /// Register a declaration. Nothing is resolved until a name is used.
    pub(crate) fn declare(&mut self, declaration: &'a Declaration) -> Result<(), FormatError> {
        let (name, binding) = match declaration {
            Declaration::Input(input) => (input.name.as_str(), Binding::Input(&input.value)),
            Declaration::Local(local) => (local.name.as_str(), Binding::Local(&local.value)),
            Declaration::Unsupported(statement) => {
                return Err(FormatError::UnsupportedStatement {
                    keyword: statement.keyword.clone(),
                });
            }
        };
        tracing::trace!(name, "declared");
        self.bindings.insert(name, binding);
        Ok(())
    }

    pub(crate) fn binding(&self, name: &str) -> Option<Binding<'a>> {
        self.bindings.get(name).copied()
    }

    /// Mark `name` as being resolved.
    ///
    /// Fails when the depth limit is reached or `name` is already on the
    /// stack.
    pub(crate) fn push_resolution(&mut self, name: &str) -> Result<(), FormatError> {
        if self.resolving.len() >= self.max_depth {
            return Err(FormatError::MaxDepthExceeded);
        }
        if self.resolving.iter().any(|entry| entry == name) {
            let mut chain = self.resolving.clone();
            chain.push(name.to_string());
            return Err(FormatError::CyclicReference { chain });
        }
        self.resolving.push(name.to_string());
        Ok(())
    }

    pub(crate) fn pop_resolution(&mut self) {
        self.resolving.pop();
    }
}
