//! Registry of named formatting and selection functions.
//!
//! Annotations such as `:number` are looked up here by name at format time.
//! A registry is built once and then only read; adding functions produces a
//! new registry, so one registry can back many messages and threads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use icu_locale_core::Locale;

use crate::interpreter::builtins;
use crate::interpreter::error::FunctionError;
use crate::types::{Options, Value};

/// Turns an annotated operand into a value for output.
///
/// `operand` is `None` for function-only expressions such as `{:now}`.
/// Plain functions and closures with the same signature are formatters.
pub trait Formatter: Send + Sync {
    fn format(
        &self,
        operand: Option<&Value>,
        locale: &Locale,
        options: &Options,
    ) -> Result<Value, FunctionError>;
}

impl<F> Formatter for F
where
    F: Fn(Option<&Value>, &Locale, &Options) -> Result<Value, FunctionError> + Send + Sync,
{
    fn format(
        &self,
        operand: Option<&Value>,
        locale: &Locale,
        options: &Options,
    ) -> Result<Value, FunctionError> {
        self(operand, locale, options)
    }
}

/// Matches an annotated operand against the literal keys of a `.match`.
///
/// Returns the keys that match, most preferred first. The list may contain
/// strings that are not among `keys`; those never match a variant.
pub trait Selector: Send + Sync {
    fn select(
        &self,
        operand: Option<&Value>,
        locale: &Locale,
        options: &Options,
        keys: &[String],
    ) -> Result<Vec<String>, FunctionError>;
}

impl<F> Selector for F
where
    F: Fn(Option<&Value>, &Locale, &Options, &[String]) -> Result<Vec<String>, FunctionError>
        + Send
        + Sync,
{
    fn select(
        &self,
        operand: Option<&Value>,
        locale: &Locale,
        options: &Options,
        keys: &[String],
    ) -> Result<Vec<String>, FunctionError> {
        self(operand, locale, options, keys)
    }
}

/// Named formatters and selectors.
///
/// # Example
///
/// ```
/// use mf2::{FunctionError, Locale, Options, Registry, Value};
///
/// fn shout(
///     operand: Option<&Value>,
///     _: &Locale,
///     _: &Options,
/// ) -> Result<Value, FunctionError> {
///     let text = operand.map(ToString::to_string).unwrap_or_default();
///     Ok(Value::String(text.to_uppercase()))
/// }
///
/// let registry = Registry::with_defaults().with_formatter("shout", shout);
/// assert!(registry.formatter("shout").is_some());
/// assert!(registry.formatter("number").is_some());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    formatters: BTreeMap<String, Arc<dyn Formatter>>,
    selectors: BTreeMap<String, Arc<dyn Selector>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the default functions: `:string`, `:number`,
    /// `:integer`, `:date`, `:time` and `:datetime`.
    pub fn with_defaults() -> Self {
        builtins::register(Self::new())
    }

    /// Return this registry with `formatter` registered under `name`.
    pub fn with_formatter(
        mut self,
        name: impl Into<String>,
        formatter: impl Formatter + 'static,
    ) -> Self {
        self.formatters.insert(name.into(), Arc::new(formatter));
        self
    }

    /// Return this registry with `selector` registered under `name`.
    pub fn with_selector(
        mut self,
        name: impl Into<String>,
        selector: impl Selector + 'static,
    ) -> Self {
        self.selectors.insert(name.into(), Arc::new(selector));
        self
    }

    /// Combine two registries; functions in `overlay` shadow ours by name.
    pub fn extend(&self, overlay: &Registry) -> Registry {
        let mut combined = self.clone();
        combined.formatters.extend(
            overlay
                .formatters
                .iter()
                .map(|(name, formatter)| (name.clone(), Arc::clone(formatter))),
        );
        combined.selectors.extend(
            overlay
                .selectors
                .iter()
                .map(|(name, selector)| (name.clone(), Arc::clone(selector))),
        );
        combined
    }

    /// Get the formatter registered under `name`.
    pub fn formatter(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|formatter| &**formatter)
    }

    /// Get the selector registered under `name`.
    pub fn selector(&self, name: &str) -> Option<&dyn Selector> {
        self.selectors.get(name).map(|selector| &**selector)
    }

    /// All registered function names, sorted and without repeats.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.formatters
            .keys()
            .chain(self.selectors.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("selectors", &self.selectors.keys().collect::<Vec<_>>())
            .finish()
    }
}
