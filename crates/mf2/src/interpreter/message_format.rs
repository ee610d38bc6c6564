//! Configured formatter for message source text.

use std::cell::RefCell;
use std::collections::HashMap;

use bon::Builder;
use icu_locale_core::{Locale, locale};

use crate::error::Error;
use crate::interpreter::context::{DEFAULT_MAX_DEPTH, FormatContext};
use crate::interpreter::error::FormatError;
use crate::interpreter::evaluator::format_in_context;
use crate::interpreter::registry::Registry;
use crate::parser::{Message, MessageError, parse};
use crate::types::Inputs;

/// A locale and a function registry bundled for repeated formatting.
///
/// Source text passed to [`format_str`](Self::format_str) is parsed once and
/// cached, so formatting the same message again skips parsing. The cache
/// uses a `RefCell`, so a `MessageFormat` is not `Sync`; share parsed
/// [`Message`]s and the [`Registry`] across threads instead.
///
/// # Example
///
/// ```
/// use mf2::{MessageFormat, inputs, locale};
///
/// let mf = MessageFormat::builder().locale(locale!("en")).build();
/// let text = mf
///     .format_str(
///         ".match {$count :integer} one {{one file}} * {{{$count} files}}",
///         &inputs! { "count" => 3 },
///     )
///     .unwrap();
/// assert_eq!(text, "3 files");
/// ```
#[derive(Builder)]
pub struct MessageFormat {
    /// Locale passed to every registry function.
    #[builder(default = locale!("en"))]
    locale: Locale,

    /// Functions available to annotations.
    #[builder(default = Registry::with_defaults())]
    registry: Registry,

    /// Limit on nested declaration resolution.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Parsed messages keyed by their source text.
    #[builder(skip)]
    cache: RefCell<HashMap<String, Message>>,
}

impl Default for MessageFormat {
    fn default() -> Self {
        MessageFormat::builder().build()
    }
}

impl MessageFormat {
    /// Create a formatter for English with the default functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter for `locale` with the default functions.
    pub fn with_locale(locale: Locale) -> Self {
        MessageFormat::builder().locale(locale).build()
    }

    /// Get the current locale.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Change the locale used by later format calls.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Get the function registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Replace the function registry.
    pub fn set_registry(&mut self, registry: Registry) {
        self.registry = registry;
    }

    /// Get the nested resolution limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Format an already parsed message.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] when resolution or selection fails.
    pub fn format(&self, message: &Message, inputs: &Inputs) -> Result<String, FormatError> {
        let mut ctx = FormatContext::new(&self.locale, inputs, &self.registry)
            .with_max_depth(self.max_depth);
        format_in_context(message, &mut ctx)
    }

    /// Parse (or reuse) and format message source text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Message`] when the text does not parse or validate,
    /// and [`Error::Format`] when formatting fails.
    pub fn format_str(&self, source: &str, inputs: &Inputs) -> Result<String, Error> {
        let message = self.cached_message(source)?;
        Ok(self.format(&message, inputs)?)
    }

    /// Clear the parse cache.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Return the number of cached messages.
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Look up or parse and cache message source text.
    fn cached_message(&self, source: &str) -> Result<Message, MessageError> {
        if let Some(message) = self.cache.borrow().get(source) {
            return Ok(message.clone());
        }
        let message = parse(source)?;
        self.cache
            .borrow_mut()
            .insert(source.to_string(), message.clone());
        Ok(message)
    }
}
