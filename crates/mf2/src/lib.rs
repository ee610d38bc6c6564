mod error;
pub mod interpreter;
pub mod parser;
pub mod types;

pub use error::Error;
pub use icu_locale_core::{Locale, locale};
pub use interpreter::{
    DEFAULT_MAX_DEPTH, FormatError, Formatter, FunctionError, MessageFormat, PluralKind, Registry,
    ResolvedValue, Selector, compute_suggestions, format_message, plural_category,
};
pub use parser::{
    DataModelError, DeclarationConflict, Message, MessageError, ParseError, parse, parse_message,
    validate,
};
pub use types::{Inputs, Options, Value};

/// Creates an [`Inputs`] map from key-value pairs.
///
/// Each value goes through `Into<Value>`, so you can pass
/// integers, floats or strings directly.
///
/// # Example
///
/// ```
/// use mf2::{inputs, Value};
///
/// let i = inputs! { "count" => 3, "name" => "Alice" };
/// assert_eq!(i.len(), 2);
/// assert_eq!(i["count"].as_number(), Some(3));
/// assert_eq!(i["name"].as_string(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! inputs {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
