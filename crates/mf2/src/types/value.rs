use core::fmt;
use std::collections::{BTreeMap, HashMap};

/// A runtime value passed into a message or produced by a registry function.
///
/// Inputs, option values and formatter results all share this type, so a
/// formatter can hand its output to another expression unchanged.
///
/// # Example
///
/// ```
/// use mf2::Value;
///
/// assert_eq!(Value::from(42).as_number(), Some(42));
/// assert_eq!(Value::from(0.5).as_float(), Some(0.5));
/// assert_eq!(Value::from("Alice").as_string(), Some("Alice"));
/// assert_eq!(Value::from(2.0).to_string(), "2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer number.
    Number(i64),

    /// A floating-point number, displayed without a trailing `.0`.
    Float(f64),

    /// A string value. Literals in a message always resolve to strings.
    String(String),
}

/// Input variables keyed by name, as supplied to a format call.
pub type Inputs = HashMap<String, Value>;

/// Resolved option values keyed by option name.
///
/// Ordered so that formatters observe options deterministically.
pub type Options = BTreeMap<String, Value>;

impl Value {
    /// The integer, when this is a `Number`.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Float(_) | Value::String(_) => None,
        }
    }

    /// The numeric value as `f64`; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Number(n) => Some(*n as f64),
            Value::String(_) => None,
        }
    }

    /// The text, when this is a `String`.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Number(_) | Value::Float(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) => fmt::Display::fmt(number, f),
            Value::Float(float) => fmt::Display::fmt(float, f),
            Value::String(text) => f.write_str(text),
        }
    }
}

macro_rules! from_lossless_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Value {
                fn from(n: $int) -> Self {
                    Value::Number(i64::from(n))
                }
            }
        )*
    };
}

from_lossless_integer!(i8, i16, i32, u8, u16, u32);

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

// Values past i64::MAX wrap.
impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}
