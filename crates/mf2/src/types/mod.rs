mod value;

pub use value::{Inputs, Options, Value};
