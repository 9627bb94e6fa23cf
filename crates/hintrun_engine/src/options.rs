//! Option and global values passed to the lint engine.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Lint options keyed by option name, in declaration order.
pub type Options = IndexMap<String, OptionValue>;

/// Predefined globals keyed by identifier; the flag tells whether the global
/// is assignable.
pub type Globals = IndexMap<String, bool>;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean switch.
    Bool(bool),
    /// Numeric setting such as `maxerr` or `indent`.
    Number(serde_json::Number),
    /// String setting such as `quotmark`.
    String(String),
    /// Structured value passed through untouched.
    Other(Value),
}

impl OptionValue {
    /// Converts a parsed JSON value into an option value.
    ///
    /// The strings `"true"` and `"false"` become booleans.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => match s.as_str() {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => Self::String(s),
            },
            other => Self::Other(other),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Interprets a per-global flag from an object-form `globals` declaration.
///
/// Only `true` and `"true"` mark a global as assignable.
pub fn global_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}
