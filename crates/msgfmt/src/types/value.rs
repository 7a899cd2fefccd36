use std::fmt;
use std::sync::Arc;

use super::ValueType;

/// A value supplied by the host that is not one of the built-in shapes.
///
/// Custom values declare their own [`ValueType`] so that the formatter
/// registry can route them through a type hierarchy registered at setup
/// time. Their `Display` output is what the root formatter prints.
pub trait CustomValue: fmt::Debug + fmt::Display + Send + Sync {
    /// The type used for formatter resolution.
    fn value_type(&self) -> ValueType;
}

/// A runtime value that can be passed as a message parameter.
///
/// An absent parameter is represented as `None` at the lookup site, never
/// as a variant of this enum.
///
/// # Example
///
/// ```
/// use msgfmt::Value;
///
/// let count: Value = 42.into();
/// let name: Value = "Alice".into();
/// let flags: Value = vec![Value::from(true), Value::from(false)].into();
///
/// assert_eq!(count.as_integer(), Some(42));
/// assert_eq!(name.as_str(), Some("Alice"));
/// assert_eq!(flags.as_list().map(<[Value]>::len), Some(2));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// A boolean.
    Bool(bool),

    /// A single character.
    Char(char),

    /// A signed integer; reports the primitive type `i64`.
    Integer(i64),

    /// A floating-point number; reports the primitive type `f64`.
    Float(f64),

    /// A string value.
    String(String),

    /// An ordered list of values.
    List(Vec<Value>),

    /// A host-defined value.
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// The runtime type used to resolve formatters for this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::BOOL,
            Value::Char(_) => ValueType::CHAR,
            Value::Integer(_) => ValueType::I64,
            Value::Float(_) => ValueType::F64,
            Value::String(_) => ValueType::STRING,
            Value::List(_) => ValueType::LIST,
            Value::Custom(custom) => custom.value_type(),
        }
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the value is textual (a string or a character).
    pub fn is_text(&self) -> bool {
        matches!(self, Value::String(_) | Value::Char(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Arc<dyn CustomValue>> for Value {
    fn from(custom: Arc<dyn CustomValue>) -> Self {
        Value::Custom(custom)
    }
}
