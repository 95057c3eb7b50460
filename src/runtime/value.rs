//! Column values exchanged with a mapping runtime

use thiserror::Error;

/// Errors converting between records, models and stored values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// A stored value has a different kind than the column's Rust type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the column expects
        expected: &'static str,
        /// Kind that was stored
        found: &'static str,
    },

    /// A stored integer does not fit the column's Rust type
    #[error("value {value} out of range for {target}")]
    OutOfRange {
        /// Rendered value
        value: String,
        /// Target Rust type
        target: &'static str,
    },

    /// The model has no column with this name
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// A single column value
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    /// SQL NULL, the value of an unset optional field
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer, also used for enum numbers
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Value {
    /// Short name of the value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Whether this is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a stored [`Value`] back into a column's Rust type
pub trait FromValue: Sized {
    /// Convert, failing on a kind mismatch or overflow
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

fn mismatch<T>(expected: &'static str, found: &Value) -> Result<T, ConvertError> {
    Err(ConvertError::TypeMismatch {
        expected,
        found: found.kind(),
    })
}

fn out_of_range(value: impl ToString, target: &'static str) -> ConvertError {
    ConvertError::OutOfRange {
        value: value.to_string(),
        target,
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => mismatch("bool", &other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Int(v) => Ok(v),
            Value::UInt(v) => i64::try_from(v).map_err(|_| out_of_range(v, "i64")),
            other => mismatch("int", &other),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let v = i64::from_value(value)?;
        i32::try_from(v).map_err(|_| out_of_range(v, "i32"))
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::UInt(v) => Ok(v),
            Value::Int(v) => u64::try_from(v).map_err(|_| out_of_range(v, "u64")),
            other => mismatch("uint", &other),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let v = u64::from_value(value)?;
        u32::try_from(v).map_err(|_| out_of_range(v, "u32"))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(v) => Ok(v),
            other => mismatch("float", &other),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Text(v) => Ok(v),
            other => mismatch("text", &other),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => mismatch("bytes", &other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
