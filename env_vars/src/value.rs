//! Typed values produced by configuration accessors.
//!
//! A [`Value`] is what every read of a [`crate::Config`] yields: the coerced
//! form of a raw variable, an uncoerced default, a computed property or a
//! stubbed override. Conversions to and from plain Rust types let callers
//! write `config.get_as::<i64>("timeout")` instead of matching by hand.

use serde::{Deserialize, Serialize};

use crate::{EnvError, EnvResult};

/// A configuration value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value; the default of an optional declaration.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// Homogeneous list produced by an array declaration.
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in mismatch errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The float payload, if any. Integers are not widened.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the array payload, if any.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &'static str) -> EnvError {
        EnvError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for String {
    type Error = EnvError;

    fn try_from(value: Value) -> EnvResult<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = EnvError;

    fn try_from(value: Value) -> EnvResult<Self> {
        value.as_int().ok_or_else(|| value.mismatch("int"))
    }
}

impl TryFrom<Value> for f64 {
    type Error = EnvError;

    fn try_from(value: Value) -> EnvResult<Self> {
        value.as_float().ok_or_else(|| value.mismatch("float"))
    }
}

impl TryFrom<Value> for bool {
    type Error = EnvError;

    fn try_from(value: Value) -> EnvResult<Self> {
        value.as_bool().ok_or_else(|| value.mismatch("bool"))
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = EnvError>,
{
    type Error = EnvError;

    fn try_from(value: Value) -> EnvResult<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(T::try_from).collect(),
            other => Err(other.mismatch("array")),
        }
    }
}
