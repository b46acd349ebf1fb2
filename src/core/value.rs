//! # Field Values
//!
//! [`Value`] is the dynamic form of one field, used by the descriptor-driven
//! engine. Typed packets convert their fields to and from values through
//! [`IntoValue`] and [`FromValue`]; narrowing conversions are range checked.

use crate::core::types::{BlockPosition, Vec3f};
use crate::error::{ProtocolError, Result};

/// One decoded or to-be-encoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Wide enough for every fixed-width and varint integer codec.
    Integer(i128),
    Float(f64),
    String(String),
    Vec3(Vec3f),
    Position(BlockPosition),
    List(Vec<Value>),
}

impl Value {
    /// Name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Vec3(_) => "vec3",
            Value::Position(_) => "position",
            Value::List(_) => "list",
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Conversion of a packet field into its wire value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion of a wire value back into a packet field.
pub trait FromValue: Sized {
    fn from_value(field: &str, value: Value) -> Result<Self>;
}

pub(crate) fn type_mismatch(field: &str, expected: &'static str, found: &Value) -> ProtocolError {
    ProtocolError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind_name(),
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {$(
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::Integer(i128::from(self))
            }
        }

        impl FromValue for $ty {
            fn from_value(field: &str, value: Value) -> Result<Self> {
                match value {
                    Value::Integer(v) => <$ty>::try_from(v)
                        .map_err(|_| ProtocolError::value_range(stringify!($ty), v)),
                    other => Err(type_mismatch(field, "integer", &other)),
                }
            }
        }
    )*};
}

integer_value!(u8, i8, u16, i16, u32, i32, u64, i64);

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch(field, "bool", &other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => narrow_f64(v),
            other => Err(type_mismatch(field, "float", &other)),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(type_mismatch(field, "float", &other)),
        }
    }
}

/// Narrows to `f32`, rejecting finite values that would overflow to infinity.
pub(crate) fn narrow_f64(v: f64) -> Result<f32> {
    let narrowed = v as f32;
    if v.is_finite() && narrowed.is_infinite() {
        return Err(ProtocolError::value_range("f32", v));
    }
    Ok(narrowed)
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FromValue for String {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(type_mismatch(field, "string", &other)),
        }
    }
}

impl IntoValue for Vec3f {
    fn into_value(self) -> Value {
        Value::Vec3(self)
    }
}

impl FromValue for Vec3f {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::Vec3(v) => Ok(v),
            other => Err(type_mismatch(field, "vec3", &other)),
        }
    }
}

impl IntoValue for BlockPosition {
    fn into_value(self) -> Value {
        Value::Position(self)
    }
}

impl FromValue for BlockPosition {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::Position(p) => Ok(p),
            other => Err(type_mismatch(field, "position", &other)),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(field: &str, value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| T::from_value(field, item))
                .collect(),
            other => Err(type_mismatch(field, "list", &other)),
        }
    }
}
