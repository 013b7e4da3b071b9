//! Loosely-typed input values.
//!
//! Applications hand rows over as maps of column name to [`Value`]. The buffer
//! only learns what the value must become once it resolves the column, so
//! conversion is deferred to the converter keyed by the column's types.

use std::fmt;

use crate::decimal::DecimalValue;

/// A value that has not yet been coerced into a column's canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i128),
    Float(f64),
    Decimal(DecimalValue),
    Text(String),
    Binary(Vec<u8>),
    Boolean(bool),
}

macro_rules! impl_from_for_value {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value!(Int, i8, i16, i32, i64, i128, u8, u16, u32, u64);
impl_from_for_value!(Float, f32, f64);
impl_from_for_value!(Decimal, DecimalValue);
impl_from_for_value!(Text, String);
impl_from_for_value!(Binary, Vec<u8>);
impl_from_for_value!(Boolean, bool);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Binary(_) => "binary",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v:?}"),
            Value::Binary(v) => write!(f, "<{} bytes>", v.len()),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_right_variant() {
        assert_eq!(Value::from(3i8), Value::Int(3));
        assert_eq!(Value::from(u64::MAX), Value::Int(u64::MAX as i128));
        assert_eq!(Value::from("bob"), Value::Text("bob".into()));
        assert_eq!(Value::from(&b"\x01\x02"[..]), Value::Binary(vec![1, 2]));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Boolean(true));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Value::from(vec![0u8; 4]).to_string(), "<4 bytes>");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::from("a").to_string(), "\"a\"");
    }
}
