//! Value conversion keyed by (physical, logical) type.
//!
//! Each legal column type pair maps to one [`ConvertFn`]. The buffer resolves
//! the function once per column at schema setup and then calls it for every
//! non-null value written to that column.

use rowsink_types::{
    ColumnSpec, DecimalError, DecimalValue, LogicalType, PhysicalType, Value,
};
use thiserror::Error;

/// A value in the canonical, width-checked form of its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalValue {
    Null,
    /// Unscaled fixed-point integer, already range-checked for the column.
    Int(i128),
    Boolean(bool),
    Text(String),
    Binary(Vec<u8>),
}

/// Why a value could not be converted into its column's representation.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("cannot convert {found} value to {expected}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} out of range for {physical}")]
    OutOfRange {
        value: String,
        physical: PhysicalType,
    },

    #[error("{0}")]
    Decimal(#[from] DecimalError),

    #[error("value has {len} {unit}, exceeding the declared maximum of {max}")]
    TooLong {
        unit: &'static str,
        len: u64,
        max: u64,
    },

    #[error("'{0}' is not a boolean")]
    InvalidBoolean(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Converts one non-null value for the given column.
pub type ConvertFn = fn(&ColumnSpec, &Value) -> Result<CanonicalValue, ConversionError>;

/// The conversion function for a column type pair.
///
/// Returns `None` for pairs outside the compatibility table; descriptor
/// validation never lets those through.
pub fn converter_for(physical: PhysicalType, logical: LogicalType) -> Option<ConvertFn> {
    use LogicalType as L;
    use PhysicalType as P;

    let f: ConvertFn = match (physical, logical) {
        (P::Sb1 | P::Sb2 | P::Sb4 | P::Sb8 | P::Sb16, L::Fixed) => convert_fixed,
        (P::Sb1, L::Boolean) => convert_boolean,
        (P::Lob, L::Text | L::Char) => convert_text,
        (P::Lob, L::Binary) => convert_binary,
        _ => return None,
    };
    Some(f)
}

fn wrong_shape(expected: &'static str, value: &Value) -> ConversionError {
    ConversionError::WrongShape {
        expected,
        found: value.type_name(),
    }
}

fn convert_fixed(spec: &ColumnSpec, value: &Value) -> Result<CanonicalValue, ConversionError> {
    let decimal = match value {
        Value::Int(v) => DecimalValue::new(*v, 0)?,
        Value::Decimal(d) => *d,
        Value::Float(f) => DecimalValue::from_f64(*f)?,
        Value::Text(t) => t.parse::<DecimalValue>()?,
        _ => return Err(wrong_shape("a fixed-point number", value)),
    };
    let raw = decimal.align(spec.precision, spec.scale)?.raw_value();

    let (lo, hi) = spec
        .physical
        .int_range()
        .ok_or_else(|| wrong_shape("a fixed-point number", value))?;
    if raw < lo || raw > hi {
        return Err(ConversionError::OutOfRange {
            value: decimal.to_string(),
            physical: spec.physical,
        });
    }
    Ok(CanonicalValue::Int(raw))
}

fn convert_boolean(_spec: &ColumnSpec, value: &Value) -> Result<CanonicalValue, ConversionError> {
    let b = match value {
        Value::Boolean(b) => *b,
        Value::Int(0) => false,
        Value::Int(1) => true,
        Value::Int(other) => return Err(ConversionError::InvalidBoolean(other.to_string())),
        Value::Text(t) => match t.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => true,
            "false" | "f" | "no" | "0" => false,
            _ => return Err(ConversionError::InvalidBoolean(t.clone())),
        },
        _ => return Err(wrong_shape("a boolean", value)),
    };
    Ok(CanonicalValue::Boolean(b))
}

fn convert_text(spec: &ColumnSpec, value: &Value) -> Result<CanonicalValue, ConversionError> {
    let text = match value {
        Value::Text(t) => t.clone(),
        Value::Int(v) => v.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        _ => return Err(wrong_shape("text", value)),
    };
    check_length("bytes", text.len() as u64, spec.byte_length)?;
    check_length("characters", text.chars().count() as u64, spec.char_length)?;
    Ok(CanonicalValue::Text(text))
}

fn convert_binary(spec: &ColumnSpec, value: &Value) -> Result<CanonicalValue, ConversionError> {
    let bytes = match value {
        Value::Binary(b) => b.clone(),
        Value::Text(t) => hex::decode(t)?,
        _ => return Err(wrong_shape("binary", value)),
    };
    check_length("bytes", bytes.len() as u64, spec.byte_length)?;
    Ok(CanonicalValue::Binary(bytes))
}

#[inline]
fn check_length(unit: &'static str, len: u64, max: Option<u64>) -> Result<(), ConversionError> {
    match max {
        Some(max) if len > max => Err(ConversionError::TooLong { unit, len, max }),
        _ => Ok(()),
    }
}
