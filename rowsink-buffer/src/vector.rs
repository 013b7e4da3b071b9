//! Arrow builders backing the pending column vectors.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryBuilder, BooleanBuilder, Decimal128Builder, Int8Builder, Int16Builder,
    Int32Builder, Int64Builder, StringBuilder,
};
use arrow::datatypes::DataType;
use rowsink_result::{Error, Result};
use rowsink_types::ColumnSpec;

use crate::convert::CanonicalValue;

/// Bytes charged for the offset entry of a variable-length cell.
pub const LOB_OFFSET_BYTES: u64 = 4;

/// Average payload reserved per variable-length row.
const LOB_BYTES_PER_ROW_HINT: usize = 16;

/// Append-only column vector over an Arrow builder.
pub(crate) enum ColumnVector {
    Int8(Int8Builder),
    Int16(Int16Builder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Decimal(Decimal128Builder),
    Boolean(BooleanBuilder),
    Utf8(StringBuilder),
    Binary(BinaryBuilder),
}

impl ColumnVector {
    pub(crate) fn new(spec: &ColumnSpec, capacity: usize) -> Result<Self> {
        let vector = match spec.arrow_data_type() {
            DataType::Int8 => ColumnVector::Int8(Int8Builder::with_capacity(capacity)),
            DataType::Int16 => ColumnVector::Int16(Int16Builder::with_capacity(capacity)),
            DataType::Int32 => ColumnVector::Int32(Int32Builder::with_capacity(capacity)),
            DataType::Int64 => ColumnVector::Int64(Int64Builder::with_capacity(capacity)),
            DataType::Decimal128(precision, scale) => ColumnVector::Decimal(
                Decimal128Builder::with_capacity(capacity)
                    .with_precision_and_scale(precision, scale)?,
            ),
            DataType::Boolean => ColumnVector::Boolean(BooleanBuilder::with_capacity(capacity)),
            DataType::Utf8 => ColumnVector::Utf8(StringBuilder::with_capacity(
                capacity,
                capacity * LOB_BYTES_PER_ROW_HINT,
            )),
            DataType::Binary => ColumnVector::Binary(BinaryBuilder::with_capacity(
                capacity,
                capacity * LOB_BYTES_PER_ROW_HINT,
            )),
            other => {
                return Err(Error::Internal(format!(
                    "no column vector for data type {other:?}"
                )));
            }
        };
        Ok(vector)
    }

    /// Check that `value` has the shape and range this vector stores, so a
    /// later [`append`](Self::append) of it cannot go wrong.
    pub(crate) fn check(&self, value: &CanonicalValue) -> Result<()> {
        let fits = match (self, value) {
            (_, CanonicalValue::Null) => true,
            (ColumnVector::Int8(_), CanonicalValue::Int(v)) => i8::try_from(*v).is_ok(),
            (ColumnVector::Int16(_), CanonicalValue::Int(v)) => i16::try_from(*v).is_ok(),
            (ColumnVector::Int32(_), CanonicalValue::Int(v)) => i32::try_from(*v).is_ok(),
            (ColumnVector::Int64(_), CanonicalValue::Int(v)) => i64::try_from(*v).is_ok(),
            (ColumnVector::Decimal(_), CanonicalValue::Int(_))
            | (ColumnVector::Boolean(_), CanonicalValue::Boolean(_))
            | (ColumnVector::Utf8(_), CanonicalValue::Text(_))
            | (ColumnVector::Binary(_), CanonicalValue::Binary(_)) => true,
            _ => false,
        };
        if fits {
            Ok(())
        } else {
            Err(Error::Internal(format!(
                "converter produced {value:?} for the wrong vector"
            )))
        }
    }

    /// Append a value that passed [`check`](Self::check).
    ///
    /// A value that would not have passed is stored as null so every vector
    /// keeps the same length.
    pub(crate) fn append(&mut self, value: &CanonicalValue) {
        debug_assert!(self.check(value).is_ok(), "unchecked append of {value:?}");

        macro_rules! append_int {
            ($builder:expr, $ty:ty) => {
                match value {
                    CanonicalValue::Int(v) => match <$ty>::try_from(*v) {
                        Ok(narrowed) => $builder.append_value(narrowed),
                        Err(_) => $builder.append_null(),
                    },
                    _ => $builder.append_null(),
                }
            };
        }

        match self {
            ColumnVector::Int8(b) => append_int!(b, i8),
            ColumnVector::Int16(b) => append_int!(b, i16),
            ColumnVector::Int32(b) => append_int!(b, i32),
            ColumnVector::Int64(b) => append_int!(b, i64),
            ColumnVector::Decimal(b) => append_int!(b, i128),
            ColumnVector::Boolean(b) => match value {
                CanonicalValue::Boolean(v) => b.append_value(*v),
                _ => b.append_null(),
            },
            ColumnVector::Utf8(b) => match value {
                CanonicalValue::Text(v) => b.append_value(v),
                _ => b.append_null(),
            },
            ColumnVector::Binary(b) => match value {
                CanonicalValue::Binary(v) => b.append_value(v),
                _ => b.append_null(),
            },
        }
    }

    /// Payload bytes held by a variable-length vector; zero for fixed ones.
    pub(crate) fn payload_bytes(&self) -> u64 {
        match self {
            ColumnVector::Utf8(b) => b.values_slice().len() as u64,
            ColumnVector::Binary(b) => b.values_slice().len() as u64,
            _ => 0,
        }
    }

    /// Copy everything appended so far into an immutable array. The builder
    /// keeps its contents.
    pub(crate) fn to_array(&self) -> ArrayRef {
        match self {
            ColumnVector::Int8(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Int16(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Int32(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Int64(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Decimal(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Boolean(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Utf8(b) => Arc::new(b.finish_cloned()),
            ColumnVector::Binary(b) => Arc::new(b.finish_cloned()),
        }
    }
}

/// Bytes a value adds to a variable-length vector's payload.
pub(crate) fn payload_len(value: &CanonicalValue) -> u64 {
    match value {
        CanonicalValue::Text(t) => t.len() as u64,
        CanonicalValue::Binary(b) => b.len() as u64,
        _ => 0,
    }
}

/// Estimated in-memory footprint of one cell.
pub(crate) fn cell_size(spec: &ColumnSpec, value: &CanonicalValue) -> u64 {
    if let Some(width) = spec.physical.byte_width() {
        return width as u64;
    }
    match value {
        CanonicalValue::Text(t) => t.len() as u64 + LOB_OFFSET_BYTES,
        CanonicalValue::Binary(b) => b.len() as u64 + LOB_OFFSET_BYTES,
        _ => LOB_OFFSET_BYTES,
    }
}
