//! Column descriptors as declared by the backend, and their validated form.

use std::collections::HashMap;

use arrow::datatypes::{DataType, Field};
use rowsink_result::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::name::normalize_column_name;
use crate::physical::{LogicalType, PhysicalType, is_compatible};
use crate::{
    DEFAULT_BINARY_BYTE_LENGTH, DEFAULT_TEXT_BYTE_LENGTH, DEFAULT_TEXT_CHAR_LENGTH,
    MAX_FIXED_PRECISION,
};

/// Field metadata keys stamped onto every Arrow field the buffer produces.
pub const LOGICAL_TYPE_META_KEY: &str = "logical_type";
pub const PHYSICAL_TYPE_META_KEY: &str = "physical_type";
pub const PRECISION_META_KEY: &str = "precision";
pub const SCALE_META_KEY: &str = "scale";
pub const BYTE_LENGTH_META_KEY: &str = "byte_length";
pub const CHAR_LENGTH_META_KEY: &str = "length";

fn default_nullable() -> bool {
    true
}

/// A column as described by the ingestion backend.
///
/// Type names are kept as strings so an unrecognized name surfaces as a schema
/// error naming the column instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub physical_type: String,
    pub logical_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
}

impl ColumnDescriptor {
    pub fn new(
        name: impl Into<String>,
        physical_type: impl Into<String>,
        logical_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            physical_type: physical_type.into(),
            logical_type: logical_type.into(),
            nullable: true,
            precision: None,
            scale: 0,
            byte_length: None,
            length: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_byte_length(mut self, byte_length: u64) -> Self {
        self.byte_length = Some(byte_length);
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Check the descriptor and resolve it into a [`ColumnSpec`].
    pub fn validate(&self) -> Result<ColumnSpec> {
        let fail = |message: String| Error::schema(self.name.clone(), message);

        let physical = PhysicalType::from_name(&self.physical_type)
            .ok_or_else(|| fail(format!("unrecognized physical type '{}'", self.physical_type)))?;
        let logical = LogicalType::from_name(&self.logical_type)
            .ok_or_else(|| fail(format!("unrecognized logical type '{}'", self.logical_type)))?;
        if !is_compatible(physical, logical) {
            return Err(fail(format!(
                "physical type {physical} cannot hold logical type {logical}"
            )));
        }

        let name = normalize_column_name(&self.name);
        if name.is_empty() {
            return Err(fail("column name is empty".to_string()));
        }

        let mut precision = 0u8;
        let mut scale = 0u8;
        let mut byte_length = None;
        let mut char_length = None;

        match logical {
            LogicalType::Fixed => {
                let max = u32::from(MAX_FIXED_PRECISION);
                let declared = self.precision.unwrap_or(max);
                if declared == 0 || declared > max {
                    return Err(fail(format!(
                        "precision {declared} outside supported range 1..={max}"
                    )));
                }
                if self.scale > max {
                    return Err(fail(format!(
                        "scale {} outside supported range 0..={max}",
                        self.scale
                    )));
                }
                if self.scale > declared {
                    return Err(fail(format!(
                        "scale {} exceeds precision {declared}",
                        self.scale
                    )));
                }
                // Both bounded by MAX_FIXED_PRECISION above.
                precision = declared as u8;
                scale = self.scale as u8;
            }
            LogicalType::Boolean => {
                precision = 1;
            }
            LogicalType::Text | LogicalType::Char => {
                byte_length = Some(
                    positive_or(self.byte_length, DEFAULT_TEXT_BYTE_LENGTH, "byte length")
                        .map_err(fail)?,
                );
                char_length = Some(
                    positive_or(self.length, DEFAULT_TEXT_CHAR_LENGTH, "length").map_err(fail)?,
                );
            }
            LogicalType::Binary => {
                byte_length = Some(
                    positive_or(self.byte_length, DEFAULT_BINARY_BYTE_LENGTH, "byte length")
                        .map_err(fail)?,
                );
            }
        }

        Ok(ColumnSpec {
            declared_name: self.name.clone(),
            name,
            physical,
            logical,
            nullable: self.nullable,
            precision,
            scale,
            byte_length,
            char_length,
        })
    }
}

fn positive_or(value: Option<u64>, default: u64, what: &str) -> std::result::Result<u64, String> {
    match value {
        None => Ok(default),
        Some(0) => Err(format!("{what} must be positive")),
        Some(v) => Ok(v),
    }
}

/// A validated column: parsed types, normalized name and resolved bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Name exactly as declared, used in error messages.
    pub declared_name: String,
    /// Normalized name used for lookup and as the Arrow field name.
    pub name: String,
    pub physical: PhysicalType,
    pub logical: LogicalType,
    pub nullable: bool,
    /// Significant digits for `FIXED` columns; 1 for booleans, 0 otherwise.
    pub precision: u8,
    pub scale: u8,
    /// Maximum UTF-8 / binary length in bytes for LOB columns.
    pub byte_length: Option<u64>,
    /// Maximum length in characters for text columns.
    pub char_length: Option<u64>,
}

impl ColumnSpec {
    /// Arrow type of the column vector backing this column.
    pub fn arrow_data_type(&self) -> DataType {
        match (self.physical, self.logical) {
            (_, LogicalType::Boolean) => DataType::Boolean,
            (_, LogicalType::Text | LogicalType::Char) => DataType::Utf8,
            (_, LogicalType::Binary) => DataType::Binary,
            (PhysicalType::Sb1, LogicalType::Fixed) if self.scale == 0 => DataType::Int8,
            (PhysicalType::Sb2, LogicalType::Fixed) if self.scale == 0 => DataType::Int16,
            (PhysicalType::Sb4, LogicalType::Fixed) if self.scale == 0 => DataType::Int32,
            (PhysicalType::Sb8, LogicalType::Fixed) if self.scale == 0 => DataType::Int64,
            (_, LogicalType::Fixed) => DataType::Decimal128(self.precision, self.scale as i8),
        }
    }

    /// Arrow field carrying the column's type description as metadata.
    pub fn arrow_field(&self) -> Field {
        let mut md = HashMap::new();
        md.insert(
            LOGICAL_TYPE_META_KEY.to_string(),
            self.logical.name().to_string(),
        );
        md.insert(
            PHYSICAL_TYPE_META_KEY.to_string(),
            self.physical.name().to_string(),
        );
        if self.logical == LogicalType::Fixed {
            md.insert(PRECISION_META_KEY.to_string(), self.precision.to_string());
            md.insert(SCALE_META_KEY.to_string(), self.scale.to_string());
        }
        if let Some(len) = self.byte_length {
            md.insert(BYTE_LENGTH_META_KEY.to_string(), len.to_string());
        }
        if let Some(len) = self.char_length {
            md.insert(CHAR_LENGTH_META_KEY.to_string(), len.to_string());
        }
        Field::new(self.name.clone(), self.arrow_data_type(), self.nullable).with_metadata(md)
    }
}
