//! Column types, descriptors and input values for the rowsink ingestion buffer.
//!
//! This crate holds the leaf of the type system: the physical/logical type
//! pairs a backend may declare, the validation that turns a
//! [`ColumnDescriptor`] into a [`ColumnSpec`], the [`SchemaCatalog`] that
//! resolves row-map keys to columns, and the loosely-typed [`Value`] rows are
//! written with.

pub mod catalog;
pub mod decimal;
pub mod descriptor;
pub mod name;
pub mod physical;
pub mod value;

pub use catalog::SchemaCatalog;
pub use decimal::{DecimalError, DecimalValue};
pub use descriptor::{ColumnDescriptor, ColumnSpec};
pub use name::normalize_column_name;
pub use physical::{COMPATIBILITY, LogicalType, PhysicalType, is_compatible};
pub use value::Value;

/// Largest number of significant digits a `FIXED` column may declare.
pub const MAX_FIXED_PRECISION: u8 = 38;

/// Byte bound applied to text columns that declare none.
pub const DEFAULT_TEXT_BYTE_LENGTH: u64 = 16 * 1024 * 1024;

/// Character bound applied to text columns that declare none.
pub const DEFAULT_TEXT_CHAR_LENGTH: u64 = 16 * 1024 * 1024;

/// Byte bound applied to binary columns that declare none.
pub const DEFAULT_BINARY_BYTE_LENGTH: u64 = 8 * 1024 * 1024;
