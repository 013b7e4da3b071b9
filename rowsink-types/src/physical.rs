//! Physical and logical column types plus the table of legal pairings.
//!
//! The backend describes every column with two type names: a *physical* type
//! fixing the on-wire width, and a *logical* type giving the meaning layered on
//! top of it. Only the pairings in [`COMPATIBILITY`] are accepted.

use std::fmt;

/// On-wire storage class of a column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    /// Signed 1-byte integer.
    Sb1,
    /// Signed 2-byte integer.
    Sb2,
    /// Signed 4-byte integer.
    Sb4,
    /// Signed 8-byte integer.
    Sb8,
    /// Signed 16-byte integer.
    Sb16,
    /// Variable-length binary or text.
    Lob,
}

impl PhysicalType {
    /// Parse a wire name (`SB1`, `sb16`, `LOB`, ...). Returns `None` for
    /// anything unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SB1" => Some(PhysicalType::Sb1),
            "SB2" => Some(PhysicalType::Sb2),
            "SB4" => Some(PhysicalType::Sb4),
            "SB8" => Some(PhysicalType::Sb8),
            "SB16" => Some(PhysicalType::Sb16),
            "LOB" => Some(PhysicalType::Lob),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PhysicalType::Sb1 => "SB1",
            PhysicalType::Sb2 => "SB2",
            PhysicalType::Sb4 => "SB4",
            PhysicalType::Sb8 => "SB8",
            PhysicalType::Sb16 => "SB16",
            PhysicalType::Lob => "LOB",
        }
    }

    /// Width in bytes of the fixed-width classes; `None` for [`PhysicalType::Lob`].
    #[inline]
    pub fn byte_width(self) -> Option<usize> {
        match self {
            PhysicalType::Sb1 => Some(1),
            PhysicalType::Sb2 => Some(2),
            PhysicalType::Sb4 => Some(4),
            PhysicalType::Sb8 => Some(8),
            PhysicalType::Sb16 => Some(16),
            PhysicalType::Lob => None,
        }
    }

    /// Inclusive range of unscaled integers representable by this class.
    pub fn int_range(self) -> Option<(i128, i128)> {
        match self {
            PhysicalType::Sb1 => Some((i8::MIN as i128, i8::MAX as i128)),
            PhysicalType::Sb2 => Some((i16::MIN as i128, i16::MAX as i128)),
            PhysicalType::Sb4 => Some((i32::MIN as i128, i32::MAX as i128)),
            PhysicalType::Sb8 => Some((i64::MIN as i128, i64::MAX as i128)),
            PhysicalType::Sb16 => Some((i128::MIN, i128::MAX)),
            PhysicalType::Lob => None,
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic interpretation of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Fixed-point numeric with a declared precision and scale.
    Fixed,
    Boolean,
    /// Variable-length character string.
    Text,
    /// Fixed-length character string; buffered exactly like `Text`.
    Char,
    Binary,
}

impl LogicalType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "FIXED" => Some(LogicalType::Fixed),
            "BOOLEAN" => Some(LogicalType::Boolean),
            "TEXT" => Some(LogicalType::Text),
            "CHAR" => Some(LogicalType::Char),
            "BINARY" => Some(LogicalType::Binary),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalType::Fixed => "FIXED",
            LogicalType::Boolean => "BOOLEAN",
            LogicalType::Text => "TEXT",
            LogicalType::Char => "CHAR",
            LogicalType::Binary => "BINARY",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every (physical, logical) pairing a column descriptor may declare.
pub const COMPATIBILITY: &[(PhysicalType, LogicalType)] = &[
    (PhysicalType::Sb1, LogicalType::Fixed),
    (PhysicalType::Sb2, LogicalType::Fixed),
    (PhysicalType::Sb4, LogicalType::Fixed),
    (PhysicalType::Sb8, LogicalType::Fixed),
    (PhysicalType::Sb16, LogicalType::Fixed),
    (PhysicalType::Sb1, LogicalType::Boolean),
    (PhysicalType::Lob, LogicalType::Text),
    (PhysicalType::Lob, LogicalType::Char),
    (PhysicalType::Lob, LogicalType::Binary),
];

#[inline]
pub fn is_compatible(physical: PhysicalType, logical: LogicalType) -> bool {
    COMPATIBILITY.contains(&(physical, logical))
}
