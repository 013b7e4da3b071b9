//! Running per-column aggregate.

use arrow_buffer::i256;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DistinctKey {
    Int(i256),
    Str(String),
}

/// Min/max, null count and exact distinct count of the values fed to one
/// column since the last reset.
///
/// Integer and string domains are tracked separately: fixed-point and boolean
/// columns feed [`add_int_value`](Self::add_int_value), text and binary
/// columns feed [`add_str_value`](Self::add_str_value). Strings compare by
/// raw byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBufferStats {
    min_int: Option<i256>,
    max_int: Option<i256>,
    min_str: Option<String>,
    max_str: Option<String>,
    max_length: u64,
    null_count: u64,
    distinct: FxHashSet<DistinctKey>,
}

impl RowBufferStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_int_value(&mut self, value: i256) {
        self.min_int = Some(self.min_int.map_or(value, |m| m.min(value)));
        self.max_int = Some(self.max_int.map_or(value, |m| m.max(value)));
        self.distinct.insert(DistinctKey::Int(value));
    }

    pub fn add_str_value(&mut self, value: &str) {
        self.max_length = self.max_length.max(value.len() as u64);
        self.extend_str_range(value);
        self.distinct.insert(DistinctKey::Str(value.to_string()));
    }

    /// Binary values are tracked as their lower-case hex rendering, which
    /// orders the same way as the raw bytes. `max_length` counts raw bytes.
    pub fn add_binary_value(&mut self, value: &[u8]) {
        let rendered = hex::encode(value);
        self.max_length = self.max_length.max(value.len() as u64);
        self.extend_str_range(&rendered);
        self.distinct.insert(DistinctKey::Str(rendered));
    }

    #[inline]
    pub fn inc_null_count(&mut self) {
        self.null_count += 1;
    }

    fn extend_str_range(&mut self, value: &str) {
        match &self.min_str {
            Some(m) if m.as_bytes() <= value.as_bytes() => {}
            _ => self.min_str = Some(value.to_string()),
        }
        match &self.max_str {
            Some(m) if m.as_bytes() >= value.as_bytes() => {}
            _ => self.max_str = Some(value.to_string()),
        }
    }

    #[inline]
    pub fn current_min_int_value(&self) -> Option<i256> {
        self.min_int
    }

    #[inline]
    pub fn current_max_int_value(&self) -> Option<i256> {
        self.max_int
    }

    #[inline]
    pub fn current_min_str_value(&self) -> Option<&str> {
        self.min_str.as_deref()
    }

    #[inline]
    pub fn current_max_str_value(&self) -> Option<&str> {
        self.max_str.as_deref()
    }

    #[inline]
    pub fn current_max_length(&self) -> u64 {
        self.max_length
    }

    #[inline]
    pub fn current_null_count(&self) -> u64 {
        self.null_count
    }

    #[inline]
    pub fn distinct_values(&self) -> u64 {
        self.distinct.len() as u64
    }

    /// Whether any non-null value has been observed.
    #[inline]
    pub fn has_values(&self) -> bool {
        !self.distinct.is_empty()
    }

    /// Return every field to the unset state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_range_and_distinct_count() {
        let mut stats = RowBufferStats::new();
        for v in [2i64, 10, 1, 10] {
            stats.add_int_value(i256::from_i128(v.into()));
        }
        assert_eq!(stats.current_min_int_value(), Some(i256::from_i128(1)));
        assert_eq!(stats.current_max_int_value(), Some(i256::from_i128(10)));
        assert_eq!(stats.distinct_values(), 3);
        assert_eq!(stats.current_null_count(), 0);
        assert_eq!(stats.current_min_str_value(), None);
    }

    #[test]
    fn strings_compare_by_raw_bytes() {
        let mut stats = RowBufferStats::new();
        stats.add_str_value("bob");
        stats.add_str_value("Zed");
        stats.add_str_value("alice");
        stats.add_str_value("\u{e9}");
        assert_eq!(stats.current_min_str_value(), Some("Zed"));
        assert_eq!(stats.current_max_str_value(), Some("\u{e9}"));
        assert_eq!(stats.current_max_length(), 5);
        assert_eq!(stats.distinct_values(), 4);
    }

    #[test]
    fn binary_values_track_hex() {
        let mut stats = RowBufferStats::new();
        stats.add_binary_value(&[0xff, 0x00]);
        stats.add_binary_value(&[0x0a]);
        assert_eq!(stats.current_min_str_value(), Some("0a"));
        assert_eq!(stats.current_max_str_value(), Some("ff00"));
        assert_eq!(stats.current_max_length(), 2);
    }

    #[test]
    fn reset_unsets_everything() {
        let mut stats = RowBufferStats::new();
        stats.add_int_value(i256::from_i128(-5));
        stats.add_str_value("x");
        stats.inc_null_count();
        stats.reset();
        assert_eq!(stats, RowBufferStats::default());
        assert_eq!(stats.current_min_int_value(), None);
        assert_eq!(stats.current_max_str_value(), None);
        assert_eq!(stats.current_null_count(), 0);
        assert_eq!(stats.distinct_values(), 0);
        assert!(!stats.has_values());
    }
}
