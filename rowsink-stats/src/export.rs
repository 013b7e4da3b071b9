//! Owned statistics snapshots.
//!
//! Everything here is copied out of the live accumulators, so a later reset of
//! the buffer cannot reach into a snapshot that was already handed out.

use std::collections::{BTreeMap, BTreeSet};

use arrow_buffer::i256;
use serde::{Deserialize, Serialize};

use crate::accumulator::RowBufferStats;

/// Exported statistics of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileColumnProperties {
    #[serde(with = "crate::serde_i256", default)]
    pub min_int_value: Option<i256>,
    #[serde(with = "crate::serde_i256", default)]
    pub max_int_value: Option<i256>,
    #[serde(default)]
    pub min_str_value: Option<String>,
    #[serde(default)]
    pub max_str_value: Option<String>,
    #[serde(default)]
    pub max_length: u64,
    pub null_count: u64,
    pub distinct_values: u64,
}

impl FileColumnProperties {
    /// Snapshot one accumulator. `row_count` is the number of rows the
    /// accumulator has seen.
    pub fn from_stats(stats: &RowBufferStats, row_count: u64) -> Self {
        if !stats.has_values() {
            return Self {
                null_count: row_count,
                ..Self::default()
            };
        }
        Self {
            min_int_value: stats.current_min_int_value(),
            max_int_value: stats.current_max_int_value(),
            min_str_value: stats.current_min_str_value().map(str::to_string),
            max_str_value: stats.current_max_str_value().map(str::to_string),
            max_length: stats.current_max_length(),
            null_count: stats.current_null_count(),
            distinct_values: stats.distinct_values(),
        }
    }

    /// Combine the statistics of two disjoint row sets.
    ///
    /// The distinct count adds, which overestimates when both sides share
    /// values; the sets themselves are not part of the snapshot.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_int_value: widen(self.min_int_value, other.min_int_value, Ord::min),
            max_int_value: widen(self.max_int_value, other.max_int_value, Ord::max),
            min_str_value: widen(
                self.min_str_value.clone(),
                other.min_str_value.clone(),
                Ord::min,
            ),
            max_str_value: widen(
                self.max_str_value.clone(),
                other.max_str_value.clone(),
                Ord::max,
            ),
            max_length: self.max_length.max(other.max_length),
            null_count: self.null_count + other.null_count,
            distinct_values: self.distinct_values + other.distinct_values,
        }
    }

    fn with_extra_nulls(&self, nulls: u64) -> Self {
        Self {
            null_count: self.null_count + nulls,
            ..self.clone()
        }
    }
}

fn widen<T>(a: Option<T>, b: Option<T>, pick: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Row count plus per-column statistics of a flush or a chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpInfo {
    pub rows: u64,
    pub columns: BTreeMap<String, FileColumnProperties>,
}

impl EpInfo {
    #[inline]
    pub fn column(&self, name: &str) -> Option<&FileColumnProperties> {
        self.columns.get(name)
    }

    /// Roll two snapshots into one covering both row sets.
    ///
    /// A column present on only one side is treated as all-null on the other.
    pub fn merge(&self, other: &EpInfo) -> EpInfo {
        let names: BTreeSet<&String> = self.columns.keys().chain(other.columns.keys()).collect();
        let mut columns = BTreeMap::new();
        for name in names {
            let merged = match (self.columns.get(name), other.columns.get(name)) {
                (Some(a), Some(b)) => a.merge(b),
                (Some(a), None) => a.with_extra_nulls(other.rows),
                (None, Some(b)) => b.with_extra_nulls(self.rows),
                (None, None) => continue,
            };
            columns.insert(name.clone(), merged);
        }
        EpInfo {
            rows: self.rows + other.rows,
            columns,
        }
    }
}

/// Copy a set of live accumulators into an owned [`EpInfo`].
///
/// # Examples
///
/// ```
/// use rowsink_stats::{RowBufferStats, build_ep_info, i256};
///
/// let mut ints = RowBufferStats::new();
/// ints.add_int_value(i256::from_i128(7));
/// let mut empty = RowBufferStats::new();
/// empty.inc_null_count();
///
/// let ep = build_ep_info(1, [("A", &ints), ("B", &empty)]);
/// assert_eq!(ep.column("A").unwrap().max_int_value, Some(i256::from_i128(7)));
/// assert_eq!(ep.column("B").unwrap().null_count, 1);
/// assert_eq!(ep.column("B").unwrap().min_int_value, None);
/// ```
pub fn build_ep_info<'a, I>(row_count: u64, stats: I) -> EpInfo
where
    I: IntoIterator<Item = (&'a str, &'a RowBufferStats)>,
{
    let columns = stats
        .into_iter()
        .map(|(name, s)| (name.to_string(), FileColumnProperties::from_stats(s, row_count)))
        .collect();
    EpInfo {
        rows: row_count,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i128) -> i256 {
        i256::from_i128(v)
    }

    #[test]
    fn merge_widens_ranges_and_adds_counts() {
        let a = FileColumnProperties {
            min_int_value: Some(int(3)),
            max_int_value: Some(int(9)),
            null_count: 1,
            distinct_values: 2,
            ..Default::default()
        };
        let b = FileColumnProperties {
            min_int_value: Some(int(-4)),
            max_int_value: Some(int(5)),
            null_count: 2,
            distinct_values: 3,
            ..Default::default()
        };
        let m = a.merge(&b);
        assert_eq!(m.min_int_value, Some(int(-4)));
        assert_eq!(m.max_int_value, Some(int(9)));
        assert_eq!(m.null_count, 3);
        assert_eq!(m.distinct_values, 5);
        assert_eq!(m.min_str_value, None);
    }

    #[test]
    fn merge_keeps_set_side_when_other_is_unset() {
        let a = FileColumnProperties {
            min_str_value: Some("b".into()),
            max_str_value: Some("d".into()),
            max_length: 1,
            distinct_values: 2,
            ..Default::default()
        };
        let empty = FileColumnProperties {
            null_count: 4,
            ..Default::default()
        };
        let m = empty.merge(&a);
        assert_eq!(m.min_str_value.as_deref(), Some("b"));
        assert_eq!(m.max_str_value.as_deref(), Some("d"));
        assert_eq!(m.null_count, 4);
    }

    #[test]
    fn ep_info_merge_pads_missing_columns_with_nulls() {
        let mut left = EpInfo {
            rows: 2,
            ..Default::default()
        };
        left.columns.insert("A".into(), FileColumnProperties::default());
        let right = EpInfo {
            rows: 3,
            ..Default::default()
        };
        let m = left.merge(&right);
        assert_eq!(m.rows, 5);
        assert_eq!(m.column("A").unwrap().null_count, 3);
    }
}
