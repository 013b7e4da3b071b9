//! The schema-validated row buffer of one channel.

use std::collections::HashMap;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use rowsink_result::{Error, Result};
use rowsink_stats::{RowBufferStats, build_ep_info, i256};
use rowsink_types::{ColumnDescriptor, SchemaCatalog, Value};

use crate::config::RowBufferConfig;
use crate::convert::{CanonicalValue, ConvertFn, converter_for};
use crate::flush::FlushResult;
use crate::vector::{ColumnVector, cell_size, payload_len};

/// One row as handed over by the application: column name to value.
pub type Row = HashMap<String, Value>;

/// Buffers rows for a single channel until the owner flushes them.
///
/// Every mutating operation runs under one instance lock, so an insert sees
/// either the whole state before a flush or the whole state after it. The
/// buffered size is mirrored into an atomic that is only written once an
/// insert call has been fully committed; [`get_size`](Self::get_size) reads
/// it without taking the lock.
///
/// # Lifecycle
///
/// 1. [`setup_schema`](Self::setup_schema) declares the columns.
/// 2. [`insert_rows`](Self::insert_rows) validates and appends rows,
///    all-or-nothing per call.
/// 3. [`flush`](Self::flush) swaps the buffered rows out into a
///    [`FlushResult`].
/// 4. [`close`](Self::close) rejects further inserts. Rows still buffered can
///    be drained with `flush`.
pub struct RowBuffer {
    config: RowBufferConfig,
    state: Mutex<BufferState>,
    size: AtomicU64,
}

#[derive(Default)]
struct BufferState {
    columns: Option<ColumnSet>,
    row_count: u64,
    sequencer: u64,
    offset_token: Option<String>,
    buffer_size: u64,
    closed: bool,
}

/// Per-column state that is replaced wholesale by a schema change.
struct ColumnSet {
    catalog: SchemaCatalog,
    converters: Vec<ConvertFn>,
    vectors: Vec<ColumnVector>,
    stats: Vec<RowBufferStats>,
}

impl ColumnSet {
    fn new(catalog: SchemaCatalog, capacity: usize) -> Result<Self> {
        let mut converters = Vec::with_capacity(catalog.len());
        for spec in catalog.columns() {
            let convert = converter_for(spec.physical, spec.logical).ok_or_else(|| {
                Error::schema(
                    spec.declared_name.clone(),
                    format!("no converter for {}/{}", spec.physical, spec.logical),
                )
            })?;
            converters.push(convert);
        }
        let vectors = Self::empty_vectors(&catalog, capacity)?;
        let stats = vec![RowBufferStats::default(); catalog.len()];
        Ok(Self {
            catalog,
            converters,
            vectors,
            stats,
        })
    }

    fn empty_vectors(catalog: &SchemaCatalog, capacity: usize) -> Result<Vec<ColumnVector>> {
        catalog
            .columns()
            .iter()
            .map(|spec| ColumnVector::new(spec, capacity))
            .collect()
    }
}

impl RowBuffer {
    pub fn new(config: RowBufferConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BufferState::default()),
            size: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn channel_name(&self) -> &str {
        &self.config.channel_name
    }

    #[inline]
    pub fn config(&self) -> &RowBufferConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, BufferState>> {
        self.state.lock().map_err(|_| {
            Error::Internal(format!(
                "row buffer lock for channel '{}' is poisoned",
                self.config.channel_name
            ))
        })
    }

    /// Replace the schema and discard everything buffered under the old one.
    ///
    /// On error the previous schema, rows and statistics are kept.
    pub fn setup_schema(&self, descriptors: &[ColumnDescriptor]) -> Result<()> {
        let catalog = SchemaCatalog::try_new(descriptors)?;
        let columns = ColumnSet::new(catalog, self.config.initial_capacity)?;
        let column_count = columns.catalog.len();

        let mut state = self.lock()?;
        state.columns = Some(columns);
        state.row_count = 0;
        state.offset_token = None;
        state.buffer_size = 0;
        self.size.store(0, Ordering::Release);

        tracing::debug!(
            "[ROW_BUFFER] channel '{}' schema set up with {} column(s)",
            self.config.channel_name,
            column_count
        );
        Ok(())
    }

    /// Validate, convert and append a batch of rows.
    ///
    /// The whole batch is checked before anything is appended. If any row is
    /// rejected the buffer is left exactly as it was, and the error carries
    /// the index of the failing row and the declared name of the failing
    /// column. A `Some` offset token replaces the stored one.
    ///
    /// A text or binary column may hold at most
    /// [`column_payload_limit`](RowBufferConfig::column_payload_limit) bytes
    /// between flushes; a row that would exceed it is rejected the same way.
    pub fn insert_rows(&self, rows: &[Row], offset_token: Option<&str>) -> Result<()> {
        let mut state = self.lock()?;
        if state.closed {
            tracing::warn!(
                "[ROW_BUFFER] rejected insert of {} row(s) into closed channel '{}'",
                rows.len(),
                self.config.channel_name
            );
            return Err(Error::buffer_closed(&self.config.channel_name));
        }
        let columns = state
            .columns
            .as_mut()
            .ok_or_else(|| Error::internal_state("insert_rows called before setup_schema"))?;

        let payload_limit = self.config.column_payload_limit();
        let (staged, staged_size) = stage_rows(columns, rows, payload_limit)?;

        // Nothing below can fail, so the call commits in full.
        for (c, values) in staged.into_iter().enumerate() {
            let vector = &mut columns.vectors[c];
            let stats = &mut columns.stats[c];
            for value in &values {
                vector.append(value);
                match value {
                    CanonicalValue::Null => stats.inc_null_count(),
                    CanonicalValue::Int(v) => stats.add_int_value(i256::from_i128(*v)),
                    CanonicalValue::Boolean(b) => {
                        stats.add_int_value(i256::from_i128(i128::from(*b)))
                    }
                    CanonicalValue::Text(t) => stats.add_str_value(t),
                    CanonicalValue::Binary(b) => stats.add_binary_value(b),
                }
            }
        }

        state.row_count += rows.len() as u64;
        state.buffer_size += staged_size;
        if let Some(token) = offset_token {
            state.offset_token = Some(token.to_string());
        }
        self.size.store(state.buffer_size, Ordering::Release);

        tracing::trace!(
            "[ROW_BUFFER] channel '{}' committed {} row(s), {} buffered",
            self.config.channel_name,
            rows.len(),
            state.row_count
        );
        Ok(())
    }

    /// Swap out everything buffered since the last flush.
    ///
    /// Returns `Ok(None)` without advancing the sequencer when no rows are
    /// buffered. Permitted after [`close`](Self::close).
    pub fn flush(&self) -> Result<Option<FlushResult>> {
        let mut state = self.lock()?;
        let row_count = state.row_count;
        let capacity = self.config.initial_capacity;
        let columns = state
            .columns
            .as_mut()
            .ok_or_else(|| Error::internal_state("flush called before setup_schema"))?;
        if row_count == 0 {
            return Ok(None);
        }

        // Build everything fallible first; the buffer only changes once the
        // batch exists.
        let arrays = columns.vectors.iter().map(ColumnVector::to_array).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(row_count as usize));
        let vectors =
            RecordBatch::try_new_with_options(columns.catalog.arrow_schema(), arrays, &options)?;
        let fresh = ColumnSet::empty_vectors(&columns.catalog, capacity)?;

        columns.vectors = fresh;
        let stats = mem::replace(
            &mut columns.stats,
            vec![RowBufferStats::default(); columns.catalog.len()],
        );
        let ep_info = build_ep_info(row_count, columns.catalog.column_names().zip(stats.iter()));

        let result = FlushResult {
            channel_name: self.config.channel_name.clone(),
            row_count,
            row_sequencer: state.sequencer,
            vectors,
            offset_token: state.offset_token.take(),
            buffer_size: state.buffer_size,
            ep_info,
        };

        state.sequencer += 1;
        state.row_count = 0;
        state.buffer_size = 0;
        self.size.store(0, Ordering::Release);

        tracing::debug!(
            "[ROW_BUFFER] channel '{}' flushed {} row(s) ({} bytes) as sequencer {}",
            self.config.channel_name,
            result.row_count,
            result.buffer_size,
            result.row_sequencer
        );
        Ok(Some(result))
    }

    /// Estimated bytes buffered by committed inserts since the last flush.
    #[inline]
    pub fn get_size(&self) -> u64 {
        self.size.load(Ordering::Acquire)
    }

    /// Drop buffered rows and statistics. Keeps the schema and the sequencer.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.lock()?;
        if let Some(columns) = state.columns.as_mut() {
            columns.vectors =
                ColumnSet::empty_vectors(&columns.catalog, self.config.initial_capacity)?;
            columns.stats.iter_mut().for_each(RowBufferStats::reset);
        }
        state.row_count = 0;
        state.offset_token = None;
        state.buffer_size = 0;
        self.size.store(0, Ordering::Release);
        Ok(())
    }

    /// Reject every future insert. Idempotent.
    pub fn close(&self) -> Result<()> {
        let mut state = self.lock()?;
        if !state.closed {
            state.closed = true;
            tracing::debug!(
                "[ROW_BUFFER] channel '{}' closed with {} row(s) still buffered",
                self.config.channel_name,
                state.row_count
            );
        }
        Ok(())
    }

    pub fn is_closed(&self) -> Result<bool> {
        Ok(self.lock()?.closed)
    }

    /// Rows buffered since the last flush.
    pub fn row_count(&self) -> Result<u64> {
        Ok(self.lock()?.row_count)
    }

    /// Sequencer the next non-empty flush will carry.
    pub fn sequencer(&self) -> Result<u64> {
        Ok(self.lock()?.sequencer)
    }

    pub fn offset_token(&self) -> Result<Option<String>> {
        Ok(self.lock()?.offset_token.clone())
    }

    /// Normalized column names in declaration order; empty before setup.
    pub fn column_names(&self) -> Result<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .columns
            .as_ref()
            .map(|c| c.catalog.column_names().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Copy of the live statistics of a column, looked up like a row-map key.
    pub fn column_stats(&self, name: &str) -> Result<Option<RowBufferStats>> {
        let state = self.lock()?;
        let columns = state
            .columns
            .as_ref()
            .ok_or_else(|| Error::internal_state("column_stats called before setup_schema"))?;
        Ok(columns
            .catalog
            .resolve(name)
            .map(|idx| columns.stats[idx].clone()))
    }
}

/// Convert every value of every row, column-major, without touching the
/// buffer. Returns the staged values and their estimated size.
///
/// Every staged value has passed [`ColumnVector::check`], and no text or
/// binary column ends up holding more than `payload_limit` bytes.
fn stage_rows(
    columns: &ColumnSet,
    rows: &[Row],
    payload_limit: u64,
) -> Result<(Vec<Vec<CanonicalValue>>, u64)> {
    let catalog = &columns.catalog;
    let mut staged: Vec<Vec<CanonicalValue>> = (0..catalog.len())
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();
    let mut payload: Vec<u64> = columns
        .vectors
        .iter()
        .map(ColumnVector::payload_bytes)
        .collect();
    let mut size = 0u64;
    let mut slots: Vec<Option<&Value>> = vec![None; catalog.len()];

    for (row_index, row) in rows.iter().enumerate() {
        slots.iter_mut().for_each(|s| *s = None);

        for (key, value) in row {
            let idx = catalog.resolve(key).ok_or_else(|| {
                Error::invalid_row(row_index, key.clone(), "unknown column")
            })?;
            if slots[idx].is_some() {
                return Err(Error::invalid_row(
                    row_index,
                    key.clone(),
                    format!("duplicate column '{}'", catalog.column(idx).name),
                ));
            }
            slots[idx] = Some(value);
        }

        for (idx, slot) in slots.iter().enumerate() {
            let spec = catalog.column(idx);
            let canonical = match *slot {
                None | Some(Value::Null) => {
                    if !spec.nullable {
                        return Err(Error::invalid_row(
                            row_index,
                            spec.declared_name.clone(),
                            "null value for non-nullable column",
                        ));
                    }
                    CanonicalValue::Null
                }
                Some(value) => (columns.converters[idx])(spec, value).map_err(|e| {
                    Error::invalid_row(row_index, spec.declared_name.clone(), e)
                })?,
            };
            columns.vectors[idx].check(&canonical)?;
            payload[idx] += payload_len(&canonical);
            if payload[idx] > payload_limit {
                return Err(Error::invalid_row(
                    row_index,
                    spec.declared_name.clone(),
                    format!(
                        "column would hold {} bytes, over its {payload_limit}-byte limit; \
                         flush before inserting more",
                        payload[idx]
                    ),
                ));
            }
            size += cell_size(spec, &canonical);
            staged[idx].push(canonical);
        }
    }
    Ok((staged, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn row_buffer_is_send_sync() {
        assert_send_sync::<RowBuffer>();
        assert_send_sync::<FlushResult>();
    }

    #[test]
    fn operations_before_setup() {
        let buffer = RowBuffer::new(RowBufferConfig::default());
        assert!(
            buffer
                .insert_rows(&[Row::new()], None)
                .unwrap_err()
                .is_internal_state()
        );
        assert!(buffer.flush().unwrap_err().is_internal_state());
        assert!(buffer.column_stats("A").unwrap_err().is_internal_state());
        buffer.reset().unwrap();
        assert_eq!(buffer.get_size(), 0);
        assert!(buffer.column_names().unwrap().is_empty());
        buffer.close().unwrap();
        assert!(buffer.is_closed().unwrap());
    }
}
