use std::fmt;
use thiserror::Error;

/// Unified error type for all rowsink operations.
///
/// Every fallible operation in the buffer, statistics and blob crates returns
/// this enum. The three user-facing kinds map directly onto how a caller should
/// react:
///
/// - [`Error::Schema`]: a column descriptor handed to `setup_schema` was
///   rejected. The buffer keeps whatever schema it had before.
/// - [`Error::InvalidRow`]: an insert call was rejected. Nothing from that call
///   was committed, so the caller may fix the offending value and retry the
///   same batch.
/// - [`Error::InternalState`]: the buffer was used before a schema existed.
///   This is a programming error and retrying will not help.
///
/// # Thread Safety
///
/// `Error` is `Send + Sync`, so it can be returned from worker threads that
/// drive inserts or flushes.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow error raised by the columnar vector store.
    ///
    /// This occurs when assembling flushed vectors into a `RecordBatch` or
    /// when writing them as an IPC stream. It indicates a mismatch between the
    /// declared schema and the data handed to Arrow.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON encoding or decoding of metadata failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A column descriptor was rejected during schema setup.
    ///
    /// Raised when the physical type is unrecognized, the (physical, logical)
    /// pairing is not supported, precision/scale/length are out of range, or
    /// two columns normalize to the same name. `column` is the declared name of
    /// the first offending column.
    #[error("invalid column '{column}': {message}")]
    Schema { column: String, message: String },

    /// An insert call was rejected.
    ///
    /// `row_index` is the position of the failing row inside the call and
    /// `column` the declared name of the failing column. Both are `None` when
    /// the call was rejected before looking at any row (the buffer is closed).
    ///
    /// # Recovery
    ///
    /// The buffer is left exactly as it was before the call. Fix the value and
    /// retry.
    #[error("invalid row{}: {message}", location(.row_index, .column))]
    InvalidRow {
        row_index: Option<usize>,
        column: Option<String>,
        message: String,
    },

    /// The buffer was used before any schema was established.
    #[error("invalid buffer state: {0}")]
    InternalState(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation. A poisoned instance
    /// lock (a panic while holding it) is reported this way.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

fn location(row_index: &Option<usize>, column: &Option<String>) -> String {
    match (row_index, column.as_deref()) {
        (Some(row), Some(column)) => format!(" {row} (column '{column}')"),
        (Some(row), None) => format!(" {row}"),
        (None, Some(column)) => format!(" (column '{column}')"),
        (None, None) => String::new(),
    }
}

impl Error {
    /// Create a schema error for the named column.
    #[inline]
    pub fn schema(column: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Schema {
            column: column.into(),
            message: message.to_string(),
        }
    }

    /// Create a row error pinned to a row index and column.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowsink_result::Error;
    ///
    /// let err = Error::invalid_row(3, "COLINT", "null value for non-nullable column");
    /// assert!(err.is_invalid_row());
    /// assert_eq!(err.row_index(), Some(3));
    /// assert_eq!(err.column(), Some("COLINT"));
    /// ```
    #[inline]
    pub fn invalid_row(
        row_index: usize,
        column: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Error::InvalidRow {
            row_index: Some(row_index),
            column: Some(column.into()),
            message: message.to_string(),
        }
    }

    /// Create the row error returned by every insert on a closed buffer.
    #[inline]
    pub fn buffer_closed(channel: &str) -> Self {
        Error::InvalidRow {
            row_index: None,
            column: None,
            message: format!("channel '{channel}' is closed"),
        }
    }

    #[inline]
    pub fn internal_state(message: impl fmt::Display) -> Self {
        Error::InternalState(message.to_string())
    }

    #[inline]
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::Schema { .. })
    }

    #[inline]
    pub fn is_invalid_row(&self) -> bool {
        matches!(self, Error::InvalidRow { .. })
    }

    #[inline]
    pub fn is_internal_state(&self) -> bool {
        matches!(self, Error::InternalState(_))
    }

    /// Row index carried by an [`Error::InvalidRow`], if any.
    pub fn row_index(&self) -> Option<usize> {
        match self {
            Error::InvalidRow { row_index, .. } => *row_index,
            _ => None,
        }
    }

    /// Column name carried by a schema or row error, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Error::Schema { column, .. } => Some(column),
            Error::InvalidRow { column, .. } => column.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_row_display_includes_location() {
        let err = Error::invalid_row(2, "COLCHAR", "value too long");
        assert_eq!(
            err.to_string(),
            "invalid row 2 (column 'COLCHAR'): value too long"
        );
    }

    #[test]
    fn closed_buffer_error_has_no_location() {
        let err = Error::buffer_closed("orders");
        assert!(err.is_invalid_row());
        assert_eq!(err.row_index(), None);
        assert_eq!(err.column(), None);
        assert_eq!(err.to_string(), "invalid row: channel 'orders' is closed");
    }

    #[test]
    fn schema_error_names_column() {
        let err = Error::schema("COLX", "unrecognized physical type 'SB3'");
        assert!(err.is_schema_error());
        assert_eq!(err.column(), Some("COLX"));
        assert!(!err.is_internal_state());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
