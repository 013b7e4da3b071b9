//! Schema-validated row buffer for streaming ingestion.
//!
//! A [`RowBuffer`] takes loosely-typed rows, checks every value against the
//! declared columns, converts it into the column's canonical form and appends
//! it to an Arrow column vector while keeping per-column statistics current.
//! The owner polls [`RowBuffer::get_size`] and calls [`RowBuffer::flush`]
//! when it wants to ship a batch; the buffer never decides that on its own.
//!
//! ```
//! use rowsink_buffer::{Row, RowBuffer, RowBufferConfig};
//! use rowsink_types::{ColumnDescriptor, Value};
//!
//! let buffer = RowBuffer::new(RowBufferConfig::new("orders"));
//! buffer
//!     .setup_schema(&[
//!         ColumnDescriptor::new("id", "SB8", "FIXED").with_nullable(false),
//!         ColumnDescriptor::new("note", "LOB", "TEXT"),
//!     ])
//!     .unwrap();
//!
//! let row: Row = [("id".to_string(), Value::from(7))].into_iter().collect();
//! buffer.insert_rows(&[row], Some("offset-1")).unwrap();
//!
//! let flushed = buffer.flush().unwrap().expect("one row buffered");
//! assert_eq!(flushed.row_count, 1);
//! assert_eq!(flushed.row_sequencer, 0);
//! assert_eq!(flushed.offset_token.as_deref(), Some("offset-1"));
//! assert_eq!(flushed.ep_info.column("NOTE").unwrap().null_count, 1);
//! ```

pub mod config;
pub mod convert;
pub mod flush;
pub mod row_buffer;
mod vector;

pub use config::{MAX_VECTOR_PAYLOAD_BYTES, RowBufferConfig};
pub use convert::{CanonicalValue, ConversionError, ConvertFn, converter_for};
pub use flush::FlushResult;
pub use row_buffer::{Row, RowBuffer};
pub use vector::LOB_OFFSET_BYTES;
