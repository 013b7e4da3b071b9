//! rowsink: the client-side write path of a streaming ingestion client.
//!
//! This crate re-exports the `rowsink-*` crates behind one API surface.
//!
//! # Quick Start
//!
//! ```rust
//! use rowsink::{ColumnDescriptor, Row, RowBuffer, RowBufferConfig, Value};
//!
//! let buffer = RowBuffer::new(RowBufferConfig::new("events"));
//! buffer
//!     .setup_schema(&[ColumnDescriptor::new("amount", "SB8", "FIXED")
//!         .with_precision(10)
//!         .with_scale(2)])
//!     .unwrap();
//!
//! let row: Row = [("AMOUNT".to_string(), Value::from(12.5))].into_iter().collect();
//! buffer.insert_rows(&[row], None).unwrap();
//! assert_eq!(buffer.get_size(), 8);
//!
//! let flushed = buffer.flush().unwrap().unwrap();
//! let amount = flushed.ep_info.column("AMOUNT").unwrap();
//! assert_eq!(amount.max_int_value.unwrap().to_string(), "1250");
//! ```
//!
//! # Architecture
//!
//! - **Types** (`rowsink-types`): physical/logical types, column descriptors,
//!   name normalization and the schema catalog.
//! - **Statistics** (`rowsink-stats`): per-column accumulators and their
//!   exported snapshots.
//! - **Buffer** (`rowsink-buffer`): value conversion, Arrow column vectors and
//!   the flush/reset/close lifecycle.
//! - **Blob** (`rowsink-blob`): chunk serialization and blob metadata.
//! - **Errors** (`rowsink-result`): the shared [`Error`] and [`Result`].

pub use rowsink_blob::{BlobBuilder, BlobMetadata, ChannelMetadata, ChunkMetadata, TableRef};
pub use rowsink_buffer::{FlushResult, Row, RowBuffer, RowBufferConfig};
pub use rowsink_result::{Error, Result};
pub use rowsink_stats::{EpInfo, FileColumnProperties, RowBufferStats};
pub use rowsink_types::{
    ColumnDescriptor, DecimalValue, LogicalType, PhysicalType, SchemaCatalog, Value,
};

pub mod blob {
    //! Chunk serialization and checksums.
    pub use rowsink_blob::{deserialize_chunk, md5_hex, serialize_chunk};
}

pub mod stats {
    //! Statistics export.
    pub use rowsink_stats::{build_ep_info, i256};
}
