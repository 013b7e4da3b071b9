//! Upload-side shapes built from [`FlushResult`](rowsink_buffer::FlushResult)s.
//!
//! A blob is a byte string made of one or more chunks. Each chunk is an Arrow
//! IPC stream holding the rows of one table, drawn from one or more flushes,
//! and carries the rolled-up statistics of those rows. [`BlobBuilder`] lays
//! the chunks out back to back and produces the [`BlobMetadata`] the backend
//! expects alongside the bytes. Uploading and registering the blob happen
//! elsewhere.

pub mod builder;
pub mod chunk;
pub mod metadata;

pub use builder::{BlobBuilder, TableRef};
pub use chunk::{deserialize_chunk, md5_hex, serialize_chunk};
pub use metadata::{BlobMetadata, ChannelMetadata, ChunkMetadata};
