//! Lays chunks out back to back into one blob.

use rowsink_buffer::FlushResult;
use rowsink_result::{Error, Result};

use crate::chunk::{md5_hex, serialize_chunk};
use crate::metadata::{BlobMetadata, ChannelMetadata, ChunkMetadata};

/// Fully qualified table a chunk belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

/// Accumulates chunks for one blob.
#[derive(Debug)]
pub struct BlobBuilder {
    path: String,
    bytes: Vec<u8>,
    chunks: Vec<ChunkMetadata>,
}

impl BlobBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bytes: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Append the rows of `flushes` as one chunk of `table`.
    ///
    /// The chunk's statistics are the merge of every flush's statistics, and
    /// each flush contributes one channel entry in the given order.
    pub fn append_chunk(
        &mut self,
        table: &TableRef,
        flushes: &[FlushResult],
    ) -> Result<&ChunkMetadata> {
        let data = serialize_chunk(flushes)?;
        let eps = flushes
            .iter()
            .map(|f| f.ep_info.clone())
            .reduce(|acc, next| acc.merge(&next))
            .unwrap_or_default();
        let channels = flushes
            .iter()
            .map(|f| ChannelMetadata {
                channel_name: f.channel_name.clone(),
                row_sequencer: f.row_sequencer,
                offset_token: f.offset_token.clone(),
            })
            .collect();

        let chunk = ChunkMetadata {
            database: table.database.clone(),
            schema: table.schema.clone(),
            table: table.table.clone(),
            chunk_start_offset: self.bytes.len() as u64,
            chunk_length: data.len() as u64,
            channels,
            chunk_md5: md5_hex(&data),
            eps,
        };
        self.bytes.extend_from_slice(&data);

        tracing::debug!(
            "[BLOB] '{}' chunk {} for {}.{}.{}: {} row(s), {} bytes at offset {}",
            self.path,
            self.chunks.len(),
            chunk.database,
            chunk.schema,
            chunk.table,
            chunk.eps.rows,
            chunk.chunk_length,
            chunk.chunk_start_offset
        );
        self.chunks.push(chunk);
        self.chunks
            .last()
            .ok_or_else(|| Error::Internal("chunk vanished after push".to_string()))
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Blob bytes plus the metadata describing them.
    pub fn finish(self) -> (Vec<u8>, BlobMetadata) {
        let metadata = BlobMetadata {
            md5: md5_hex(&self.bytes),
            path: self.path,
            chunks: self.chunks,
        };
        (self.bytes, metadata)
    }
}
