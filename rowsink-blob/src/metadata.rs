use rowsink_stats::EpInfo;
use serde::{Deserialize, Serialize};

/// Metadata sent with a blob when it is registered with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    pub path: String,
    /// Lower-case hex MD5 of the whole blob.
    pub md5: String,
    pub chunks: Vec<ChunkMetadata>,
}

/// One table's rows inside a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub database: String,
    pub schema: String,
    pub table: String,
    /// Byte offset of the chunk within the blob.
    pub chunk_start_offset: u64,
    pub chunk_length: u64,
    pub channels: Vec<ChannelMetadata>,
    pub chunk_md5: String,
    pub eps: EpInfo,
}

/// Progress of one channel covered by a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub channel_name: String,
    pub row_sequencer: u64,
    #[serde(default)]
    pub offset_token: Option<String>,
}

impl BlobMetadata {
    pub fn to_json(&self) -> rowsink_result::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
