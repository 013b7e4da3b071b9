use arrow::record_batch::RecordBatch;
use rowsink_stats::EpInfo;

/// Everything buffered between two flushes, handed to the uploader.
///
/// Owns its vectors and statistics outright; nothing here is shared with the
/// buffer it came from.
#[derive(Debug, Clone)]
pub struct FlushResult {
    pub channel_name: String,
    pub row_count: u64,
    /// Number of non-empty flushes this buffer produced before this one.
    pub row_sequencer: u64,
    pub vectors: RecordBatch,
    /// Last checkpoint token seen before the flush, if any.
    pub offset_token: Option<String>,
    /// Estimated in-memory size of the flushed rows.
    pub buffer_size: u64,
    pub ep_info: EpInfo,
}
