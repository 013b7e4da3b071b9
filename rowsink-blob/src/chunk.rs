use arrow::compute::concat_batches;
use arrow::ipc::reader::StreamReader;
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use md5::{Digest, Md5};
use rowsink_buffer::FlushResult;
use rowsink_result::{Error, Result};

/// Serializes the vectors of several flushes of one table into a single Arrow
/// IPC stream. All flushes must share a schema.
pub fn serialize_chunk(flushes: &[FlushResult]) -> Result<Vec<u8>> {
    let first = flushes
        .first()
        .ok_or_else(|| Error::Internal("cannot serialize a chunk without flushes".to_string()))?;
    let schema = first.vectors.schema();
    let batch = concat_batches(&schema, flushes.iter().map(|f| &f.vectors))?;

    let mut writer = StreamWriter::try_new(Vec::new(), &schema)?;
    writer.write(&batch)?;
    writer.finish()?;
    Ok(writer.into_inner()?)
}

/// Reads a chunk written by [`serialize_chunk`] back into one batch.
pub fn deserialize_chunk(bytes: &[u8]) -> Result<RecordBatch> {
    let mut reader = StreamReader::try_new(bytes, None)?;
    let batch = reader.next().ok_or(Error::Internal(
        "Serialized Arrow stream is empty".to_string(),
    ))??;
    Ok(batch)
}

/// Lower-case hex MD5 digest.
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}
