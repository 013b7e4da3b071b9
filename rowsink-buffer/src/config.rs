/// Largest payload an Arrow `Utf8`/`Binary` vector can address with its
/// 32-bit offsets.
pub const MAX_VECTOR_PAYLOAD_BYTES: u64 = i32::MAX as u64;

/// Run-time configuration of a [`RowBuffer`](crate::RowBuffer) (no hidden
/// constants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBufferConfig {
    /// Name of the channel this buffer belongs to. Stamped onto every flush
    /// and every log line.
    pub channel_name: String,
    /// Rows reserved up front in each column vector, after schema setup and
    /// after every flush or reset.
    pub initial_capacity: usize,
    /// Payload bytes one text or binary column may hold between flushes.
    /// An insert that would go past it is rejected. Values above
    /// [`MAX_VECTOR_PAYLOAD_BYTES`] are capped to it.
    pub max_column_payload_bytes: u64,
}

impl RowBufferConfig {
    pub fn new(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            ..Self::default()
        }
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_column_payload_bytes(mut self, max_bytes: u64) -> Self {
        self.max_column_payload_bytes = max_bytes;
        self
    }

    /// Payload limit actually enforced per column.
    #[inline]
    pub fn column_payload_limit(&self) -> u64 {
        self.max_column_payload_bytes.min(MAX_VECTOR_PAYLOAD_BYTES)
    }
}

impl Default for RowBufferConfig {
    fn default() -> Self {
        Self {
            channel_name: "default".to_string(),
            initial_capacity: 1024,
            max_column_payload_bytes: MAX_VECTOR_PAYLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_limit_is_capped_by_arrow_offsets() {
        let config = RowBufferConfig::new("c");
        assert_eq!(config.column_payload_limit(), MAX_VECTOR_PAYLOAD_BYTES);
        let config = config.with_max_column_payload_bytes(u64::MAX);
        assert_eq!(config.column_payload_limit(), MAX_VECTOR_PAYLOAD_BYTES);
        let config = config.with_max_column_payload_bytes(64);
        assert_eq!(config.column_payload_limit(), 64);
    }
}
