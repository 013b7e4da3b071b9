//! Column statistics for the rowsink ingestion buffer.
//!
//! [`RowBufferStats`] is the live, mutable accumulator a buffer keeps per
//! column. [`build_ep_info`] copies a set of accumulators into an [`EpInfo`],
//! the owned snapshot that travels with a flush and, rolled up with
//! [`EpInfo::merge`], with every chunk of an uploaded blob.

pub mod accumulator;
pub mod export;
mod serde_i256;

pub use accumulator::RowBufferStats;
pub use export::{EpInfo, FileColumnProperties, build_ep_info};

pub use arrow_buffer::i256;
