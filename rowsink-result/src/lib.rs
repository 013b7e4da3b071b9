//! Error types and result definitions for the rowsink ingestion buffer.
//!
//! This crate provides the unified error type ([`Error`]) and result alias
//! ([`Result<T>`]) used by every rowsink crate, so errors cross crate
//! boundaries with `?` and callers can classify them without string matching.
//!
//! # Error Categories
//!
//! - **Schema errors** ([`Error::Schema`]): rejected column descriptors
//! - **Row errors** ([`Error::InvalidRow`]): rejected insert calls, including
//!   inserts on a closed buffer
//! - **State errors** ([`Error::InternalState`]): use before schema setup
//! - **Data format errors** ([`Error::Arrow`], [`Error::Serialization`])
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
