use crate::error::Error;

/// Result type alias used throughout rowsink.
///
/// This is a type alias for `std::result::Result<T, Error>`. Every rowsink
/// operation that can fail returns this type.
pub type Result<T> = std::result::Result<T, Error>;
