//! Column name normalization.
//!
//! Unquoted identifiers are case-insensitive and canonically upper-case.
//! Identifiers wrapped in double quotes keep their exact spelling, so `colA`
//! (stored as `COLA`) and `"colA"` (stored as `colA`) are different columns.

const QUOTE: char = '"';

/// Canonical form of a declared or row-map column name.
///
/// # Examples
///
/// ```
/// use rowsink_types::normalize_column_name;
///
/// assert_eq!(normalize_column_name("colTinyInt"), "COLTINYINT");
/// assert_eq!(normalize_column_name("\"colTinyInt\""), "colTinyInt");
/// assert_eq!(normalize_column_name("\"say \"\"hi\"\"\""), "say \"hi\"");
/// ```
pub fn normalize_column_name(raw: &str) -> String {
    if is_quoted(raw) {
        raw[1..raw.len() - 1].replace("\"\"", "\"")
    } else {
        raw.to_uppercase()
    }
}

/// Whether `raw` is wrapped in the quoting delimiter.
#[inline]
pub fn is_quoted(raw: &str) -> bool {
    raw.len() >= 2 && raw.starts_with(QUOTE) && raw.ends_with(QUOTE)
}
