use std::collections::HashMap;
use std::sync::Once;

use rowsink_types::{ColumnDescriptor, Value};

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let env = std::env::var("RUST_LOG").ok();
        let filter = match env {
            Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            None => EnvFilter::new("info"),
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .init();
    });
}

#[cfg(feature = "auto-init")]
mod auto {
    // Use ctor to run at binary init time to avoid having to call init in every test.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}

/// The mixed-width schema most buffer tests run against.
///
/// `"colTinyInt"` (quoted, exact case) and `COLTINYINT` are distinct columns.
/// Every column is non-nullable except `COLCHAR`, a text column bounded to 11
/// characters / 14 bytes.
pub fn mixed_schema() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("\"colTinyInt\"", "SB1", "FIXED")
            .with_nullable(false)
            .with_precision(2),
        ColumnDescriptor::new("COLTINYINT", "SB1", "FIXED")
            .with_nullable(false)
            .with_precision(2),
        ColumnDescriptor::new("COLSMALLINT", "SB2", "FIXED")
            .with_nullable(false)
            .with_precision(4),
        ColumnDescriptor::new("COLINT", "SB4", "FIXED")
            .with_nullable(false)
            .with_precision(9),
        ColumnDescriptor::new("COLBIGINT", "SB8", "FIXED")
            .with_nullable(false)
            .with_precision(18),
        ColumnDescriptor::new("COLDECIMAL", "SB16", "FIXED")
            .with_nullable(false)
            .with_precision(38)
            .with_scale(2),
        ColumnDescriptor::new("COLCHAR", "LOB", "TEXT")
            .with_byte_length(14)
            .with_length(11),
    ]
}

/// A row for [`mixed_schema`] that passes validation.
pub fn mixed_row(
    tiny: i8,
    small: i16,
    int: i32,
    big: i64,
    decimal: f64,
    text: &str,
) -> HashMap<String, Value> {
    row([
        ("\"colTinyInt\"", Value::from(tiny)),
        ("colTinyInt", Value::from(tiny)),
        ("colSmallInt", Value::from(small)),
        ("colInt", Value::from(int)),
        ("colBigInt", Value::from(big)),
        ("colDecimal", Value::from(decimal)),
        ("colChar", Value::from(text)),
    ])
}

/// Build a row map from `(key, value)` pairs.
pub fn row<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> HashMap<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
