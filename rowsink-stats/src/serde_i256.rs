//! `Option<i256>` as an optional decimal string.
//!
//! 256-bit integers do not fit a JSON number, so they travel as text.

use arrow_buffer::i256;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S>(value: &Option<i256>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<i256>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(deserializer)?;
    text.map(|t| {
        i256::from_string(&t).ok_or_else(|| D::Error::custom(format!("invalid integer '{t}'")))
    })
    .transpose()
}
