//! Lenient deserialisers for loosely-typed upstream JSON.
//!
//! Case files and critic output come from OCR pipelines and LLMs, so scalar
//! fields arrive as strings, numbers or `null` interchangeably and list
//! elements are occasionally the wrong shape. These helpers absorb that noise
//! at the boundary instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialise a scalar into `Option<String>`.
///
/// Strings are kept as-is unless blank; numbers and booleans are rendered
/// with their JSON text; `null`, arrays and objects become `None`.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_text))
}

/// Deserialise a scalar into `String`, mapping anything unusable to `""`.
pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_text(deserializer).map(Option::unwrap_or_default)
}

/// Deserialise an object that may be `null`, falling back to `T::default()`.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialise a sequence, silently skipping elements that do not fit `T`.
///
/// A missing or non-array value yields an empty vector.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
