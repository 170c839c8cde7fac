//! API models for request and response payloads

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use std::{fmt::Display, str::FromStr};

pub mod survey;
pub mod user;

/// Deserialize an optional field that browser forms may send as `""`, as a
/// quoted string, or as a bare JSON number.
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => raw.trim().parse().map(Some).map_err(de::Error::custom),
        Some(Value::Number(number)) => number
            .to_string()
            .parse()
            .map(Some)
            .map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!("unexpected value: {}", other))),
    }
}
