use crate::core::patch::Patch;
use serde::de::{self, Deserialize, DeserializeOwned, Deserializer};
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// A JSON number, or a string holding one (HTML inputs send "120")
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn parse_number<T, E>(value: NumberOrString<T>) -> Result<Option<T>, E>
where
    T: FromStr,
    T::Err: Display,
    E: de::Error,
{
    match value {
        NumberOrString::Number(n) => Ok(Some(n)),
        NumberOrString::Text(s) if s.trim().is_empty() => Ok(None),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| E::custom(format!("invalid number '{}': {}", s, e))),
    }
}

/// Optional number that may arrive as a string; empty strings count as missing
pub fn deserialize_number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        Some(value) => parse_number(value),
        None => Ok(None),
    }
}

/// Patch variant of [`deserialize_number_or_string`]; `null` and `""` both clear
pub fn deserialize_patch_number<'de, D, T>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    deserialize_number_or_string(deserializer).map(Patch::from)
}

/// Optional value where a blank string counts as missing (`"estado": ""`)
pub fn deserialize_blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(de::Error::custom),
    }
}

/// Patch variant of [`deserialize_blank_as_none`]
///
/// `null` clears, a blank string leaves the stored value alone (an unselected
/// `<select>` posts `""`).
pub fn deserialize_patch_blank_as_absent<'de, D, T>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None => Ok(Patch::Clear),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(Patch::Absent),
        Some(value) => T::deserialize(value).map(Patch::Set).map_err(de::Error::custom),
    }
}
