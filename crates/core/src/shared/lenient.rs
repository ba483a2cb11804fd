//! Field deserializers for service bodies that must degrade rather than
//! fail: one bad element turns the whole list into "nothing found".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A list of `T`, or an empty list when the field is not an array or any
/// element does not parse.
pub(crate) fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            log::warn!("Expected a list in service response, got {other}; treating as empty");
            return Ok(Vec::new());
        }
    };
    match items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
    {
        Ok(list) => Ok(list),
        Err(e) => {
            log::warn!("Malformed element in service response ({e}); treating as empty");
            Ok(Vec::new())
        }
    }
}

/// A number, or `None` for anything else.
pub(crate) fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}
