use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::Bool(value) => Some(value.to_string()),
        Value::Number(value) => Some(value.to_string()),
        Value::String(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Splits a comma separated text into trimmed, non-empty parts.
pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn deserialize_as_option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

/// Treats an explicit `null` like a missing field.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `true`/`false`, numbers (non-zero is `true`) and the strings `"1"`, `"true"` or `"yes"`.
pub fn deserialize_as_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(num)) => num.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
        Some(Value::String(text)) => matches!(text.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    })
}

/// Accepts either a comma separated string (`"a, b"`) or a sequence (`[a, b]`).
pub fn deserialize_as_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => split_comma_list(&text),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(value_to_string)
            .flat_map(|v| split_comma_list(&v))
            .collect(),
        Some(other) => value_to_string(&other).map_or_else(Vec::new, |v| split_comma_list(&v)),
        None => Vec::new(),
    })
}
