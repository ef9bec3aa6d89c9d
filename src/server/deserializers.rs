use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;
use serde_json::Value;

// clients send ids and numbers either as JSON numbers or as strings ("1"),
// both have to end up as i64
pub fn deserialize_i64_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| de::Error::invalid_value(Unexpected::Other("number"), &"an integer")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"an integer")),
        other => Err(de::Error::invalid_type(unexpected(&other), &"an integer")),
    }
}

// labels are only displayed: strings as they are, anything else as JSON text
pub fn deserialize_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// `?page=abc` falls back to the first page instead of rejecting the request
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
        Value::String(s) => Unexpected::Str(s),
        Value::Number(_) => Unexpected::Other("number"),
    }
}
