//! Lenient field accessors over untyped JSON.

use serde_json::Value;

/// Read a numeric field as a timestamp.
///
/// Strings are never coerced: exports that store `"1700000000"` in a
/// timestamp field are treated as if the field were absent.
pub fn timestamp(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(as_timestamp)
}

/// Numeric JSON values as whole timestamps. Fractional parts are truncated,
/// so `1500.2` and `1500.9` compare equal.
pub fn as_timestamp(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64()
        .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
        .or_else(|| n.as_f64().map(|f| f as i64))
}

/// Read a string field.
pub fn string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Read a string field, treating the empty string as absent.
pub fn non_empty_string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    string(value, key).filter(|s| !s.is_empty())
}

/// Read an array field, yielding an empty slice when absent or mistyped.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Whether a `data` entry survives pruning: an object or array with at
/// least one entry. `{}`, `[]` and scalars are structural noise.
pub fn has_entries(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Whether a marker value counts as present. `null`, `false`, `0` and `""`
/// do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
