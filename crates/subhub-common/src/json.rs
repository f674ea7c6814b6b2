//! `serde_json::Value` utility functions.
//!
//! Webhook payloads arrive untyped, so every field read goes through these
//! helpers: string conversions, numeric coercion and blank detection.

use serde_json::Value;

/// Converts a JSON value to a `String` representation.
///
/// Returns an empty string for `Null`. Strings are returned as-is, numbers and
/// booleans use their JSON text, arrays and objects are rendered compactly.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use subhub_common::value_to_string;
///
/// assert_eq!(value_to_string(&json!(null)), "");
/// assert_eq!(value_to_string(&json!(42)), "42");
/// assert_eq!(value_to_string(&json!("hello")), "hello");
/// assert_eq!(value_to_string(&json!(true)), "true");
/// ```
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts a value to a trimmed `String`, returning `None` if the result is blank.
pub fn value_to_string_non_empty(value: &Value) -> Option<String> {
    let s = value_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// True for `null` and for strings that are empty after trimming.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Short name of the JSON type, used in diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts a value to `i64`, returning `None` for non-numeric or null values.
///
/// Handles integers, floats (truncated) and numeric strings.
pub fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|v| i64::try_from(v).ok()))
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v as i64)),
        Value::String(s) => {
            parse_i64(s).or_else(|| parse_f64(s).filter(|v| v.is_finite()).map(|v| v as i64))
        }
        _ => None,
    }
}

/// Converts a value to `u64`, returning `None` for negative, non-numeric or null values.
///
/// Unsigned integers above `i64::MAX` keep their full value.
pub fn value_to_u64(value: &Value) -> Option<u64> {
    let exact = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    exact.or_else(|| value_to_i64(value).and_then(|v| u64::try_from(v).ok()))
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
