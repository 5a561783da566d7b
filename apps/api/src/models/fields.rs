//! Permissive field coercion for model-produced and stored documents.
//!
//! Nothing here ever fails: a value of the wrong shape degrades to `None` or an
//! empty list instead of rejecting the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Flattens a JSON value for a table cell: lists joined with ", ", objects as JSON.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_cell)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
    }
}

pub fn text_from(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(display_cell(other)),
    }
}

pub fn list_from(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(display_cell)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

pub fn score_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
            })
        }
        _ => None,
    }
}

pub fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text_from(&Value::deserialize(deserializer)?))
}

pub fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(list_from(&Value::deserialize(deserializer)?))
}

pub fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(score_from(&Value::deserialize(deserializer)?))
}
