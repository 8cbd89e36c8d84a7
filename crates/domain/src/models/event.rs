//! Raw and normalized app-usage events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One observed app-usage record, consumed as-is from the event source.
///
/// Producers have shipped several field-naming conventions over time
/// (snake_case Postgres columns, camelCase Firestore documents), so the
/// record is an open mapping and lookups tolerate both spellings. Unknown
/// extra fields are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent(Map<String, Value>);

impl RawEvent {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; non-object values yield an empty event.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Look up a field by its canonical snake_case name, falling back to
    /// the camelCase alias (`last_time_used` also matches `lastTimeUsed`).
    pub fn field(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(name) {
            if !value.is_null() {
                return Some(value);
            }
        }
        let alias = camel_alias(name);
        self.0.get(&alias).filter(|v| !v.is_null())
    }

    /// Field value as a non-empty string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Field value as a float, accepting numbers and numeric strings.
    pub fn f64_field(&self, name: &str) -> Option<f64> {
        match self.field(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for RawEvent {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Convert a snake_case field name to its camelCase alias.
fn camel_alias(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Canonical shape of one event after field resolution.
///
/// `timestamp` is absent when no candidate field parsed; such an event is
/// excluded from every time-based computation but may still count toward
/// duration-only checks.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub timestamp: Option<DateTime<Utc>>,
    /// Foreground time in minutes; never negative, 0.0 when unresolvable.
    pub minutes: f64,
    pub session_id: String,
    /// Package identifier of the app that produced the event; empty when
    /// the record carried none.
    pub package: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_alias() {
        assert_eq!(camel_alias("last_time_used"), "lastTimeUsed");
        assert_eq!(camel_alias("session_id"), "sessionId");
        assert_eq!(camel_alias("date"), "date");
        assert_eq!(
            camel_alias("total_time_in_foreground_ms"),
            "totalTimeInForegroundMs"
        );
    }

    #[test]
    fn test_field_prefers_snake_case() {
        let mut event = RawEvent::new();
        event.insert("session_id", json!("snake"));
        event.insert("sessionId", json!("camel"));
        assert_eq!(event.str_field("session_id"), Some("snake"));
    }

    #[test]
    fn test_field_falls_back_to_camel_case() {
        let mut event = RawEvent::new();
        event.insert("sessionId", json!("camel"));
        assert_eq!(event.str_field("session_id"), Some("camel"));
    }

    #[test]
    fn test_field_skips_null_snake_value() {
        let mut event = RawEvent::new();
        event.insert("package_name", Value::Null);
        event.insert("packageName", json!("com.example.app"));
        assert_eq!(event.str_field("package_name"), Some("com.example.app"));
    }

    #[test]
    fn test_f64_field_accepts_numeric_strings() {
        let mut event = RawEvent::new();
        event.insert("total_time_in_foreground", json!("12.5"));
        assert_eq!(event.f64_field("total_time_in_foreground"), Some(12.5));
    }

    #[test]
    fn test_f64_field_rejects_garbage() {
        let mut event = RawEvent::new();
        event.insert("total_time_in_foreground", json!("soon"));
        assert_eq!(event.f64_field("total_time_in_foreground"), None);
    }

    #[test]
    fn test_str_field_trims_and_rejects_empty() {
        let mut event = RawEvent::new();
        event.insert("session_id", json!("  "));
        assert_eq!(event.str_field("session_id"), None);
    }

    #[test]
    fn test_from_value_non_object() {
        let event = RawEvent::from_value(json!([1, 2, 3]));
        assert_eq!(event, RawEvent::new());
    }
}
