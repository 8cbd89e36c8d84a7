//! Event normalization.
//!
//! Raw events arrive with arbitrary key casing and several timestamp and
//! duration encodings. Normalization resolves each record to a canonical
//! shape; malformed or missing fields degrade to absent/zero so one corrupt
//! event never aborts evaluation of the rest.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::{NormalizedEvent, RawEvent};

/// Epoch values above this are milliseconds, not seconds.
const EPOCH_MILLIS_CUTOFF: f64 = 1e12;

/// Session bucket for events that carry no identifier at all.
pub const UNKNOWN_SESSION: &str = "unknown-session";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Resolve a raw event to its canonical shape.
pub fn normalize(event: &RawEvent) -> NormalizedEvent {
    NormalizedEvent {
        timestamp: resolve_timestamp(event),
        minutes: resolve_minutes(event),
        session_id: resolve_session_id(event),
        package: resolve_package(event),
    }
}

/// Timestamp candidates in priority order; the first parseable one wins.
fn resolve_timestamp(event: &RawEvent) -> Option<DateTime<Utc>> {
    if let Some(ts) = event.field("timestamp").and_then(timestamp_from_value) {
        return Some(ts);
    }
    if let Some(ts) = event.f64_field("last_time_used").and_then(parse_epoch) {
        return Some(ts);
    }
    if let Some(ts) = event
        .str_field("last_time_used_formatted")
        .and_then(parse_datetime_str)
    {
        return Some(ts);
    }
    if let Some(ts) = event.str_field("date").and_then(parse_date_str) {
        return Some(ts);
    }
    for key in ["created_at", "updated_at"] {
        if let Some(ts) = event.field(key).and_then(timestamp_from_value) {
            return Some(ts);
        }
    }
    None
}

/// Duration candidates in priority order; first positive value wins.
fn resolve_minutes(event: &RawEvent) -> f64 {
    const CANDIDATES: &[(&str, f64)] = &[
        ("total_time_in_foreground_minutes", 1.0),
        ("total_time_in_foreground", 1.0),
        ("total_time_in_foreground_ms", 60_000.0),
    ];

    for (key, divisor) in CANDIDATES {
        if let Some(raw) = event.f64_field(key) {
            let minutes = raw / divisor;
            if minutes > 0.0 {
                return minutes;
            }
        }
    }
    0.0
}

/// Session identifier, falling back to the record id so every counted
/// event occupies a session bucket.
fn resolve_session_id(event: &RawEvent) -> String {
    for key in ["session_id", "id", "document_id"] {
        if let Some(s) = event.str_field(key) {
            return s.to_string();
        }
        // Row ids may arrive as numbers.
        if let Some(value) = event.field(key) {
            if let Some(n) = value.as_i64() {
                return n.to_string();
            }
        }
    }
    UNKNOWN_SESSION.to_string()
}

fn resolve_package(event: &RawEvent) -> String {
    for key in ["package_name", "app_id", "app"] {
        if let Some(s) = event.str_field(key) {
            return s.to_string();
        }
    }
    String::new()
}

/// Parse an epoch value, correcting millisecond-encoded inputs.
fn parse_epoch(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let secs = if ts > EPOCH_MILLIS_CUTOFF {
        ts / 1000.0
    } else {
        ts
    };
    let millis = (secs * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}

/// Coerce a JSON value to a timestamp: epoch number, ISO-8601 string, or
/// numeric string.
fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => parse_epoch(n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            parse_datetime_str(s).or_else(|| s.parse::<f64>().ok().and_then(parse_epoch))
        }
        _ => None,
    }
}
