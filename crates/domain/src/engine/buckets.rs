//! Week-bucketed session accounting.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::NormalizedEvent;

/// Group distinct session ids into "weeks back" buckets.
///
/// Bucket 0 is the 7-day window ending at `now` (a sliding window, not
/// calendar-week-aligned); bucket `i` is the i-th prior 7-day window.
/// An event counts only when its resolved minutes are positive and its
/// timestamp is present and not in the future. Events whose `weeks_back`
/// falls outside `[0, bucket_count)` are dropped entirely.
pub fn bucketize(
    events: &[NormalizedEvent],
    now: DateTime<Utc>,
    bucket_count: usize,
) -> Vec<HashSet<String>> {
    let mut buckets: Vec<HashSet<String>> = vec![HashSet::new(); bucket_count];

    for event in events {
        if event.minutes <= 0.0 {
            continue;
        }
        let Some(timestamp) = event.timestamp else {
            continue;
        };
        if timestamp > now {
            continue;
        }
        let weeks_back = (now - timestamp).num_days() / 7;
        if let Ok(index) = usize::try_from(weeks_back) {
            if index < bucket_count {
                buckets[index].insert(event.session_id.clone());
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn event(days_ago: i64, minutes: f64, session: &str) -> NormalizedEvent {
        NormalizedEvent {
            timestamp: Some(now() - Duration::days(days_ago)),
            minutes,
            session_id: session.to_string(),
            package: "com.example".to_string(),
        }
    }

    #[test]
    fn test_events_land_in_expected_buckets() {
        let events = vec![event(0, 5.0, "a"), event(7, 5.0, "b"), event(14, 5.0, "c")];
        let buckets = bucketize(&events, now(), 3);
        assert!(buckets[0].contains("a"));
        assert!(buckets[1].contains("b"));
        assert!(buckets[2].contains("c"));
    }

    #[test]
    fn test_repeated_sessions_count_once_per_week() {
        let events = vec![event(1, 5.0, "a"), event(2, 3.0, "a"), event(3, 1.0, "a")];
        let buckets = bucketize(&events, now(), 3);
        assert_eq!(buckets[0].len(), 1);
    }

    #[test]
    fn test_zero_minute_events_are_dropped() {
        let events = vec![event(1, 0.0, "a"), event(1, -2.0, "b")];
        let buckets = bucketize(&events, now(), 3);
        assert!(buckets[0].is_empty());
    }

    #[test]
    fn test_events_without_timestamp_are_dropped() {
        let events = vec![NormalizedEvent {
            timestamp: None,
            minutes: 10.0,
            session_id: "a".to_string(),
            package: String::new(),
        }];
        let buckets = bucketize(&events, now(), 3);
        assert!(buckets.iter().all(HashSet::is_empty));
    }

    #[test]
    fn test_out_of_range_events_are_excluded_entirely() {
        let events = vec![event(30, 5.0, "old")];
        let buckets = bucketize(&events, now(), 3);
        assert!(buckets.iter().all(HashSet::is_empty));
    }

    #[test]
    fn test_future_events_are_dropped() {
        let events = vec![event(-3, 5.0, "future")];
        let buckets = bucketize(&events, now(), 3);
        assert!(buckets.iter().all(HashSet::is_empty));
    }

    #[test]
    fn test_bucket_boundary_is_seven_days() {
        // 6 days back is still week 0; 7 days back tips into week 1.
        let events = vec![event(6, 1.0, "edge0"), event(7, 1.0, "edge1")];
        let buckets = bucketize(&events, now(), 2);
        assert!(buckets[0].contains("edge0"));
        assert!(buckets[1].contains("edge1"));
    }

    #[test]
    fn test_requested_length_is_always_honored() {
        let buckets = bucketize(&[], now(), 9);
        assert_eq!(buckets.len(), 9);
    }
}
