//! Signal evaluators.
//!
//! Seven state-free rules over normalized events. Empty input is never an
//! error: every evaluator has a defined result for zero events, and the
//! "all buckets non-empty" checks evaluate every required bucket so that
//! empty weeks count as inactive rather than vacuously satisfied.
//! (The seventh signal, goal-setting-completed, is a goal-store existence
//! check and lives on the [`GoalStore`](crate::sources::GoalStore) trait.)

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use crate::engine::buckets::bucketize;
use crate::models::{
    NormalizedEvent, RegistrationEvaluation, RegistrationThresholds, SignalThresholds,
};

/// Consecutive active weeks required for the engaged signal.
const ENGAGED_WEEKS: usize = 3;

/// Consecutive active weeks required for the retained signal.
const RETAINED_WEEKS: usize = 9;

/// Window inspected for retention dropoff: nine prior weeks plus the
/// current one.
const RETENTION_DROPOFF_WEEKS: usize = RETAINED_WEEKS + 1;

/// True when any event reaches the login foreground-minutes threshold.
///
/// Uses resolved duration directly; a timestamp is not required.
pub fn login_completed(events: &[NormalizedEvent], thresholds: &SignalThresholds) -> bool {
    events
        .iter()
        .any(|event| event.minutes >= thresholds.login_min_minutes)
}

/// Registration check: the user must have used the app at all, and either
/// the max foreground minutes or the count of distinct sessions within the
/// last 7 days must reach its threshold.
pub fn registration_completed(
    events: &[NormalizedEvent],
    now: DateTime<Utc>,
    thresholds: &SignalThresholds,
) -> RegistrationEvaluation {
    let cutoff = now - Duration::days(7);

    let max_minutes = events.iter().map(|e| e.minutes).fold(0.0_f64, f64::max);

    let recent_sessions: HashSet<&str> = events
        .iter()
        .filter(|e| e.timestamp.is_some_and(|ts| ts >= cutoff))
        .map(|e| e.session_id.as_str())
        .collect();
    let weekly_sessions = recent_sessions.len();

    let used_app = !events.is_empty();
    let meets_minutes_threshold = max_minutes >= thresholds.registration_min_minutes;
    let meets_weekly_threshold = weekly_sessions >= thresholds.registration_min_weekly_sessions;
    // used_app is a hard precondition: an inactive user never registers
    // even if stale metrics would otherwise clear a threshold.
    let completed = used_app && (meets_minutes_threshold || meets_weekly_threshold);

    RegistrationEvaluation {
        event_count: events.len(),
        max_minutes,
        weekly_sessions,
        thresholds: RegistrationThresholds {
            min_foreground_minutes: thresholds.registration_min_minutes,
            min_weekly_sessions: thresholds.registration_min_weekly_sessions,
        },
        used_app,
        meets_minutes_threshold,
        meets_weekly_threshold,
        completed,
    }
}

/// Three consecutive active weeks, including the current one.
pub fn engaged(events: &[NormalizedEvent], now: DateTime<Utc>) -> bool {
    bucketize(events, now, ENGAGED_WEEKS)
        .iter()
        .all(|bucket| !bucket.is_empty())
}

/// Activity last week, silence this week.
pub fn engagement_dropoff(events: &[NormalizedEvent], now: DateTime<Utc>) -> bool {
    let buckets = bucketize(events, now, 2);
    !buckets[1].is_empty() && buckets[0].is_empty()
}

/// Nine consecutive active weeks, including the current one.
pub fn retained(events: &[NormalizedEvent], now: DateTime<Utc>) -> bool {
    bucketize(events, now, RETAINED_WEEKS)
        .iter()
        .all(|bucket| !bucket.is_empty())
}

/// Nine prior active weeks followed by a silent current week.
pub fn retained_dropoff(events: &[NormalizedEvent], now: DateTime<Utc>) -> bool {
    let buckets = bucketize(events, now, RETENTION_DROPOFF_WEEKS);
    let previous_nine_active = buckets[1..].iter().all(|bucket| !bucket.is_empty());
    previous_nine_active && buckets[0].is_empty()
}
