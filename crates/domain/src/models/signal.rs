//! Signal summary models and evaluator thresholds.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::goal::GoalTierMap;

/// Thresholds injected into the signal evaluators.
///
/// Defaults match the documented product values: 1 foreground minute for
/// login, 4 foreground minutes or 4 weekly sessions for registration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub login_min_minutes: f64,
    pub registration_min_minutes: f64,
    pub registration_min_weekly_sessions: usize,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            login_min_minutes: 1.0,
            registration_min_minutes: 4.0,
            registration_min_weekly_sessions: 4,
        }
    }
}

/// Thresholds echoed back in the registration evaluation payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegistrationThresholds {
    pub min_foreground_minutes: f64,
    pub min_weekly_sessions: usize,
}

/// Structured result of the registration-completed evaluator.
///
/// Carries the raw metrics alongside the verdict so callers can inspect
/// which branch of the threshold OR fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationEvaluation {
    pub event_count: usize,
    pub max_minutes: f64,
    pub weekly_sessions: usize,
    pub thresholds: RegistrationThresholds,
    pub used_app: bool,
    pub meets_minutes_threshold: bool,
    pub meets_weekly_threshold: bool,
    pub completed: bool,
}

/// Per-user engagement signals for one evaluation instant.
///
/// Built fresh on every request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SignalSummary {
    pub user_id: String,
    /// Events fetched from the event source before goal filtering.
    pub event_count: usize,
    /// Events whose package maps to at least one of the user's goal
    /// subcategories ("service events"); all evaluators run over these.
    pub service_event_count: usize,
    pub goal_setting_completed: bool,
    pub login_completed: bool,
    pub registration: RegistrationEvaluation,
    pub engaged: bool,
    pub engagement_dropoff: bool,
    pub retained: bool,
    pub retained_dropoff: bool,
    /// The user's goal subcategories grouped by tier.
    pub tiers: GoalTierMap,
    /// Subcategories satisfied by the apps seen in the service events.
    pub service_subcategories: BTreeSet<String>,
}

impl SignalSummary {
    pub fn registration_completed(&self) -> bool {
        self.registration.completed
    }
}
