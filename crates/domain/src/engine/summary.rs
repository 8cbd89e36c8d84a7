//! Signal summary orchestration.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::engine::{evaluators, milestones, normalize};
use crate::error::SignalError;
use crate::models::{
    MilestoneSummary, NormalizedEvent, PackageGoalMap, SignalSummary, SignalThresholds,
};
use crate::sources::{EventSource, GoalStore};

/// Orchestrates one summary build per user: fetch events, filter to the
/// user's goal-relevant "service" events, run every evaluator, assemble
/// the result. Stateless across users; safe to share between requests.
pub struct SignalEngine {
    events: Arc<dyn EventSource>,
    goals: Arc<dyn GoalStore>,
    thresholds: SignalThresholds,
}

impl SignalEngine {
    pub fn new(
        events: Arc<dyn EventSource>,
        goals: Arc<dyn GoalStore>,
        thresholds: SignalThresholds,
    ) -> Self {
        Self {
            events,
            goals,
            thresholds,
        }
    }

    /// Build the signal summary for one user at the given instant.
    ///
    /// All-or-nothing: collaborator failures propagate, a corrupt event
    /// does not (the normalizer degrades it instead).
    pub async fn build_summary(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SignalSummary, SignalError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(SignalError::Configuration(
                "user_id must not be empty".to_string(),
            ));
        }

        let raw_events = self.events.fetch_events(user_id, None).await?;
        let normalized: Vec<NormalizedEvent> = raw_events.iter().map(normalize::normalize).collect();

        let tiers = self.goals.goal_tiers(user_id).await?;
        let goal_subcategories = tiers.flatten();

        let packages: Vec<String> = normalized
            .iter()
            .map(|e| e.package.as_str())
            .filter(|p| !p.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let package_map = if packages.is_empty() {
            PackageGoalMap::new()
        } else {
            self.goals.packages_to_subcategories(&packages).await?
        };

        // Service events: the event's package must map to at least one
        // subcategory the user selected a goal for. No goals means no
        // service events, which leaves every bucketed signal false.
        let mut service_subcategories: BTreeSet<String> = BTreeSet::new();
        let mut service_events: Vec<NormalizedEvent> = Vec::new();
        for event in &normalized {
            let Some(subcategories) = package_map.subcategories_for(&event.package) else {
                continue;
            };
            let matched: Vec<&String> = subcategories.intersection(&goal_subcategories).collect();
            if matched.is_empty() {
                continue;
            }
            service_subcategories.extend(matched.into_iter().cloned());
            service_events.push(event.clone());
        }

        let goal_setting_completed = self.goals.goal_exists(Some(user_id)).await?;
        let registration =
            evaluators::registration_completed(&service_events, now, &self.thresholds);

        let summary = SignalSummary {
            user_id: user_id.to_string(),
            event_count: raw_events.len(),
            service_event_count: service_events.len(),
            goal_setting_completed,
            login_completed: evaluators::login_completed(&service_events, &self.thresholds),
            registration,
            engaged: evaluators::engaged(&service_events, now),
            engagement_dropoff: evaluators::engagement_dropoff(&service_events, now),
            retained: evaluators::retained(&service_events, now),
            retained_dropoff: evaluators::retained_dropoff(&service_events, now),
            tiers,
            service_subcategories,
        };

        debug!(
            user_id = %summary.user_id,
            event_count = summary.event_count,
            service_event_count = summary.service_event_count,
            "Built signal summary"
        );

        Ok(summary)
    }

    /// Build the signal summary and the milestones derived from it.
    pub async fn build_milestones(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(SignalSummary, MilestoneSummary), SignalError> {
        let summary = self.build_summary(user_id, now).await?;
        let milestones = milestones::build_milestone_summary(&summary);
        Ok((summary, milestones))
    }
}
