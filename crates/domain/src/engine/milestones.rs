//! Milestone composition.
//!
//! Intersects engagement signals with goal-tier membership: a milestone
//! fires only when goal setting is complete, the underlying signal is true,
//! and the tier has at least one subcategory matched by the user's service
//! events.

use std::collections::BTreeSet;

use crate::models::{GoalTier, MilestoneSummary, SignalSummary};

/// Derive the tier-scoped milestones from a signal summary.
pub fn build_milestone_summary(summary: &SignalSummary) -> MilestoneSummary {
    let goal_setting = summary.goal_setting_completed;
    let registered = summary.registration_completed();

    let tier1_active = tier_has_matching_events(
        summary.tiers.get(GoalTier::Tier1),
        &summary.service_subcategories,
    );
    let tier2_active = tier_has_matching_events(
        summary.tiers.get(GoalTier::Tier2),
        &summary.service_subcategories,
    );

    MilestoneSummary {
        goal_setting_complete: goal_setting,
        tier1_app_registered: goal_setting && registered && tier1_active,
        tier2_app_registered: goal_setting && registered && tier2_active,
        tier1_app_engaged: goal_setting && summary.engaged && tier1_active,
        tier2_app_engaged: goal_setting && summary.engaged && tier2_active,
        tier1_app_engagement_dropoff: goal_setting && summary.engagement_dropoff && tier1_active,
        tier2_app_engagement_dropoff: goal_setting && summary.engagement_dropoff && tier2_active,
        tier1_app_retained: goal_setting && summary.retained && tier1_active,
        tier2_app_retained: goal_setting && summary.retained && tier2_active,
        tier1_app_retention_dropoff: goal_setting && summary.retained_dropoff && tier1_active,
        tier2_app_retention_dropoff: goal_setting && summary.retained_dropoff && tier2_active,
    }
}

/// Both sets must be non-empty and share at least one subcategory.
fn tier_has_matching_events(
    tier_subcategories: &BTreeSet<String>,
    event_subcategories: &BTreeSet<String>,
) -> bool {
    if tier_subcategories.is_empty() || event_subcategories.is_empty() {
        return false;
    }
    !tier_subcategories.is_disjoint(event_subcategories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        GoalTier, GoalTierMap, RegistrationEvaluation, RegistrationThresholds,
    };

    fn summary(goal_setting: bool) -> SignalSummary {
        let mut tiers = GoalTierMap::default();
        tiers.insert(GoalTier::Tier1, "fitness");
        tiers.insert(GoalTier::Tier2, "reading");

        SignalSummary {
            user_id: "user-1".to_string(),
            event_count: 4,
            service_event_count: 4,
            goal_setting_completed: goal_setting,
            login_completed: true,
            registration: RegistrationEvaluation {
                event_count: 4,
                max_minutes: 6.0,
                weekly_sessions: 2,
                thresholds: RegistrationThresholds {
                    min_foreground_minutes: 4.0,
                    min_weekly_sessions: 4,
                },
                used_app: true,
                meets_minutes_threshold: true,
                meets_weekly_threshold: false,
                completed: true,
            },
            engaged: true,
            engagement_dropoff: false,
            retained: false,
            retained_dropoff: false,
            tiers,
            service_subcategories: ["fitness".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_goal_setting_gates_every_milestone() {
        let milestones = build_milestone_summary(&summary(false));
        assert!(milestones.is_all_false());
    }

    #[test]
    fn test_tier1_milestones_require_tier1_match() {
        let milestones = build_milestone_summary(&summary(true));
        assert!(milestones.tier1_app_registered);
        assert!(milestones.tier1_app_engaged);
        // tier2 (reading) has no matching service events.
        assert!(!milestones.tier2_app_registered);
        assert!(!milestones.tier2_app_engaged);
    }

    #[test]
    fn test_signal_false_keeps_milestone_false() {
        let milestones = build_milestone_summary(&summary(true));
        assert!(!milestones.tier1_app_retained);
        assert!(!milestones.tier1_app_engagement_dropoff);
        assert!(!milestones.tier1_app_retention_dropoff);
    }

    #[test]
    fn test_empty_service_subcategories_never_activate_a_tier() {
        let mut s = summary(true);
        s.service_subcategories.clear();
        let milestones = build_milestone_summary(&s);
        assert!(milestones.goal_setting_complete);
        assert!(!milestones.tier1_app_registered);
        assert!(!milestones.tier2_app_registered);
    }

    #[test]
    fn test_empty_tier_never_activates() {
        let mut s = summary(true);
        s.tiers = GoalTierMap::default();
        let milestones = build_milestone_summary(&s);
        assert!(!milestones.tier1_app_engaged);
        assert!(!milestones.tier2_app_engaged);
    }

    #[test]
    fn test_registered_milestone_implies_goal_setting() {
        for goal_setting in [false, true] {
            let milestones = build_milestone_summary(&summary(goal_setting));
            if milestones.tier1_app_registered {
                assert!(milestones.goal_setting_complete);
            }
        }
    }
}
