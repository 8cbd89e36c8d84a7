//! Goal-tier-scoped milestone model.

use serde::Serialize;

/// Tier-scoped milestones derived from a [`SignalSummary`].
///
/// Every milestone is gated on goal-setting completion and on the tier
/// having at least one subcategory matched by the user's service events.
/// Derived entirely per request; no independent state.
///
/// [`SignalSummary`]: crate::models::SignalSummary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MilestoneSummary {
    pub goal_setting_complete: bool,
    pub tier1_app_registered: bool,
    pub tier2_app_registered: bool,
    pub tier1_app_engaged: bool,
    pub tier2_app_engaged: bool,
    pub tier1_app_engagement_dropoff: bool,
    pub tier2_app_engagement_dropoff: bool,
    pub tier1_app_retained: bool,
    pub tier2_app_retained: bool,
    pub tier1_app_retention_dropoff: bool,
    pub tier2_app_retention_dropoff: bool,
}

impl MilestoneSummary {
    /// True when no milestone has been reached.
    pub fn is_all_false(&self) -> bool {
        self == &Self::default()
    }
}
