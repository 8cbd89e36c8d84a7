//! Collaborator traits for the external event and goal stores.
//!
//! The engine performs no I/O itself; both stores are injected handles
//! with explicit lifecycle, created at process start by the boundary layer.

use async_trait::async_trait;

use crate::error::SignalError;
use crate::models::{GoalTierMap, PackageGoalMap, RawEvent};

/// Source of raw app-usage events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch all events for one user, newest first.
    async fn fetch_events(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<RawEvent>, SignalError>;

    /// List user ids known to the event store, for batch evaluation.
    async fn list_user_ids(&self, limit: Option<i64>) -> Result<Vec<String>, SignalError>;
}

/// Source of user-selected goals and goal-to-app-category mappings.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// The user's goal subcategories grouped by tier.
    async fn goal_tiers(&self, user_id: &str) -> Result<GoalTierMap, SignalError>;

    /// Map app packages to the goal subcategories they satisfy.
    async fn packages_to_subcategories(
        &self,
        packages: &[String],
    ) -> Result<PackageGoalMap, SignalError>;

    /// Whether at least one goal is linked to the user (or to any user
    /// when no user id is given).
    async fn goal_exists(&self, user_id: Option<&str>) -> Result<bool, SignalError>;
}
