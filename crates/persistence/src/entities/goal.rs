//! Goal-store row mappings.

use sqlx::FromRow;

/// One user-goal row joined to its goal subcategory.
#[derive(Debug, Clone, FromRow)]
pub struct GoalTierRow {
    /// Relationship label (`primary`, `secondary`, `tertiary`).
    pub relationship: Option<String>,
    pub goal_subcategory_id: Option<String>,
}

/// One app-to-goal-subcategory mapping row.
#[derive(Debug, Clone, FromRow)]
pub struct PackageGoalRow {
    pub app_id: Option<String>,
    pub goal_subcategory_id: Option<String>,
}
