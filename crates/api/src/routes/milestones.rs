//! Milestone route handler.

use axum::{extract::State, Json};
use axum_extra::extract::Query;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_milestone_summary_built;
use crate::routes::signals::{resolve_user_ids, UserIdQuery};
use domain::models::{MilestoneSummary, SignalSummary};

/// Signals and derived milestones for one user.
#[derive(Debug, Serialize)]
pub struct MilestoneResponse {
    pub user_id: String,
    pub signals: SignalSummary,
    pub milestones: MilestoneSummary,
}

/// GET /milestones
///
/// A single user's response is inlined; several users become a
/// `{user_id: response}` object.
pub async fn milestones_summary(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_ids = resolve_user_ids(&query, state.config.signals.default_user_id.as_deref())?;
    let now = Utc::now();

    let mut per_user = Map::new();
    for user_id in &user_ids {
        let (signals, milestones) = state.engine.build_milestones(user_id, now).await?;
        record_milestone_summary_built();

        let response = MilestoneResponse {
            user_id: user_id.clone(),
            signals,
            milestones,
        };
        let value = serde_json::to_value(&response)
            .map_err(|e| ApiError::Internal(format!("serializing milestones: {e}")))?;
        per_user.insert(user_id.clone(), value);
    }

    let body = if per_user.len() == 1 {
        per_user.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
    } else {
        Value::Object(per_user)
    };

    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::GoalTierMap;
    use std::collections::BTreeSet;

    #[test]
    fn test_milestone_response_serialization() {
        let response = MilestoneResponse {
            user_id: "user-1".to_string(),
            signals: SignalSummary {
                user_id: "user-1".to_string(),
                event_count: 3,
                service_event_count: 2,
                goal_setting_completed: true,
                login_completed: true,
                registration: domain::engine::evaluators::registration_completed(
                    &[],
                    Utc::now(),
                    &domain::models::SignalThresholds::default(),
                ),
                engaged: false,
                engagement_dropoff: false,
                retained: false,
                retained_dropoff: false,
                tiers: GoalTierMap::default(),
                service_subcategories: BTreeSet::new(),
            },
            milestones: MilestoneSummary::default(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["signals"]["event_count"], 3);
        assert_eq!(json["milestones"]["goal_setting_complete"], false);
    }
}
