//! Engagement signal route handlers.
//!
//! Each signal has its own GET route returning `{<signal_name>: bool}` for a
//! single user, or `{<signal_name>: {user_id: bool}}` when several users are
//! requested. `/signals` returns the full per-user summary.

use axum::{extract::State, Json};
use axum_extra::extract::Query;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_signal_summary_built;
use domain::models::SignalSummary;

/// Query parameters shared by all signal routes.
///
/// `user_id` may be repeated (`?user_id=a&user_id=b`) and each value may
/// itself be a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserIdQuery {
    #[serde(default)]
    pub user_id: Vec<String>,
}

/// Resolve the requested user ids.
///
/// Splits comma-separated values, trims whitespace, drops empties and
/// deduplicates while preserving order. Falls back to the configured
/// default user id when the request names none; fails with a validation
/// error when neither is available.
pub fn resolve_user_ids(
    query: &UserIdQuery,
    default_user_id: Option<&str>,
) -> Result<Vec<String>, ApiError> {
    let mut user_ids: Vec<String> = query
        .user_id
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if user_ids.is_empty() {
        if let Some(default) = default_user_id.map(str::trim).filter(|s| !s.is_empty()) {
            user_ids.push(default.to_string());
        }
    }

    if user_ids.is_empty() {
        return Err(ApiError::Validation(
            "user_id is required: pass ?user_id=... or configure signals.default_user_id".into(),
        ));
    }

    let mut seen = HashSet::new();
    user_ids.retain(|id| seen.insert(id.clone()));

    Ok(user_ids)
}

/// Shape the per-user boolean results into the response body.
///
/// A single user is inlined as a bare boolean; several users become a
/// `{user_id: bool}` object.
fn signal_body(signal_name: &str, mut results: Vec<(String, bool)>) -> Json<Value> {
    let value = if results.len() == 1 {
        Value::Bool(results.remove(0).1)
    } else {
        Value::Object(
            results
                .into_iter()
                .map(|(user_id, value)| (user_id, Value::Bool(value)))
                .collect(),
        )
    };

    let mut body = Map::new();
    body.insert(signal_name.to_string(), value);
    Json(Value::Object(body))
}

/// Evaluate one signal for every requested user.
async fn evaluate_signal<F>(
    state: &AppState,
    query: &UserIdQuery,
    signal_name: &'static str,
    extract: F,
) -> Result<Json<Value>, ApiError>
where
    F: Fn(&SignalSummary) -> bool,
{
    let user_ids = resolve_user_ids(query, state.config.signals.default_user_id.as_deref())?;
    let now = Utc::now();

    let mut results = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let summary = state.engine.build_summary(&user_id, now).await?;
        record_signal_summary_built(signal_name);
        results.push((user_id, extract(&summary)));
    }

    Ok(signal_body(signal_name, results))
}

/// GET /goal-setting-completed
///
/// Unlike the usage-based signals, this only consults the goal store.
pub async fn goal_setting_completed(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_ids = resolve_user_ids(&query, state.config.signals.default_user_id.as_deref())?;

    let mut results = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let completed = state.goals.goal_exists(Some(&user_id)).await?;
        record_signal_summary_built("goal_setting_completed");
        results.push((user_id, completed));
    }

    Ok(signal_body("goal_setting_completed", results))
}

/// GET /customer-app-login-completed
pub async fn login_completed(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    evaluate_signal(&state, &query, "customer_app_login_completed", |s| {
        s.login_completed
    })
    .await
}

/// GET /customer-app-registration-completed
pub async fn registration_completed(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    evaluate_signal(&state, &query, "customer_app_registration_completed", |s| {
        s.registration_completed()
    })
    .await
}

/// GET /customer-app-engaged
pub async fn engaged(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    evaluate_signal(&state, &query, "customer_app_engaged", |s| s.engaged).await
}

/// GET /customer-app-engagement-dropoff
pub async fn engagement_dropoff(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    evaluate_signal(&state, &query, "customer_app_engagement_dropoff", |s| {
        s.engagement_dropoff
    })
    .await
}

/// GET /customer-app-retained
pub async fn retained(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    evaluate_signal(&state, &query, "customer_app_retained", |s| s.retained).await
}

/// GET /customer-app-retained-dropoff
pub async fn retained_dropoff(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    evaluate_signal(&state, &query, "customer_app_retained_dropoff", |s| {
        s.retained_dropoff
    })
    .await
}

/// GET /signals
///
/// Full signal summary per user; a single user's summary is inlined,
/// several become `{user_id: summary}`.
pub async fn signals_summary(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_ids = resolve_user_ids(&query, state.config.signals.default_user_id.as_deref())?;
    let now = Utc::now();

    let mut per_user = Map::new();
    for user_id in &user_ids {
        let summary = state.engine.build_summary(user_id, now).await?;
        record_signal_summary_built("signals");
        let value = serde_json::to_value(&summary)
            .map_err(|e| ApiError::Internal(format!("serializing summary: {e}")))?;
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

    fn query(values: &[&str]) -> UserIdQuery {
        UserIdQuery {
            user_id: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolve_user_ids_single() {
        let ids = resolve_user_ids(&query(&["user-1"]), None).unwrap();
        assert_eq!(ids, vec!["user-1"]);
    }

    #[test]
    fn test_resolve_user_ids_repeated_params() {
        let ids = resolve_user_ids(&query(&["user-1", "user-2"]), None).unwrap();
        assert_eq!(ids, vec!["user-1", "user-2"]);
    }

    #[test]
    fn test_resolve_user_ids_comma_separated() {
        let ids = resolve_user_ids(&query(&["user-1,user-2, user-3"]), None).unwrap();
        assert_eq!(ids, vec!["user-1", "user-2", "user-3"]);
    }

    #[test]
    fn test_resolve_user_ids_dedupes_preserving_order() {
        let ids = resolve_user_ids(&query(&["b,a", "b", "c,a"]), None).unwrap();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_resolve_user_ids_skips_empty_segments() {
        let ids = resolve_user_ids(&query(&["user-1,,  ,"]), None).unwrap();
        assert_eq!(ids, vec!["user-1"]);
    }

    #[test]
    fn test_resolve_user_ids_falls_back_to_default() {
        let ids = resolve_user_ids(&query(&[]), Some("fallback-user")).unwrap();
        assert_eq!(ids, vec!["fallback-user"]);
    }

    #[test]
    fn test_resolve_user_ids_explicit_wins_over_default() {
        let ids = resolve_user_ids(&query(&["user-1"]), Some("fallback-user")).unwrap();
        assert_eq!(ids, vec!["user-1"]);
    }

    #[test]
    fn test_resolve_user_ids_blank_default_rejected() {
        let result = resolve_user_ids(&query(&[]), Some("   "));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_resolve_user_ids_missing_is_validation_error() {
        let result = resolve_user_ids(&query(&[]), None);
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_signal_body_single_user_inlined() {
        let Json(body) = signal_body("customer_app_engaged", vec![("u1".to_string(), true)]);
        assert_eq!(body["customer_app_engaged"], Value::Bool(true));
    }

    #[test]
    fn test_signal_body_multiple_users_keyed() {
        let Json(body) = signal_body(
            "customer_app_engaged",
            vec![("u1".to_string(), true), ("u2".to_string(), false)],
        );
        assert_eq!(body["customer_app_engaged"]["u1"], Value::Bool(true));
        assert_eq!(body["customer_app_engaged"]["u2"], Value::Bool(false));
    }
}
