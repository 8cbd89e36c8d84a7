//! Periodic batch evaluation of signals and milestones.
//!
//! Lists known user ids from the event source and computes the full
//! signal and milestone summary for each, so results show up in logs and
//! metrics without anyone polling the HTTP routes.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use domain::engine::SignalEngine;
use domain::sources::EventSource;

use super::scheduler::{Job, JobFrequency};
use crate::config::JobsConfig;
use crate::middleware::metrics::record_sweep_run;

pub struct SignalSweepJob {
    engine: Arc<SignalEngine>,
    events: Arc<dyn EventSource>,
    interval_minutes: u64,
    user_limit: i64,
}

impl SignalSweepJob {
    pub fn new(engine: Arc<SignalEngine>, events: Arc<dyn EventSource>, config: &JobsConfig) -> Self {
        Self {
            engine,
            events,
            interval_minutes: config.sweep_interval_minutes,
            user_limit: config.sweep_user_limit,
        }
    }
}

#[async_trait::async_trait]
impl Job for SignalSweepJob {
    fn name(&self) -> &'static str {
        "signal_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        let user_ids = self
            .events
            .list_user_ids(Some(self.user_limit))
            .await
            .map_err(|e| format!("listing user ids: {e}"))?;

        if user_ids.is_empty() {
            info!("No users with events; nothing to sweep");
            return Ok(());
        }

        let now = Utc::now();
        let mut failures = 0usize;

        for user_id in &user_ids {
            // One user's bad data must not block the rest of the sweep.
            match self.engine.build_milestones(user_id, now).await {
                Ok((summary, milestones)) => {
                    info!(
                        user_id = %user_id,
                        event_count = summary.event_count,
                        service_event_count = summary.service_event_count,
                        goal_setting = milestones.goal_setting_complete,
                        engaged = summary.engaged,
                        retained = summary.retained,
                        "Swept user signals"
                    );
                }
                Err(e) => {
                    failures += 1;
                    warn!(user_id = %user_id, error = %e, "Signal sweep failed for user");
                }
            }
        }

        record_sweep_run(user_ids.len(), failures);

        if failures == user_ids.len() {
            return Err(format!("all {} users failed", failures));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::error::SignalError;
    use domain::models::{GoalTierMap, PackageGoalMap, RawEvent, SignalThresholds};
    use domain::sources::GoalStore;
    use serde_json::json;

    struct FakeEvents {
        user_ids: Vec<String>,
        fail_listing: bool,
    }

    #[async_trait]
    impl EventSource for FakeEvents {
        async fn fetch_events(
            &self,
            _user_id: &str,
            _limit: Option<i64>,
        ) -> Result<Vec<RawEvent>, SignalError> {
            let value = json!({
                "timestamp": "2026-08-20T10:00:00Z",
                "total_time_in_foreground_minutes": 5.0,
                "session_id": "s1",
                "package_name": "com.fit.app"
            });
            Ok(vec![RawEvent::from_value(value)])
        }

        async fn list_user_ids(&self, limit: Option<i64>) -> Result<Vec<String>, SignalError> {
            if self.fail_listing {
                return Err(SignalError::Collaborator("events offline".into()));
            }
            let limit = limit.unwrap_or(i64::MAX) as usize;
            Ok(self.user_ids.iter().take(limit).cloned().collect())
        }
    }

    struct FakeGoals;

    #[async_trait]
    impl GoalStore for FakeGoals {
        async fn goal_tiers(&self, _user_id: &str) -> Result<GoalTierMap, SignalError> {
            Ok(GoalTierMap::default())
        }

        async fn packages_to_subcategories(
            &self,
            _packages: &[String],
        ) -> Result<PackageGoalMap, SignalError> {
            Ok(PackageGoalMap::new())
        }

        async fn goal_exists(&self, _user_id: Option<&str>) -> Result<bool, SignalError> {
            Ok(false)
        }
    }

    fn sweep_job(user_ids: &[&str], fail_listing: bool) -> SignalSweepJob {
        let events = Arc::new(FakeEvents {
            user_ids: user_ids.iter().map(|s| s.to_string()).collect(),
            fail_listing,
        });
        let engine = Arc::new(SignalEngine::new(
            events.clone(),
            Arc::new(FakeGoals),
            SignalThresholds::default(),
        ));
        SignalSweepJob::new(engine, events, &JobsConfig::default())
    }

    #[tokio::test]
    async fn test_sweep_processes_all_users() {
        let job = sweep_job(&["user-1", "user-2"], false);
        assert!(job.execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_empty_user_list_is_ok() {
        let job = sweep_job(&[], false);
        assert!(job.execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_fails_when_listing_fails() {
        let job = sweep_job(&["user-1"], true);
        let result = job.execute().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("listing user ids"));
    }

    #[test]
    fn test_sweep_frequency_follows_config() {
        let job = sweep_job(&[], false);
        assert!(matches!(job.frequency(), JobFrequency::Minutes(60)));
    }
}
