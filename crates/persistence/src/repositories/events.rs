//! Event repository backed by the Postgres events table.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use domain::error::SignalError;
use domain::models::RawEvent;
use domain::sources::EventSource;

/// Repository for raw app-usage events.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn collaborator(err: sqlx::Error) -> SignalError {
    SignalError::Collaborator(format!("event store: {err}"))
}

#[async_trait]
impl EventSource for EventRepository {
    /// Fetch all events for one user, newest first.
    ///
    /// Event producers have drifted the table schema over time, so rows
    /// are read as `jsonb` open mappings and left to the normalizer to
    /// resolve, rather than mapped to a fixed column set.
    async fn fetch_events(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<RawEvent>, SignalError> {
        let rows: Vec<Json<serde_json::Value>> = sqlx::query_scalar(
            r#"
            SELECT to_jsonb(e) AS event
            FROM public.events AS e
            WHERE e.user_id::text = $1
            ORDER BY COALESCE(e.updated_at, e.created_at) DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(collaborator)?;

        debug!(user_id = %user_id, count = rows.len(), "Fetched raw events");

        Ok(rows
            .into_iter()
            .map(|row| RawEvent::from_value(row.0))
            .collect())
    }

    async fn list_user_ids(&self, limit: Option<i64>) -> Result<Vec<String>, SignalError> {
        let user_ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT e.user_id::text AS user_id
            FROM public.events AS e
            WHERE e.user_id IS NOT NULL
            ORDER BY user_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(collaborator)?;

        Ok(user_ids)
    }
}
