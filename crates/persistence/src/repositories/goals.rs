//! Goal repository backed by the goal-tracking Postgres schema.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::error::SignalError;
use domain::models::{GoalTier, GoalTierMap, PackageGoalMap};
use domain::sources::GoalStore;

use crate::entities::{GoalTierRow, PackageGoalRow};

/// Repository for user goals and goal-to-app-category mappings.
#[derive(Debug, Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn collaborator(err: sqlx::Error) -> SignalError {
    SignalError::Collaborator(format!("goal store: {err}"))
}

/// Fold user-goal rows into a tier map; rows with an unknown relationship
/// label or a missing subcategory are ignored.
fn tier_map_from_rows(rows: Vec<GoalTierRow>) -> GoalTierMap {
    let mut tiers = GoalTierMap::default();
    for row in rows {
        let Some(subcategory) = row.goal_subcategory_id.filter(|s| !s.is_empty()) else {
            continue;
        };
        let Some(tier) = row
            .relationship
            .as_deref()
            .and_then(GoalTier::from_relationship)
        else {
            continue;
        };
        tiers.insert(tier, subcategory);
    }
    tiers
}

/// Fold app-mapping rows into a package map, skipping incomplete rows.
fn package_map_from_rows(rows: Vec<PackageGoalRow>) -> PackageGoalMap {
    let mut map = PackageGoalMap::new();
    for row in rows {
        let (Some(app_id), Some(subcategory)) = (row.app_id, row.goal_subcategory_id) else {
            continue;
        };
        if app_id.is_empty() || subcategory.is_empty() {
            continue;
        }
        map.insert(app_id, subcategory);
    }
    map
}

#[async_trait]
impl GoalStore for GoalRepository {
    async fn goal_tiers(&self, user_id: &str) -> Result<GoalTierMap, SignalError> {
        let rows: Vec<GoalTierRow> = sqlx::query_as(
            r#"
            SELECT
                ug."relationshipType"::text AS relationship,
                g."goalSubCategoryId"::text AS goal_subcategory_id
            FROM public.user_goals AS ug
            JOIN public.goals AS g ON g.id = ug."goalId"
            WHERE ug."userId"::text = $1
              AND g."goalSubCategoryId" IS NOT NULL
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(collaborator)?;

        Ok(tier_map_from_rows(rows))
    }

    async fn packages_to_subcategories(
        &self,
        packages: &[String],
    ) -> Result<PackageGoalMap, SignalError> {
        if packages.is_empty() {
            return Ok(PackageGoalMap::new());
        }

        let rows: Vec<PackageGoalRow> = sqlx::query_as(
            r#"
            SELECT
                a."appId"::text AS app_id,
                agsc."goalSubCategoriesId"::text AS goal_subcategory_id
            FROM public.apps AS a
            JOIN public.app_goal_sub_categories AS agsc ON agsc."appsId" = a.id
            WHERE a."appId" = ANY($1)
            "#,
        )
        .bind(packages)
        .fetch_all(&self.pool)
        .await
        .map_err(collaborator)?;

        Ok(package_map_from_rows(rows))
    }

    async fn goal_exists(&self, user_id: Option<&str>) -> Result<bool, SignalError> {
        let exists: bool = match user_id {
            Some(user_id) => sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM public.user_goals AS ug
                    JOIN public.goals AS g ON g.id = ug."goalId"
                    JOIN public.users AS u ON u.id = ug."userId"
                    WHERE u.id::text = $1
                )
                "#,
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(collaborator)?,
            None => sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM public.user_goals AS ug
                    JOIN public.goals AS g ON g.id = ug."goalId"
                    JOIN public.users AS u ON u.id = ug."userId"
                )
                "#,
            )
            .fetch_one(&self.pool)
            .await
            .map_err(collaborator)?,
        };

        Ok(exists)
    }
}
