//! Feature flag model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// Sentinel region code meaning "no region restriction".
pub const ALL_REGIONS: &str = "ALL";

/// A feature flag: a named toggle owned by a team, with a target
/// rollout percentage and a region scope.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeatureFlag {
    /// Unique identifier.
    pub id: Uuid,
    /// Flag name, unique within a team.
    pub name: String,
    /// Owning team.
    pub team: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Target rollout percentage, 0..=100.
    pub rollout_percentage: i32,
    /// Region scope: `{ALL}` or a set of specific region codes.
    pub regions: Vec<String>,
    /// When the flag was created.
    pub created_at: DateTime<Utc>,
    /// When the flag was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a feature flag.
#[derive(Debug, Clone)]
pub struct CreateFeatureFlag {
    pub name: String,
    pub team: String,
    pub description: Option<String>,
    pub rollout_percentage: i32,
    pub regions: Vec<String>,
}

/// Input for updating a feature flag.
#[derive(Debug, Clone)]
pub struct UpdateFeatureFlag {
    pub name: String,
    pub team: String,
    pub description: Option<String>,
    pub rollout_percentage: i32,
    pub regions: Vec<String>,
}

/// Filter options for listing flags.
#[derive(Debug, Clone, Default)]
pub struct FlagFilter {
    /// Restrict to one team.
    pub team: Option<String>,
    /// Case-insensitive name substring match.
    pub name_query: Option<String>,
}

impl FeatureFlag {
    /// Whether the flag's region scope is unrestricted.
    #[must_use]
    pub fn is_all_regions(&self) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|r| r == ALL_REGIONS)
    }

    /// Insert a new flag.
    pub async fn create<'e, E>(executor: E, input: CreateFeatureFlag) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO feature_flags (name, team, description, rollout_percentage, regions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, team, description, rollout_percentage, regions,
                      created_at, updated_at
            ",
        )
        .bind(input.name)
        .bind(input.team)
        .bind(input.description)
        .bind(input.rollout_percentage)
        .bind(input.regions)
        .fetch_one(executor)
        .await
    }

    /// Fetch a flag by id.
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, name, team, description, rollout_percentage, regions,
                   created_at, updated_at
            FROM feature_flags
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Fetch a flag by its (team, name) pair.
    ///
    /// Used for uniqueness checks before create and rename.
    pub async fn find_by_team_and_name<'e, E>(
        executor: E,
        team: &str,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, name, team, description, rollout_percentage, regions,
                   created_at, updated_at
            FROM feature_flags
            WHERE team = $1 AND name = $2
            ",
        )
        .bind(team)
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    /// Update a flag's fields, bumping `updated_at`.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        input: UpdateFeatureFlag,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            UPDATE feature_flags
            SET name = $2, team = $3, description = $4, rollout_percentage = $5,
                regions = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, name, team, description, rollout_percentage, regions,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.team)
        .bind(input.description)
        .bind(input.rollout_percentage)
        .bind(input.regions)
        .fetch_optional(executor)
        .await
    }

    /// Delete a flag. Association rows cascade at the schema level.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM feature_flags WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List flags with optional filters, newest-first.
    pub async fn list<'e, E>(
        executor: E,
        filter: &FlagFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if filter.team.is_some() {
            conditions.push(format!("team = ${param_idx}"));
            param_idx += 1;
        }

        if filter.name_query.is_some() {
            conditions.push(format!("name ILIKE ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            r"
            SELECT id, name, team, description, rollout_percentage, regions,
                   created_at, updated_at
            FROM feature_flags
            {where_clause}
            ORDER BY created_at DESC
            LIMIT ${param_idx} OFFSET ${}
            ",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Self>(&query);

        if let Some(team) = &filter.team {
            q = q.bind(team);
        }

        if let Some(name_query) = &filter.name_query {
            q = q.bind(format!("%{name_query}%"));
        }

        q.bind(limit).bind(offset).fetch_all(executor).await
    }

    /// List the flags currently enabled for one workspace.
    pub async fn list_enabled_for_workspace<'e, E>(
        executor: E,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT f.id, f.name, f.team, f.description, f.rollout_percentage,
                   f.regions, f.created_at, f.updated_at
            FROM feature_flags f
            JOIN workspace_feature_flags a ON a.flag_id = f.id
            WHERE a.workspace_id = $1 AND a.enabled = TRUE
            ORDER BY f.name
            ",
        )
        .bind(workspace_id)
        .fetch_all(executor)
        .await
    }

    /// Count flags matching the filter.
    pub async fn count<'e, E>(executor: E, filter: &FlagFilter) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if filter.team.is_some() {
            conditions.push(format!("team = ${param_idx}"));
            param_idx += 1;
        }

        if filter.name_query.is_some() {
            conditions.push(format!("name ILIKE ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT COUNT(*) FROM feature_flags {where_clause}");

        let mut q = sqlx::query_as::<_, (i64,)>(&query);

        if let Some(team) = &filter.team {
            q = q.bind(team);
        }

        if let Some(name_query) = &filter.name_query {
            q = q.bind(format!("%{name_query}%"));
        }

        let row = q.fetch_one(executor).await?;
        Ok(row.0)
    }
}
