//! Workspace/flag association model.
//!
//! The association arena: one row per (flag, workspace) pair, created
//! when a flag is seeded and only ever flipped afterwards. The rollout
//! engine is the sole writer of the `enabled` column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// Enabled/disabled state of one flag for one workspace.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkspaceFeatureFlag {
    /// Unique identifier.
    pub id: Uuid,
    /// The flag this row belongs to.
    pub flag_id: Uuid,
    /// The workspace this row belongs to.
    pub workspace_id: Uuid,
    /// Whether the flag is enabled for this workspace.
    pub enabled: bool,
    /// When the association was seeded.
    pub created_at: DateTime<Utc>,
    /// When the association was last flipped.
    pub updated_at: DateTime<Utc>,
}

/// Association state joined with workspace attributes, for listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlagWorkspaceState {
    pub workspace_id: Uuid,
    pub workspace_name: String,
    pub region: Option<String>,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

/// Enabled-workspace count for one region.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegionEnabledCount {
    /// Region code; `None` groups workspaces with no region.
    pub region: Option<String>,
    pub enabled_count: i64,
}

impl WorkspaceFeatureFlag {
    /// Seed one association row per existing workspace for a new flag.
    ///
    /// Idempotent on the (flag, workspace) unique pair. Returns the
    /// number of rows inserted.
    pub async fn seed_for_flag<'e, E>(executor: E, flag_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r"
            INSERT INTO workspace_feature_flags (flag_id, workspace_id)
            SELECT $1, id FROM workspaces
            ON CONFLICT (flag_id, workspace_id) DO NOTHING
            ",
        )
        .bind(flag_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Load every association for a flag.
    pub async fn list_for_flag<'e, E>(executor: E, flag_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, flag_id, workspace_id, enabled, created_at, updated_at
            FROM workspace_feature_flags
            WHERE flag_id = $1
            ORDER BY created_at
            ",
        )
        .bind(flag_id)
        .fetch_all(executor)
        .await
    }

    /// Load the associations for a flag whose workspace lies in one of
    /// the given regions. Workspaces with no region never match.
    pub async fn list_for_flag_in_regions<'e, E>(
        executor: E,
        flag_id: Uuid,
        regions: &[String],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT a.id, a.flag_id, a.workspace_id, a.enabled, a.created_at, a.updated_at
            FROM workspace_feature_flags a
            JOIN workspaces w ON w.id = a.workspace_id
            WHERE a.flag_id = $1 AND w.region = ANY($2)
            ORDER BY a.created_at
            ",
        )
        .bind(flag_id)
        .bind(regions)
        .fetch_all(executor)
        .await
    }

    /// Load the associations for a flag restricted to specific workspaces.
    pub async fn list_for_flag_and_workspaces<'e, E>(
        executor: E,
        flag_id: Uuid,
        workspace_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if workspace_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Self>(
            r"
            SELECT id, flag_id, workspace_id, enabled, created_at, updated_at
            FROM workspace_feature_flags
            WHERE flag_id = $1 AND workspace_id = ANY($2)
            ORDER BY created_at
            ",
        )
        .bind(flag_id)
        .bind(workspace_ids)
        .fetch_all(executor)
        .await
    }

    /// Batch-set `enabled` on the given workspaces' rows for a flag.
    ///
    /// Returns the number of rows updated. Never inserts.
    pub async fn set_enabled<'e, E>(
        executor: E,
        flag_id: Uuid,
        workspace_ids: &[Uuid],
        enabled: bool,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if workspace_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r"
            UPDATE workspace_feature_flags
            SET enabled = $3, updated_at = now()
            WHERE flag_id = $1 AND workspace_id = ANY($2)
            ",
        )
        .bind(flag_id)
        .bind(workspace_ids)
        .bind(enabled)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count enabled workspaces for a flag.
    pub async fn count_enabled<'e, E>(executor: E, flag_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, (i64,)>(
            r"
            SELECT COUNT(*) FROM workspace_feature_flags
            WHERE flag_id = $1 AND enabled = TRUE
            ",
        )
        .bind(flag_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// List association state for a flag joined with workspace
    /// attributes, optionally filtered to one enablement state.
    pub async fn list_workspace_states<'e, E>(
        executor: E,
        flag_id: Uuid,
        enabled: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FlagWorkspaceState>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut conditions = vec!["a.flag_id = $1".to_string()];
        let mut param_idx = 2;

        if enabled.is_some() {
            conditions.push(format!("a.enabled = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = conditions.join(" AND ");
        let query = format!(
            r"
            SELECT a.workspace_id, w.name AS workspace_name, w.region,
                   a.enabled, a.updated_at
            FROM workspace_feature_flags a
            JOIN workspaces w ON w.id = a.workspace_id
            WHERE {where_clause}
            ORDER BY w.name
            LIMIT ${param_idx} OFFSET ${}
            ",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, FlagWorkspaceState>(&query).bind(flag_id);

        if let Some(enabled) = enabled {
            q = q.bind(enabled);
        }

        q.bind(limit).bind(offset).fetch_all(executor).await
    }

    /// Count enabled workspaces per region for a flag.
    pub async fn count_enabled_by_region<'e, E>(
        executor: E,
        flag_id: Uuid,
    ) -> Result<Vec<RegionEnabledCount>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, RegionEnabledCount>(
            r"
            SELECT w.region, COUNT(*) AS enabled_count
            FROM workspace_feature_flags a
            JOIN workspaces w ON w.id = a.workspace_id
            WHERE a.flag_id = $1 AND a.enabled = TRUE
            GROUP BY w.region
            ORDER BY w.region NULLS LAST
            ",
        )
        .bind(flag_id)
        .fetch_all(executor)
        .await
    }
}
