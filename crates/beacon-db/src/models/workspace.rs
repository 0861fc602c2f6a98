//! Workspace model.
//!
//! Workspaces are provisioned by an external system; beacon only reads
//! them to decide rollout candidacy and to validate explicit targeting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A workspace that feature flags can be rolled out to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    /// Unique identifier.
    pub id: Uuid,
    /// Workspace name.
    pub name: String,
    /// Free-form workspace type.
    pub workspace_type: String,
    /// Region code, if the workspace is region-homed.
    pub region: Option<String>,
    /// When the workspace was created.
    pub created_at: DateTime<Utc>,
    /// When the workspace was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Fetch a workspace by id.
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, name, workspace_type, region, created_at, updated_at
            FROM workspaces
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Return which of the given ids actually exist.
    ///
    /// The caller compares the result against its input to name missing
    /// workspaces in validation errors.
    pub async fn find_existing_ids<'e, E>(
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (Uuid,)>(
            r"
            SELECT id FROM workspaces WHERE id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
