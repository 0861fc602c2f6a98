//! Flag audit log model.
//!
//! Records every state-changing flag operation. Entries are append-only
//! and survive deletion of the flag they describe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// Kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagOperation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for FlagOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagOperation::Create => write!(f, "create"),
            FlagOperation::Update => write!(f, "update"),
            FlagOperation::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for FlagOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(FlagOperation::Create),
            "update" => Ok(FlagOperation::Update),
            "delete" => Ok(FlagOperation::Delete),
            _ => Err(format!("Invalid flag operation: {s}")),
        }
    }
}

/// One immutable audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlagAuditLog {
    /// Unique identifier.
    pub id: Uuid,
    /// The flag this entry describes; `None` once the flag is deleted.
    pub flag_id: Option<Uuid>,
    /// Flag name snapshot at mutation time.
    pub flag_name: String,
    /// Operation kind.
    pub operation: String,
    /// Team snapshot at mutation time.
    pub team: String,
    /// State before the mutation (absent on create).
    pub old_values: Option<JsonValue>,
    /// State after the mutation (absent on delete).
    pub new_values: Option<JsonValue>,
    /// Caller-supplied actor, unverified.
    pub changed_by: Option<String>,
    /// When the mutation happened.
    pub created_at: DateTime<Utc>,
}

/// Input for appending an audit entry.
#[derive(Debug, Clone)]
pub struct CreateFlagAuditEntry {
    pub flag_id: Option<Uuid>,
    pub flag_name: String,
    pub operation: FlagOperation,
    pub team: String,
    pub old_values: Option<JsonValue>,
    pub new_values: Option<JsonValue>,
    pub changed_by: Option<String>,
}

/// Filter options for querying the audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub flag_id: Option<Uuid>,
    pub team: Option<String>,
    pub operation: Option<String>,
}

impl FlagAuditLog {
    /// Get the operation as enum.
    #[must_use]
    pub fn operation_enum(&self) -> Option<FlagOperation> {
        self.operation.parse().ok()
    }

    /// Append a new audit entry.
    pub async fn create<'e, E>(
        executor: E,
        input: CreateFlagAuditEntry,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO flag_audit_log
                (flag_id, flag_name, operation, team, old_values, new_values, changed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, flag_id, flag_name, operation, team, old_values, new_values,
                      changed_by, created_at
            ",
        )
        .bind(input.flag_id)
        .bind(input.flag_name)
        .bind(input.operation.to_string())
        .bind(input.team)
        .bind(input.old_values)
        .bind(input.new_values)
        .bind(input.changed_by)
        .fetch_one(executor)
        .await
    }

    /// List audit entries with optional filters, newest-first.
    ///
    /// `cursor` pages backwards in time: only entries strictly older
    /// than it are returned.
    pub async fn list<'e, E>(
        executor: E,
        filter: &AuditLogFilter,
        cursor: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if filter.flag_id.is_some() {
            conditions.push(format!("flag_id = ${param_idx}"));
            param_idx += 1;
        }

        if filter.team.is_some() {
            conditions.push(format!("team = ${param_idx}"));
            param_idx += 1;
        }

        if filter.operation.is_some() {
            conditions.push(format!("operation = ${param_idx}"));
            param_idx += 1;
        }

        if cursor.is_some() {
            conditions.push(format!("created_at < ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            r"
            SELECT id, flag_id, flag_name, operation, team, old_values, new_values,
                   changed_by, created_at
            FROM flag_audit_log
            {where_clause}
            ORDER BY created_at DESC
            LIMIT ${param_idx}
            "
        );

        let mut q = sqlx::query_as::<_, Self>(&query);

        if let Some(flag_id) = filter.flag_id {
            q = q.bind(flag_id);
        }

        if let Some(team) = &filter.team {
            q = q.bind(team);
        }

        if let Some(operation) = &filter.operation {
            q = q.bind(operation);
        }

        if let Some(c) = cursor {
            q = q.bind(c);
        }

        q = q.bind(limit);

        q.fetch_all(executor).await
    }

    /// Count audit entries matching the filter.
    pub async fn count<'e, E>(executor: E, filter: &AuditLogFilter) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if filter.flag_id.is_some() {
            conditions.push(format!("flag_id = ${param_idx}"));
            param_idx += 1;
        }

        if filter.team.is_some() {
            conditions.push(format!("team = ${param_idx}"));
            param_idx += 1;
        }

        if filter.operation.is_some() {
            conditions.push(format!("operation = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT COUNT(*) FROM flag_audit_log {where_clause}");

        let mut q = sqlx::query_as::<_, (i64,)>(&query);

        if let Some(flag_id) = filter.flag_id {
            q = q.bind(flag_id);
        }

        if let Some(team) = &filter.team {
            q = q.bind(team);
        }

        if let Some(operation) = &filter.operation {
            q = q.bind(operation);
        }

        let row = q.fetch_one(executor).await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_operation_display() {
        assert_eq!(FlagOperation::Create.to_string(), "create");
        assert_eq!(FlagOperation::Update.to_string(), "update");
        assert_eq!(FlagOperation::Delete.to_string(), "delete");
    }

    #[test]
    fn test_flag_operation_from_str() {
        assert_eq!(
            "create".parse::<FlagOperation>().unwrap(),
            FlagOperation::Create
        );
        assert_eq!(
            "UPDATE".parse::<FlagOperation>().unwrap(),
            FlagOperation::Update
        );
        assert!("rename".parse::<FlagOperation>().is_err());
    }

    #[test]
    fn test_operation_enum_accessor() {
        let entry = FlagAuditLog {
            id: Uuid::new_v4(),
            flag_id: Some(Uuid::new_v4()),
            flag_name: "checkout-v2".to_string(),
            operation: "delete".to_string(),
            team: "payments".to_string(),
            old_values: None,
            new_values: None,
            changed_by: None,
            created_at: Utc::now(),
        };
        assert_eq!(entry.operation_enum(), Some(FlagOperation::Delete));
    }
}
