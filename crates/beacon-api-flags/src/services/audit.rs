//! Audit trail recording.
//!
//! One append per mutating operation, always on the mutation's own
//! transaction: a failed audit write aborts the whole mutation. Entries
//! are never updated or deleted.

use beacon_db::models::{CreateFlagAuditEntry, FeatureFlag, FlagAuditLog, FlagOperation};
use serde_json::{json, Value as JsonValue};
use sqlx::PgConnection;

/// Shapes and appends audit entries for flag mutations.
pub struct AuditService;

impl AuditService {
    /// Full snapshot of a flag's audited fields.
    #[must_use]
    pub fn snapshot_payload(flag: &FeatureFlag) -> JsonValue {
        json!({
            "name": flag.name,
            "description": flag.description,
            "team": flag.team,
            "rollout_percentage": flag.rollout_percentage,
            "regions": flag.regions,
        })
    }

    /// Percentage-only payload used on plain updates.
    #[must_use]
    pub fn percentage_payload(rollout_percentage: i32) -> JsonValue {
        json!({ "rollout_percentage": rollout_percentage })
    }

    /// Payload for explicit workspace targeting: the enabled count plus
    /// the (unchanged) percentage for display continuity.
    #[must_use]
    pub fn targeting_payload(enabled_workspace_count: i64, rollout_percentage: i32) -> JsonValue {
        json!({
            "enabled_workspace_count": enabled_workspace_count,
            "rollout_percentage": rollout_percentage,
        })
    }

    /// Record a flag creation: no old values, full new snapshot.
    pub async fn record_created(
        conn: &mut PgConnection,
        flag: &FeatureFlag,
        changed_by: Option<String>,
    ) -> Result<FlagAuditLog, sqlx::Error> {
        FlagAuditLog::create(
            &mut *conn,
            CreateFlagAuditEntry {
                flag_id: Some(flag.id),
                flag_name: flag.name.clone(),
                operation: FlagOperation::Create,
                team: flag.team.clone(),
                old_values: None,
                new_values: Some(Self::snapshot_payload(flag)),
                changed_by,
            },
        )
        .await
    }

    /// Record a plain update. Only the rollout percentage is diffed.
    pub async fn record_updated(
        conn: &mut PgConnection,
        flag: &FeatureFlag,
        old_percentage: i32,
        new_percentage: i32,
        changed_by: Option<String>,
    ) -> Result<FlagAuditLog, sqlx::Error> {
        FlagAuditLog::create(
            &mut *conn,
            CreateFlagAuditEntry {
                flag_id: Some(flag.id),
                flag_name: flag.name.clone(),
                operation: FlagOperation::Update,
                team: flag.team.clone(),
                old_values: Some(Self::percentage_payload(old_percentage)),
                new_values: Some(Self::percentage_payload(new_percentage)),
                changed_by,
            },
        )
        .await
    }

    /// Record a deletion: full old snapshot, no new values.
    pub async fn record_deleted(
        conn: &mut PgConnection,
        flag: &FeatureFlag,
        changed_by: Option<String>,
    ) -> Result<FlagAuditLog, sqlx::Error> {
        FlagAuditLog::create(
            &mut *conn,
            CreateFlagAuditEntry {
                flag_id: Some(flag.id),
                flag_name: flag.name.clone(),
                operation: FlagOperation::Delete,
                team: flag.team.clone(),
                old_values: Some(Self::snapshot_payload(flag)),
                new_values: None,
                changed_by,
            },
        )
        .await
    }

    /// Record an explicit workspace targeting update.
    pub async fn record_workspaces_updated(
        conn: &mut PgConnection,
        flag: &FeatureFlag,
        old_enabled_count: i64,
        new_enabled_count: i64,
        changed_by: Option<String>,
    ) -> Result<FlagAuditLog, sqlx::Error> {
        FlagAuditLog::create(
            &mut *conn,
            CreateFlagAuditEntry {
                flag_id: Some(flag.id),
                flag_name: flag.name.clone(),
                operation: FlagOperation::Update,
                team: flag.team.clone(),
                old_values: Some(Self::targeting_payload(
                    old_enabled_count,
                    flag.rollout_percentage,
                )),
                new_values: Some(Self::targeting_payload(
                    new_enabled_count,
                    flag.rollout_percentage,
                )),
                changed_by,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_flag() -> FeatureFlag {
        FeatureFlag {
            id: Uuid::new_v4(),
            name: "checkout-v2".to_string(),
            team: "payments".to_string(),
            description: Some("new checkout".to_string()),
            rollout_percentage: 30,
            regions: vec!["eu-west".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_payload_shape() {
        let payload = AuditService::snapshot_payload(&sample_flag());
        assert_eq!(payload["name"], "checkout-v2");
        assert_eq!(payload["team"], "payments");
        assert_eq!(payload["rollout_percentage"], 30);
        assert_eq!(payload["regions"][0], "eu-west");
        assert_eq!(payload["description"], "new checkout");
    }

    #[test]
    fn test_percentage_payload_only_tracks_percentage() {
        let payload = AuditService::percentage_payload(55);
        let obj = payload.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(payload["rollout_percentage"], 55);
    }

    #[test]
    fn test_targeting_payload_shape() {
        let payload = AuditService::targeting_payload(7, 30);
        assert_eq!(payload["enabled_workspace_count"], 7);
        assert_eq!(payload["rollout_percentage"], 30);
    }
}
