//! Tests for the audit payload shapes.
//!
//! Each mutation kind produces a specific old/new value shape; these
//! pin them down so dashboard consumers can rely on the keys.

use beacon_api_flags::services::AuditService;
use beacon_db::models::{FeatureFlag, FlagOperation};
use chrono::Utc;
use uuid::Uuid;

fn flag() -> FeatureFlag {
    FeatureFlag {
        id: Uuid::new_v4(),
        name: "checkout-v2".to_string(),
        team: "payments".to_string(),
        description: None,
        rollout_percentage: 40,
        regions: vec!["ALL".to_string()],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// CREATE: no old values, full new snapshot.
#[test]
fn test_create_shape_is_full_snapshot() {
    let payload = AuditService::snapshot_payload(&flag());
    let obj = payload.as_object().unwrap();

    assert_eq!(obj.len(), 5);
    assert!(obj.contains_key("name"));
    assert!(obj.contains_key("description"));
    assert!(obj.contains_key("team"));
    assert!(obj.contains_key("rollout_percentage"));
    assert!(obj.contains_key("regions"));
    // Absent description is recorded as an explicit null.
    assert!(payload["description"].is_null());
}

/// UPDATE: only the rollout percentage is diffed; name/team/description
/// changes are not part of the plain-update payload.
#[test]
fn test_update_shape_tracks_percentage_only() {
    let old = AuditService::percentage_payload(40);
    let new = AuditService::percentage_payload(70);

    assert_eq!(old.as_object().unwrap().len(), 1);
    assert_eq!(new.as_object().unwrap().len(), 1);
    assert_eq!(old["rollout_percentage"], 40);
    assert_eq!(new["rollout_percentage"], 70);
}

/// Workspace-targeted UPDATE: enabled count plus the unchanged
/// percentage on both sides.
#[test]
fn test_targeting_shape_repeats_percentage() {
    let old = AuditService::targeting_payload(3, 40);
    let new = AuditService::targeting_payload(5, 40);

    assert_eq!(old["enabled_workspace_count"], 3);
    assert_eq!(new["enabled_workspace_count"], 5);
    assert_eq!(old["rollout_percentage"], new["rollout_percentage"]);
}

#[test]
fn test_operation_kind_round_trip() {
    for op in [
        FlagOperation::Create,
        FlagOperation::Update,
        FlagOperation::Delete,
    ] {
        let parsed: FlagOperation = op.to_string().parse().unwrap();
        assert_eq!(parsed, op);
    }
}
