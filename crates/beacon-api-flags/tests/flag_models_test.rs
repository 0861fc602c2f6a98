//! Integration tests for flag request validation and serialization.

use beacon_api_flags::models::{
    CreateFlagRequest, FlagResponse, SetWorkspacesRequest, UpdateFlagRequest,
};
use uuid::Uuid;

fn create_request() -> CreateFlagRequest {
    CreateFlagRequest {
        name: "checkout-v2".to_string(),
        team: "payments".to_string(),
        description: Some("new checkout flow".to_string()),
        regions: Some(vec!["eu-west".to_string(), "us-east".to_string()]),
        rollout_percentage: Some(25),
        changed_by: Some("ops@example.com".to_string()),
    }
}

#[test]
fn test_create_request_valid() {
    assert!(create_request().validate().is_none());
}

#[test]
fn test_create_request_percentage_bounds() {
    let mut request = create_request();

    request.rollout_percentage = Some(0);
    assert!(request.validate().is_none());

    request.rollout_percentage = Some(100);
    assert!(request.validate().is_none());

    request.rollout_percentage = Some(101);
    let (field, message) = request.validate().unwrap();
    assert_eq!(field, "rollout_percentage");
    assert!(message.contains("between 0 and 100"));

    request.rollout_percentage = Some(-5);
    assert!(request.validate().is_some());
}

#[test]
fn test_create_request_empty_team() {
    let mut request = create_request();
    request.team = String::new();
    let (field, _) = request.validate().unwrap();
    assert_eq!(field, "team");
}

#[test]
fn test_create_request_name_too_long() {
    let mut request = create_request();
    request.name = "f".repeat(101);
    let (field, message) = request.validate().unwrap();
    assert_eq!(field, "name");
    assert!(message.contains("100"));
}

#[test]
fn test_create_request_defaults() {
    let request = CreateFlagRequest {
        name: "beta-banner".to_string(),
        team: "growth".to_string(),
        description: None,
        regions: None,
        rollout_percentage: None,
        changed_by: None,
    };
    assert!(request.validate().is_none());
    assert_eq!(request.initial_percentage(), 0);
    assert_eq!(request.effective_regions(), vec!["ALL".to_string()]);
}

#[test]
fn test_create_request_deserialization_minimal() {
    let json = r#"{"name": "beta-banner", "team": "growth"}"#;
    let request: CreateFlagRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.name, "beta-banner");
    assert!(request.rollout_percentage.is_none());
    assert!(request.changed_by.is_none());
}

#[test]
fn test_update_request_requires_valid_regions() {
    let request = UpdateFlagRequest {
        name: "checkout-v2".to_string(),
        team: "payments".to_string(),
        description: None,
        regions: vec![],
        rollout_percentage: 50,
        changed_by: None,
    };
    let (field, message) = request.validate().unwrap();
    assert_eq!(field, "regions");
    assert!(message.contains("at least one"));
}

#[test]
fn test_update_request_deserialization() {
    let json = r#"{
        "name": "checkout-v2",
        "team": "payments",
        "regions": ["ALL"],
        "rollout_percentage": 75,
        "changed_by": "ops@example.com"
    }"#;
    let request: UpdateFlagRequest = serde_json::from_str(json).unwrap();
    assert!(request.validate().is_none());
    assert_eq!(request.rollout_percentage, 75);
    assert_eq!(request.changed_by.as_deref(), Some("ops@example.com"));
}

#[test]
fn test_set_workspaces_request_validation() {
    let empty = SetWorkspacesRequest {
        workspace_ids: vec![],
        enabled: true,
        changed_by: None,
    };
    assert!(empty.validate().is_some());

    let ok = SetWorkspacesRequest {
        workspace_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
        enabled: true,
        changed_by: None,
    };
    assert!(ok.validate().is_none());
}

#[test]
fn test_flag_response_serialization() {
    let response = FlagResponse {
        id: Uuid::new_v4(),
        name: "checkout-v2".to_string(),
        team: "payments".to_string(),
        description: None,
        rollout_percentage: 30,
        regions: vec!["ALL".to_string()],
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"name\":\"checkout-v2\""));
    assert!(json.contains("\"rollout_percentage\":30"));
    // Absent description is omitted entirely.
    assert!(!json.contains("description"));
}

#[test]
fn test_flag_response_deserialization() {
    let json = r#"{
        "id": "550e8400-e29b-41d4-a716-446655440000",
        "name": "checkout-v2",
        "team": "payments",
        "rollout_percentage": 30,
        "regions": ["eu-west"],
        "created_at": "2026-01-15T10:00:00Z",
        "updated_at": "2026-01-15T10:00:00Z"
    }"#;

    let response: FlagResponse = serde_json::from_str(json).unwrap();
    assert_eq!(
        response.id.to_string(),
        "550e8400-e29b-41d4-a716-446655440000"
    );
    assert_eq!(response.regions, vec!["eu-west".to_string()]);
}
