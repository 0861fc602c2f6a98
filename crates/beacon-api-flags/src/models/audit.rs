//! Response models for the audit trail.

use beacon_db::models::FlagAuditLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

/// Query parameters for the audit log.
#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    /// Restrict to one flag.
    pub flag_id: Option<Uuid>,
    /// Restrict to one team.
    pub team: Option<String>,
    /// Restrict to one operation kind (create, update, delete).
    pub operation: Option<String>,
    /// Only entries strictly older than this timestamp.
    pub before: Option<DateTime<Utc>>,
    /// Maximum entries to return (default 50, max 200).
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// One audit entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEntryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    /// Absent once the flag has been deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub flag_id: Option<Uuid>,
    pub flag_name: String,
    pub operation: String,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub old_values: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub new_values: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FlagAuditLog> for AuditEntryResponse {
    fn from(entry: FlagAuditLog) -> Self {
        Self {
            id: entry.id,
            flag_id: entry.flag_id,
            flag_name: entry.flag_name,
            operation: entry.operation,
            team: entry.team,
            old_values: entry.old_values,
            new_values: entry.new_values,
            changed_by: entry.changed_by,
            created_at: entry.created_at,
        }
    }
}

/// Audit log page, newest-first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogResponse {
    pub entries: Vec<AuditEntryResponse>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_response_from_model() {
        let entry = FlagAuditLog {
            id: Uuid::new_v4(),
            flag_id: None,
            flag_name: "checkout-v2".to_string(),
            operation: "delete".to_string(),
            team: "payments".to_string(),
            old_values: Some(serde_json::json!({"rolloutPercentage": 30})),
            new_values: None,
            changed_by: Some("ops@example.com".to_string()),
            created_at: Utc::now(),
        };

        let response = AuditEntryResponse::from(entry);
        assert_eq!(response.operation, "delete");
        assert!(response.flag_id.is_none());
        assert!(response.new_values.is_none());

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"operation\":\"delete\""));
        // Deleted-flag entries omit the flag id entirely.
        assert!(!json.contains("\"flag_id\""));
    }
}
