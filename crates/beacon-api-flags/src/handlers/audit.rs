//! Handlers for the audit trail.

use axum::{
    extract::{Query, State},
    Json,
};
use beacon_db::models::AuditLogFilter;
use uuid::Uuid;

use crate::error::FlagApiError;
use crate::models::{AuditEntryResponse, AuditLogQuery, AuditLogResponse};
use crate::router::FlagsAppState;

/// GET /audit
///
/// List audit entries, newest-first, filterable by flag, team, or
/// operation kind.
#[utoipa::path(
    get,
    path = "/audit",
    params(
        ("flag_id" = Option<Uuid>, Query, description = "Restrict to one flag"),
        ("team" = Option<String>, Query, description = "Restrict to one team"),
        ("operation" = Option<String>, Query, description = "Restrict to create, update, or delete"),
        ("before" = Option<String>, Query, description = "Only entries older than this RFC 3339 timestamp"),
        ("limit" = Option<i64>, Query, description = "Maximum entries (default 50, max 200)"),
    ),
    responses(
        (status = 200, description = "Audit entries", body = AuditLogResponse),
        (status = 400, description = "Invalid operation filter", body = crate::error::ErrorResponse),
    ),
    tag = "Audit"
)]
pub async fn list_audit_handler(
    State(state): State<FlagsAppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogResponse>, FlagApiError> {
    let limit = query.limit.clamp(1, 200);

    if let Some(operation) = &query.operation {
        if operation.parse::<beacon_db::models::FlagOperation>().is_err() {
            return Err(FlagApiError::validation(
                "operation",
                "operation must be one of: create, update, delete",
            ));
        }
    }

    let filter = AuditLogFilter {
        flag_id: query.flag_id,
        team: query.team,
        operation: query.operation.map(|o| o.to_lowercase()),
    };

    let (entries, total) = state
        .flag_service
        .list_audit(&filter, query.before, limit)
        .await?;

    Ok(Json(AuditLogResponse {
        entries: entries.into_iter().map(AuditEntryResponse::from).collect(),
        total,
    }))
}
