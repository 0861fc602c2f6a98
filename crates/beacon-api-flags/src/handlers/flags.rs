//! Handlers for flag CRUD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use beacon_core::FlagId;
use beacon_db::models::FlagFilter;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FlagApiError;
use crate::models::{
    CreateFlagRequest, FlagListResponse, FlagResponse, ListFlagsQuery, UpdateFlagRequest,
};
use crate::router::FlagsAppState;

/// Query parameters for flag deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteFlagQuery {
    /// Caller-supplied actor recorded in the audit trail (unverified).
    pub changed_by: Option<String>,
}

/// POST /flags
///
/// Create a feature flag. Seeds association rows for every current
/// workspace and applies the initial rollout.
#[utoipa::path(
    post,
    path = "/flags",
    request_body = CreateFlagRequest,
    responses(
        (status = 201, description = "Flag created", body = FlagResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate (team, name)", body = crate::error::ErrorResponse),
    ),
    tag = "Flags"
)]
pub async fn create_flag_handler(
    State(state): State<FlagsAppState>,
    Json(request): Json<CreateFlagRequest>,
) -> Result<(StatusCode, Json<FlagResponse>), FlagApiError> {
    if let Some((field, message)) = request.validate() {
        return Err(FlagApiError::validation(field, message));
    }

    let flag = state.flag_service.create_flag(request).await?;
    Ok((StatusCode::CREATED, Json(FlagResponse::from(flag))))
}

/// GET /flags
///
/// List flags, optionally filtered by team or name substring.
#[utoipa::path(
    get,
    path = "/flags",
    params(
        ("team" = Option<String>, Query, description = "Restrict to one team"),
        ("q" = Option<String>, Query, description = "Name substring filter"),
        ("limit" = Option<i64>, Query, description = "Maximum entries (default 50, max 200)"),
        ("offset" = Option<i64>, Query, description = "Entries to skip"),
    ),
    responses(
        (status = 200, description = "Flag listing", body = FlagListResponse),
    ),
    tag = "Flags"
)]
pub async fn list_flags_handler(
    State(state): State<FlagsAppState>,
    Query(query): Query<ListFlagsQuery>,
) -> Result<Json<FlagListResponse>, FlagApiError> {
    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let filter = FlagFilter {
        team: query.team,
        name_query: query.q,
    };

    let (flags, total) = state.flag_service.list_flags(&filter, limit, offset).await?;

    Ok(Json(FlagListResponse {
        flags: flags.into_iter().map(FlagResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// GET /flags/{id}
///
/// Fetch one flag.
#[utoipa::path(
    get,
    path = "/flags/{id}",
    params(
        ("id" = Uuid, Path, description = "Flag ID")
    ),
    responses(
        (status = 200, description = "The flag", body = FlagResponse),
        (status = 404, description = "Flag not found", body = crate::error::ErrorResponse),
    ),
    tag = "Flags"
)]
pub async fn get_flag_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlagResponse>, FlagApiError> {
    let flag = state.flag_service.get_flag(FlagId::from_uuid(id)).await?;
    Ok(Json(FlagResponse::from(flag)))
}

/// PUT /flags/{id}
///
/// Update a flag and re-apply its rollout at the new percentage.
#[utoipa::path(
    put,
    path = "/flags/{id}",
    params(
        ("id" = Uuid, Path, description = "Flag ID")
    ),
    request_body = UpdateFlagRequest,
    responses(
        (status = 200, description = "Flag updated", body = FlagResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse),
        (status = 404, description = "Flag not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate (team, name)", body = crate::error::ErrorResponse),
    ),
    tag = "Flags"
)]
pub async fn update_flag_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFlagRequest>,
) -> Result<Json<FlagResponse>, FlagApiError> {
    if let Some((field, message)) = request.validate() {
        return Err(FlagApiError::validation(field, message));
    }

    let flag = state
        .flag_service
        .update_flag(FlagId::from_uuid(id), request)
        .await?;
    Ok(Json(FlagResponse::from(flag)))
}

/// DELETE /flags/{id}
///
/// Delete a flag. Associations cascade; audit entries survive.
#[utoipa::path(
    delete,
    path = "/flags/{id}",
    params(
        ("id" = Uuid, Path, description = "Flag ID"),
        ("changed_by" = Option<String>, Query, description = "Actor recorded in the audit trail"),
    ),
    responses(
        (status = 204, description = "Flag deleted"),
        (status = 404, description = "Flag not found", body = crate::error::ErrorResponse),
    ),
    tag = "Flags"
)]
pub async fn delete_flag_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteFlagQuery>,
) -> Result<StatusCode, FlagApiError> {
    state
        .flag_service
        .delete_flag(FlagId::from_uuid(id), query.changed_by)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
