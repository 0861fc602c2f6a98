//! Handlers for workspace targeting and workspace-side queries.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use beacon_core::{FlagId, WorkspaceId};
use uuid::Uuid;

use crate::error::FlagApiError;
use crate::models::{
    FlagWorkspacesResponse, ListFlagWorkspacesQuery, RegionCountResponse, RegionCountsResponse,
    SetWorkspacesRequest, SetWorkspacesResponse, WorkspaceFlagStateResponse,
    WorkspaceFlagsResponse,
};
use crate::router::FlagsAppState;

/// PUT /flags/{id}/workspaces
///
/// Force-enable or force-disable a flag for an explicit list of
/// workspaces, independent of percentage bucketing. Association rows
/// must already exist; this path never creates them.
#[utoipa::path(
    put,
    path = "/flags/{id}/workspaces",
    params(
        ("id" = Uuid, Path, description = "Flag ID")
    ),
    request_body = SetWorkspacesRequest,
    responses(
        (status = 200, description = "Targeting updated", body = SetWorkspacesResponse),
        (status = 400, description = "Validation error or no associations found", body = crate::error::ErrorResponse),
        (status = 404, description = "Flag or workspace not found", body = crate::error::ErrorResponse),
    ),
    tag = "Workspaces"
)]
pub async fn set_workspaces_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetWorkspacesRequest>,
) -> Result<Json<SetWorkspacesResponse>, FlagApiError> {
    if let Some((field, message)) = request.validate() {
        return Err(FlagApiError::validation(field, message));
    }

    let response = state
        .flag_service
        .set_workspaces(FlagId::from_uuid(id), request)
        .await?;
    Ok(Json(response))
}

/// GET /flags/{id}/workspaces
///
/// List the workspaces associated with a flag and their enablement
/// state, optionally filtered to one state.
#[utoipa::path(
    get,
    path = "/flags/{id}/workspaces",
    params(
        ("id" = Uuid, Path, description = "Flag ID"),
        ("enabled" = Option<bool>, Query, description = "Restrict to one enablement state"),
        ("limit" = Option<i64>, Query, description = "Maximum entries (default 50, max 200)"),
        ("offset" = Option<i64>, Query, description = "Entries to skip"),
    ),
    responses(
        (status = 200, description = "Workspace states", body = FlagWorkspacesResponse),
        (status = 404, description = "Flag not found", body = crate::error::ErrorResponse),
    ),
    tag = "Workspaces"
)]
pub async fn list_flag_workspaces_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListFlagWorkspacesQuery>,
) -> Result<Json<FlagWorkspacesResponse>, FlagApiError> {
    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let states = state
        .flag_service
        .list_flag_workspaces(FlagId::from_uuid(id), query.enabled, limit, offset)
        .await?;

    Ok(Json(FlagWorkspacesResponse {
        flag_id: id,
        workspaces: states
            .into_iter()
            .map(WorkspaceFlagStateResponse::from)
            .collect(),
        limit,
        offset,
    }))
}

/// GET /flags/{id}/regions
///
/// Enabled-workspace count per region for a flag.
#[utoipa::path(
    get,
    path = "/flags/{id}/regions",
    params(
        ("id" = Uuid, Path, description = "Flag ID")
    ),
    responses(
        (status = 200, description = "Per-region enabled counts", body = RegionCountsResponse),
        (status = 404, description = "Flag not found", body = crate::error::ErrorResponse),
    ),
    tag = "Workspaces"
)]
pub async fn region_counts_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegionCountsResponse>, FlagApiError> {
    let counts = state
        .flag_service
        .region_counts(FlagId::from_uuid(id))
        .await?;

    Ok(Json(RegionCountsResponse {
        flag_id: id,
        regions: counts.into_iter().map(RegionCountResponse::from).collect(),
    }))
}

/// GET /workspaces/{id}/flags
///
/// List the flags currently enabled for a workspace.
#[utoipa::path(
    get,
    path = "/workspaces/{id}/flags",
    params(
        ("id" = Uuid, Path, description = "Workspace ID")
    ),
    responses(
        (status = 200, description = "Enabled flags", body = WorkspaceFlagsResponse),
        (status = 404, description = "Workspace not found", body = crate::error::ErrorResponse),
    ),
    tag = "Workspaces"
)]
pub async fn workspace_flags_handler(
    State(state): State<FlagsAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceFlagsResponse>, FlagApiError> {
    let flags = state
        .flag_service
        .list_enabled_flags_for_workspace(WorkspaceId::from_uuid(id))
        .await?;
    Ok(Json(WorkspaceFlagsResponse::from_flags(id, flags)))
}
