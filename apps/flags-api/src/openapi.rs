//! OpenAPI documentation for the flag API.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use beacon_api_flags::error::ErrorResponse;
use beacon_api_flags::handlers;
use beacon_api_flags::models::{
    AuditEntryResponse, AuditLogResponse, CreateFlagRequest, FlagListResponse, FlagResponse,
    FlagWorkspacesResponse, RegionCountResponse, RegionCountsResponse, SetWorkspacesRequest,
    SetWorkspacesResponse, UpdateFlagRequest, WorkspaceFlagStateResponse, WorkspaceFlagsResponse,
};

/// OpenAPI document for the beacon flag API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Beacon Flags API",
        description = "Feature flag management: CRUD, deterministic percentage rollout, and audit trail"
    ),
    paths(
        handlers::flags::create_flag_handler,
        handlers::flags::list_flags_handler,
        handlers::flags::get_flag_handler,
        handlers::flags::update_flag_handler,
        handlers::flags::delete_flag_handler,
        handlers::workspaces::set_workspaces_handler,
        handlers::workspaces::list_flag_workspaces_handler,
        handlers::workspaces::region_counts_handler,
        handlers::workspaces::workspace_flags_handler,
        handlers::audit::list_audit_handler,
    ),
    components(schemas(
        CreateFlagRequest,
        UpdateFlagRequest,
        FlagResponse,
        FlagListResponse,
        SetWorkspacesRequest,
        SetWorkspacesResponse,
        WorkspaceFlagStateResponse,
        FlagWorkspacesResponse,
        WorkspaceFlagsResponse,
        RegionCountResponse,
        RegionCountsResponse,
        AuditEntryResponse,
        AuditLogResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Flags", description = "Flag CRUD and rollout"),
        (name = "Workspaces", description = "Workspace targeting and queries"),
        (name = "Audit", description = "Audit trail"),
    )
)]
pub struct ApiDoc;

/// Routes serving the OpenAPI document.
pub fn docs_routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
