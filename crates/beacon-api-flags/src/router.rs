//! Router configuration for the flag API.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::handlers::{
    create_flag_handler, delete_flag_handler, get_flag_handler, list_audit_handler,
    list_flag_workspaces_handler, list_flags_handler, region_counts_handler,
    set_workspaces_handler, update_flag_handler, workspace_flags_handler,
};
use crate::services::FlagService;

/// Application state for the flag API.
#[derive(Clone)]
pub struct FlagsAppState {
    /// Database connection pool.
    pub pool: PgPool,
    /// Service for flag lifecycle and rollout orchestration.
    pub flag_service: Arc<FlagService>,
}

/// Create the flag API router.
///
/// Provides:
/// - POST   /flags - Create a flag
/// - GET    /flags - List flags (team / name-substring filters)
/// - GET    /flags/{id} - Fetch a flag
/// - PUT    /flags/{id} - Update a flag and re-apply its rollout
/// - DELETE /flags/{id} - Delete a flag
/// - PUT    /flags/{id}/workspaces - Explicit workspace targeting
/// - GET    /flags/{id}/workspaces - Association state per workspace
/// - GET    /flags/{id}/regions - Enabled counts per region
/// - GET    /workspaces/{id}/flags - Enabled flags for a workspace
/// - GET    /audit - Audit trail, newest-first
pub fn flags_router(pool: PgPool) -> Router {
    let flag_service = Arc::new(FlagService::new(pool.clone()));

    let state = FlagsAppState { pool, flag_service };

    Router::new()
        .route("/flags", post(create_flag_handler))
        .route("/flags", get(list_flags_handler))
        .route("/flags/:id", get(get_flag_handler))
        .route("/flags/:id", put(update_flag_handler))
        .route("/flags/:id", delete(delete_flag_handler))
        .route("/flags/:id/workspaces", put(set_workspaces_handler))
        .route("/flags/:id/workspaces", get(list_flag_workspaces_handler))
        .route("/flags/:id/regions", get(region_counts_handler))
        .route("/workspaces/:id/flags", get(workspace_flags_handler))
        .route("/audit", get(list_audit_handler))
        .with_state(state)
}
