//! Request and response models for workspace targeting and listing.

use beacon_db::models::{FeatureFlag, FlagWorkspaceState, RegionEnabledCount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::FlagResponse;

/// Request to force the flag state for an explicit set of workspaces,
/// independent of percentage bucketing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetWorkspacesRequest {
    /// The workspaces to update. Association rows must already exist.
    #[schema(value_type = Vec<String>, format = "uuid")]
    pub workspace_ids: Vec<Uuid>,
    /// The state to force on those workspaces.
    pub enabled: bool,
    /// Caller-supplied actor recorded in the audit trail (unverified).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
}

impl SetWorkspacesRequest {
    /// Validate the request.
    #[must_use]
    pub fn validate(&self) -> Option<(String, String)> {
        if self.workspace_ids.is_empty() {
            return Some((
                "workspace_ids".to_string(),
                "workspace_ids must contain at least one workspace".to_string(),
            ));
        }
        None
    }
}

/// Result of an explicit workspace targeting update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetWorkspacesResponse {
    #[schema(value_type = String, format = "uuid")]
    pub flag_id: Uuid,
    /// Number of association rows updated.
    pub updated: u64,
    /// Enabled-workspace count after the update.
    pub enabled_workspace_count: i64,
}

/// Association state of one workspace for a flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceFlagStateResponse {
    #[schema(value_type = String, format = "uuid")]
    pub workspace_id: Uuid,
    pub workspace_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<FlagWorkspaceState> for WorkspaceFlagStateResponse {
    fn from(state: FlagWorkspaceState) -> Self {
        Self {
            workspace_id: state.workspace_id,
            workspace_name: state.workspace_name,
            region: state.region,
            enabled: state.enabled,
            updated_at: state.updated_at,
        }
    }
}

/// Query parameters for listing a flag's workspaces.
#[derive(Debug, Deserialize)]
pub struct ListFlagWorkspacesQuery {
    /// Restrict to one enablement state.
    pub enabled: Option<bool>,
    /// Maximum entries to return (default 50, max 200).
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Entries to skip.
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Workspaces associated with a flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FlagWorkspacesResponse {
    #[schema(value_type = String, format = "uuid")]
    pub flag_id: Uuid,
    pub workspaces: Vec<WorkspaceFlagStateResponse>,
    pub limit: i64,
    pub offset: i64,
}

/// Flags enabled for one workspace.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceFlagsResponse {
    #[schema(value_type = String, format = "uuid")]
    pub workspace_id: Uuid,
    pub flags: Vec<FlagResponse>,
}

impl WorkspaceFlagsResponse {
    /// Build the response from persistence rows.
    #[must_use]
    pub fn from_flags(workspace_id: Uuid, flags: Vec<FeatureFlag>) -> Self {
        Self {
            workspace_id,
            flags: flags.into_iter().map(FlagResponse::from).collect(),
        }
    }
}

/// Enabled-workspace count for one region.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionCountResponse {
    /// Region code; absent for workspaces with no region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub enabled_count: i64,
}

impl From<RegionEnabledCount> for RegionCountResponse {
    fn from(count: RegionEnabledCount) -> Self {
        Self {
            region: count.region,
            enabled_count: count.enabled_count,
        }
    }
}

/// Per-region enabled counts for a flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionCountsResponse {
    #[schema(value_type = String, format = "uuid")]
    pub flag_id: Uuid,
    pub regions: Vec<RegionCountResponse>,
}
