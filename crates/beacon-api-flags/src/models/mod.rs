//! Request and response models for the flag API.

mod audit;
mod flag;
mod workspaces;

pub use audit::{AuditEntryResponse, AuditLogQuery, AuditLogResponse};
pub use flag::{
    CreateFlagRequest, FlagListResponse, FlagResponse, ListFlagsQuery, UpdateFlagRequest,
};
pub use workspaces::{
    FlagWorkspacesResponse, ListFlagWorkspacesQuery, RegionCountResponse, RegionCountsResponse,
    SetWorkspacesRequest, SetWorkspacesResponse, WorkspaceFlagStateResponse,
    WorkspaceFlagsResponse,
};
