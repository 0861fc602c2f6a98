//! Database models.
//!
//! Each model struct maps one table and carries its query methods,
//! generic over [`sqlx::PgExecutor`] so they run equally against a pool
//! or an open transaction.

mod feature_flag;
mod flag_audit_log;
mod workspace;
mod workspace_flag;

pub use feature_flag::{CreateFeatureFlag, FeatureFlag, FlagFilter, UpdateFeatureFlag, ALL_REGIONS};
pub use flag_audit_log::{AuditLogFilter, CreateFlagAuditEntry, FlagAuditLog, FlagOperation};
pub use workspace::Workspace;
pub use workspace_flag::{FlagWorkspaceState, RegionEnabledCount, WorkspaceFeatureFlag};
