//! Feature flag API for beacon.
//!
//! Provides flag CRUD, the deterministic percentage rollout engine,
//! explicit workspace targeting, and the append-only audit trail.
//!
//! ## Rollout model
//!
//! Every flag owns one association row per workspace, seeded at flag
//! creation. Changing a flag's rollout percentage re-derives the full
//! enablement set from a stable hash of (flag id, workspace id), so the
//! same workspaces stay enabled as the percentage moves: raising the
//! percentage only adds workspaces, lowering it only removes them.
//!
//! ## Audit trail
//!
//! Every mutation appends exactly one audit entry inside the mutation's
//! transaction: the rollout changes and the audit record commit or roll
//! back together.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::FlagApiError;
pub use router::{flags_router, FlagsAppState};
pub use services::{AuditService, FlagService, RolloutEngine};
