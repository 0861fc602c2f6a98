//! Services for the flag API.

mod audit;
mod flag_service;
mod rollout;

pub use audit::AuditService;
pub use flag_service::FlagService;
pub use rollout::{rollout_partition, stable_bucket, RolloutEngine, RolloutOutcome};
