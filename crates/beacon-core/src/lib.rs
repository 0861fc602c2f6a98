//! Core types for the beacon feature-flag platform.
//!
//! This crate holds the pieces every other beacon crate depends on:
//! strongly typed identifiers and the shared error taxonomy. It is
//! deliberately free of persistence and transport concerns.

pub mod error;
pub mod ids;

pub use error::{BeaconError, Result};
pub use ids::{FlagId, ParseIdError, WorkspaceId};
