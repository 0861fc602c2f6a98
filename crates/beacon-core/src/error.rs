//! Error types.
//!
//! Standardized error taxonomy shared across beacon services. Each
//! variant maps to a common failure scenario and converts cleanly to an
//! HTTP status at the API boundary.
//!
//! # Example
//!
//! ```
//! use beacon_core::{BeaconError, Result};
//!
//! fn find_flag(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(BeaconError::NotFound {
//!             resource: "FeatureFlag".to_string(),
//!             id: None,
//!         });
//!     }
//!     Ok(format!("flag {id}"))
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for beacon services.
///
/// # Variants
///
/// - `NotFound` - referenced resource does not exist (HTTP 404)
/// - `Conflict` - state conflict, e.g. duplicate (team, name) (HTTP 409)
/// - `Validation` - input failed boundary validation (HTTP 400)
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BeaconError {
    /// Requested resource was not found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g. "FeatureFlag").
        resource: String,
        /// Optional identifier of the resource.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// The operation conflicts with existing state.
    ///
    /// Used for duplicate (team, name) pairs on create and rename.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting state.
        message: String,
    },

    /// Input validation failure.
    ///
    /// Rejected at the boundary before reaching any engine logic.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Description of the validation failure.
        message: String,
    },
}

/// Type alias for Results using [`BeaconError`].
pub type Result<T> = std::result::Result<T, BeaconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_without_id() {
        let error = BeaconError::NotFound {
            resource: "FeatureFlag".to_string(),
            id: None,
        };
        assert_eq!(error.to_string(), "FeatureFlag not found");
    }

    #[test]
    fn test_not_found_display_with_id() {
        let error = BeaconError::NotFound {
            resource: "Workspace".to_string(),
            id: Some("ws-123".to_string()),
        };
        assert_eq!(error.to_string(), "Workspace not found: ws-123");
    }

    #[test]
    fn test_conflict_display() {
        let error = BeaconError::Conflict {
            message: "flag 'checkout-v2' already exists for team 'payments'".to_string(),
        };
        assert!(error.to_string().starts_with("Conflict:"));
        assert!(error.to_string().contains("checkout-v2"));
    }

    #[test]
    fn test_validation_display() {
        let error = BeaconError::Validation {
            field: "rollout_percentage".to_string(),
            message: "must be between 0 and 100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Validation error on field 'rollout_percentage': must be between 0 and 100"
        );
    }

    #[test]
    fn test_serialization_tags() {
        let error = BeaconError::NotFound {
            resource: "FeatureFlag".to_string(),
            id: Some("123".to_string()),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"not_found\""));
        assert!(json.contains("\"resource\":\"FeatureFlag\""));
    }

    #[test]
    fn test_is_std_error() {
        let error = BeaconError::Conflict {
            message: "dup".to_string(),
        };
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner() -> Result<()> {
            Err(BeaconError::NotFound {
                resource: "FeatureFlag".to_string(),
                id: None,
            })
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
