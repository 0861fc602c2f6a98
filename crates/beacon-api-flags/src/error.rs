//! Error types for the flag API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use beacon_core::{BeaconError, FlagId};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during flag operations.
#[derive(Debug, Error)]
pub enum FlagApiError {
    /// Domain error from the shared taxonomy (not-found, conflict,
    /// validation).
    #[error(transparent)]
    Core(#[from] BeaconError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response format for API errors.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl FlagApiError {
    /// A flag lookup came up empty.
    #[must_use]
    pub fn flag_not_found(id: FlagId) -> Self {
        Self::Core(BeaconError::NotFound {
            resource: "FeatureFlag".to_string(),
            id: Some(id.to_string()),
        })
    }

    /// One or more referenced workspaces do not exist.
    #[must_use]
    pub fn workspaces_not_found(missing: &[uuid::Uuid]) -> Self {
        let ids = missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::Core(BeaconError::NotFound {
            resource: "Workspace".to_string(),
            id: Some(ids),
        })
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Core(BeaconError::Conflict {
            message: message.into(),
        })
    }

    /// Create a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Core(BeaconError::Validation {
            field: field.into(),
            message: message.into(),
        })
    }
}

impl IntoResponse for FlagApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, field) = match &self {
            FlagApiError::Core(BeaconError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "not_found", self.to_string(), None)
            }
            FlagApiError::Core(BeaconError::Conflict { message }) => {
                (StatusCode::CONFLICT, "conflict", message.clone(), None)
            }
            FlagApiError::Core(BeaconError::Validation { field, message }) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.clone(),
                Some(field.clone()),
            ),
            FlagApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
            field,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_not_found_message() {
        let id = FlagId::new();
        let error = FlagApiError::flag_not_found(id);
        let msg = error.to_string();
        assert!(msg.contains("FeatureFlag not found"));
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn test_workspaces_not_found_names_missing_ids() {
        let missing = vec![uuid::Uuid::new_v4(), uuid::Uuid::new_v4()];
        let error = FlagApiError::workspaces_not_found(&missing);
        let msg = error.to_string();
        assert!(msg.contains(&missing[0].to_string()));
        assert!(msg.contains(&missing[1].to_string()));
    }

    #[test]
    fn test_conflict_constructor() {
        let error = FlagApiError::conflict("flag 'checkout-v2' already exists");
        match error {
            FlagApiError::Core(BeaconError::Conflict { message }) => {
                assert!(message.contains("checkout-v2"));
            }
            _ => panic!("Expected Conflict error"),
        }
    }

    #[test]
    fn test_validation_constructor() {
        let error = FlagApiError::validation("rollout_percentage", "must be between 0 and 100");
        match error {
            FlagApiError::Core(BeaconError::Validation { field, message }) => {
                assert_eq!(field, "rollout_percentage");
                assert!(message.contains("0 and 100"));
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_database_error_from_sqlx() {
        let error: FlagApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, FlagApiError::Database(_)));
    }
}
