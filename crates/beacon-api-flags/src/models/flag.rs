//! Request and response models for flag CRUD.

use beacon_db::models::{FeatureFlag, ALL_REGIONS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length for flag names and team names.
const MAX_NAME_LENGTH: usize = 100;

fn validate_percentage(value: i32) -> Option<(String, String)> {
    if !(0..=100).contains(&value) {
        return Some((
            "rollout_percentage".to_string(),
            "rollout_percentage must be between 0 and 100".to_string(),
        ));
    }
    None
}

fn validate_regions(regions: &[String]) -> Option<(String, String)> {
    if regions.is_empty() {
        return Some((
            "regions".to_string(),
            "regions must contain at least one region code".to_string(),
        ));
    }
    if regions.iter().any(|r| r.trim().is_empty()) {
        return Some((
            "regions".to_string(),
            "region codes cannot be empty".to_string(),
        ));
    }
    None
}

fn validate_name_field(field: &str, value: &str) -> Option<(String, String)> {
    if value.trim().is_empty() {
        return Some((field.to_string(), format!("{field} cannot be empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Some((
            field.to_string(),
            format!("{field} cannot exceed {MAX_NAME_LENGTH} characters"),
        ));
    }
    None
}

/// Request to create a feature flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFlagRequest {
    /// Flag name, unique within the team.
    pub name: String,
    /// Owning team.
    pub team: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Region scope. Defaults to unrestricted (`["ALL"]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
    /// Initial rollout percentage. Defaults to 0 (disabled everywhere).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollout_percentage: Option<i32>,
    /// Caller-supplied actor recorded in the audit trail (unverified).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
}

impl CreateFlagRequest {
    /// Validate the request.
    ///
    /// Returns `Some((field, message))` if validation fails.
    #[must_use]
    pub fn validate(&self) -> Option<(String, String)> {
        if let Some(err) = validate_name_field("name", &self.name) {
            return Some(err);
        }
        if let Some(err) = validate_name_field("team", &self.team) {
            return Some(err);
        }
        if let Some(pct) = self.rollout_percentage {
            if let Some(err) = validate_percentage(pct) {
                return Some(err);
            }
        }
        if let Some(regions) = &self.regions {
            if let Some(err) = validate_regions(regions) {
                return Some(err);
            }
        }
        None
    }

    /// The effective initial rollout percentage.
    #[must_use]
    pub fn initial_percentage(&self) -> i32 {
        self.rollout_percentage.unwrap_or(0)
    }

    /// The effective region scope.
    #[must_use]
    pub fn effective_regions(&self) -> Vec<String> {
        self.regions
            .clone()
            .unwrap_or_else(|| vec![ALL_REGIONS.to_string()])
    }
}

/// Request to update a feature flag.
///
/// Full replacement of the mutable fields; the rollout is re-derived
/// from the new percentage on every update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateFlagRequest {
    /// New flag name.
    pub name: String,
    /// New owning team.
    pub team: String,
    /// New description (null clears it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New region scope.
    pub regions: Vec<String>,
    /// New rollout percentage.
    pub rollout_percentage: i32,
    /// Caller-supplied actor recorded in the audit trail (unverified).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
}

impl UpdateFlagRequest {
    /// Validate the request.
    #[must_use]
    pub fn validate(&self) -> Option<(String, String)> {
        if let Some(err) = validate_name_field("name", &self.name) {
            return Some(err);
        }
        if let Some(err) = validate_name_field("team", &self.team) {
            return Some(err);
        }
        if let Some(err) = validate_percentage(self.rollout_percentage) {
            return Some(err);
        }
        validate_regions(&self.regions)
    }
}

/// Query parameters for listing flags.
#[derive(Debug, Deserialize)]
pub struct ListFlagsQuery {
    /// Restrict to one team.
    pub team: Option<String>,
    /// Case-insensitive name substring.
    pub q: Option<String>,
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

/// A feature flag as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FlagResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rollout_percentage: i32,
    pub regions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeatureFlag> for FlagResponse {
    fn from(flag: FeatureFlag) -> Self {
        Self {
            id: flag.id,
            name: flag.name,
            team: flag.team,
            description: flag.description,
            rollout_percentage: flag.rollout_percentage,
            regions: flag.regions,
            created_at: flag.created_at,
            updated_at: flag.updated_at,
        }
    }
}

/// Paginated flag listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FlagListResponse {
    pub flags: Vec<FlagResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateFlagRequest {
        CreateFlagRequest {
            name: "checkout-v2".to_string(),
            team: "payments".to_string(),
            description: None,
            regions: None,
            rollout_percentage: None,
            changed_by: None,
        }
    }

    #[test]
    fn test_create_valid() {
        assert!(valid_create().validate().is_none());
    }

    #[test]
    fn test_create_empty_name() {
        let mut request = valid_create();
        request.name = "  ".to_string();
        let (field, msg) = request.validate().unwrap();
        assert_eq!(field, "name");
        assert!(msg.contains("cannot be empty"));
    }

    #[test]
    fn test_create_percentage_out_of_range() {
        let mut request = valid_create();
        request.rollout_percentage = Some(101);
        let (field, _) = request.validate().unwrap();
        assert_eq!(field, "rollout_percentage");

        request.rollout_percentage = Some(-1);
        assert!(request.validate().is_some());

        request.rollout_percentage = Some(100);
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_defaults() {
        let request = valid_create();
        assert_eq!(request.initial_percentage(), 0);
        assert_eq!(request.effective_regions(), vec!["ALL".to_string()]);
    }

    #[test]
    fn test_create_empty_regions_rejected() {
        let mut request = valid_create();
        request.regions = Some(vec![]);
        let (field, _) = request.validate().unwrap();
        assert_eq!(field, "regions");
    }

    #[test]
    fn test_update_blank_region_code_rejected() {
        let request = UpdateFlagRequest {
            name: "checkout-v2".to_string(),
            team: "payments".to_string(),
            description: None,
            regions: vec!["eu-west".to_string(), " ".to_string()],
            rollout_percentage: 25,
            changed_by: None,
        };
        let (field, msg) = request.validate().unwrap();
        assert_eq!(field, "regions");
        assert!(msg.contains("cannot be empty"));
    }
}
