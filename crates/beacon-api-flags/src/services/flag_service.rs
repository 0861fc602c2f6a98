//! Flag lifecycle orchestration.
//!
//! Thin service tying the stores, the rollout engine, and the audit
//! recorder together. Every mutation runs in one transaction spanning
//! the flag write, the association batch writes, and the audit append:
//! all three commit together or none do (an early return rolls the
//! transaction back on drop).

use beacon_core::{FlagId, WorkspaceId};
use beacon_db::models::{
    AuditLogFilter, CreateFeatureFlag, FeatureFlag, FlagAuditLog, FlagFilter, FlagWorkspaceState,
    RegionEnabledCount, UpdateFeatureFlag, Workspace, WorkspaceFeatureFlag,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::FlagApiError;
use crate::models::{
    CreateFlagRequest, SetWorkspacesRequest, SetWorkspacesResponse, UpdateFlagRequest,
};
use crate::services::{AuditService, RolloutEngine};

/// Service for feature flag CRUD and rollout orchestration.
#[derive(Clone)]
pub struct FlagService {
    pool: PgPool,
}

impl FlagService {
    /// Create a new flag service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a feature flag.
    ///
    /// Enforces (team, name) uniqueness, seeds the association arena
    /// against the current workspace population, applies the initial
    /// rollout, and records the audit entry.
    pub async fn create_flag(
        &self,
        request: CreateFlagRequest,
    ) -> Result<FeatureFlag, FlagApiError> {
        if FeatureFlag::find_by_team_and_name(&self.pool, &request.team, &request.name)
            .await?
            .is_some()
        {
            return Err(FlagApiError::conflict(format!(
                "flag '{}' already exists for team '{}'",
                request.name, request.team
            )));
        }

        let mut tx = self.pool.begin().await?;

        let flag = FeatureFlag::create(
            &mut *tx,
            CreateFeatureFlag {
                name: request.name.clone(),
                team: request.team.clone(),
                description: request.description.clone(),
                rollout_percentage: request.initial_percentage(),
                regions: request.effective_regions(),
            },
        )
        .await?;

        let seeded = RolloutEngine::seed_associations(&mut tx, flag.id).await?;
        let outcome = RolloutEngine::apply_rollout(&mut tx, &flag, flag.rollout_percentage).await?;
        AuditService::record_created(&mut tx, &flag, request.changed_by).await?;

        tx.commit().await?;

        tracing::info!(
            flag_id = %flag.id,
            team = %flag.team,
            name = %flag.name,
            rollout_percentage = flag.rollout_percentage,
            seeded,
            enabled = outcome.enabled_count,
            "Feature flag created"
        );

        Ok(flag)
    }

    /// Update a feature flag and re-apply its rollout.
    pub async fn update_flag(
        &self,
        id: FlagId,
        request: UpdateFlagRequest,
    ) -> Result<FeatureFlag, FlagApiError> {
        let flag_id = *id.as_uuid();

        let existing = FeatureFlag::find_by_id(&self.pool, flag_id)
            .await?
            .ok_or_else(|| FlagApiError::flag_not_found(id))?;

        // (team, name) uniqueness, excluding the flag being updated.
        if let Some(other) =
            FeatureFlag::find_by_team_and_name(&self.pool, &request.team, &request.name).await?
        {
            if other.id != flag_id {
                return Err(FlagApiError::conflict(format!(
                    "flag '{}' already exists for team '{}'",
                    request.name, request.team
                )));
            }
        }

        let old_percentage = existing.rollout_percentage;

        let mut tx = self.pool.begin().await?;

        let updated = FeatureFlag::update(
            &mut *tx,
            flag_id,
            UpdateFeatureFlag {
                name: request.name.clone(),
                team: request.team.clone(),
                description: request.description.clone(),
                rollout_percentage: request.rollout_percentage,
                regions: request.regions.clone(),
            },
        )
        .await?
        .ok_or_else(|| FlagApiError::flag_not_found(id))?;

        let outcome =
            RolloutEngine::apply_rollout(&mut tx, &updated, updated.rollout_percentage).await?;
        AuditService::record_updated(
            &mut tx,
            &updated,
            old_percentage,
            updated.rollout_percentage,
            request.changed_by,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            flag_id = %updated.id,
            team = %updated.team,
            name = %updated.name,
            old_percentage,
            new_percentage = updated.rollout_percentage,
            enabled = outcome.enabled_count,
            "Feature flag updated"
        );

        Ok(updated)
    }

    /// Delete a feature flag.
    ///
    /// Association rows cascade at the schema level; the audit entry
    /// keeps the name and team snapshots after its flag reference is
    /// cleared.
    pub async fn delete_flag(
        &self,
        id: FlagId,
        changed_by: Option<String>,
    ) -> Result<(), FlagApiError> {
        let flag_id = *id.as_uuid();

        let existing = FeatureFlag::find_by_id(&self.pool, flag_id)
            .await?
            .ok_or_else(|| FlagApiError::flag_not_found(id))?;

        let mut tx = self.pool.begin().await?;

        AuditService::record_deleted(&mut tx, &existing, changed_by).await?;
        let deleted = FeatureFlag::delete(&mut *tx, flag_id).await?;
        if !deleted {
            return Err(FlagApiError::flag_not_found(id));
        }

        tx.commit().await?;

        tracing::info!(
            flag_id = %flag_id,
            team = %existing.team,
            name = %existing.name,
            "Feature flag deleted"
        );

        Ok(())
    }

    /// Force the flag state for an explicit set of workspaces,
    /// bypassing percentage bucketing.
    ///
    /// Only flips existing association rows; never fabricates them.
    pub async fn set_workspaces(
        &self,
        id: FlagId,
        request: SetWorkspacesRequest,
    ) -> Result<SetWorkspacesResponse, FlagApiError> {
        let flag_id = *id.as_uuid();

        let flag = FeatureFlag::find_by_id(&self.pool, flag_id)
            .await?
            .ok_or_else(|| FlagApiError::flag_not_found(id))?;

        let existing_ids = Workspace::find_existing_ids(&self.pool, &request.workspace_ids).await?;
        let missing: Vec<Uuid> = request
            .workspace_ids
            .iter()
            .filter(|requested| !existing_ids.contains(requested))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(FlagApiError::workspaces_not_found(&missing));
        }

        let mut tx = self.pool.begin().await?;

        let associations = WorkspaceFeatureFlag::list_for_flag_and_workspaces(
            &mut *tx,
            flag_id,
            &request.workspace_ids,
        )
        .await?;
        // Rows are never fabricated here: every requested workspace must
        // already carry an association for this flag.
        let distinct_requested: std::collections::HashSet<Uuid> =
            request.workspace_ids.iter().copied().collect();
        if associations.len() != distinct_requested.len() {
            return Err(FlagApiError::validation(
                "workspace_ids",
                "no associations found for the requested workspaces",
            ));
        }

        let old_enabled_count = WorkspaceFeatureFlag::count_enabled(&mut *tx, flag_id).await?;

        let target_ids: Vec<Uuid> = associations.iter().map(|a| a.workspace_id).collect();
        let updated =
            WorkspaceFeatureFlag::set_enabled(&mut *tx, flag_id, &target_ids, request.enabled)
                .await?;

        let new_enabled_count = WorkspaceFeatureFlag::count_enabled(&mut *tx, flag_id).await?;

        AuditService::record_workspaces_updated(
            &mut tx,
            &flag,
            old_enabled_count,
            new_enabled_count,
            request.changed_by,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            flag_id = %flag_id,
            enabled = request.enabled,
            updated,
            old_enabled_count,
            new_enabled_count,
            "Workspace targeting updated"
        );

        Ok(SetWorkspacesResponse {
            flag_id,
            updated,
            enabled_workspace_count: new_enabled_count,
        })
    }

    /// Fetch a flag by id.
    pub async fn get_flag(&self, id: FlagId) -> Result<FeatureFlag, FlagApiError> {
        FeatureFlag::find_by_id(&self.pool, *id.as_uuid())
            .await?
            .ok_or_else(|| FlagApiError::flag_not_found(id))
    }

    /// List flags with optional team/name filters.
    pub async fn list_flags(
        &self,
        filter: &FlagFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FeatureFlag>, i64), FlagApiError> {
        let flags = FeatureFlag::list(&self.pool, filter, limit, offset).await?;
        let total = FeatureFlag::count(&self.pool, filter).await?;
        Ok((flags, total))
    }

    /// List association state for a flag's workspaces.
    pub async fn list_flag_workspaces(
        &self,
        id: FlagId,
        enabled: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FlagWorkspaceState>, FlagApiError> {
        let flag = self.get_flag(id).await?;
        WorkspaceFeatureFlag::list_workspace_states(&self.pool, flag.id, enabled, limit, offset)
            .await
            .map_err(FlagApiError::from)
    }

    /// List the flags currently enabled for a workspace.
    pub async fn list_enabled_flags_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<FeatureFlag>, FlagApiError> {
        let ws_id = *workspace_id.as_uuid();
        if Workspace::find_by_id(&self.pool, ws_id).await?.is_none() {
            return Err(FlagApiError::workspaces_not_found(&[ws_id]));
        }
        FeatureFlag::list_enabled_for_workspace(&self.pool, ws_id)
            .await
            .map_err(FlagApiError::from)
    }

    /// Count enabled workspaces per region for a flag.
    pub async fn region_counts(
        &self,
        id: FlagId,
    ) -> Result<Vec<RegionEnabledCount>, FlagApiError> {
        let flag = self.get_flag(id).await?;
        WorkspaceFeatureFlag::count_enabled_by_region(&self.pool, flag.id)
            .await
            .map_err(FlagApiError::from)
    }

    /// List audit entries, newest-first.
    pub async fn list_audit(
        &self,
        filter: &AuditLogFilter,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<(Vec<FlagAuditLog>, i64), FlagApiError> {
        let entries = FlagAuditLog::list(&self.pool, filter, before, limit).await?;
        let total = FlagAuditLog::count(&self.pool, filter).await?;
        Ok((entries, total))
    }
}
