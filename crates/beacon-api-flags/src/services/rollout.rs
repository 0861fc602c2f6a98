//! Deterministic percentage rollout engine.
//!
//! Decides which workspaces have a flag enabled for a target rollout
//! percentage. The decision for a (flag, workspace) pair depends only
//! on the two identities: each pair hashes to a stable bucket in
//! [0, 100), and the pair is enabled iff its bucket is below the target
//! percentage. Raising the percentage therefore enables a superset of
//! the workspaces enabled at any lower percentage, and lowering it
//! disables a subset. Membership never scrambles as the target moves.

use beacon_db::models::{FeatureFlag, WorkspaceFeatureFlag};
use sha2::{Digest, Sha256};
use sqlx::PgConnection;
use uuid::Uuid;

/// Stable bucket in [0, 100) for a (flag, workspace) pair.
///
/// SHA-256 over the concatenated canonical UUID strings, first 8 bytes
/// as a big-endian integer, mod 100. Stable across processes and
/// restarts; no per-call randomness.
#[must_use]
pub fn stable_bucket(flag_id: Uuid, workspace_id: Uuid) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(flag_id.to_string().as_bytes());
    hasher.update(workspace_id.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % 100) as u8
}

/// The subset of `workspace_ids` whose bucket falls below `percentage`.
///
/// Pure function of the identities; the order of the input does not
/// influence which workspaces qualify.
#[must_use]
pub fn rollout_partition(flag_id: Uuid, workspace_ids: &[Uuid], percentage: i32) -> Vec<Uuid> {
    workspace_ids
        .iter()
        .copied()
        .filter(|workspace_id| i32::from(stable_bucket(flag_id, *workspace_id)) < percentage)
        .collect()
}

/// Summary of one rollout application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutOutcome {
    /// Number of associations considered (region scope applied).
    pub candidate_count: usize,
    /// Number of associations left enabled.
    pub enabled_count: usize,
}

/// Applies rollout decisions to the association rows of a flag.
///
/// The engine is the sole writer of the `enabled` column. All methods
/// run on the caller's open transaction so the rollout commits or rolls
/// back together with the flag mutation and its audit entry.
pub struct RolloutEngine;

impl RolloutEngine {
    /// Seed one association row per existing workspace for a new flag.
    ///
    /// Rows start disabled; the subsequent [`Self::apply_rollout`] call
    /// establishes the initial enablement. Workspaces provisioned after
    /// a flag exists do not get rows from here; that is an external
    /// provisioning responsibility.
    pub async fn seed_associations(
        conn: &mut PgConnection,
        flag_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let seeded = WorkspaceFeatureFlag::seed_for_flag(&mut *conn, flag_id).await?;
        tracing::debug!(flag_id = %flag_id, seeded, "Seeded association rows");
        Ok(seeded)
    }

    /// Re-derive the enablement set of a flag for a target percentage.
    ///
    /// The candidate set is every association of the flag, narrowed to
    /// in-scope workspaces when the flag's region scope is restricted;
    /// out-of-scope rows are left untouched. Candidates are always
    /// reset to disabled before the recompute: a row enabled under the
    /// previous percentage gets no special treatment, so no stale
    /// enablement survives a percentage decrease.
    ///
    /// An empty candidate set is a no-op, not an error.
    pub async fn apply_rollout(
        conn: &mut PgConnection,
        flag: &FeatureFlag,
        target_percentage: i32,
    ) -> Result<RolloutOutcome, sqlx::Error> {
        let candidates = if flag.is_all_regions() {
            WorkspaceFeatureFlag::list_for_flag(&mut *conn, flag.id).await?
        } else {
            WorkspaceFeatureFlag::list_for_flag_in_regions(&mut *conn, flag.id, &flag.regions)
                .await?
        };
        let candidate_ids: Vec<Uuid> = candidates.iter().map(|a| a.workspace_id).collect();

        WorkspaceFeatureFlag::set_enabled(&mut *conn, flag.id, &candidate_ids, false).await?;

        let enabled_ids = match target_percentage {
            0 => Vec::new(),
            100 => candidate_ids.clone(),
            _ => rollout_partition(flag.id, &candidate_ids, target_percentage),
        };

        WorkspaceFeatureFlag::set_enabled(&mut *conn, flag.id, &enabled_ids, true).await?;

        tracing::debug!(
            flag_id = %flag.id,
            target_percentage,
            candidates = candidate_ids.len(),
            enabled = enabled_ids.len(),
            "Applied rollout"
        );

        Ok(RolloutOutcome {
            candidate_count: candidate_ids.len(),
            enabled_count: enabled_ids.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_ids(n: u128) -> Vec<Uuid> {
        (1..=n).map(Uuid::from_u128).collect()
    }

    #[test]
    fn test_bucket_is_stable() {
        let flag = Uuid::from_u128(7);
        let workspace = Uuid::from_u128(42);
        assert_eq!(
            stable_bucket(flag, workspace),
            stable_bucket(flag, workspace)
        );
    }

    #[test]
    fn test_bucket_in_range() {
        let flag = Uuid::from_u128(99);
        for workspace in fixed_ids(500) {
            assert!(stable_bucket(flag, workspace) < 100);
        }
    }

    #[test]
    fn test_bucket_depends_on_both_identities() {
        let workspace = Uuid::from_u128(42);
        let buckets: Vec<u8> = (1..=50u128)
            .map(|n| stable_bucket(Uuid::from_u128(n), workspace))
            .collect();
        // Different flags should not all land the workspace in one bucket.
        assert!(buckets.iter().any(|b| *b != buckets[0]));
    }

    #[test]
    fn test_partition_monotone_in_percentage() {
        let flag = Uuid::from_u128(7);
        let workspaces = fixed_ids(200);

        let mut previous: Vec<Uuid> = Vec::new();
        for percentage in [1, 10, 30, 55, 80, 99] {
            let current = rollout_partition(flag, &workspaces, percentage);
            for id in &previous {
                assert!(
                    current.contains(id),
                    "workspace enabled at a lower percentage disappeared at {percentage}"
                );
            }
            previous = current;
        }
    }

    #[test]
    fn test_partition_deterministic() {
        let flag = Uuid::from_u128(11);
        let workspaces = fixed_ids(100);
        assert_eq!(
            rollout_partition(flag, &workspaces, 37),
            rollout_partition(flag, &workspaces, 37)
        );
    }

    #[test]
    fn test_partition_order_independent() {
        let flag = Uuid::from_u128(11);
        let workspaces = fixed_ids(50);
        let mut reversed = workspaces.clone();
        reversed.reverse();

        let mut a = rollout_partition(flag, &workspaces, 40);
        let mut b = rollout_partition(flag, &reversed, 40);
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_boundaries() {
        let flag = Uuid::from_u128(3);
        let workspaces = fixed_ids(100);
        assert!(rollout_partition(flag, &workspaces, 0).is_empty());
        assert_eq!(rollout_partition(flag, &workspaces, 100).len(), 100);
    }

    #[test]
    fn test_partition_distribution_is_plausible() {
        let flag = Uuid::from_u128(23);
        let workspaces = fixed_ids(1000);
        let enabled = rollout_partition(flag, &workspaces, 30).len();
        // Loose bounds; the hash should land near 30% of 1000.
        assert!((150..=450).contains(&enabled), "got {enabled}");
    }
}
