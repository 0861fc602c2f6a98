//! Tests for the deterministic rollout decision logic.
//!
//! These exercise the pure decision layer: the stable bucket function
//! and the percentage partition it induces. The properties here are the
//! ones operators rely on when they move a percentage slider: no
//! flapping, no scrambling, exact boundaries.

use beacon_api_flags::services::{rollout_partition, stable_bucket};
use std::collections::HashSet;
use uuid::Uuid;

fn workspaces(n: u128) -> Vec<Uuid> {
    // Deterministic ids so failures reproduce exactly.
    (1..=n).map(|i| Uuid::from_u128(i * 7919)).collect()
}

const FLAG: u128 = 0xFEED_FACE;

/// Same inputs always produce the same bucket, across calls and across
/// processes (the hash has no process-local state).
#[test]
fn test_bucket_determinism() {
    let flag = Uuid::from_u128(FLAG);
    for workspace in workspaces(100) {
        let first = stable_bucket(flag, workspace);
        let second = stable_bucket(flag, workspace);
        assert_eq!(first, second);
    }
}

/// Buckets are always in [0, 100).
#[test]
fn test_bucket_range() {
    let flag = Uuid::from_u128(FLAG);
    for workspace in workspaces(1000) {
        assert!(stable_bucket(flag, workspace) < 100);
    }
}

/// Monotonicity: the set enabled at a lower percentage is a subset of
/// the set enabled at any higher percentage.
#[test]
fn test_partition_monotonicity_full_sweep() {
    let flag = Uuid::from_u128(FLAG);
    let pool = workspaces(300);

    let mut previous: HashSet<Uuid> = HashSet::new();
    for percentage in 1..=99 {
        let current: HashSet<Uuid> =
            rollout_partition(flag, &pool, percentage).into_iter().collect();
        assert!(
            previous.is_subset(&current),
            "membership scrambled between {} and {}",
            percentage - 1,
            percentage
        );
        previous = current;
    }
}

/// Applying the same percentage twice yields the identical enabled set.
#[test]
fn test_partition_idempotence_at_fixed_percentage() {
    let flag = Uuid::from_u128(FLAG);
    let pool = workspaces(10);

    let first = rollout_partition(flag, &pool, 30);
    let second = rollout_partition(flag, &pool, 30);
    assert_eq!(first, second);
}

/// Percentage 0 enables nothing; percentage 100 enables everything.
#[test]
fn test_partition_boundary_exactness() {
    let flag = Uuid::from_u128(FLAG);
    let pool = workspaces(250);

    assert!(rollout_partition(flag, &pool, 0).is_empty());

    let all = rollout_partition(flag, &pool, 100);
    assert_eq!(all.len(), pool.len());
}

/// The enabled subset is exactly the workspaces whose bucket is below
/// the target, which is the membership rule the engine persists.
#[test]
fn test_partition_matches_bucket_rule() {
    let flag = Uuid::from_u128(FLAG);
    let pool = workspaces(200);
    let target = 42;

    let enabled: HashSet<Uuid> = rollout_partition(flag, &pool, target).into_iter().collect();
    for workspace in &pool {
        let expected = i32::from(stable_bucket(flag, *workspace)) < target;
        assert_eq!(enabled.contains(workspace), expected);
    }
}

/// Input order does not influence membership.
#[test]
fn test_partition_independent_of_input_order() {
    let flag = Uuid::from_u128(FLAG);
    let pool = workspaces(120);
    let mut shuffled = pool.clone();
    shuffled.rotate_left(37);
    shuffled.reverse();

    let a: HashSet<Uuid> = rollout_partition(flag, &pool, 60).into_iter().collect();
    let b: HashSet<Uuid> = rollout_partition(flag, &shuffled, 60).into_iter().collect();
    assert_eq!(a, b);
}

/// Different flags partition the same workspace pool differently; the
/// bucket is a function of the pair, not of the workspace alone.
#[test]
fn test_partition_varies_per_flag() {
    let pool = workspaces(200);
    let a: HashSet<Uuid> = rollout_partition(Uuid::from_u128(1), &pool, 50)
        .into_iter()
        .collect();
    let b: HashSet<Uuid> = rollout_partition(Uuid::from_u128(2), &pool, 50)
        .into_iter()
        .collect();
    assert_ne!(a, b);
}

/// A fresh recompute at a lower percentage keeps only bucket-qualifying
/// workspaces: nothing sticks around from the higher-percentage set.
#[test]
fn test_no_sticky_enablement_after_decrease() {
    let flag = Uuid::from_u128(FLAG);
    let pool = workspaces(300);

    let high: HashSet<Uuid> = rollout_partition(flag, &pool, 80).into_iter().collect();
    let low: HashSet<Uuid> = rollout_partition(flag, &pool, 20).into_iter().collect();

    assert!(low.is_subset(&high));
    assert!(low.len() < high.len());
    for workspace in high.difference(&low) {
        assert!(i32::from(stable_bucket(flag, *workspace)) >= 20);
    }
}
