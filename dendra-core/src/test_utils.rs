//! Shared test fixtures for `dendra-core`.

use dendra_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{MergeNode, MergeStep, PointRecord};

/// Builds a proptest configuration from the shared CI profile so every suite
/// honours `PROGTEST_CASES` and `DENDRA_PBT_FORK`.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Four points: a tight triple near the origin and one outlier.
pub(crate) fn scenario_points() -> Vec<PointRecord> {
    vec![
        PointRecord::new("P0", 0.0, 0.0).with_number("age", 30.0),
        PointRecord::new("P1", 1.0, 0.0).with_number("age", 40.0),
        PointRecord::new("P2", 0.0, 1.0)
            .with_number("age", 50.0)
            .with_text("note", "late"),
        PointRecord::new("P3", 10.0, 10.0).with_text("age", "unknown"),
    ]
}

/// Merge tree over [`scenario_points`]: `(((P0 P1)@1 P2)@2 P3)@20`.
pub(crate) fn scenario_tree() -> MergeNode {
    MergeNode::merge(
        20.0,
        MergeNode::merge(
            2.0,
            MergeNode::merge(1.0, MergeNode::leaf(0, "P0"), MergeNode::leaf(1, "P1")),
            MergeNode::leaf(2, "P2"),
        ),
        MergeNode::leaf(3, "P3"),
    )
}

/// Merge log matching [`scenario_tree`], ending in the completion marker.
pub(crate) fn scenario_steps() -> Vec<MergeStep> {
    vec![
        MergeStep::merge(vec![0], vec![1], 1.0),
        MergeStep::merge(vec![0, 1], vec![2], 2.0),
        MergeStep::merge(vec![0, 1, 2], vec![3], 20.0),
        MergeStep::complete(20.0, vec![0, 1, 2, 3]),
    ]
}

/// A complete agglomeration of `point_count` points.
#[derive(Clone, Debug)]
pub(crate) struct MergeHistory {
    pub(crate) point_count: usize,
    pub(crate) tree: MergeNode,
    pub(crate) steps: Vec<MergeStep>,
}

/// Merges random pairs of clusters at strictly increasing heights until one
/// cluster remains, recording both the tree and the step log.
pub(crate) fn random_history(point_count: usize, seed: u64) -> MergeHistory {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut live: Vec<MergeNode> = (0..point_count)
        .map(|index| MergeNode::leaf(index, format!("P{index}")))
        .collect();
    let mut steps = Vec::with_capacity(point_count);
    let mut height = 0.0;
    while live.len() > 1 {
        let first = live.swap_remove(rng.gen_range(0..live.len()));
        let second = live.swap_remove(rng.gen_range(0..live.len()));
        height += rng.gen_range(0.1..5.0);
        steps.push(MergeStep::merge(
            first.members().to_vec(),
            second.members().to_vec(),
            height,
        ));
        live.push(MergeNode::merge(height, first, second));
    }
    let tree = live
        .pop()
        .unwrap_or_else(|| MergeNode::leaf(0, "P0"));
    steps.push(MergeStep::complete(height, tree.members().to_vec()));
    MergeHistory {
        point_count,
        tree,
        steps,
    }
}

/// Histories over 1 to 24 points.
pub(crate) fn merge_history() -> impl Strategy<Value = MergeHistory> {
    (1usize..=24, any::<u64>()).prop_map(|(point_count, seed)| random_history(point_count, seed))
}

/// A tree that disagrees with the point count it is cut against.
#[derive(Clone, Debug)]
pub(crate) struct MalformedTree {
    pub(crate) point_count: usize,
    pub(crate) tree: MergeNode,
}

/// Merges leaves drawn with replacement from `0..point_count + 3` at random,
/// unordered heights. Leaves end up missing, duplicated or out of range, and
/// parents may sit below their children.
pub(crate) fn random_malformed_tree(point_count: usize, seed: u64) -> MalformedTree {
    let mut rng = SmallRng::seed_from_u64(seed);
    let leaf_count = rng.gen_range(1..=point_count + 4);
    let mut live: Vec<MergeNode> = (0..leaf_count)
        .map(|slot| MergeNode::leaf(rng.gen_range(0..point_count + 3), format!("L{slot}")))
        .collect();
    while live.len() > 1 {
        let first = live.swap_remove(rng.gen_range(0..live.len()));
        let second = live.swap_remove(rng.gen_range(0..live.len()));
        live.push(MergeNode::merge(rng.gen_range(0.0..10.0), first, second));
    }
    let tree = live.pop().unwrap_or_else(|| MergeNode::leaf(0, "L0"));
    MalformedTree { point_count, tree }
}

/// Malformed trees over 0 to 12 points.
pub(crate) fn malformed_tree() -> impl Strategy<Value = MalformedTree> {
    (0usize..=12, any::<u64>())
        .prop_map(|(point_count, seed)| random_malformed_tree(point_count, seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_history_merges_everything() {
        let history = random_history(6, 7);
        assert_eq!(history.tree.members(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(history.tree.internal_node_count(), 5);
        assert_eq!(history.steps.len(), 6);
        assert!(
            history
                .steps
                .windows(2)
                .all(|pair| pair[0].distance() <= pair[1].distance())
        );
    }

    #[test]
    fn malformed_trees_stray_outside_the_point_range() {
        let strays = (0..32u64)
            .map(|seed| random_malformed_tree(4, seed))
            .filter(|sample| sample.tree.members().iter().any(|&index| index >= 4))
            .count();
        assert!(strays > 0);
    }

    #[test]
    fn single_point_history_has_only_the_marker() {
        let history = random_history(1, 0);
        assert!(history.tree.is_leaf());
        assert_eq!(history.steps.len(), 1);
        assert!(!history.steps[0].is_merge());
    }
}
