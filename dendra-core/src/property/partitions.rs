//! Exhaustiveness and agreement of tree cuts and log replay.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    ClusterPartition, MergeNode, partition_at_height, partition_at_step, replayable_step_count,
    step_for_node,
    test_utils::{MalformedTree, MergeHistory},
};

fn ensure_exhaustive(
    partition: &ClusterPartition,
    point_count: usize,
    context: &str,
) -> TestCaseResult {
    if partition.is_exhaustive_over(point_count) {
        Ok(())
    } else {
        Err(TestCaseError::fail(format!(
            "{context}: {:?} does not cover 0..{point_count} exactly once",
            partition.clusters(),
        )))
    }
}

/// Cuts at every merge height, below the lowest merge and above the root.
pub(super) fn run_cut_property(history: &MergeHistory) -> TestCaseResult {
    let n = history.point_count;
    let tree = &history.tree;

    let above = partition_at_height(tree, tree.max_height() + 1.0, n);
    ensure_exhaustive(&above, n, "above root")?;
    if above.len() != 1 {
        return Err(TestCaseError::fail(format!(
            "cut above the root produced {} clusters",
            above.len()
        )));
    }

    let floor = tree.min_internal_height().map_or(0.0, |lowest| lowest / 2.0);
    let below = partition_at_height(tree, floor, n);
    if below.normalised() != ClusterPartition::singletons(n).normalised() {
        return Err(TestCaseError::fail(format!(
            "cut below every merge produced {:?}",
            below.clusters()
        )));
    }

    let mut heights: Vec<f64> = tree
        .iter()
        .filter(|node| !node.is_leaf())
        .map(MergeNode::height)
        .collect();
    heights.sort_by(f64::total_cmp);
    for (applied, height) in heights.iter().enumerate() {
        let partition = partition_at_height(tree, *height, n);
        ensure_exhaustive(&partition, n, "cut at merge height")?;
        let expected = n - (applied + 1);
        if partition.len() != expected {
            return Err(TestCaseError::fail(format!(
                "cut at {height} produced {} clusters, expected {expected}",
                partition.len()
            )));
        }
    }
    Ok(())
}

/// Cuts of malformed trees still cover every point exactly once.
///
/// Besides `cut`, the tree is cut at each node height, below and above every
/// node, and at NaN.
pub(super) fn run_malformed_cut_property(sample: &MalformedTree, cut: f64) -> TestCaseResult {
    let n = sample.point_count;
    let mut heights: Vec<f64> = sample.tree.iter().map(MergeNode::height).collect();
    heights.extend([cut, -1.0, f64::INFINITY, f64::NAN]);
    for height in heights {
        let partition = partition_at_height(&sample.tree, height, n);
        ensure_exhaustive(&partition, n, &format!("malformed cut at {height}"))?;
    }
    Ok(())
}

/// Replays every counter and compares it with the equivalent cut.
pub(super) fn run_replay_property(history: &MergeHistory) -> TestCaseResult {
    let n = history.point_count;
    let steps = &history.steps;
    let count = replayable_step_count(steps);

    let merges = n.saturating_sub(1);
    let expected_count = if merges == 0 { 0 } else { merges + 1 };
    if count != expected_count {
        return Err(TestCaseError::fail(format!(
            "replayable count {count} for {n} points, expected {expected_count}"
        )));
    }

    for step in 0..=count {
        let replayed = partition_at_step(steps, step, n);
        let Some(partition) = replayed.partition() else {
            if step > 1 {
                return Err(TestCaseError::fail(format!("step {step} is unclustered")));
            }
            continue;
        };
        ensure_exhaustive(partition, n, "replay")?;
        let Some(last_applied) = steps.get(step - 2) else {
            return Err(TestCaseError::fail(format!("step {step} has no applied merge")));
        };
        let cut = partition_at_height(&history.tree, last_applied.distance(), n);
        if cut.normalised() != partition.normalised() {
            return Err(TestCaseError::fail(format!(
                "step {step}: replay {:?} disagrees with cut {:?}",
                partition.normalised(),
                cut.normalised(),
            )));
        }
    }

    if n > 1 {
        let final_partition = partition_at_step(steps, count, n);
        if final_partition.partition().map(ClusterPartition::len) != Some(1) {
            return Err(TestCaseError::fail(
                "final replay step must produce a single cluster".to_owned(),
            ));
        }
    }
    Ok(())
}

/// Every internal node is found in the log, in height order.
pub(super) fn run_node_step_property(history: &MergeHistory) -> TestCaseResult {
    for node in history.tree.iter().filter(|node| !node.is_leaf()) {
        let Some(position) = step_for_node(node, &history.steps) else {
            return Err(TestCaseError::fail(format!(
                "no step produced {:?}",
                node.members()
            )));
        };
        let distance = history.steps.get(position).map(|step| step.distance());
        if distance != Some(node.height()) {
            return Err(TestCaseError::fail(format!(
                "step {position} has distance {distance:?}, node height {}",
                node.height()
            )));
        }
    }
    Ok(())
}
