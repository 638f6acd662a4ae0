//! Replay of the ordered merge-step log.
//!
//! The clustering service reports every merge it performed, in increasing
//! distance order, followed by a terminal completion marker. Replaying a
//! prefix of that log reconstructs the partition the algorithm held at that
//! moment.
//!
//! The replay counter follows the step-through walkthrough: at counter `k`
//! the first `k` merges are shown as connection lines, while clusters lag one
//! step behind and fuse the first `k - 1` merges. Counter values `0` and `1`
//! therefore have no clusters yet, and counter `m + 1` (for `m` real merges)
//! shows the fully merged state.

mod union_find;

use std::collections::HashMap;

use tracing::debug;

use crate::{partition::ClusterPartition, tree::MergeNode};

use self::union_find::DisjointSet;

/// Kind of entry in the merge-step log.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepAction {
    /// Two clusters were merged.
    #[cfg_attr(feature = "serde", serde(alias = "connect"))]
    Merge,
    /// Terminal marker emitted once every point has been merged.
    Complete,
}

/// One entry of the merge-step log.
///
/// # Examples
/// ```
/// use dendra_core::{MergeStep, StepAction};
///
/// let step = MergeStep::merge(vec![0, 1], vec![2], 2.0);
/// assert_eq!(step.merged(), &[0, 1, 2]);
/// assert_eq!(step.action(), StepAction::Merge);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MergeStep {
    side_a: Vec<usize>,
    side_b: Vec<usize>,
    merged: Vec<usize>,
    distance: f64,
    action: StepAction,
}

impl MergeStep {
    /// Creates a merge of `side_a` and `side_b` at `distance`.
    #[must_use]
    pub fn merge(side_a: Vec<usize>, side_b: Vec<usize>, distance: f64) -> Self {
        let mut merged = Vec::with_capacity(side_a.len() + side_b.len());
        merged.extend_from_slice(&side_a);
        merged.extend_from_slice(&side_b);
        merged.sort_unstable();
        merged.dedup();
        Self {
            side_a,
            side_b,
            merged,
            distance,
            action: StepAction::Merge,
        }
    }

    /// Creates the terminal completion marker.
    #[must_use]
    pub const fn complete(distance: f64, merged: Vec<usize>) -> Self {
        Self {
            side_a: Vec::new(),
            side_b: Vec::new(),
            merged,
            distance,
            action: StepAction::Complete,
        }
    }

    /// Creates a step from all of its fields as reported by the service.
    #[must_use]
    pub const fn from_parts(
        side_a: Vec<usize>,
        side_b: Vec<usize>,
        merged: Vec<usize>,
        distance: f64,
        action: StepAction,
    ) -> Self {
        Self {
            side_a,
            side_b,
            merged,
            distance,
            action,
        }
    }

    /// Members of the first merged cluster.
    #[must_use]
    pub fn side_a(&self) -> &[usize] {
        &self.side_a
    }

    /// Members of the second merged cluster.
    #[must_use]
    pub fn side_b(&self) -> &[usize] {
        &self.side_b
    }

    /// Members of the cluster produced by this step.
    #[must_use]
    pub fn merged(&self) -> &[usize] {
        &self.merged
    }

    /// Merge distance.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Step kind.
    #[must_use]
    pub const fn action(&self) -> StepAction {
        self.action
    }

    /// Returns `true` for real merges.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.action == StepAction::Merge
    }

    /// First member of each side, used to anchor connection lines.
    #[must_use]
    pub fn anchors(&self) -> Option<(usize, usize)> {
        Some((*self.side_a.first()?, *self.side_b.first()?))
    }
}

/// Result of replaying the merge log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepPartition {
    /// No merge has been fused into a cluster yet.
    Unclustered,
    /// Partition after the replayed merges.
    Clustered(ClusterPartition),
}

impl StepPartition {
    /// The partition, unless nothing has been merged yet.
    #[must_use]
    pub const fn partition(&self) -> Option<&ClusterPartition> {
        match self {
            Self::Unclustered => None,
            Self::Clustered(partition) => Some(partition),
        }
    }

    /// Consumes the value, returning the partition if there is one.
    #[must_use]
    pub fn into_partition(self) -> Option<ClusterPartition> {
        match self {
            Self::Unclustered => None,
            Self::Clustered(partition) => Some(partition),
        }
    }

    /// Returns `true` for [`StepPartition::Unclustered`].
    #[must_use]
    pub const fn is_unclustered(&self) -> bool {
        matches!(self, Self::Unclustered)
    }
}

/// Reconstructs the partition shown at replay counter `step`.
///
/// Counters `0` and `1` return [`StepPartition::Unclustered`]. Otherwise the
/// first `step - 1` merge steps are applied to `point_count` singletons; the
/// completion marker is never replayed. A step whose first `side_a` or
/// `side_b` index is missing or outside `0..point_count` is skipped.
///
/// Clusters are ordered by their smallest member and list members ascending.
///
/// # Examples
/// ```
/// use dendra_core::{MergeStep, partition_at_step};
///
/// let steps = vec![
///     MergeStep::merge(vec![0], vec![1], 1.0),
///     MergeStep::merge(vec![0, 1], vec![2], 2.0),
///     MergeStep::complete(2.0, vec![0, 1, 2]),
/// ];
/// assert!(partition_at_step(&steps, 1, 3).is_unclustered());
/// let partition = partition_at_step(&steps, 2, 3).into_partition().expect("clustered");
/// assert_eq!(partition.clusters(), &[vec![0, 1], vec![2]]);
/// ```
#[must_use]
pub fn partition_at_step(steps: &[MergeStep], step: usize, point_count: usize) -> StepPartition {
    if step <= 1 {
        return StepPartition::Unclustered;
    }

    let mut dsu = DisjointSet::new(point_count);
    let mut skipped = 0usize;
    for (position, merge) in steps
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.is_merge())
        .take(step - 1)
    {
        let roots = merge
            .anchors()
            .and_then(|(a, b)| Some((dsu.find(a)?, dsu.find(b)?)));
        match roots {
            Some((left, right)) => {
                dsu.union_roots(left, right);
            }
            None => {
                skipped += 1;
                debug!(position, "merge step references unknown points; skipped");
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, step, "replay skipped unresolvable merge steps");
    }

    StepPartition::Clustered(ClusterPartition::from_clusters(dsu.groups()))
}

/// Upper bound of the replay counter: one step per real merge plus the step
/// on which the last merge fuses into a cluster. Zero for an empty log.
#[must_use]
pub fn replayable_step_count(steps: &[MergeStep]) -> usize {
    match steps.iter().filter(|step| step.is_merge()).count() {
        0 => 0,
        merges => merges + 1,
    }
}

/// Connection lines visible at replay counter `step`: the anchor pair of each
/// merge among the first `step` log entries.
#[must_use]
pub fn connections_at_step(steps: &[MergeStep], step: usize) -> Vec<(usize, usize)> {
    steps
        .iter()
        .take(step)
        .filter(|entry| entry.is_merge())
        .filter_map(MergeStep::anchors)
        .collect()
}

/// Merge distance reached at replay counter `step`: the distance of log entry
/// `step - 1`, clamped to the last entry, or `0.0` before the first step.
#[must_use]
pub fn height_at_step(steps: &[MergeStep], step: usize) -> f64 {
    if step == 0 {
        return 0.0;
    }
    let index = (step - 1).min(steps.len().saturating_sub(1));
    steps.get(index).map_or(0.0, MergeStep::distance)
}

/// Position in the log of the merge that produced `node`.
///
/// A merge matches when its merged index set equals the node's members,
/// irrespective of order. Leaves never match. Callers resolving many nodes
/// against one log should build a [`MergePositions`] once instead.
#[must_use]
pub fn step_for_node(node: &MergeNode, steps: &[MergeStep]) -> Option<usize> {
    if node.is_leaf() {
        return None;
    }
    let members = node.members();
    steps.iter().position(|step| {
        step.is_merge() && step.merged().len() == members.len() && {
            let mut merged = step.merged().to_vec();
            merged.sort_unstable();
            merged == members
        }
    })
}

/// Sorted merged set to the first merge step producing it.
#[derive(Debug)]
pub(crate) struct MergePositions {
    positions: HashMap<Vec<usize>, usize>,
}

impl MergePositions {
    pub(crate) fn new(steps: &[MergeStep]) -> Self {
        let mut positions = HashMap::with_capacity(steps.len());
        for (position, step) in steps.iter().enumerate() {
            if !step.is_merge() {
                continue;
            }
            let mut merged = step.merged().to_vec();
            merged.sort_unstable();
            positions.entry(merged).or_insert(position);
        }
        Self { positions }
    }

    /// Same answer as [`step_for_node`] in constant time per node.
    pub(crate) fn of(&self, node: &MergeNode) -> Option<usize> {
        if node.is_leaf() {
            return None;
        }
        self.positions.get(node.members()).copied()
    }
}
