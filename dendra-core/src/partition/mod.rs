//! Flat partitions derived from a merge tree cut.
//!
//! Cutting a dendrogram at height `h` yields the maximal subtrees whose merge
//! height does not exceed `h`. The descent is iterative and visits every node
//! at most once, so a cut costs O(N).
//!
//! Malformed trees are repaired rather than rejected:
//!
//! - member indices outside `0..N` are discarded;
//! - an index already claimed by an earlier cluster is not emitted again, so
//!   the clusters stay disjoint;
//! - clusters left empty by the two rules above are dropped;
//! - any index in `0..N` that no cluster covers is appended as a singleton.

use tracing::debug;

use crate::tree::MergeNode;

/// A disjoint decomposition of point indices into clusters.
///
/// Values produced by [`partition_at_height`] and
/// [`crate::partition_at_step`] cover `0..N` exactly once; values built with
/// [`ClusterPartition::from_clusters`] are taken as given and can be checked
/// with [`ClusterPartition::is_exhaustive_over`].
///
/// # Examples
/// ```
/// use dendra_core::ClusterPartition;
///
/// let partition = ClusterPartition::from_clusters(vec![vec![0, 2], vec![1]]);
/// assert_eq!(partition.len(), 2);
/// assert_eq!(partition.cluster_of(2), Some(0));
/// assert!(partition.is_exhaustive_over(3));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterPartition {
    clusters: Vec<Vec<usize>>,
}

impl ClusterPartition {
    /// Builds a partition from explicit clusters without validation.
    #[must_use]
    pub const fn from_clusters(clusters: Vec<Vec<usize>>) -> Self {
        Self { clusters }
    }

    /// Every point in its own cluster.
    #[must_use]
    pub fn singletons(point_count: usize) -> Self {
        Self {
            clusters: (0..point_count).map(|index| vec![index]).collect(),
        }
    }

    /// Clusters in emission order.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Consumes the partition, returning its clusters.
    #[must_use]
    pub fn into_clusters(self) -> Vec<Vec<usize>> {
        self.clusters
    }

    /// Number of clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns `true` when the partition has no clusters (only for `N == 0`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterates over the clusters.
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<usize>> {
        self.clusters.iter()
    }

    /// Index of the cluster containing `point`.
    #[must_use]
    pub fn cluster_of(&self, point: usize) -> Option<usize> {
        self.clusters
            .iter()
            .position(|members| members.contains(&point))
    }

    /// Per-point cluster index for points `0..point_count`.
    #[must_use]
    pub fn assignments(&self, point_count: usize) -> Vec<Option<usize>> {
        let mut out = vec![None; point_count];
        for (cluster, members) in self.clusters.iter().enumerate() {
            for &point in members {
                if let Some(slot) = out.get_mut(point) {
                    *slot = Some(cluster);
                }
            }
        }
        out
    }

    /// Returns `true` when the clusters are pairwise disjoint and cover
    /// `0..point_count` exactly once.
    #[must_use]
    pub fn is_exhaustive_over(&self, point_count: usize) -> bool {
        let mut seen = vec![false; point_count];
        for &point in self.clusters.iter().flatten() {
            match seen.get_mut(point) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|covered| covered)
    }

    /// Clusters with every member list sorted and the clusters ordered by
    /// their smallest member. Useful for order-insensitive comparisons.
    #[must_use]
    pub fn normalised(&self) -> Vec<Vec<usize>> {
        let mut clusters = self.clusters.clone();
        for members in &mut clusters {
            members.sort_unstable();
        }
        clusters.sort_unstable_by_key(|members| members.first().copied());
        clusters
    }
}

impl<'a> IntoIterator for &'a ClusterPartition {
    type Item = &'a Vec<usize>;
    type IntoIter = std::slice::Iter<'a, Vec<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cuts `root` at `cut_height` and returns the resulting partition of
/// `0..point_count`.
///
/// A node whose height exceeds the cut is split into its children; any other
/// node contributes its whole member set as one cluster. Leaves always yield
/// singletons. Clusters are emitted in left-to-right tree order, followed by
/// any repaired singletons in ascending index order.
///
/// # Examples
/// ```
/// use dendra_core::{MergeNode, partition_at_height};
///
/// let pair = MergeNode::merge(1.0, MergeNode::leaf(0, "a"), MergeNode::leaf(1, "b"));
/// let tree = MergeNode::merge(5.0, pair, MergeNode::leaf(2, "c"));
///
/// assert_eq!(partition_at_height(&tree, 2.0, 3).clusters(), &[vec![0, 1], vec![2]]);
/// assert_eq!(partition_at_height(&tree, 5.0, 3).len(), 1);
/// assert_eq!(partition_at_height(&tree, 0.5, 3).len(), 3);
/// ```
#[must_use]
pub fn partition_at_height(root: &MergeNode, cut_height: f64, point_count: usize) -> ClusterPartition {
    let mut claimed = vec![false; point_count];
    let mut clusters = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node {
            MergeNode::Internal {
                height, left, right, ..
            } if *height > cut_height => {
                stack.push(right);
                stack.push(left);
            }
            _ => {
                let cluster = claim(node.members(), &mut claimed);
                if !cluster.is_empty() {
                    clusters.push(cluster);
                }
            }
        }
    }

    let emitted = clusters.len();
    clusters.extend(
        claimed
            .iter()
            .enumerate()
            .filter(|(_, covered)| !**covered)
            .map(|(index, _)| vec![index]),
    );
    let injected = clusters.len() - emitted;
    if injected > 0 {
        debug!(
            injected,
            point_count, "merge tree omitted points; injected singleton clusters"
        );
    }

    ClusterPartition { clusters }
}

fn claim(members: &[usize], claimed: &mut [bool]) -> Vec<usize> {
    members
        .iter()
        .copied()
        .filter(|&index| match claimed.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        })
        .collect()
}
