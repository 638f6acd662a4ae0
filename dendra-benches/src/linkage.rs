//! Single-linkage agglomeration producing a merge tree and step log.
//!
//! All pairwise distances are sorted in non-decreasing order and merged with
//! a union-find structure; each successful union emits one tree node and one
//! log entry. The quadratic edge list is fine for benchmark-sized inputs.

use dendra_core::{MergeNode, MergeStep, PointRecord};

/// Merge tree and step log over a dataset.
#[derive(Clone, Debug)]
pub struct MergeHistory {
    /// Root of the merge tree.
    pub tree: MergeNode,
    /// Merge log ending in the completion marker.
    pub steps: Vec<MergeStep>,
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    distance: f64,
    source: usize,
    target: usize,
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    component: Vec<Option<MergeNode>>,
}

impl DisjointSet {
    fn new(points: &[PointRecord]) -> Self {
        Self {
            parent: (0..points.len()).collect(),
            rank: vec![0; points.len()],
            component: points
                .iter()
                .enumerate()
                .map(|(index, point)| Some(MergeNode::leaf(index, point.id.clone())))
                .collect(),
        }
    }

    fn parent_of(&self, node: usize) -> usize {
        self.parent.get(node).copied().unwrap_or(node)
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent_of(root) != root {
            root = self.parent_of(root);
        }
        let mut cursor = node;
        while cursor != root {
            let next = self.parent_of(cursor);
            if let Some(slot) = self.parent.get_mut(cursor) {
                *slot = root;
            }
            cursor = next;
        }
        root
    }

    fn rank_of(&self, node: usize) -> u8 {
        self.rank.get(node).copied().unwrap_or(0)
    }

    /// Joins the two roots, returning the surviving root.
    fn union_roots(&mut self, left: usize, right: usize) -> usize {
        let (winner, loser) = if self.rank_of(left) < self.rank_of(right) {
            (right, left)
        } else {
            (left, right)
        };
        if let Some(slot) = self.parent.get_mut(loser) {
            *slot = winner;
        }
        if self.rank_of(winner) == self.rank_of(loser) {
            if let Some(rank) = self.rank.get_mut(winner) {
                *rank = rank.saturating_add(1);
            }
        }
        winner
    }

    fn take(&mut self, root: usize) -> Option<MergeNode> {
        self.component.get_mut(root).and_then(Option::take)
    }

    fn put(&mut self, root: usize, node: MergeNode) {
        if let Some(slot) = self.component.get_mut(root) {
            *slot = Some(node);
        }
    }
}

fn pairwise_edges(points: &[PointRecord]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (source, a) in points.iter().enumerate() {
        for (offset, b) in points.iter().skip(source + 1).enumerate() {
            edges.push(Edge {
                distance: a.position().distance_to(b.position()),
                source,
                target: source + 1 + offset,
            });
        }
    }
    edges.sort_unstable_by(|left, right| {
        left.distance
            .total_cmp(&right.distance)
            .then(left.source.cmp(&right.source))
            .then(left.target.cmp(&right.target))
    });
    edges
}

/// Builds the single-linkage history of `points`, or `None` for an empty
/// dataset.
#[must_use]
pub fn single_linkage(points: &[PointRecord]) -> Option<MergeHistory> {
    let mut dsu = DisjointSet::new(points);
    let mut steps = Vec::with_capacity(points.len());
    let mut last_distance = 0.0;
    for edge in pairwise_edges(points) {
        let left_root = dsu.find(edge.source);
        let right_root = dsu.find(edge.target);
        if left_root == right_root {
            continue;
        }
        let (Some(left), Some(right)) = (dsu.take(left_root), dsu.take(right_root)) else {
            continue;
        };
        steps.push(MergeStep::merge(
            left.members().to_vec(),
            right.members().to_vec(),
            edge.distance,
        ));
        let merged = dsu.union_roots(left_root, right_root);
        dsu.put(merged, MergeNode::merge(edge.distance, left, right));
        last_distance = edge.distance;
    }
    let root = dsu.find(0);
    let tree = dsu.take(root)?;
    steps.push(MergeStep::complete(last_distance, tree.members().to_vec()));
    Some(MergeHistory { tree, steps })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_nearest_pairs_first() {
        let points = [
            PointRecord::new("a", 0.0, 0.0),
            PointRecord::new("b", 1.0, 0.0),
            PointRecord::new("c", 5.0, 0.0),
            PointRecord::new("d", 5.5, 0.0),
        ];
        let history = single_linkage(&points).expect("non-empty input");
        let distances: Vec<f64> = history.steps.iter().map(MergeStep::distance).collect();
        assert_eq!(distances, vec![0.5, 1.0, 4.0, 4.0]);
        assert_eq!(history.steps[0].merged(), &[2, 3]);
        assert_eq!(history.tree.members(), &[0, 1, 2, 3]);
        assert_eq!(history.tree.height(), 4.0);
        assert!(!history.steps[3].is_merge());
    }

    #[test]
    fn empty_input_has_no_history() {
        assert!(single_linkage(&[]).is_none());
    }

    #[test]
    fn single_point_is_a_leaf() {
        let history = single_linkage(&[PointRecord::new("solo", 1.0, 1.0)]).expect("one point");
        assert!(history.tree.is_leaf());
        assert_eq!(history.steps.len(), 1);
    }
}
