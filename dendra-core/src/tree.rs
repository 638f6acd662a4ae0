//! Merge tree (dendrogram) model.
//!
//! A merge tree is a binary tree whose leaves are data points and whose
//! internal nodes record the distance at which two clusters were combined.
//! Trees are built once per dataset/algorithm selection and never mutated;
//! every node is exclusively owned by its parent.

/// A node of a merge tree.
///
/// Internal nodes carry the union of their children's member indices so that
/// a subtree can be emitted as a cluster without walking it again.
///
/// # Examples
/// ```
/// use dendra_core::MergeNode;
///
/// let pair = MergeNode::merge(1.0, MergeNode::leaf(0, "a"), MergeNode::leaf(1, "b"));
/// let tree = MergeNode::merge(2.0, pair, MergeNode::leaf(2, "c"));
/// assert_eq!(tree.height(), 2.0);
/// assert_eq!(tree.members(), &[0, 1, 2]);
/// assert_eq!(tree.leaf_labels_in_order(), vec!["a", "b", "c"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum MergeNode {
    /// A single data point.
    Leaf {
        /// Point index in `0..N`.
        index: usize,
        /// Display label, usually the point identifier.
        label: String,
    },
    /// The merge of two clusters.
    Internal {
        /// Distance at which the children were merged.
        height: f64,
        /// First merged subtree.
        left: Box<MergeNode>,
        /// Second merged subtree.
        right: Box<MergeNode>,
        /// Sorted, de-duplicated union of both children's members.
        members: Vec<usize>,
    },
}

impl MergeNode {
    /// Creates a leaf for point `index`.
    #[must_use]
    pub fn leaf(index: usize, label: impl Into<String>) -> Self {
        Self::Leaf {
            index,
            label: label.into(),
        }
    }

    /// Creates an internal node merging `left` and `right` at `height`.
    #[must_use]
    pub fn merge(height: f64, left: Self, right: Self) -> Self {
        let mut members = Vec::with_capacity(left.members().len() + right.members().len());
        members.extend_from_slice(left.members());
        members.extend_from_slice(right.members());
        members.sort_unstable();
        members.dedup();
        Self::Internal {
            height,
            left: Box::new(left),
            right: Box::new(right),
            members,
        }
    }

    /// Merge height; leaves sit at height zero.
    #[must_use]
    pub const fn height(&self) -> f64 {
        match self {
            Self::Leaf { .. } => 0.0,
            Self::Internal { height, .. } => *height,
        }
    }

    /// Point indices contained in this subtree.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        match self {
            Self::Leaf { index, .. } => std::slice::from_ref(index),
            Self::Internal { members, .. } => members,
        }
    }

    /// Returns `true` for leaves.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Returns both children of an internal node.
    #[must_use]
    pub fn children(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Leaf { .. } => None,
            Self::Internal { left, right, .. } => Some((left, right)),
        }
    }

    /// Iterates over the subtree in pre-order, visiting left before right.
    #[must_use]
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Largest internal merge height in the subtree, or `0.0` for a lone leaf.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.iter()
            .filter(|node| !node.is_leaf())
            .map(Self::height)
            .fold(0.0, f64::max)
    }

    /// Smallest internal merge height, or `None` when the subtree is a leaf.
    #[must_use]
    pub fn min_internal_height(&self) -> Option<f64> {
        self.iter()
            .filter(|node| !node.is_leaf())
            .map(Self::height)
            .reduce(f64::min)
    }

    /// Number of internal nodes, i.e. the number of merges encoded.
    #[must_use]
    pub fn internal_node_count(&self) -> usize {
        self.iter().filter(|node| !node.is_leaf()).count()
    }

    /// Leaf labels from left to right.
    #[must_use]
    pub fn leaf_labels_in_order(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|node| match node {
                Self::Leaf { label, .. } => Some(label.as_str()),
                Self::Internal { .. } => None,
            })
            .collect()
    }
}

/// Pre-order iterator over a [`MergeNode`] subtree.
///
/// Uses an explicit stack so deep, chain-shaped trees do not exhaust the call
/// stack.
#[derive(Debug)]
pub struct Nodes<'a> {
    stack: Vec<&'a MergeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a MergeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some((left, right)) = node.children() {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(node)
    }
}

impl<'a> IntoIterator for &'a MergeNode {
    type Item = &'a MergeNode;
    type IntoIter = Nodes<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
