//! Union-find (disjoint set union) used while replaying merge steps.
//!
//! Elements are point indices stored in a flat arena; parents are indices into
//! the same arena, so there is no pointer chasing and no ownership cycle.
//! `find` compresses paths in a second pass and `union` attaches the smaller
//! set below the larger one.

#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(super) fn len(&self) -> usize {
        self.parent.len()
    }

    /// Representative of `node`'s set, or `None` when `node` is not tracked.
    pub(super) fn find(&mut self, mut node: usize) -> Option<usize> {
        let mut root = node;
        loop {
            let parent = *self.parent.get(root)?;
            if parent == root {
                break;
            }
            root = parent;
        }

        while let Some(&parent) = self.parent.get(node) {
            if parent == node {
                break;
            }
            if let Some(slot) = self.parent.get_mut(node) {
                *slot = root;
            }
            node = parent;
        }

        Some(root)
    }

    /// Merges the sets rooted at `left` and `right`, returning the surviving
    /// root. Both arguments must be roots returned by [`Self::find`].
    pub(super) fn union_roots(&mut self, left: usize, right: usize) -> usize {
        if left == right {
            return left;
        }
        let left_size = self.size.get(left).copied().unwrap_or(0);
        let right_size = self.size.get(right).copied().unwrap_or(0);
        let (parent, child) = if left_size < right_size {
            (right, left)
        } else {
            (left, right)
        };
        if let Some(slot) = self.parent.get_mut(child) {
            *slot = parent;
        }
        if let Some(slot) = self.size.get_mut(parent) {
            *slot = left_size + right_size;
        }
        parent
    }

    /// Groups every element by representative. Groups are ordered by their
    /// smallest element and list elements in ascending order.
    pub(super) fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root = vec![usize::MAX; self.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for node in 0..self.len() {
            let Some(root) = self.find(node) else {
                continue;
            };
            let Some(slot) = slot_of_root.get_mut(root) else {
                continue;
            };
            if *slot == usize::MAX {
                *slot = groups.len();
                groups.push(Vec::new());
            }
            if let Some(group) = groups.get_mut(*slot) {
                group.push(node);
            }
        }
        groups
    }
}
