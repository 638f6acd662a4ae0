//! Dendrogram drawing geometry.
//!
//! Leaves are laid out as rows along the vertical axis and merge heights run
//! along the horizontal axis through a [`HeightScale`]. Merges are revealed
//! progressively: a merge is drawn once the replay counter has passed its
//! position in the step log.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    interaction::HeightScale,
    replay::{MergePositions, MergeStep},
    tree::MergeNode,
};

/// Minimum vertical distance between two leaf rows, in pixels.
pub const MIN_LEAF_SPACING: f64 = 50.0;
/// Rows are kept this far inside the band.
const ROW_INSET: f64 = 10.0;

/// Vertical pixel band that leaf rows are distributed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Upper edge.
    pub top: f64,
    /// Lower edge.
    pub bottom: f64,
}

impl Band {
    /// Creates a band between `top` and `bottom`.
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Band of a dendrogram canvas `height` pixels tall, with 35 px reserved
    /// above and 45 px below.
    #[must_use]
    pub fn for_canvas(height: f64) -> Self {
        Self::new(35.0, height - 45.0)
    }

    fn extent(self) -> f64 {
        self.bottom - self.top
    }
}

/// Vertical position of every leaf label.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafRows {
    band: Band,
    ordered: Vec<(String, f64)>,
    by_label: BTreeMap<String, f64>,
}

impl LeafRows {
    /// Rows in display order: tree order first, then extra labels.
    #[must_use]
    pub fn ordered(&self) -> &[(String, f64)] {
        &self.ordered
    }

    /// Row of `label`, if it was laid out.
    #[must_use]
    pub fn row_of(&self, label: &str) -> Option<f64> {
        self.by_label.get(label).copied()
    }

    /// Band the rows were laid out in.
    #[rustfmt::skip]
    #[must_use]
    pub const fn band(&self) -> Band { self.band }

    fn leaf_row(&self, node: &MergeNode) -> f64 {
        match node {
            MergeNode::Leaf { label, .. } => self.row_of(label).unwrap_or(self.band.top),
            MergeNode::Internal { .. } => self.band.top,
        }
    }
}

/// Lays out leaf rows for `tree` inside `band`.
///
/// Labels appear in left-to-right tree order, followed by any of `labels` the
/// tree does not mention, sorted. Rows are evenly spaced and centred, never
/// closer than [`MIN_LEAF_SPACING`], and clamped 10 px inside the band. A
/// single label is centred.
///
/// # Examples
/// ```
/// use dendra_core::{Band, MergeNode, leaf_rows};
///
/// let tree = MergeNode::merge(1.0, MergeNode::leaf(0, "b"), MergeNode::leaf(1, "a"));
/// let rows = leaf_rows(Some(&tree), &["a", "b", "c"], Band::new(0.0, 200.0));
/// let order: Vec<&str> = rows.ordered().iter().map(|(label, _)| label.as_str()).collect();
/// assert_eq!(order, ["b", "a", "c"]);
/// assert_eq!(rows.row_of("a"), Some(100.0));
/// ```
#[must_use]
pub fn leaf_rows<S: AsRef<str>>(tree: Option<&MergeNode>, labels: &[S], band: Band) -> LeafRows {
    let mut order: Vec<String> = tree
        .map(|root| {
            root.leaf_labels_in_order()
                .into_iter()
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    let known: BTreeSet<&str> = order.iter().map(String::as_str).collect();
    let mut missing: Vec<String> = labels
        .iter()
        .map(|label| label.as_ref())
        .filter(|label| !known.contains(label))
        .map(str::to_owned)
        .collect();
    missing.sort_unstable();
    order.append(&mut missing);

    let positions = row_positions(order.len(), band);
    let ordered: Vec<(String, f64)> = order.into_iter().zip(positions).collect();
    let by_label = ordered.iter().cloned().collect();
    LeafRows {
        band,
        ordered,
        by_label,
    }
}

fn row_positions(count: usize, band: Band) -> Vec<f64> {
    let available = band.extent();
    match count {
        0 => Vec::new(),
        1 => vec![band.top + available / 2.0],
        _ => {
            let gaps = (count - 1) as f64;
            let spacing = if gaps * MIN_LEAF_SPACING <= available {
                MIN_LEAF_SPACING.max(available / gaps)
            } else {
                MIN_LEAF_SPACING
            };
            let start = band.top + (available - gaps * spacing) / 2.0;
            (0..count)
                .map(|index| {
                    (start + index as f64 * spacing)
                        .min(band.bottom - ROW_INSET)
                        .max(band.top + ROW_INSET)
                })
                .collect()
        }
    }
}

/// Vertical position of `node`: its leaf row, or the midpoint of its
/// children's positions for internal nodes. Leaves without a row sit at the
/// top of the band.
#[must_use]
pub fn node_row(node: &MergeNode, rows: &LeafRows) -> f64 {
    fold_rows(node, rows, |_, _, _| {})
}

/// Post-order walk computing node rows without recursion. `visit` receives
/// every internal node with its children's rows.
fn fold_rows<'a>(
    root: &'a MergeNode,
    rows: &LeafRows,
    mut visit: impl FnMut(&'a MergeNode, f64, f64),
) -> f64 {
    enum Frame<'n> {
        Enter(&'n MergeNode),
        Combine(&'n MergeNode),
    }

    let mut frames = vec![Frame::Enter(root)];
    let mut values: Vec<f64> = Vec::new();
    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Enter(node) => match node.children() {
                Some((left, right)) => {
                    frames.push(Frame::Combine(node));
                    frames.push(Frame::Enter(right));
                    frames.push(Frame::Enter(left));
                }
                None => values.push(rows.leaf_row(node)),
            },
            Frame::Combine(node) => {
                let right = values.pop().unwrap_or(rows.band.top);
                let left = values.pop().unwrap_or(rows.band.top);
                visit(node, left, right);
                values.push((left + right) / 2.0);
            }
        }
    }
    values.pop().unwrap_or(rows.band.top)
}

/// Drawable pieces of one merge: a vertical bar at the merge height joining
/// both children, and a horizontal stub from each child's own height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeSegment {
    /// Merge height of the node.
    pub height: f64,
    /// Position of the merge in the step log.
    pub step: usize,
    /// Horizontal position of the vertical bar.
    pub x: f64,
    /// Row of the left child.
    pub left_row: f64,
    /// Row of the right child.
    pub right_row: f64,
    /// Horizontal position of the left child.
    pub left_x: f64,
    /// Horizontal position of the right child.
    pub right_x: f64,
    /// Midpoint between both child rows; where the merge marker is drawn.
    pub mid_row: f64,
}

/// Segments for every internal node of `tree` whose merge step precedes
/// `current_step`, children before parents.
///
/// Nodes without a matching merge step are never drawn.
#[must_use]
pub fn merge_segments(
    tree: &MergeNode,
    rows: &LeafRows,
    scale: &HeightScale,
    steps: &[MergeStep],
    current_step: usize,
) -> Vec<MergeSegment> {
    let positions = MergePositions::new(steps);
    let mut segments = Vec::new();
    fold_rows(tree, rows, |node, left_row, right_row| {
        let Some((left, right)) = node.children() else {
            return;
        };
        let Some(step) = positions.of(node).filter(|&step| step < current_step) else {
            return;
        };
        segments.push(MergeSegment {
            height: node.height(),
            step,
            x: scale.to_pixel(node.height()),
            left_row,
            right_row,
            left_x: scale.to_pixel(left.height()),
            right_x: scale.to_pixel(right.height()),
            mid_row: (left_row + right_row) / 2.0,
        });
    });
    segments
}
