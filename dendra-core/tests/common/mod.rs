//! Shared fixtures for the integration tests.

use dendra_core::{MergeNode, MergeStep, PointRecord};

/// Three points near the origin and one outlier.
pub fn points() -> Vec<PointRecord> {
    vec![
        PointRecord::new("P0", 0.0, 0.0).with_number("age", 30.0),
        PointRecord::new("P1", 1.0, 0.0).with_number("age", 40.0),
        PointRecord::new("P2", 0.0, 1.0).with_number("age", 50.0),
        PointRecord::new("P3", 10.0, 10.0).with_number("age", 70.0),
    ]
}

/// `(((P0 P1)@1 P2)@2 P3)@20`
pub fn tree() -> MergeNode {
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

/// Merge log matching [`tree`].
pub fn steps() -> Vec<MergeStep> {
    vec![
        MergeStep::merge(vec![0], vec![1], 1.0),
        MergeStep::merge(vec![0, 1], vec![2], 2.0),
        MergeStep::merge(vec![0, 1, 2], vec![3], 20.0),
        MergeStep::complete(20.0, vec![0, 1, 2, 3]),
    ]
}
