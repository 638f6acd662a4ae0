//! Dendra core library.
//!
//! Turns the output of an agglomerative clustering run (a merge tree plus an
//! ordered merge-step log) into the state an interactive explorer renders:
//! flat partitions at a cut height or replay step, pixel placement of points,
//! non-overlapping cluster circles, hit testing, and the dendrogram panel
//! geometry with its draggable cut line.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dendrogram;
mod error;
mod explorer;
mod geometry;
mod hit;
mod interaction;
mod layout;
mod partition;
mod point;
mod replay;
mod transform;
mod tree;
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod wire;

#[cfg(test)]
mod property;
#[cfg(test)]
mod test_utils;

pub use crate::{
    dendrogram::{Band, LeafRows, MIN_LEAF_SPACING, MergeSegment, leaf_rows, merge_segments, node_row},
    error::{Axis, DendraError, DendraErrorCode, Result, WireError, WireErrorCode},
    explorer::{ClusterSummary, DendrogramView, Explorer, ExplorerBuilder, Scene, ViewMode},
    geometry::Point,
    hit::{DEFAULT_POINT_HIT_RADIUS, HitTarget, HitTester},
    interaction::{CutLineController, DragState, HeightScale, PointerEvent, default_cut_height},
    layout::{
        ClusterLayout, ClusterVisual, Color, LayoutConfig, Palette, ParseColorError,
        generated_color, point_color,
    },
    partition::{ClusterPartition, partition_at_height},
    point::{AttributeValue, Attributes, PointRecord},
    replay::{
        MergeStep, StepAction, StepPartition, connections_at_step, height_at_step,
        partition_at_step, replayable_step_count, step_for_node,
    },
    transform::{AxisRange, Bounds, CoordinateTransform, Padding, TransformBuilder, Viewport},
    tree::{MergeNode, Nodes},
};
