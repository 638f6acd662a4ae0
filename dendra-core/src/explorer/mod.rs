//! Explorer sessions tying the engines together.
//!
//! An [`Explorer`] owns one dataset and its clustering result. For each view
//! mode it derives a [`Scene`]: the partition, the point and cluster geometry
//! and the replay annotations a renderer needs. Scenes are recomputed from
//! scratch whenever the mode or viewport changes; nothing is cached.

mod builder;

use std::collections::BTreeMap;

use tracing::{Span, field, instrument};

use crate::{
    dendrogram::{Band, LeafRows, MergeSegment, leaf_rows, merge_segments},
    geometry::Point,
    hit::{HitTarget, HitTester},
    interaction::{HeightScale, default_cut_height},
    layout::{ClusterLayout, Color, LayoutConfig, Palette, point_color},
    partition::{ClusterPartition, partition_at_height},
    point::PointRecord,
    replay::{
        MergeStep, connections_at_step, height_at_step, partition_at_step, replayable_step_count,
    },
    transform::CoordinateTransform,
    tree::MergeNode,
};

pub use self::builder::ExplorerBuilder;

/// How clusters are chosen. The two modes are mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewMode {
    /// Replay the merge log up to a step counter.
    Replay {
        /// Replay counter; see [`crate::partition_at_step`].
        step: usize,
    },
    /// Cut the merge tree at a height.
    Cut {
        /// Cut height.
        height: f64,
    },
}

/// Everything needed to draw the scatter plot for one view mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Mode the scene was built for.
    pub mode: ViewMode,
    /// Current partition, or `None` while nothing is clustered.
    pub partition: Option<ClusterPartition>,
    /// Pixel position of every point, in input order.
    pub point_pixels: Vec<Point>,
    /// Cluster circles for `partition`.
    pub layout: ClusterLayout,
    /// Point pairs joined by replayed merges.
    pub connections: Vec<(usize, usize)>,
    /// Merge distance the scene represents.
    pub current_height: f64,
}

impl Scene {
    /// Number of clusters shown.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.partition.as_ref().map_or(0, ClusterPartition::len)
    }
}

/// Tooltip payload for one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSummary {
    /// Cluster index in the partition.
    pub cluster: usize,
    /// Number of member points that exist in the dataset.
    pub size: usize,
    /// Mean of each numeric attribute over the members that carry it.
    pub means: BTreeMap<String, f64>,
}

/// Dendrogram geometry for one canvas size and replay counter.
#[derive(Clone, Debug, PartialEq)]
pub struct DendrogramView {
    /// Leaf label rows.
    pub rows: LeafRows,
    /// Merges revealed so far.
    pub segments: Vec<MergeSegment>,
    /// Height axis of the canvas.
    pub scale: HeightScale,
}

/// A dataset with its clustering result, ready to be explored.
#[derive(Clone, Debug)]
pub struct Explorer {
    pub(crate) points: Vec<PointRecord>,
    pub(crate) pixels: Vec<Point>,
    pub(crate) tree: Option<MergeNode>,
    pub(crate) steps: Vec<MergeStep>,
    pub(crate) palette: Palette,
    pub(crate) transform: CoordinateTransform,
    pub(crate) layout: LayoutConfig,
}

impl Explorer {
    /// Points in input order.
    #[must_use]
    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    /// Merge tree, if the clustering result had one.
    #[must_use]
    pub const fn tree(&self) -> Option<&MergeNode> {
        self.tree.as_ref()
    }

    /// Merge-step log.
    #[must_use]
    pub fn steps(&self) -> &[MergeStep] {
        &self.steps
    }

    /// Scatter plot transform.
    #[must_use]
    pub const fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Largest merge height, `0.0` without a tree.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.tree.as_ref().map_or(0.0, MergeNode::max_height)
    }

    /// Cut height used before the user picks one.
    #[must_use]
    pub fn default_cut_height(&self) -> f64 {
        default_cut_height(self.max_height())
    }

    /// Upper bound of the replay counter.
    #[must_use]
    pub fn replayable_step_count(&self) -> usize {
        replayable_step_count(&self.steps)
    }

    /// Builds the scene for `mode`.
    #[instrument(
        name = "explorer.scene",
        skip(self),
        fields(points = self.points.len(), clusters = field::Empty),
    )]
    pub fn scene(&self, mode: ViewMode) -> Scene {
        let point_count = self.points.len();
        let (partition, connections, current_height) = match mode {
            ViewMode::Replay { step } => (
                partition_at_step(&self.steps, step, point_count).into_partition(),
                connections_at_step(&self.steps, step),
                height_at_step(&self.steps, step),
            ),
            ViewMode::Cut { height } => (
                self.tree
                    .as_ref()
                    .map(|tree| partition_at_height(tree, height, point_count)),
                Vec::new(),
                height,
            ),
        };
        let layout = partition.as_ref().map_or_else(ClusterLayout::default, |partition| {
            ClusterLayout::solve(partition, &self.pixels, &self.palette, &self.layout)
        });
        let scene = Scene {
            mode,
            partition,
            point_pixels: self.pixels.clone(),
            layout,
            connections,
            current_height,
        };
        Span::current().record("clusters", scene.cluster_count());
        scene
    }

    /// Resolves what the pointer is over in `scene`.
    #[must_use]
    pub fn hover(&self, scene: &Scene, pointer: Point) -> Option<HitTarget> {
        HitTester::new(&scene.point_pixels, &scene.layout).hit(pointer)
    }

    /// Domain position for a click at `pixel`, or `None` outside the plot
    /// area. Used to place new points.
    #[must_use]
    pub fn domain_point_at(&self, pixel: Point) -> Option<Point> {
        self.transform
            .plot_area_contains(pixel)
            .then(|| self.transform.to_domain(pixel))
    }

    /// Per-cluster means of every numeric attribute.
    ///
    /// Members outside the dataset are ignored. An attribute contributes only
    /// where it is numeric, and appears in the summary only if at least one
    /// member has it.
    #[must_use]
    pub fn cluster_summaries(&self, partition: &ClusterPartition) -> Vec<ClusterSummary> {
        partition
            .iter()
            .enumerate()
            .map(|(cluster, members)| {
                let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
                let mut size = 0;
                for record in members.iter().filter_map(|&index| self.points.get(index)) {
                    size += 1;
                    for (key, value) in &record.attributes {
                        if let Some(number) = value.as_number() {
                            let entry = totals.entry(key.as_str()).or_insert((0.0, 0));
                            entry.0 += number;
                            entry.1 += 1;
                        }
                    }
                }
                let means = totals
                    .into_iter()
                    .map(|(key, (sum, count))| (key.to_owned(), sum / count as f64))
                    .collect();
                ClusterSummary {
                    cluster,
                    size,
                    means,
                }
            })
            .collect()
    }

    /// Color of every point: its cluster's color when clustered, otherwise a
    /// color spread over all points. Used for dendrogram leaf labels.
    #[must_use]
    pub fn point_colors(&self, partition: Option<&ClusterPartition>) -> Vec<Color> {
        let total = self.points.len();
        let assignments = partition.map(|p| p.assignments(total));
        let clusters = partition.map_or(0, ClusterPartition::len);
        (0..total)
            .map(|index| {
                assignments
                    .as_ref()
                    .and_then(|slots| slots.get(index).copied().flatten())
                    .map_or_else(
                        || point_color(index, total),
                        |cluster| self.palette.color_for(cluster, clusters),
                    )
            })
            .collect()
    }

    /// Height axis of a dendrogram canvas `width` pixels wide.
    #[must_use]
    pub fn height_scale(&self, width: f64) -> HeightScale {
        HeightScale::new(self.max_height(), width)
    }

    /// Dendrogram geometry for a `width` x `height` canvas with merges up to
    /// replay counter `current_step` revealed.
    #[must_use]
    pub fn dendrogram(&self, width: f64, height: f64, current_step: usize) -> DendrogramView {
        let labels: Vec<&str> = self.points.iter().map(|p| p.id.as_str()).collect();
        let rows = leaf_rows(self.tree.as_ref(), &labels, Band::for_canvas(height));
        let scale = self.height_scale(width);
        let segments = self.tree.as_ref().map_or_else(Vec::new, |tree| {
            merge_segments(tree, &rows, &scale, &self.steps, current_step)
        });
        DendrogramView {
            rows,
            segments,
            scale,
        }
    }
}
