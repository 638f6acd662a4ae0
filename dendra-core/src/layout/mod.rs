//! Cluster circle layout.
//!
//! Each cluster is drawn as a circle around the centroid of its members'
//! pixel positions. The initial radius encloses every member with a buffer
//! and a bonus for very small clusters; a single relaxation sweep then
//! shrinks the radii of pairs that sit too close together. The sweep never
//! shrinks a circle below the radius that still encloses its members, so
//! some overlap may remain when clusters genuinely interleave. That residual
//! overlap is accepted.

mod color;

use crate::{geometry::Point, partition::ClusterPartition};

pub use self::color::{Color, Palette, ParseColorError, generated_color, point_color};

/// Tunable constants of the layout solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Added to the farthest member distance to form the enclosing radius.
    pub buffer: f64,
    /// Extra radius for single-member clusters.
    pub single_bonus: f64,
    /// Extra radius for two-member clusters.
    pub pair_bonus: f64,
    /// Extra radius for clusters with three or more members.
    pub group_bonus: f64,
    /// Minimum gap wanted between neighbouring circles.
    pub separation: f64,
    /// Factor applied to both radii of a conflicting pair.
    pub shrink: f64,
    /// Absolute lower bound for any radius after shrinking.
    pub min_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            buffer: 30.0,
            single_bonus: 15.0,
            pair_bonus: 10.0,
            group_bonus: 5.0,
            separation: 15.0,
            shrink: 0.88,
            min_radius: 30.0,
        }
    }
}

impl LayoutConfig {
    fn size_bonus(&self, positioned: usize) -> f64 {
        match positioned {
            1 => self.single_bonus,
            2 => self.pair_bonus,
            _ => self.group_bonus,
        }
    }
}

/// Geometry and color of one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterVisual {
    /// Index of the cluster in its partition.
    pub cluster: usize,
    /// Member point indices as listed by the partition.
    pub members: Vec<usize>,
    /// Centroid of the positioned members, in pixels.
    pub center: Point,
    /// Drawn radius after relaxation.
    pub radius: f64,
    /// Farthest member distance plus the buffer; `radius` never drops below
    /// this.
    pub enclosing_radius: f64,
    /// Fill and stroke color.
    pub color: Color,
}

impl ClusterVisual {
    /// Returns `true` when `pixel` lies strictly inside the circle.
    #[must_use]
    pub fn contains(&self, pixel: Point) -> bool {
        self.center.distance_to(pixel) < self.radius
    }
}

/// Circles for every cluster of a partition, in ascending cluster order.
///
/// # Examples
/// ```
/// use dendra_core::{ClusterLayout, ClusterPartition, LayoutConfig, Palette, Point};
///
/// let partition = ClusterPartition::from_clusters(vec![vec![0, 1], vec![2]]);
/// let pixels = [Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(500.0, 0.0)];
/// let layout = ClusterLayout::solve(&partition, &pixels, &Palette::default(), &LayoutConfig::default());
///
/// let pair = layout.get(0).expect("first cluster is positioned");
/// assert_eq!(pair.center, Point::new(10.0, 0.0));
/// assert_eq!(pair.radius, 50.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterLayout {
    visuals: Vec<ClusterVisual>,
}

impl ClusterLayout {
    /// Computes circles for `partition` given each point's pixel position.
    ///
    /// Members without an entry in `pixels` are ignored; a cluster with no
    /// positioned member has no visual. Colors come from `palette`, falling
    /// back to generated colors beyond its length.
    #[must_use]
    pub fn solve(
        partition: &ClusterPartition,
        pixels: &[Point],
        palette: &Palette,
        config: &LayoutConfig,
    ) -> Self {
        let total = partition.len();
        let mut visuals: Vec<ClusterVisual> = partition
            .iter()
            .enumerate()
            .filter_map(|(cluster, members)| {
                let positioned: Vec<Point> = members
                    .iter()
                    .filter_map(|&index| pixels.get(index).copied())
                    .collect();
                let center = Point::centroid(positioned.iter().copied())?;
                let farthest = positioned
                    .iter()
                    .map(|pixel| center.distance_to(*pixel))
                    .fold(0.0, f64::max);
                let enclosing_radius = farthest + config.buffer;
                Some(ClusterVisual {
                    cluster,
                    members: members.clone(),
                    center,
                    radius: enclosing_radius + config.size_bonus(positioned.len()),
                    enclosing_radius,
                    color: palette.color_for(cluster, total),
                })
            })
            .collect();

        relax(&mut visuals, config);
        Self { visuals }
    }

    /// Visuals in ascending cluster order.
    #[must_use]
    pub fn visuals(&self) -> &[ClusterVisual] {
        &self.visuals
    }

    /// Visual of partition cluster `cluster`, if it was positioned.
    #[must_use]
    pub fn get(&self, cluster: usize) -> Option<&ClusterVisual> {
        self.visuals
            .iter()
            .find(|visual| visual.cluster == cluster)
    }

    /// Number of positioned clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Returns `true` when no cluster was positioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Iterates over the visuals.
    pub fn iter(&self) -> std::slice::Iter<'_, ClusterVisual> {
        self.visuals.iter()
    }
}

impl<'a> IntoIterator for &'a ClusterLayout {
    type Item = &'a ClusterVisual;
    type IntoIter = std::slice::Iter<'a, ClusterVisual>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One sweep over unordered pairs in ascending order. Radii shrunk by an
/// earlier pair are seen by later pairs.
fn relax(visuals: &mut [ClusterVisual], config: &LayoutConfig) {
    for i in 0..visuals.len() {
        let Some((head, tail)) = visuals.split_at_mut_checked(i + 1) else {
            continue;
        };
        let Some(first) = head.last_mut() else {
            continue;
        };
        for second in tail.iter_mut() {
            let gap = first.center.distance_to(second.center);
            if gap < first.radius + second.radius + config.separation {
                first.radius = shrunk(first, config);
                second.radius = shrunk(second, config);
            }
        }
    }
}

fn shrunk(visual: &ClusterVisual, config: &LayoutConfig) -> f64 {
    (visual.radius * config.shrink)
        .max(visual.enclosing_radius)
        .max(config.min_radius)
}
