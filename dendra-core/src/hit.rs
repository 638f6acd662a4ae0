//! Pointer hit testing against points and cluster circles.

use crate::{geometry::Point, layout::ClusterLayout};

/// Pointer radius, in pixels, within which a point counts as hit.
pub const DEFAULT_POINT_HIT_RADIUS: f64 = 15.0;

/// What the pointer is over.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HitTarget {
    /// A data point, by index.
    Point(usize),
    /// A cluster circle, by partition cluster index.
    Cluster(usize),
}

/// Resolves a pointer position against the current scene.
///
/// Points always take precedence over clusters. Within each kind the lowest
/// index wins, and both checks use strict distance comparisons, so a pointer
/// exactly on a boundary does not hit.
///
/// # Examples
/// ```
/// use dendra_core::{ClusterLayout, HitTarget, HitTester, Point};
///
/// let pixels = [Point::new(100.0, 100.0)];
/// let layout = ClusterLayout::default();
/// let tester = HitTester::new(&pixels, &layout);
///
/// assert_eq!(tester.hit(Point::new(105.0, 100.0)), Some(HitTarget::Point(0)));
/// assert_eq!(tester.hit(Point::new(115.0, 100.0)), None);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HitTester<'a> {
    points: &'a [Point],
    layout: &'a ClusterLayout,
    point_radius: f64,
}

impl<'a> HitTester<'a> {
    /// Creates a tester over pixel positions and the layout they were drawn
    /// with.
    #[must_use]
    pub const fn new(points: &'a [Point], layout: &'a ClusterLayout) -> Self {
        Self {
            points,
            layout,
            point_radius: DEFAULT_POINT_HIT_RADIUS,
        }
    }

    /// Overrides the point hit radius.
    #[must_use]
    pub const fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    /// Returns the target under `pointer`, if any.
    #[must_use]
    pub fn hit(&self, pointer: Point) -> Option<HitTarget> {
        self.points
            .iter()
            .position(|pixel| pixel.distance_to(pointer) < self.point_radius)
            .map(HitTarget::Point)
            .or_else(|| {
                self.layout
                    .iter()
                    .find(|visual| visual.contains(pointer))
                    .map(|visual| HitTarget::Cluster(visual.cluster))
            })
    }
}
