//! Planar points shared by domain space and pixel space.

/// A 2-D position. Used both for domain coordinates and for pixel coordinates;
/// [`crate::CoordinateTransform`] converts between the two.
///
/// # Examples
/// ```
/// use dendra_core::Point;
///
/// let origin = Point::new(0.0, 0.0);
/// assert_eq!(origin.distance_to(Point::new(3.0, 4.0)), 5.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// Creates a point from its components.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns `true` when both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of `points`, or `None` when the iterator is empty.
    pub(crate) fn centroid(points: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = Self::default();
        for point in points {
            sum.x += point.x;
            sum.y += point.y;
            count += 1;
        }
        (count > 0).then(|| {
            let n = count as f64;
            Self::new(sum.x / n, sum.y / n)
        })
    }
}
