//! Bidirectional mapping between domain coordinates and viewport pixels.
//!
//! The domain bounding box is either supplied by the caller per axis or
//! derived from the data: the observed min/max expanded by a 10% margin on
//! each side. A derived axis with zero extent uses a unit extent instead so the
//! scale never divides by zero; an explicit degenerate range is widened to a
//! unit range centred on its value.
//!
//! Pixels grow rightwards and downwards, so the vertical axis is inverted:
//! larger domain `y` values map to smaller pixel `y` values.

use tracing::debug;

use crate::{
    error::{Axis, DendraError, Result},
    geometry::Point,
};

const DATA_MARGIN: f64 = 0.1;

/// Closed interval on one domain axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    min: f64,
    max: f64,
}

impl AxisRange {
    /// Creates a range; callers are expected to pass `min <= max`.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self { Self { min, max } }

    /// Lower bound.
    #[rustfmt::skip]
    #[must_use]
    pub const fn min(&self) -> f64 { self.min }

    /// Upper bound.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max(&self) -> f64 { self.max }

    /// Width of the interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc: Option<Self>, value| {
            Some(acc.map_or(Self::new(value, value), |range| {
                Self::new(range.min.min(value), range.max.max(value))
            }))
        })
    }

    fn with_margin(self, axis: Axis) -> Self {
        let mut span = self.span();
        if span == 0.0 {
            debug!(%axis, value = self.min, "degenerate data range; using unit span");
            span = 1.0;
        }
        Self::new(self.min - span * DATA_MARGIN, self.max + span * DATA_MARGIN)
    }

    fn validated(self, axis: Axis) -> Result<Self> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(DendraError::InvalidRange {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        if self.span() == 0.0 {
            debug!(%axis, value = self.min, "degenerate explicit range; widening to unit span");
            return Ok(Self::new(self.min - 0.5, self.max + 0.5));
        }
        Ok(self)
    }
}

/// Domain bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Horizontal range.
    pub x: AxisRange,
    /// Vertical range.
    pub y: AxisRange,
}

/// Space reserved around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    /// Space above the plot area.
    pub top: f64,
    /// Space right of the plot area.
    pub right: f64,
    /// Space below the plot area.
    pub bottom: f64,
    /// Space left of the plot area.
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 40.0,
            bottom: 60.0,
            left: 70.0,
        }
    }
}

/// Rendering surface size and the padding around its plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    padding: Padding,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    /// Creates a viewport with the default padding.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    /// Overrides the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Total width in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub const fn width(&self) -> f64 { self.width }

    /// Total height in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub const fn height(&self) -> f64 { self.height }

    /// Padding around the plot area.
    #[rustfmt::skip]
    #[must_use]
    pub const fn padding(&self) -> Padding { self.padding }

    /// Width of the plot area inside the padding.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    /// Height of the plot area inside the padding.
    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    fn validated(self) -> Result<Self> {
        let usable = self.plot_width() > 0.0 && self.plot_height() > 0.0;
        if !usable || !self.plot_width().is_finite() || !self.plot_height().is_finite() {
            return Err(DendraError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Configures and constructs [`CoordinateTransform`] instances.
///
/// # Examples
/// ```
/// use dendra_core::{Point, TransformBuilder, Viewport};
///
/// let transform = TransformBuilder::new()
///     .with_x_range(0.0, 10.0)
///     .with_y_range(0.0, 10.0)
///     .with_viewport(Viewport::new(210.0, 200.0))
///     .build(&[])
///     .expect("explicit ranges need no data");
/// let pixel = transform.to_pixel(Point::new(10.0, 10.0));
/// assert_eq!(pixel, Point::new(170.0, 40.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransformBuilder {
    x_range: Option<AxisRange>,
    y_range: Option<AxisRange>,
    viewport: Viewport,
}

impl TransformBuilder {
    /// Creates a builder that derives both ranges from the data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the horizontal domain range.
    #[must_use]
    pub const fn with_x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = Some(AxisRange::new(min, max));
        self
    }

    /// Fixes the vertical domain range.
    #[must_use]
    pub const fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some(AxisRange::new(min, max));
        self
    }

    /// Sets the target viewport.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Validates the configuration and builds the transform, deriving any
    /// missing range from `points`.
    ///
    /// # Errors
    /// Returns [`DendraError::InvalidViewport`] when the padded plot area is
    /// empty, [`DendraError::InvalidRange`] for a non-finite or inverted
    /// explicit range, [`DendraError::NonFiniteCoordinate`] when a range must
    /// be derived from data containing NaN or infinite values, and
    /// [`DendraError::EmptyPointSet`] when a range must be derived from no
    /// points.
    pub fn build(&self, points: &[Point]) -> Result<CoordinateTransform> {
        let viewport = self.viewport.validated()?;
        let needs_data = self.x_range.is_none() || self.y_range.is_none();
        if needs_data {
            if let Some((index, point)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
                return Err(DendraError::NonFiniteCoordinate {
                    index,
                    x: point.x,
                    y: point.y,
                });
            }
        }
        let x = resolve_axis(self.x_range, Axis::X, points.iter().map(|p| p.x))?;
        let y = resolve_axis(self.y_range, Axis::Y, points.iter().map(|p| p.y))?;
        Ok(CoordinateTransform {
            bounds: Bounds { x, y },
            viewport,
        })
    }
}

fn resolve_axis(
    explicit: Option<AxisRange>,
    axis: Axis,
    values: impl Iterator<Item = f64>,
) -> Result<AxisRange> {
    match explicit {
        Some(range) => range.validated(axis),
        None => AxisRange::from_values(values)
            .map(|range| range.with_margin(axis))
            .ok_or(DendraError::EmptyPointSet { axis }),
    }
}

/// Linear map between the domain bounding box and the viewport's plot area.
///
/// `to_domain` is the exact algebraic inverse of `to_pixel`; neither clamps,
/// so points outside the box map outside the plot area and back unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    bounds: Bounds,
    viewport: Viewport,
}

impl CoordinateTransform {
    /// Domain bounding box in use.
    #[rustfmt::skip]
    #[must_use]
    pub const fn bounds(&self) -> Bounds { self.bounds }

    /// Target viewport.
    #[rustfmt::skip]
    #[must_use]
    pub const fn viewport(&self) -> Viewport { self.viewport }

    /// Maps a domain point to pixel space.
    #[must_use]
    pub fn to_pixel(&self, domain: Point) -> Point {
        let Bounds { x, y } = self.bounds;
        let padding = self.viewport.padding;
        Point::new(
            padding.left + (domain.x - x.min) / x.span() * self.viewport.plot_width(),
            padding.top + (y.max - domain.y) / y.span() * self.viewport.plot_height(),
        )
    }

    /// Maps a pixel position back to domain space.
    #[must_use]
    pub fn to_domain(&self, pixel: Point) -> Point {
        let Bounds { x, y } = self.bounds;
        let padding = self.viewport.padding;
        Point::new(
            x.min + (pixel.x - padding.left) / self.viewport.plot_width() * x.span(),
            y.max - (pixel.y - padding.top) / self.viewport.plot_height() * y.span(),
        )
    }

    /// Maps every domain point to pixel space, preserving order.
    #[must_use]
    pub fn to_pixels(&self, domain: impl IntoIterator<Item = Point>) -> Vec<Point> {
        domain.into_iter().map(|point| self.to_pixel(point)).collect()
    }

    /// Returns `true` when `pixel` lies inside the padded plot area, edges
    /// included.
    #[must_use]
    pub fn plot_area_contains(&self, pixel: Point) -> bool {
        let padding = self.viewport.padding;
        (padding.left..=self.viewport.width - padding.right).contains(&pixel.x)
            && (padding.top..=self.viewport.height - padding.bottom).contains(&pixel.y)
    }
}
