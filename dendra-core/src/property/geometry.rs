//! Transform round trips and layout radius floors.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    ClusterLayout, LayoutConfig, Palette, Point, TransformBuilder, Viewport, partition_at_height,
    test_utils::MergeHistory,
};

/// Scattered domain points plus the viewport they are drawn into.
#[derive(Clone, Debug)]
pub(super) struct Scatter {
    pub(super) points: Vec<Point>,
    pub(super) width: f64,
    pub(super) height: f64,
}

/// Mapping to pixels and back returns the original point.
pub(super) fn run_round_trip_property(scatter: &Scatter) -> TestCaseResult {
    let transform = TransformBuilder::new()
        .with_viewport(Viewport::new(scatter.width, scatter.height))
        .build(&scatter.points)
        .map_err(|err| TestCaseError::fail(format!("transform rejected scatter: {err}")))?;
    for point in &scatter.points {
        let pixel = transform.to_pixel(*point);
        if !transform.plot_area_contains(pixel) {
            return Err(TestCaseError::fail(format!(
                "{point:?} maps outside the plot area at {pixel:?}"
            )));
        }
        let back = transform.to_domain(pixel);
        let tolerance = 1e-9 * (1.0 + point.x.abs().max(point.y.abs()));
        if back.distance_to(*point) > tolerance {
            return Err(TestCaseError::fail(format!("{point:?} came back as {back:?}")));
        }
    }
    Ok(())
}

/// Pixels inside the plot area survive a trip through domain space.
///
/// `fractions` place each probe pixel relative to the padded plot area, so
/// `(0, 0)` is its top-left corner and `(1, 1)` its bottom-right corner.
pub(super) fn run_pixel_round_trip_property(
    scatter: &Scatter,
    fractions: &[(f64, f64)],
) -> TestCaseResult {
    let transform = TransformBuilder::new()
        .with_viewport(Viewport::new(scatter.width, scatter.height))
        .build(&scatter.points)
        .map_err(|err| TestCaseError::fail(format!("transform rejected scatter: {err}")))?;
    let viewport = transform.viewport();
    let padding = viewport.padding();
    for &(fx, fy) in fractions {
        // Clamped so rounding at the far edges stays inside the area.
        let pixel = Point::new(
            (padding.left + fx * viewport.plot_width())
                .clamp(padding.left, viewport.width() - padding.right),
            (padding.top + fy * viewport.plot_height())
                .clamp(padding.top, viewport.height() - padding.bottom),
        );
        if !transform.plot_area_contains(pixel) {
            return Err(TestCaseError::fail(format!(
                "{pixel:?} is not inside the plot area"
            )));
        }
        let back = transform.to_pixel(transform.to_domain(pixel));
        let tolerance = 1e-9 * (1.0 + pixel.x.abs().max(pixel.y.abs()));
        if back.distance_to(pixel) > tolerance {
            return Err(TestCaseError::fail(format!("{pixel:?} came back as {back:?}")));
        }
    }
    Ok(())
}

/// Relaxed radii never fall below the enclosing radius or the global floor.
pub(super) fn run_radius_floor_property(
    history: &MergeHistory,
    pixels: &[Point],
) -> TestCaseResult {
    let config = LayoutConfig::default();
    let cut = history.tree.max_height() / 2.0;
    let partition = partition_at_height(&history.tree, cut, history.point_count);
    let layout = ClusterLayout::solve(&partition, pixels, &Palette::default(), &config);
    if layout.len() != partition.len() {
        return Err(TestCaseError::fail(format!(
            "{} visuals for {} clusters",
            layout.len(),
            partition.len()
        )));
    }
    for visual in layout.iter() {
        if visual.radius < visual.enclosing_radius || visual.radius < config.min_radius {
            return Err(TestCaseError::fail(format!(
                "cluster {} radius {} below floor (enclosing {})",
                visual.cluster, visual.radius, visual.enclosing_radius
            )));
        }
    }
    Ok(())
}
