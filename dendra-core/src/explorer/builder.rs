//! Builder for [`Explorer`] sessions.
//!
//! Collects the dataset, the clustering result and the view configuration,
//! then validates them once in [`ExplorerBuilder::build`].

use tracing::instrument;

use crate::{
    Result,
    error::DendraError,
    explorer::Explorer,
    layout::{LayoutConfig, Palette},
    point::PointRecord,
    replay::MergeStep,
    transform::{TransformBuilder, Viewport},
    tree::MergeNode,
};

/// Configures and constructs [`Explorer`] instances.
///
/// # Examples
/// ```
/// use dendra_core::{ExplorerBuilder, MergeNode, MergeStep, PointRecord, ViewMode};
///
/// let explorer = ExplorerBuilder::new(vec![
///     PointRecord::new("a", 0.0, 0.0),
///     PointRecord::new("b", 1.0, 0.0),
/// ])
/// .with_tree(MergeNode::merge(1.0, MergeNode::leaf(0, "a"), MergeNode::leaf(1, "b")))
/// .with_steps(vec![
///     MergeStep::merge(vec![0], vec![1], 1.0),
///     MergeStep::complete(1.0, vec![0, 1]),
/// ])
/// .build()
/// .expect("configuration is valid");
///
/// let scene = explorer.scene(ViewMode::Cut { height: 2.0 });
/// assert_eq!(scene.partition.map(|p| p.len()), Some(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExplorerBuilder {
    points: Vec<PointRecord>,
    tree: Option<MergeNode>,
    steps: Vec<MergeStep>,
    palette: Palette,
    transform: TransformBuilder,
    layout: LayoutConfig,
}

impl ExplorerBuilder {
    /// Starts a session over `points`. Without a tree or steps every view
    /// shows unclustered points.
    #[must_use]
    pub fn new(points: Vec<PointRecord>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Sets the merge tree used by cut mode and the dendrogram.
    #[must_use]
    pub fn with_tree(mut self, tree: MergeNode) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Sets the merge-step log used by replay mode.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<MergeStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the preferred cluster colors.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Fixes the horizontal domain range instead of deriving it from the
    /// points.
    #[must_use]
    pub fn with_x_range(mut self, min: f64, max: f64) -> Self {
        self.transform = self.transform.with_x_range(min, max);
        self
    }

    /// Fixes the vertical domain range instead of deriving it from the
    /// points.
    #[must_use]
    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.transform = self.transform.with_y_range(min, max);
        self
    }

    /// Sets the scatter plot viewport.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.transform = self.transform.with_viewport(viewport);
        self
    }

    /// Overrides the layout solver constants.
    #[must_use]
    pub const fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Number of points configured so far.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Validates the configuration and constructs an [`Explorer`].
    ///
    /// # Errors
    /// Returns [`DendraError::NonFiniteCoordinate`] when any point has a NaN
    /// or infinite coordinate, and propagates the errors of
    /// [`TransformBuilder::build`] for unusable ranges or viewports.
    #[instrument(
        name = "explorer.build",
        err,
        skip(self),
        fields(points = self.points.len(), steps = self.steps.len(), tree = self.tree.is_some()),
    )]
    pub fn build(self) -> Result<Explorer> {
        let positions: Vec<_> = self.points.iter().map(PointRecord::position).collect();
        if let Some((index, point)) = positions
            .iter()
            .enumerate()
            .find(|(_, position)| !position.is_finite())
        {
            return Err(DendraError::NonFiniteCoordinate {
                index,
                x: point.x,
                y: point.y,
            });
        }
        let transform = self.transform.build(&positions)?;
        let pixels = transform.to_pixels(positions);
        Ok(Explorer {
            points: self.points,
            pixels,
            tree: self.tree,
            steps: self.steps,
            palette: self.palette,
            transform,
            layout: self.layout,
        })
    }
}
