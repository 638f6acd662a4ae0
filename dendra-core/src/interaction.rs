//! Cut-line dragging on the dendrogram's horizontal height axis.
//!
//! [`HeightScale`] maps merge heights onto a compressed pixel band at the left
//! of the dendrogram canvas. [`CutLineController`] turns pointer events into
//! cut-height updates, threading the caller-owned [`DragState`] through each
//! call.

/// Share of the drawable width given to the dendrogram itself.
const WIDTH_RATIO: f64 = 0.6;
/// Share of the dendrogram width actually used by merge heights.
const COMPRESSION: f64 = 0.85;
/// Fraction of the tree height used as the cut before the first drag.
const DEFAULT_CUT_RATIO: f64 = 0.6;

/// Fallback cut height shown before the user has dragged the cut line.
///
/// # Examples
/// ```
/// use dendra_core::default_cut_height;
///
/// assert_eq!(default_cut_height(20.0), 12.0);
/// ```
#[must_use]
pub fn default_cut_height(max_height: f64) -> f64 {
    max_height * DEFAULT_CUT_RATIO
}

/// One-dimensional map between merge heights and canvas x positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightScale {
    max_height: f64,
    width: f64,
    left: f64,
    right: f64,
}

impl HeightScale {
    /// Creates a scale for a tree of `max_height` drawn on a canvas `width`
    /// pixels wide, with the default 120 px left and 30 px right padding.
    #[must_use]
    pub const fn new(max_height: f64, width: f64) -> Self {
        Self {
            max_height,
            width,
            left: 120.0,
            right: 30.0,
        }
    }

    /// Overrides the horizontal padding.
    #[must_use]
    pub const fn with_padding(mut self, left: f64, right: f64) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Largest merge height of the tree.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max_height(&self) -> f64 { self.max_height }

    /// Canvas width in pixels.
    #[rustfmt::skip]
    #[must_use]
    pub const fn width(&self) -> f64 { self.width }

    /// Left padding; height zero sits here.
    #[rustfmt::skip]
    #[must_use]
    pub const fn left(&self) -> f64 { self.left }

    fn effective_width(&self) -> f64 {
        (self.width - self.left - self.right) * WIDTH_RATIO
    }

    fn band(&self) -> f64 {
        self.effective_width() * COMPRESSION
    }

    /// Returns `true` when the tree has no positive height or the canvas has
    /// no drawable width. Degenerate scales map everything to the left edge
    /// and ignore drags.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.max_height > 0.0 && self.max_height.is_finite() && self.band() > 0.0)
    }

    /// Pixel position of `height`, clamped to `[left, left + effective width]`.
    #[must_use]
    pub fn to_pixel(&self, height: f64) -> f64 {
        if self.is_degenerate() {
            return self.left;
        }
        let x = self.left + height / self.max_height * self.band();
        x.min(self.left + self.effective_width()).max(self.left)
    }

    /// Height under pixel `x`, clamped to `[0, max_height]`.
    #[must_use]
    pub fn to_height(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let relative = x - self.left;
        if relative <= 0.0 {
            0.0
        } else if relative >= self.band() {
            self.max_height
        } else {
            relative / self.band() * self.max_height
        }
    }

    /// Pixel position of the cut line for `height`, kept inside the canvas
    /// padding.
    #[must_use]
    pub fn cut_line_pixel(&self, height: f64) -> f64 {
        self.to_pixel(height)
            .max(self.left)
            .min(self.width - self.right)
    }
}

/// Caller-owned drag state. The only mutable state in the crate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    /// Whether a drag is in progress.
    pub is_dragging: bool,
    /// Current cut height.
    pub cut_height: f64,
}

impl DragState {
    /// Idle state with the given cut height.
    #[must_use]
    pub const fn new(cut_height: f64) -> Self {
        Self {
            is_dragging: false,
            cut_height,
        }
    }
}

/// Pointer input on the dendrogram canvas. Positions are canvas-relative x
/// coordinates in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        /// Canvas x position.
        x: f64,
    },
    /// Pointer moved.
    Move {
        /// Canvas x position.
        x: f64,
    },
    /// Button released.
    Up,
    /// Pointer left the canvas.
    Leave,
}

/// Drag state machine for the cut line.
///
/// # Examples
/// ```
/// use dendra_core::{CutLineController, DragState, HeightScale, PointerEvent};
///
/// // 400 px canvas: the height band spans x = 120..247.5.
/// let controller = CutLineController::new(HeightScale::new(20.0, 400.0));
/// let mut state = DragState::new(12.0);
///
/// assert_eq!(controller.handle(&mut state, PointerEvent::Down { x: 120.0 }), Some(0.0));
/// assert!(state.is_dragging);
/// assert_eq!(controller.handle(&mut state, PointerEvent::Move { x: 400.0 }), Some(20.0));
/// assert_eq!(controller.handle(&mut state, PointerEvent::Up), None);
/// assert!(!state.is_dragging);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutLineController {
    scale: HeightScale,
}

impl CutLineController {
    /// Creates a controller over `scale`.
    #[must_use]
    pub const fn new(scale: HeightScale) -> Self {
        Self { scale }
    }

    /// Scale used to convert pointer positions.
    #[rustfmt::skip]
    #[must_use]
    pub const fn scale(&self) -> HeightScale { self.scale }

    /// Applies `event` to `state`, returning the new cut height when it
    /// changed.
    ///
    /// A press outside `[0, width]` or on a degenerate scale is ignored. Moves
    /// only update the cut while dragging. Releasing or leaving the canvas
    /// always ends the drag.
    pub fn handle(&self, state: &mut DragState, event: PointerEvent) -> Option<f64> {
        match event {
            PointerEvent::Down { x } => {
                if self.scale.is_degenerate() || !(0.0..=self.scale.width).contains(&x) {
                    return None;
                }
                state.is_dragging = true;
                self.update(state, x)
            }
            PointerEvent::Move { x } if state.is_dragging && !self.scale.is_degenerate() => {
                self.update(state, x)
            }
            PointerEvent::Move { .. } => None,
            PointerEvent::Up | PointerEvent::Leave => {
                state.is_dragging = false;
                None
            }
        }
    }

    fn update(&self, state: &mut DragState, x: f64) -> Option<f64> {
        let height = self.scale.to_height(x);
        if height == state.cut_height {
            return None;
        }
        state.cut_height = height;
        Some(height)
    }
}
