// SPDX-License-Identifier: MPL-2.0
//! Drag-pan coordinate clamping
//!
//! Maps pointer or touch deltas to a bounded translation offset for content
//! that is larger than its viewport. Offset (0, 0) aligns the content's
//! top-left with the viewport's top-left; panning goes negative and stops
//! where the content's far edge would leave the viewport. The clamped value
//! is recomputed continuously while the gesture runs and becomes the new
//! baseline only on release.

/// A pointer position in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle size in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A translation applied to the content, zero or negative per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Grab-and-drag state for panning oversized content.
///
/// Holds the committed baseline offset between gestures; a running gesture
/// only produces live values through [`calculate_offset`](Self::calculate_offset)
/// and never touches the baseline until [`release`](Self::release).
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Viewport rectangle the content pans within.
    viewport: Size,
    /// Size of the draggable content.
    content: Size,
    /// Baseline offset committed by the last released gesture.
    committed: Offset,
    /// Position where the active gesture started, if one is running.
    start: Option<Point>,
}

impl DragState {
    /// Creates an idle state with a zero baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the viewport and content rectangles the clamp works against.
    ///
    /// The baseline is re-clamped so a content swap or viewport resize can
    /// never leave the pan outside the new bounds.
    pub fn set_bounds(&mut self, viewport: Size, content: Size) {
        self.viewport = viewport;
        self.content = content;
        self.committed = self.clamp(self.committed);
    }

    /// `true` while a gesture is running.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    /// Returns the committed baseline offset.
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.committed
    }

    /// Starts a gesture at the given pointer position.
    ///
    /// A second start supersedes a gesture already running.
    pub fn start(&mut self, position: Point) {
        self.start = Some(position);
    }

    /// Calculates the live offset for the current pointer position.
    ///
    /// Returns `None` when no gesture is running. The value is the baseline
    /// plus the pointer delta, clamped per axis; it is feedback only and is
    /// not persisted.
    #[must_use]
    pub fn calculate_offset(&self, current_position: Point) -> Option<Offset> {
        let start = self.start?;
        let raw = Offset::new(
            self.committed.x + (current_position.x - start.x),
            self.committed.y + (current_position.y - start.y),
        );
        Some(self.clamp(raw))
    }

    /// Ends the gesture and commits the clamped offset as the new baseline.
    ///
    /// Without a running gesture the baseline is returned unchanged.
    pub fn release(&mut self, current_position: Point) -> Offset {
        if let Some(offset) = self.calculate_offset(current_position) {
            self.committed = offset;
        }
        self.start = None;
        self.committed
    }

    /// Abandons the gesture, keeping the previous baseline.
    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Clamps per axis to `[min(0, viewport - content), 0]`.
    fn clamp(&self, raw: Offset) -> Offset {
        let min_x = (self.viewport.width - self.content.width).min(0.0);
        let min_y = (self.viewport.height - self.content.height).min(0.0);
        Offset::new(raw.x.clamp(min_x, 0.0), raw.y.clamp(min_y, 0.0))
    }
}
