use crate::constants::{FALL_RIGHT_THRESHOLD, ROTATION_PER_PIXEL};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallDirection {
    Left,
    Right,
}

/// Emitted when a drag ends with a nonzero horizontal offset. Carries
/// everything the falling card needs to start from where it was let go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub position: Point,
    pub rotation: f32,
    pub direction: FallDirection,
}

/// Tracks the card being dragged: offset from the drag origin, the tilt
/// derived from it, and whether a drag is in progress.
#[derive(Debug, Default)]
pub struct GestureTracker {
    position: Point,
    rotation: f32,
    dragging: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_drag_start(&mut self) {
        self.dragging = true;
    }

    pub fn on_drag_move(&mut self, dx: f32, dy: f32) {
        self.position = Point { x: dx, y: dy };
        self.rotation = dx * ROTATION_PER_PIXEL;
    }

    /// Decision point. A release at the drag origin snaps the card back and
    /// returns `None`; anything else is a release. Note the one-sided
    /// threshold: any negative dx, or positive dx up to the threshold, falls
    /// left. Only dx beyond the threshold falls right.
    pub fn on_drag_end(&mut self, dx: f32, dy: f32) -> Option<Release> {
        self.dragging = false;

        if dx == 0.0 {
            self.reset();
            return None;
        }

        let direction = if dx > FALL_RIGHT_THRESHOLD {
            FallDirection::Right
        } else {
            FallDirection::Left
        };

        Some(Release {
            position: Point { x: dx, y: dy },
            rotation: dx * ROTATION_PER_PIXEL,
            direction,
        })
    }

    /// Back to neutral. Called on snap-back and after every slide transition.
    pub fn reset(&mut self) {
        self.position = Point::default();
        self.rotation = 0.0;
        self.dragging = false;
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
