use crate::constants::{FALL_DRIFT, FALL_DROP, FALL_DURATION, FALL_SPIN};
use crate::gesture::{FallDirection, Point};

/// Transform parameters for drawing the falling-card overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotate_deg: f32,
}

/// The dismissed card while its exit animation runs. Starts from the exact
/// position and tilt it was released at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingSlide {
    pub slide_index: usize,
    pub direction: FallDirection,
    pub release_position: Point,
    pub release_rotation: f32,
    elapsed: f32,
}

impl FallingSlide {
    pub fn progress(&self) -> f32 {
        (self.elapsed / FALL_DURATION).min(1.0)
    }

    pub fn transform(&self) -> FallTransform {
        let t = self.progress();
        let drift = match self.direction {
            FallDirection::Right => 1.0,
            FallDirection::Left => -1.0,
        };
        FallTransform {
            translate_x: self.release_position.x + drift * FALL_DRIFT * t * t,
            translate_y: self.release_position.y + FALL_DROP * t * t,
            rotate_deg: self.release_rotation + drift * FALL_SPIN * t,
        }
    }
}

/// Owns the single falling-card overlay. A new spawn while one is still
/// active replaces it and re-arms the timer; timers are never stacked, so a
/// fast double-release cannot leave two overlays behind.
#[derive(Debug, Default)]
pub struct FallAnimator {
    active: Option<FallingSlide>,
}

impl FallAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        slide_index: usize,
        direction: FallDirection,
        release_position: Point,
        release_rotation: f32,
    ) {
        self.active = Some(FallingSlide {
            slide_index,
            direction,
            release_position,
            release_rotation,
            elapsed: 0.0,
        });
    }

    /// Advance the fall timer; the overlay clears itself once the fall
    /// duration has elapsed.
    pub fn update(&mut self, dt: f32) {
        if let Some(falling) = &mut self.active {
            falling.elapsed += dt;
            if falling.elapsed >= FALL_DURATION {
                self.clear();
            }
        }
    }

    /// Idempotent: clearing an already-cleared overlay is a no-op.
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&FallingSlide> {
        self.active.as_ref()
    }
}
