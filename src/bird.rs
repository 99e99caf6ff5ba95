use crate::config::{BIRD_START_Y, GROUND_REST_Y, GROUND_Y};

/// Outcome of one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdStep {
    Airborne,
    /// Touched the ceiling; clamped, not fatal.
    Ceiling,
    /// Touched the ground; the run is over.
    Grounded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub y: f64,
    pub dy: f64,
    /// Position before the last step, kept for draw interpolation.
    pub y_prev: f64,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    pub fn new() -> Self {
        Self {
            y: BIRD_START_Y,
            dy: 0.0,
            y_prev: BIRD_START_Y,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Euler step from the pre-update position, then the boundary policy.
    pub fn update(&mut self, gravity: f64, delta: f64) -> BirdStep {
        self.y_prev = self.y;
        self.dy += gravity * delta;
        self.y = self.y_prev + self.dy * delta;

        if self.y > GROUND_Y {
            self.y = GROUND_REST_Y;
            self.dy = 0.0;
            BirdStep::Grounded
        } else if self.y < 0.0 {
            self.y = 0.0;
            self.dy = 0.0;
            BirdStep::Ceiling
        } else {
            BirdStep::Airborne
        }
    }

    /// Overwrites the vertical speed; repeated flaps never stack.
    pub fn flap(&mut self, impulse: f64) {
        self.dy = impulse;
    }

    /// Drops the interpolation history so the bird is drawn where it is.
    pub fn settle(&mut self) {
        self.y_prev = self.y;
    }

    pub fn draw(&self, interp: f64) -> f64 {
        self.y_prev + (self.y - self.y_prev) * interp
    }
}
