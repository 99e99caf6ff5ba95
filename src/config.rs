//! World geometry and physics constants.
//!
//! Positions are abstract "pixels": `x` grows to the right, `y` grows
//! downwards, and the playfield origin is the top-left corner of the sky.

use std::fmt;

// ── Geometry ────────────────────────────────────────────────────────────────

/// Horizontal extent of the visible playfield.
pub const WORLD_WIDTH: f64 = 400.0;
/// Lowest valid bird position; anything below is ground contact.
pub const GROUND_Y: f64 = 480.0;
/// Where the bird comes to rest after touching the ground.
pub const GROUND_REST_Y: f64 = GROUND_Y - 11.0;
/// Height of the sky band (ground line plus the bird's own height).
pub const SKY_HEIGHT: f64 = GROUND_Y + BIRD_HEIGHT;

pub const BIRD_LEFT_X: f64 = 82.0;
pub const BIRD_RIGHT_X: f64 = 114.0;
pub const BIRD_HEIGHT: f64 = 24.0;
pub const BIRD_START_Y: f64 = 228.0;

pub const PIPE_WIDTH: f64 = 52.0;
pub const PIPE_GAP_HEIGHT: f64 = 140.0;
pub const PIPE_SPAWN_X: f64 = 400.0;
/// Smallest possible `gap_top`.
pub const GAP_TOP_MIN: f64 = 130.0;
/// Number of distinct gap offsets above [`GAP_TOP_MIN`].
pub const GAP_TOP_SPAN: u32 = 150;
/// Extra room below the gap that still counts as passing.
pub const PASS_TOLERANCE: f64 = 10.0;

// ── Physics ─────────────────────────────────────────────────────────────────

pub const GRAVITY: f64 = 0.05;
pub const FLAP_IMPULSE: f64 = -2.0;
pub const SCROLL_SPEED: f64 = 0.5333;
/// Steps between two pipe spawns.
pub const SPAWN_INTERVAL: u32 = 50;

/// Simulation steps per wall-clock second.
pub const STEPS_PER_SECOND: u32 = 60;
/// Logical time handed to every `update` call by the loop driver.
pub const FIXED_DELTA: f64 = 4.0;
/// Upper bound on the wall time a single frame may feed the accumulator.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// The physics constants the simulation runs with.
///
/// There is exactly one set of values in play; the struct exists so tests
/// can reason about them together and so the spacing invariant is checked
/// in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub gravity: f64,
    pub flap_impulse: f64,
    pub scroll_speed: f64,
    pub spawn_interval: u32,
    pub fixed_delta: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            scroll_speed: SCROLL_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            fixed_delta: FIXED_DELTA,
        }
    }
}

impl Tuning {
    /// Horizontal distance between two consecutively spawned pipes.
    pub fn pipe_spacing(&self) -> f64 {
        self.spawn_interval as f64 * self.scroll_speed * self.fixed_delta
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity > 0.0) {
            return Err(ConfigError::NonPositive("gravity", self.gravity));
        }
        if !(self.flap_impulse < 0.0) {
            return Err(ConfigError::FlapNotUpward(self.flap_impulse));
        }
        if !(self.scroll_speed > 0.0) {
            return Err(ConfigError::NonPositive("scroll_speed", self.scroll_speed));
        }
        if !(self.fixed_delta > 0.0) {
            return Err(ConfigError::NonPositive("fixed_delta", self.fixed_delta));
        }
        if self.spawn_interval == 0 {
            return Err(ConfigError::NonPositive("spawn_interval", 0.0));
        }
        let required = PIPE_WIDTH + (BIRD_RIGHT_X - BIRD_LEFT_X);
        let spacing = self.pipe_spacing();
        if spacing <= required {
            return Err(ConfigError::PipesTooClose { spacing, required });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositive(&'static str, f64),
    FlapNotUpward(f64),
    PipesTooClose { spacing: f64, required: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(name, v) => write!(f, "{} must be positive, got {}", name, v),
            ConfigError::FlapNotUpward(v) => {
                write!(f, "flap impulse must be negative (upwards), got {}", v)
            }
            ConfigError::PipesTooClose { spacing, required } => write!(
                f,
                "pipe spacing {:.1} must exceed pipe width plus bird width ({:.1})",
                spacing, required
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
