//! Flappy Bird simulation core.
//!
//! The game is a fixed-timestep simulation: [`LoopDriver`] turns wall-clock
//! frames into deterministic [`Simulation::update`] steps and one
//! interpolated [`Simulation::draw`] per frame. Presentation only ever sees
//! [`Frame`] snapshots through the [`Renderer`] trait and the [`Event`]s the
//! simulation publishes.
//!
//! ```
//! use flapsim::{GameState, Simulation, rng::ScriptedGaps};
//!
//! let mut sim = Simulation::new(ScriptedGaps::constant(0));
//! sim.begin();
//! sim.flap();
//! sim.update(1.0);
//! assert_eq!(sim.state(), GameState::Running);
//! assert!(sim.bird().y < 228.0);
//! ```

pub mod bird;
pub mod clock;
pub mod collision;
pub mod config;
pub mod frame;
pub mod pipes;
pub mod render;
pub mod rng;
pub mod score;
pub mod sim;
#[cfg(feature = "audio")]
pub mod sound;
pub mod state;

pub use clock::LoopDriver;
pub use config::{ConfigError, Tuning};
pub use frame::{Frame, PipeView, Renderer};
pub use sim::Simulation;
pub use state::{DeathCause, Event, GameState};
