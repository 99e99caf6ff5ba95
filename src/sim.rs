//! The owned simulation state and its entry points.
//!
//! A step always runs in the same order: bird physics, pipe scroll/cull/spawn,
//! collision and scoring, then the state transition. A ground or pipe hit ends
//! the step on the spot.

use std::vec::Drain;

use crate::bird::{Bird, BirdStep};
use crate::collision::{self, Contact};
use crate::config::{BIRD_HEIGHT, BIRD_LEFT_X, BIRD_RIGHT_X, ConfigError, Tuning};
use crate::frame::{Frame, PipeView};
use crate::pipes::PipeManager;
use crate::rng::{GapSource, ThreadGaps};
use crate::score::ScoreTracker;
use crate::state::{DeathCause, Event, GameState};

#[derive(Debug, Clone)]
pub struct Simulation<G = ThreadGaps> {
    tuning: Tuning,
    state: GameState,
    bird: Bird,
    pipes: PipeManager,
    score: ScoreTracker,
    gaps: G,
    events: Vec<Event>,
    /// Steps taken in the current run.
    steps: u64,
}

impl Default for Simulation<ThreadGaps> {
    fn default() -> Self {
        Self::new(ThreadGaps)
    }
}

impl<G: GapSource> Simulation<G> {
    pub fn new(gaps: G) -> Self {
        Self::build(Tuning::default(), gaps)
    }

    pub fn with_tuning(tuning: Tuning, gaps: G) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(tuning, gaps))
    }

    fn build(tuning: Tuning, gaps: G) -> Self {
        Self {
            tuning,
            state: GameState::Idle,
            bird: Bird::new(),
            pipes: PipeManager::new(),
            score: ScoreTracker::new(),
            gaps,
            events: Vec::new(),
            steps: 0,
        }
    }

    /// Starts a run from Idle or Dead. Returns whether a run was started.
    pub fn begin(&mut self) -> bool {
        match self.state.begin() {
            Some(next) => {
                self.start(next);
                true
            }
            None => false,
        }
    }

    /// Restarts after death; does nothing in any other state.
    pub fn revive(&mut self) -> bool {
        match self.state.revive() {
            Some(next) => {
                self.start(next);
                true
            }
            None => false,
        }
    }

    fn start(&mut self, next: GameState) {
        let revived = self.state == GameState::Dead;
        self.bird.reset();
        self.pipes.clear();
        self.score.reset_run();
        self.steps = 0;
        self.state = next;
        self.events.push(Event::Started { revived });
        log::info!("run started (revived: {})", revived);
    }

    /// Advances one logical step. Ignored outside a run and for non-positive
    /// (or non-finite) deltas.
    pub fn update(&mut self, delta: f64) {
        if !self.state.is_running() || !(delta > 0.0 && delta.is_finite()) {
            return;
        }
        self.steps += 1;

        if self.bird.update(self.tuning.gravity, delta) == BirdStep::Grounded {
            self.die(DeathCause::Ground);
            return;
        }

        self.pipes.update(
            self.tuning.scroll_speed,
            self.tuning.spawn_interval,
            delta,
            &mut self.gaps,
        );

        match collision::check(&self.bird, &mut self.pipes) {
            (Contact::Hit, passed) => {
                // A pipe passed earlier in the same scan still counts.
                self.award(passed);
                self.die(DeathCause::Pipe);
            }
            (Contact::Passed, passed) => self.award(passed),
            (Contact::Clear, _) => {}
        }
    }

    fn award(&mut self, passed: u32) {
        if passed == 0 {
            return;
        }
        self.score.award(passed);
        let score = self.score.score();
        self.events.push(Event::Scored { score });
        log::debug!("scored: {}", score);
    }

    fn die(&mut self, cause: DeathCause) {
        let Some(next) = self.state.die() else {
            return;
        };
        self.state = next;
        let score = self.score.fold();
        let high_score = self.score.high_score();
        self.pipes.clear();
        self.bird.settle();
        self.events.push(Event::Died {
            cause,
            score,
            high_score,
        });
        log::info!(
            "died ({:?}) after {} steps with score {} (best {})",
            cause,
            self.steps,
            score,
            high_score
        );
    }

    pub fn flap(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.bird.flap(self.tuning.flap_impulse);
        self.events.push(Event::Flapped);
    }

    /// Interpolated snapshot for presentation. Pure read.
    pub fn draw(&self, interp: f64) -> Frame {
        let t = if interp.is_finite() {
            interp.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let running = self.state.is_running();
        Frame {
            state: self.state,
            bird_y: self.bird.draw(t),
            bird_dy: self.bird.dy,
            bird_left_x: BIRD_LEFT_X,
            bird_right_x: BIRD_RIGHT_X,
            bird_height: BIRD_HEIGHT,
            pipes: self
                .pipes
                .iter()
                .map(|p| PipeView {
                    x: p.draw(t),
                    width: p.width,
                    gap_top: p.gap_top,
                    gap_height: p.gap_height,
                })
                .collect(),
            score: self.score.score(),
            high_score: self.score.high_score(),
            score_text: if running {
                self.score.score_text()
            } else {
                String::new()
            },
            high_score_text: self.score.high_score_text(),
        }
    }

    /// Hands over the notifications accumulated since the last call.
    pub fn drain_events(&mut self) -> Drain<'_, Event> {
        self.events.drain(..)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Direct access for scripted setups (replays, tests).
    pub fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    pub fn pipes(&self) -> &PipeManager {
        &self.pipes
    }

    /// Direct access for scripted setups (replays, tests).
    pub fn pipes_mut(&mut self) -> &mut PipeManager {
        &mut self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn high_score(&self) -> u32 {
        self.score.high_score()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
