//! Fixed-timestep loop driver.
//!
//! Wall-clock frames go into an accumulator; whole steps come out as
//! `update(fixed_delta)` calls, and the remainder becomes the interpolation
//! factor of the single `draw` per frame.

use std::io;
use std::time::Duration;

use crate::config::{MAX_FRAME_TIME, STEPS_PER_SECOND};
use crate::frame::{Frame, Renderer};
use crate::rng::{GapSource, ThreadGaps};
use crate::sim::Simulation;
use crate::state::Event;

pub struct LoopDriver<G = ThreadGaps> {
    sim: Simulation<G>,
    /// Wall time consumed by one simulation step, in seconds.
    step: f64,
    max_frame_time: f64,
    accumulator: f64,
    total_steps: u64,
    steps_this_frame: u32,
    frame_count: u64,
    interpolation: f64,
}

impl<G: GapSource> LoopDriver<G> {
    pub fn new(sim: Simulation<G>) -> Self {
        Self {
            sim,
            step: 1.0 / STEPS_PER_SECOND as f64,
            max_frame_time: MAX_FRAME_TIME,
            accumulator: 0.0,
            total_steps: 0,
            steps_this_frame: 0,
            frame_count: 0,
            interpolation: 0.0,
        }
    }

    pub fn step(&self) -> Duration {
        Duration::from_secs_f64(self.step)
    }

    pub fn sim(&self) -> &Simulation<G> {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation<G> {
        &mut self.sim
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Steps taken since the driver was created, across runs.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Interpolation factor handed to the last `draw`, in `[0, 1)`.
    pub fn interpolation(&self) -> f64 {
        self.interpolation
    }

    /// Starts (or restarts) a run without a burst of catch-up steps.
    pub fn begin(&mut self) -> bool {
        let started = self.sim.begin();
        if started {
            self.accumulator = 0.0;
        }
        started
    }

    pub fn revive(&mut self) -> bool {
        let started = self.sim.revive();
        if started {
            self.accumulator = 0.0;
        }
        started
    }

    pub fn flap(&mut self) {
        self.sim.flap();
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, Event> {
        self.sim.drain_events()
    }

    /// Runs the whole steps owed for `frame_time`, then draws exactly once.
    pub fn advance(&mut self, frame_time: Duration) -> Frame {
        let mut dt = frame_time.as_secs_f64();
        if dt > self.max_frame_time {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.0}ms",
                dt * 1000.0,
                self.max_frame_time * 1000.0
            );
            dt = self.max_frame_time;
        }

        self.frame_count += 1;
        self.steps_this_frame = 0;

        if self.sim.state().is_running() {
            self.accumulator += dt;
            let fixed_delta = self.sim.tuning().fixed_delta;
            while self.accumulator >= self.step {
                self.sim.update(fixed_delta);
                self.accumulator -= self.step;
                self.total_steps += 1;
                self.steps_this_frame += 1;
                if !self.sim.state().is_running() {
                    break;
                }
            }
        }
        if !self.sim.state().is_running() {
            // Nothing to catch up on while frozen.
            self.accumulator = 0.0;
        }

        self.interpolation = (self.accumulator / self.step).clamp(0.0, 1.0);
        if self.interpolation >= 1.0 {
            self.interpolation = 0.0;
        }
        log::trace!(
            "frame {}: {} steps, interp {:.3}",
            self.frame_count,
            self.steps_this_frame,
            self.interpolation
        );
        self.sim.draw(self.interpolation)
    }

    /// One external animation frame: simulate, then present.
    pub fn tick<R: Renderer>(&mut self, frame_time: Duration, renderer: &mut R) -> io::Result<()> {
        let frame = self.advance(frame_time);
        renderer.present(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RecordingRenderer;
    use crate::rng::ScriptedGaps;

    fn driver() -> LoopDriver<ScriptedGaps> {
        LoopDriver::new(Simulation::new(ScriptedGaps::constant(0)))
    }

    fn steps(n: f64) -> Duration {
        Duration::from_secs_f64(n / STEPS_PER_SECOND as f64)
    }

    #[test]
    fn idle_frames_never_step() {
        let mut d = driver();
        let mut r = RecordingRenderer::default();
        d.tick(steps(3.0), &mut r).unwrap();
        assert_eq!(d.total_steps(), 0);
        assert_eq!(r.frames.len(), 1);
    }

    #[test]
    fn whole_steps_and_leftover() {
        let mut d = driver();
        d.begin();
        let mut r = RecordingRenderer::default();
        d.tick(steps(2.5), &mut r).unwrap();
        assert_eq!(d.steps_this_frame(), 2);
        assert!((d.interpolation() - 0.5).abs() < 1e-6);
        assert_eq!(d.sim().steps(), 2);
        assert_eq!(r.frames.len(), 1);
    }

    #[test]
    fn begin_resets_accumulator() {
        let mut d = driver();
        d.begin();
        d.advance(steps(0.9));
        assert!(d.accumulator() > 0.0);
        d.sim_mut().bird_mut().y = 481.0;
        d.advance(steps(0.2));
        assert!(!d.sim().state().is_running());
        assert!(d.begin());
        assert_eq!(d.accumulator(), 0.0);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut d = driver();
        d.begin();
        d.sim_mut().bird_mut().flap(-20.0);
        d.advance(Duration::from_secs(5));
        assert!(d.steps_this_frame() <= (MAX_FRAME_TIME * STEPS_PER_SECOND as f64) as u32 + 1);
    }

    #[test]
    fn death_stops_the_step_loop() {
        let mut d = driver();
        d.begin();
        d.sim_mut().bird_mut().y = 479.99;
        d.advance(steps(5.0));
        assert_eq!(d.steps_this_frame(), 1);
        assert_eq!(d.accumulator(), 0.0);
        assert_eq!(d.interpolation(), 0.0);
    }

    #[test]
    fn bookkeeping_tracks_frames_and_steps() {
        let mut d = driver();
        d.advance(steps(1.0));
        assert_eq!((d.frame_count(), d.total_steps()), (1, 0));

        d.begin();
        d.advance(steps(2.5));
        d.advance(steps(1.0));
        assert_eq!(d.frame_count(), 3);
        assert_eq!(d.total_steps(), 3);
        assert_eq!(d.steps_this_frame(), 1);
        assert!((d.interpolation() - 0.5).abs() < 1e-6);
    }
}
