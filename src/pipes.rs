//! Pipe spawning, scrolling and culling.

use std::collections::VecDeque;

use crate::config::{GAP_TOP_MIN, GAP_TOP_SPAN, PIPE_GAP_HEIGHT, PIPE_SPAWN_X, PIPE_WIDTH};
use crate::rng::GapSource;

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Leading (left) edge.
    pub x: f64,
    pub x_prev: f64,
    pub width: f64,
    /// Upper boundary of the gap.
    pub gap_top: f64,
    pub gap_height: f64,
    /// Set once the bird has been credited for this pipe.
    pub scored: bool,
}

impl Pipe {
    pub fn new(x: f64, gap_top: f64) -> Self {
        Self {
            x,
            x_prev: x,
            width: PIPE_WIDTH,
            gap_top,
            gap_height: PIPE_GAP_HEIGHT,
            scored: false,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_top + self.gap_height
    }

    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    pub fn draw(&self, interp: f64) -> f64 {
        self.x_prev + (self.x - self.x_prev) * interp
    }
}

/// Live pipes in spawn order, which is also left-to-right order.
#[derive(Debug, Clone, Default)]
pub struct PipeManager {
    pipes: VecDeque<Pipe>,
    timer: u32,
    spawned: u64,
}

impl PipeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
        self.timer = 0;
    }

    /// Scroll, cull, then spawn. A freshly spawned pipe has not moved yet.
    pub fn update<G: GapSource>(
        &mut self,
        scroll_speed: f64,
        spawn_interval: u32,
        delta: f64,
        gaps: &mut G,
    ) {
        for p in &mut self.pipes {
            p.x_prev = p.x;
            p.x -= scroll_speed * delta;
        }

        let before = self.pipes.len();
        self.pipes.retain(|p| !p.is_off_screen());
        if self.pipes.len() < before {
            log::trace!("culled {} pipe(s)", before - self.pipes.len());
        }

        if self.timer >= spawn_interval {
            let gap_top = GAP_TOP_MIN + gaps.gap_offset(GAP_TOP_SPAN) as f64;
            self.pipes.push_back(Pipe::new(PIPE_SPAWN_X, gap_top));
            self.spawned += 1;
            self.timer = 0;
            log::debug!("spawned pipe #{} with gap_top={}", self.spawned, gap_top);
        }
        self.timer += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pipe> {
        self.pipes.iter_mut()
    }

    pub fn front(&self) -> Option<&Pipe> {
        self.pipes.front()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Steps since the last spawn (or since the last reset).
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Pipes spawned over the lifetime of the manager.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Inserts a pipe directly, keeping the left-to-right order.
    pub fn insert(&mut self, pipe: Pipe) {
        let at = self.pipes.partition_point(|p| p.x <= pipe.x);
        self.pipes.insert(at, pipe);
    }
}
