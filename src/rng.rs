//! Sources for the pipe gap draw, the only non-deterministic input of the
//! simulation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks the vertical offset of each newly spawned pipe's gap.
pub trait GapSource {
    /// Returns a value uniformly distributed in `0..span`.
    fn gap_offset(&mut self, span: u32) -> u32;
}

impl<G: GapSource + ?Sized> GapSource for Box<G> {
    fn gap_offset(&mut self, span: u32) -> u32 {
        (**self).gap_offset(span)
    }
}

/// Gaps drawn from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadGaps;

impl GapSource for ThreadGaps {
    fn gap_offset(&mut self, span: u32) -> u32 {
        if span == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..span)
    }
}

/// Reproducible gaps: the same seed always yields the same pipe layout.
#[derive(Debug, Clone)]
pub struct SeededGaps {
    rng: StdRng,
}

impl SeededGaps {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl GapSource for SeededGaps {
    fn gap_offset(&mut self, span: u32) -> u32 {
        if span == 0 {
            return 0;
        }
        self.rng.gen_range(0..span)
    }
}

/// Replays a fixed list of offsets, cycling when exhausted.
///
/// Values are reduced modulo the requested span so a script can never push
/// a gap outside its legal range.
#[derive(Debug, Clone)]
pub struct ScriptedGaps {
    values: Vec<u32>,
    next: usize,
}

impl ScriptedGaps {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// Every pipe gets the same offset.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }
}

impl GapSource for ScriptedGaps {
    fn gap_offset(&mut self, span: u32) -> u32 {
        if span == 0 || self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        v % span
    }
}
