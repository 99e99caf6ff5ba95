//! What the simulation hands to presentation once per frame.

use std::io;

use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeView {
    pub x: f64,
    pub width: f64,
    pub gap_top: f64,
    pub gap_height: f64,
}

/// Interpolated, read-only snapshot of the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub state: GameState,
    pub bird_y: f64,
    /// Vertical speed, for tilting the sprite.
    pub bird_dy: f64,
    pub bird_left_x: f64,
    pub bird_right_x: f64,
    pub bird_height: f64,
    pub pipes: Vec<PipeView>,
    pub score: u32,
    pub high_score: u32,
    /// `"Score: N"` during a run, empty otherwise.
    pub score_text: String,
    pub high_score_text: String,
}

/// Anything that can show a [`Frame`].
pub trait Renderer {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).present(frame)
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _frame: &Frame) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every presented frame; handy for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
