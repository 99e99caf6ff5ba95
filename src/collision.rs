//! Bird-versus-pipe tests.
//!
//! Every pipe whose span overlaps the bird is examined, not just the head of
//! the queue: a pipe that has already passed the bird lingers until its right
//! edge leaves the screen, and by then the next one can be overlapping.

use crate::bird::Bird;
use crate::config::{BIRD_HEIGHT, BIRD_LEFT_X, BIRD_RIGHT_X, PASS_TOLERANCE};
use crate::pipes::{Pipe, PipeManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Nothing happened this step.
    Clear,
    /// The bird entered a gap it had not been credited for yet.
    Passed,
    /// The bird hit the body of a pipe.
    Hit,
}

pub fn overlaps_horizontally(pipe: &Pipe) -> bool {
    pipe.x <= BIRD_RIGHT_X && pipe.right() >= BIRD_LEFT_X
}

pub fn inside_gap(pipe: &Pipe, bird_y: f64) -> bool {
    bird_y > pipe.gap_top && bird_y + BIRD_HEIGHT < pipe.gap_bottom() + PASS_TOLERANCE
}

/// Evaluates the bird against the live pipes, updating their `scored`
/// latches. Returns the number of newly passed pipes, or `Hit`.
pub fn check(bird: &Bird, pipes: &mut PipeManager) -> (Contact, u32) {
    let mut passed = 0;
    for pipe in pipes.iter_mut() {
        if pipe.x > BIRD_RIGHT_X {
            // Ordered left to right; nothing further can touch the bird.
            break;
        }
        if !overlaps_horizontally(pipe) {
            pipe.scored = false;
            continue;
        }
        if !inside_gap(pipe, bird.y) {
            return (Contact::Hit, passed);
        }
        if !pipe.scored {
            pipe.scored = true;
            passed += 1;
        }
    }
    if passed > 0 {
        (Contact::Passed, passed)
    } else {
        (Contact::Clear, 0)
    }
}
