//! Idle / Running / Dead and the notifications published on transitions.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Before the first run; nothing moves.
    #[default]
    Idle,
    Running,
    /// Round over; frozen until revived.
    Dead,
}

impl GameState {
    pub fn is_running(self) -> bool {
        self == GameState::Running
    }

    /// `begin()` from Idle, or re-entry after death.
    pub fn begin(self) -> Option<GameState> {
        match self {
            GameState::Idle | GameState::Dead => Some(GameState::Running),
            GameState::Running => None,
        }
    }

    pub fn revive(self) -> Option<GameState> {
        match self {
            GameState::Dead => Some(GameState::Running),
            GameState::Idle | GameState::Running => None,
        }
    }

    pub fn die(self) -> Option<GameState> {
        match self {
            GameState::Running => Some(GameState::Dead),
            GameState::Idle | GameState::Dead => None,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameState::Idle => "idle",
            GameState::Running => "running",
            GameState::Dead => "dead",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Ground,
    Pipe,
}

/// What collaborators (UI, sound) are told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Started { revived: bool },
    Flapped,
    Scored { score: u32 },
    Died {
        cause: DeathCause,
        score: u32,
        high_score: u32,
    },
}
