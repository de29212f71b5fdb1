//! Read-only game snapshot

use crate::mode::GameMode;
use serde::{Deserialize, Serialize};

/// Snapshot handed to callers; a copy, never a live view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: GameMode,
    pub score: u64,
    pub level: u32,
    /// Lines, or rings in circular mode
    pub lines: u32,
    pub game_over: bool,
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Spawning,
    Active,
    Locking,
    Clearing,
    GameOver,
    /// An invariant broke; the session accepts no further commands
    Faulted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Faulted)
    }
}
