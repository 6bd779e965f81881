//! Turn progression state.
//!
//! `TurnState` records whose turn it is, which phase is current and the
//! turn counter. It is created when turn order is resolved and is only
//! mutated through the turn rules in `rules::turn`.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// The phases of a turn, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    Standby,
    Main1,
    Battle,
    Main2,
    End,
}

impl Phase {
    /// Every phase, in turn order.
    pub const SEQUENCE: [Phase; 6] = [
        Phase::Draw,
        Phase::Standby,
        Phase::Main1,
        Phase::Battle,
        Phase::Main2,
        Phase::End,
    ];

    /// The phase after this one within the same turn, or `None` from `End`.
    #[must_use]
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Draw => Some(Phase::Standby),
            Phase::Standby => Some(Phase::Main1),
            Phase::Main1 => Some(Phase::Battle),
            Phase::Battle => Some(Phase::Main2),
            Phase::Main2 => Some(Phase::End),
            Phase::End => None,
        }
    }

    /// Main phases allow token creation and other sorcery-speed actions.
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Draw => "Draw",
            Phase::Standby => "Standby",
            Phase::Main1 => "Main 1",
            Phase::Battle => "Battle",
            Phase::Main2 => "Main 2",
            Phase::End => "End",
        };
        f.write_str(name)
    }
}

/// Whose turn it is and how far it has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    /// Active player (whose turn it is).
    pub active_player: PlayerId,

    /// Current phase.
    pub phase: Phase,

    /// Turn number (starts at 1, never decreases).
    pub turn_number: u32,
}

impl TurnState {
    /// The state at the very start of a match: turn 1, Draw phase.
    #[must_use]
    pub const fn first_turn(first_player: PlayerId) -> Self {
        Self {
            active_player: first_player,
            phase: Phase::Draw,
            turn_number: 1,
        }
    }

    /// Is it `player`'s turn?
    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.active_player == player
    }
}
