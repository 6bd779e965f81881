//! Command log: what happened, who asked for it, and when.
//!
//! Every successful engine command is recorded as an `ActionRecord`. The
//! log is the audit trail for "who advanced the phase" questions: the
//! engine trusts its caller about who is allowed to act, but always
//! remembers who did.

use serde::{Deserialize, Serialize};

use super::config::ZoneRef;
use super::entity::EntityId;
use super::player::PlayerId;
use super::rng::CoinFace;
use super::state::Phase;
use crate::cards::BattlePosition;
use crate::rules::ResolutionMethod;
use crate::zones::Placement;

/// Who issued a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Issuer {
    /// A player's client.
    Player(PlayerId),
    /// The match clock (forced end of turn on expiry).
    Clock,
    /// The engine itself: setup, turn-order draws, automatic draws.
    Engine,
}

impl std::fmt::Display for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issuer::Player(p) => write!(f, "{}", p),
            Issuer::Clock => f.write_str("Clock"),
            Issuer::Engine => f.write_str("Engine"),
        }
    }
}

impl From<PlayerId> for Issuer {
    fn from(player: PlayerId) -> Self {
        Issuer::Player(player)
    }
}

/// A command that changed match state, with its observable outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ResolveTurnOrder { method: ResolutionMethod, winner: PlayerId },
    ChooseTurnOrder { go_first: bool, first_player: PlayerId },
    AdvancePhase { from: Phase, to: Phase },
    EndTurn { next_player: PlayerId, turn_number: u32 },
    Draw { player: PlayerId, card: EntityId },
    Mill { player: PlayerId, requested: usize, milled: usize },
    Move { card: EntityId, from: ZoneRef, to: ZoneRef, placement: Placement },
    Recover { card: EntityId, to: ZoneRef },
    ShuffleDeck { player: PlayerId },
    CreateToken { card: EntityId, owner: PlayerId, slot: usize },
    SetFaceDown { card: EntityId, face_down: bool },
    ChangePosition { card: EntityId, position: BattlePosition },
    SetAtk { card: EntityId, atk: i32 },
    AdjustLife { player: PlayerId, delta: i64, life: i64 },
    Attack { attacker: EntityId, target: Option<EntityId> },
    RollDice { result: u8 },
    FlipCoin { result: CoinFace },
    StartClock,
    PauseClock,
    ResetClock { seconds: u32 },
}

/// A recorded command with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Who issued the command.
    pub issuer: Issuer,

    /// What happened.
    pub command: Command,

    /// Turn number when the command ran (0 before turn order resolves).
    pub turn: u32,

    /// Position in the match-wide log.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(issuer: Issuer, command: Command, turn: u32, sequence: u32) -> Self {
        Self {
            issuer,
            command,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_from_player() {
        let issuer: Issuer = PlayerId::SECOND_SEAT.into();
        assert_eq!(issuer, Issuer::Player(PlayerId::SECOND_SEAT));
        assert_eq!(issuer.to_string(), "Player 1");
        assert_eq!(Issuer::Clock.to_string(), "Clock");
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(
            Issuer::Player(PlayerId::FIRST_SEAT),
            Command::Mill { player: PlayerId::FIRST_SEAT, requested: 5, milled: 3 },
            4,
            17,
        );

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
