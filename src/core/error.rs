//! Engine error taxonomy.
//!
//! Every failure is reported synchronously to the caller and leaves the
//! match unchanged. Nothing here is fatal; the caller decides whether to
//! show it to a player. A mill that runs out of cards is not an error at
//! all (see `zones::MillReport`).

use thiserror::Error;

use super::config::ZoneRef;
use super::entity::EntityId;
use super::player::PlayerId;
use super::state::Phase;
use crate::cards::CardId;

/// Errors returned by engine commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Draw requested from an empty deck. Usually a loss condition.
    #[error("{player} cannot draw: deck is empty")]
    DeckEmpty { player: PlayerId },

    #[error("field slot {slot} is occupied by {occupant}")]
    SlotOccupied { slot: usize, occupant: EntityId },

    #[error("field slot {slot} is out of range (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },

    /// A move onto the field did not say which slot to use.
    #[error("moving onto the field requires a slot")]
    SlotRequired,

    #[error("{player} may not choose turn order")]
    InvalidChoice { player: PlayerId },

    #[error("turn order has already been resolved")]
    AlreadyResolved,

    /// A turn command was issued before turn order was decided.
    #[error("turn order has not been resolved yet")]
    TurnOrderPending,

    #[error("unknown card {0}")]
    UnknownCard(EntityId),

    #[error("{card} is not in {zone}")]
    CardNotInZone { card: EntityId, zone: ZoneRef },

    /// Banished cards only leave through `recover`.
    #[error("{0} is banished and can only leave through a recovery effect")]
    CardBanished(EntityId),

    #[error("{0} is not on the field")]
    NotOnField(EntityId),

    #[error("tokens can only be created in a main phase (current: {0})")]
    NotMainPhase(Phase),

    #[error("attacks can only be declared in the battle phase (current: {0})")]
    NotBattlePhase(Phase),

    #[error("{0} cannot attack: it must be face-up in attack position")]
    CannotAttack(EntityId),

    #[error("cannot move from {from} back to {to}")]
    InvalidPhaseTransition { from: Phase, to: Phase },

    /// An `end_turn_at` guard named a turn that has already ended.
    #[error("turn {expected} has already ended (now turn {actual})")]
    StaleTurn { expected: u32, actual: u32 },

    #[error("card {0} is not in the catalog")]
    UnknownCatalogCard(CardId),

    #[error("deck has {count} copies of {card} (limit {limit})")]
    TooManyCopies { card: CardId, count: usize, limit: usize },

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
