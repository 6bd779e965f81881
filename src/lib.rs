//! # duel-engine
//!
//! Match state engine for a two-player, turn-based trading card game.
//!
//! ## Design Principles
//!
//! 1. **Single Authority**: One `Match` owns zones, turn state, turn
//!    order, clock and RNG. Every mutation is a method call on it, so
//!    serializing those calls (see `SharedMatch`) is the whole
//!    concurrency story.
//!
//! 2. **Atomic Moves**: A card is always in exactly one zone. Commands
//!    validate first and mutate second; a failed command changes nothing.
//!
//! 3. **Zones As Data**: Ordering, capacity and visibility of each zone
//!    kind come from a policy table, not from branching on zone names.
//!
//! 4. **Injectable Randomness**: Dice, coins and shuffles go through a
//!    seedable RNG, so matches replay exactly under test.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, RNG, configuration, commands, errors
//! - `cards`: Catalog definitions, match instances, deck lists
//! - `zones`: The zone store (draw, mill, move)
//! - `rules`: Phases, turn order, the turn clock, battle damage
//! - `game`: The `Match` authority, its shared handle and snapshots

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, CoinFace, Command, EngineError, EngineResult, EntityId, GameRng, GameRngState,
    Issuer, MatchConfig, Phase, PlayerId, PlayerMap, Randomizer, TurnState, ZoneKind, ZoneRef,
};

pub use crate::cards::{
    BattlePosition, CardDefinition, CardId, CardInstance, CardRegistry, CardType, DeckList,
};

pub use crate::zones::{Location, MillReport, Placement, ZoneStore};

pub use crate::rules::{
    AutoDraw, BattleReport, ClockTick, CoinCall, HigherDie, MatchClock, MiniGameWin, PhaseChange,
    ResolutionMethod, TurnOrderResolver, TurnOrderStatus, WinnerRule,
};

pub use crate::game::{ClockEvent, Match, MatchResult, MatchSnapshot, SharedMatch};
