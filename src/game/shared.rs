//! Lock-guarded match handle.
//!
//! A match has two sources of concurrent mutation: player commands and
//! the clock scheduler. Both go through the same `SharedMatch`, so every
//! command runs to completion under one lock and a reader never sees a
//! half-applied move.

use std::sync::Arc;

use parking_lot::Mutex;

use super::duel::{ClockEvent, Match};
use crate::core::action::Issuer;
use crate::core::error::EngineResult;
use crate::rules::turn::PhaseChange;

/// Cloneable handle to one match.
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardId, CardRegistry, DeckList};
/// use duel_engine::core::{GameRng, MatchConfig, PlayerId};
/// use duel_engine::game::{Match, SharedMatch};
/// use duel_engine::rules::MiniGameWin;
///
/// let registry = CardRegistry::from_definitions([
///     CardDefinition::monster(CardId::new(1), "Soldier", 1800, 1000),
/// ]);
/// let deck = DeckList::new().with_copies(CardId::new(1), 3);
/// let game = Match::new(MatchConfig::new(), registry, [deck.clone(), deck], GameRng::new(1)).unwrap();
///
/// let shared = SharedMatch::new(game);
/// shared.with_mut(|m| m.resolve_turn_order(&MiniGameWin(PlayerId::FIRST_SEAT))).unwrap();
/// shared.with_mut(|m| m.choose(PlayerId::FIRST_SEAT, true)).unwrap();
///
/// assert_eq!(shared.with(|m| m.turn_state().map(|t| t.turn_number)), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct SharedMatch {
    inner: Arc<Mutex<Match>>,
}

impl SharedMatch {
    #[must_use]
    pub fn new(game: Match) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    /// Run a query under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Match) -> R) -> R {
        let game = self.inner.lock();
        f(&game)
    }

    /// Run a command under the lock.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Match) -> R) -> R {
        let mut game = self.inner.lock();
        f(&mut game)
    }

    /// Clock scheduler entry point: one second elapsed.
    pub fn tick_clock(&self) -> ClockEvent {
        self.with_mut(Match::tick_clock)
    }

    /// End the given turn unless it already ended (see `Match::end_turn_at`).
    pub fn end_turn_at(&self, issuer: impl Into<Issuer>, turn_number: u32) -> EngineResult<PhaseChange> {
        let issuer = issuer.into();
        self.with_mut(|game| game.end_turn_at(issuer, turn_number))
    }
}
