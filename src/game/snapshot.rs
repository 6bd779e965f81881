//! Match snapshots for state sync.
//!
//! A `MatchSnapshot` is the complete state of a match, including hidden
//! zones and the RNG position. It encodes with `bincode`; a transport
//! outside the engine decides who receives it.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::duel::Match;
use crate::cards::CardRegistry;
use crate::core::action::ActionRecord;
use crate::core::config::MatchConfig;
use crate::core::entity::EntityId;
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::{PlayerMap, SEATS};
use crate::core::rng::{GameRng, GameRngState};
use crate::core::state::TurnState;
use crate::rules::clock::MatchClock;
use crate::rules::turn_order::TurnOrderResolver;
use crate::zones::ZoneStore;

/// Serializable copy of a whole match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub config: MatchConfig,
    pub registry: CardRegistry,
    pub zones: ZoneStore,
    pub life: PlayerMap<i64>,
    pub decked_out: PlayerMap<bool>,
    pub turn_order: TurnOrderResolver,
    pub turn: Option<TurnState>,
    pub clock: MatchClock,
    pub rng: GameRngState,
    pub next_entity: EntityId,
    pub history: Vector<ActionRecord>,
}

impl MatchSnapshot {
    pub fn encode(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> EngineResult<Self> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

impl MatchSnapshot {
    fn validate(&self) -> Result<(), String> {
        self.zones.check_integrity()?;

        if self.config.field_capacity != self.zones.field_capacity() {
            return Err(format!(
                "config has {} field slots but zones have {}",
                self.config.field_capacity,
                self.zones.field_capacity()
            ));
        }

        if let Some(highest) = self.zones.cards().map(|c| c.entity_id).max() {
            if self.next_entity <= highest {
                return Err(format!("next entity {} is not above {}", self.next_entity, highest));
            }
        }

        let seats = [
            self.turn.map(|t| t.active_player),
            self.turn_order.winner(),
            self.turn_order.first_player(),
        ];
        if let Some(seat) = seats.into_iter().flatten().find(|p| p.index() >= SEATS) {
            return Err(format!("unknown seat {}", seat));
        }
        Ok(())
    }
}

impl Match {
    /// Capture the full match state.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            config: self.config.clone(),
            registry: self.registry.clone(),
            zones: self.zones.clone(),
            life: self.life.clone(),
            decked_out: self.decked_out.clone(),
            turn_order: self.turn_order.clone(),
            turn: self.turn,
            clock: self.clock,
            rng: self.rng.state(),
            next_entity: self.next_entity,
            history: self.history.clone(),
        }
    }

    /// Rebuild a match from a snapshot.
    ///
    /// Rejects snapshots that later commands could not run against:
    /// inconsistent zone membership, a field size that disagrees with the
    /// config, an entity counter that would hand out a live id, or a seat
    /// that does not exist.
    pub fn from_snapshot(snapshot: MatchSnapshot) -> EngineResult<Self> {
        snapshot.validate().map_err(EngineError::Snapshot)?;

        Ok(Self {
            config: snapshot.config,
            registry: snapshot.registry,
            zones: snapshot.zones,
            life: snapshot.life,
            decked_out: snapshot.decked_out,
            turn_order: snapshot.turn_order,
            turn: snapshot.turn,
            clock: snapshot.clock,
            rng: GameRng::from_state(&snapshot.rng),
            next_entity: snapshot.next_entity,
            history: snapshot.history,
        })
    }
}
