//! Card instances - runtime card state.
//!
//! `CardInstance` represents one physical copy of a card in a match. It
//! tracks where the copy is and the state that only matters while it sits
//! on the field (face, battle position, ATK changes).
//!
//! Instances are owned by the `ZoneStore`; the location stored here is
//! kept in lockstep with the store's membership lists and is never
//! written from outside it.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::zones::Location;

/// Orientation of a monster on the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePosition {
    #[default]
    Attack,
    Defense,
}

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Reference to the catalog definition.
    pub card_id: CardId,

    /// Who brought this card into the match.
    pub owner: PlayerId,

    /// Created during play rather than dealt from a deck.
    pub is_token: bool,

    pub(crate) location: Location,

    /// Set face-down on the field.
    pub face_down: bool,

    pub position: BattlePosition,

    /// ATK set by an effect, replacing the catalog value.
    pub atk_override: Option<i32>,
}

impl CardInstance {
    /// Create a card instance at a location.
    #[must_use]
    pub fn new(entity_id: EntityId, card_id: CardId, owner: PlayerId, location: Location) -> Self {
        Self {
            entity_id,
            card_id,
            owner,
            is_token: false,
            location,
            face_down: false,
            position: BattlePosition::default(),
            atk_override: None,
        }
    }

    /// Create a token instance.
    #[must_use]
    pub fn token(entity_id: EntityId, card_id: CardId, owner: PlayerId, location: Location) -> Self {
        Self {
            is_token: true,
            ..Self::new(entity_id, card_id, owner, location)
        }
    }

    /// Current location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// ATK after overrides, given the catalog value.
    #[must_use]
    pub fn effective_atk(&self, base: Option<i32>) -> i32 {
        self.atk_override.or(base).unwrap_or(0)
    }

    /// Forget field-only state (on leaving the field).
    pub fn clear_field_state(&mut self) {
        self.face_down = false;
        self.position = BattlePosition::default();
        self.atk_override = None;
    }
}
