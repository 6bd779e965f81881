//! Match configuration types.
//!
//! - `ZoneKind`: the five per-player zones of a duel plus the extra deck
//! - `ZonePolicy`: ordering, capacity and visibility of each kind, as data
//! - `MatchConfig`: tunable match rules (life, clock, hand size, limits)
//!
//! Zone behavior is looked up in the policy table rather than branched on
//! zone name, so adding a zone kind means adding one table row.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// The kinds of zone every player owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Main deck: ordered, drawn from the top, face-down.
    Deck,
    /// Extra deck: unordered, face-down, summoned from directly.
    ExtraDeck,
    /// Hand: unordered, hidden from the opponent.
    Hand,
    /// Field: fixed-capacity slots.
    Field,
    /// Graveyard: unordered, face-up.
    DeadZone,
    /// Removed from play: face-up, leaves only through explicit recovery.
    Banished,
}

impl ZoneKind {
    /// Every zone kind, in display order.
    pub const ALL: [ZoneKind; 6] = [
        ZoneKind::Deck,
        ZoneKind::ExtraDeck,
        ZoneKind::Hand,
        ZoneKind::Field,
        ZoneKind::DeadZone,
        ZoneKind::Banished,
    ];

    /// Look up this zone's policy.
    #[must_use]
    pub const fn policy(self) -> ZonePolicy {
        match self {
            ZoneKind::Deck => ZonePolicy {
                ordering: ZoneOrdering::Ordered,
                capacity: ZoneCapacity::Unbounded,
                visibility: ZoneVisibility::Hidden,
            },
            ZoneKind::ExtraDeck => ZonePolicy {
                ordering: ZoneOrdering::Unordered,
                capacity: ZoneCapacity::Unbounded,
                visibility: ZoneVisibility::OwnerOnly,
            },
            ZoneKind::Hand => ZonePolicy {
                ordering: ZoneOrdering::Unordered,
                capacity: ZoneCapacity::Unbounded,
                visibility: ZoneVisibility::OwnerOnly,
            },
            ZoneKind::Field => ZonePolicy {
                ordering: ZoneOrdering::Unordered,
                capacity: ZoneCapacity::Slotted,
                visibility: ZoneVisibility::Public,
            },
            ZoneKind::DeadZone | ZoneKind::Banished => ZonePolicy {
                ordering: ZoneOrdering::Unordered,
                capacity: ZoneCapacity::Unbounded,
                visibility: ZoneVisibility::Public,
            },
        }
    }

    /// Is card order significant in this zone?
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self.policy().ordering, ZoneOrdering::Ordered)
    }

    /// Does this zone place cards into numbered slots?
    #[must_use]
    pub const fn is_slotted(self) -> bool {
        matches!(self.policy().capacity, ZoneCapacity::Slotted)
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ZoneKind::Deck => "deck",
            ZoneKind::ExtraDeck => "extraDeck",
            ZoneKind::Hand => "hand",
            ZoneKind::Field => "field",
            ZoneKind::DeadZone => "deadZone",
            ZoneKind::Banished => "banished",
        };
        f.write_str(name)
    }
}

/// A specific player's zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneRef {
    pub owner: PlayerId,
    pub kind: ZoneKind,
}

impl ZoneRef {
    #[must_use]
    pub const fn new(owner: PlayerId, kind: ZoneKind) -> Self {
        Self { owner, kind }
    }
}

impl std::fmt::Display for ZoneRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.kind)
    }
}

/// Whether card order is significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneOrdering {
    Ordered,
    Unordered,
}

/// How many cards a zone holds and how they are addressed.
///
/// Slotted zones take their slot count from `MatchConfig::field_capacity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneCapacity {
    Unbounded,
    Slotted,
}

/// Zone visibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// All cards visible to all players (field, graveyard).
    Public,
    /// Cards visible only to the zone owner (hand).
    OwnerOnly,
    /// Cards not visible to anyone (face-down deck).
    Hidden,
}

/// Ordering, capacity and visibility of one zone kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePolicy {
    pub ordering: ZoneOrdering,
    pub capacity: ZoneCapacity,
    pub visibility: ZoneVisibility,
}

/// Match rule configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use duel_engine::core::MatchConfig;
///
/// let config = MatchConfig::new()
///     .with_starting_life(4000)
///     .with_turn_seconds(60);
///
/// assert_eq!(config.starting_life, 4000);
/// assert_eq!(config.opening_hand, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Life points each player starts with.
    pub starting_life: i64,

    /// Seconds on the match clock at the start of every turn.
    pub turn_seconds: u32,

    /// Start the clock automatically when a turn begins.
    pub auto_start_clock: bool,

    /// Cards drawn into each hand before turn order is resolved.
    pub opening_hand: usize,

    /// Number of field slots per player.
    pub field_capacity: usize,

    /// Maximum copies of one catalog card in a deck list.
    pub max_copies: usize,

    /// Whether the player who goes first draws on turn 1.
    pub draw_on_first_turn: bool,

    /// Shuffle decks before dealing opening hands.
    pub shuffle_on_start: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_life: 8000,
            turn_seconds: 180,
            auto_start_clock: true,
            opening_hand: 5,
            field_capacity: 5,
            max_copies: 3,
            draw_on_first_turn: true,
            shuffle_on_start: true,
        }
    }
}

impl MatchConfig {
    /// Create a configuration with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_turn_seconds(mut self, seconds: u32) -> Self {
        self.turn_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_auto_start_clock(mut self, auto_start: bool) -> Self {
        self.auto_start_clock = auto_start;
        self
    }

    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Set the number of field slots.
    ///
    /// Panics on zero: a field with no slots cannot hold a token.
    #[must_use]
    pub fn with_field_capacity(mut self, slots: usize) -> Self {
        assert!(slots > 0, "Field must have at least 1 slot");
        self.field_capacity = slots;
        self
    }

    #[must_use]
    pub fn with_max_copies(mut self, copies: usize) -> Self {
        self.max_copies = copies;
        self
    }

    #[must_use]
    pub fn with_draw_on_first_turn(mut self, draw: bool) -> Self {
        self.draw_on_first_turn = draw;
        self
    }

    #[must_use]
    pub fn with_shuffle_on_start(mut self, shuffle: bool) -> Self {
        self.shuffle_on_start = shuffle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert!(ZoneKind::Deck.is_ordered());
        assert!(!ZoneKind::Hand.is_ordered());
        assert!(ZoneKind::Field.is_slotted());
        assert!(!ZoneKind::DeadZone.is_slotted());

        assert_eq!(ZoneKind::Deck.policy().visibility, ZoneVisibility::Hidden);
        assert_eq!(ZoneKind::Hand.policy().visibility, ZoneVisibility::OwnerOnly);
        assert_eq!(ZoneKind::Banished.policy().visibility, ZoneVisibility::Public);
    }

    #[test]
    fn test_only_deck_is_ordered_and_only_field_is_slotted() {
        let ordered: Vec<_> = ZoneKind::ALL.iter().filter(|k| k.is_ordered()).collect();
        let slotted: Vec<_> = ZoneKind::ALL.iter().filter(|k| k.is_slotted()).collect();

        assert_eq!(ordered, vec![&ZoneKind::Deck]);
        assert_eq!(slotted, vec![&ZoneKind::Field]);
    }

    #[test]
    fn test_zone_ref_display() {
        let zone = ZoneRef::new(PlayerId::SECOND_SEAT, ZoneKind::DeadZone);
        assert_eq!(format!("{}", zone), "Player 1/deadZone");
    }

    #[test]
    fn test_config_builder() {
        let config = MatchConfig::new()
            .with_starting_life(4000)
            .with_turn_seconds(60)
            .with_auto_start_clock(false)
            .with_opening_hand(4)
            .with_field_capacity(3)
            .with_max_copies(1)
            .with_draw_on_first_turn(false)
            .with_shuffle_on_start(false);

        assert_eq!(config.starting_life, 4000);
        assert_eq!(config.turn_seconds, 60);
        assert!(!config.auto_start_clock);
        assert_eq!(config.opening_hand, 4);
        assert_eq!(config.field_capacity, 3);
        assert_eq!(config.max_copies, 1);
        assert!(!config.draw_on_first_turn);
        assert!(!config.shuffle_on_start);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{ "starting_life": 2000, "max_copies": 1 }"#).unwrap();

        assert_eq!(config.starting_life, 2000);
        assert_eq!(config.max_copies, 1);
        assert_eq!(config.turn_seconds, 180);
        assert_eq!(config.field_capacity, 5);
    }

    #[test]
    #[should_panic(expected = "at least 1 slot")]
    fn test_zero_field_capacity_panics() {
        let _ = MatchConfig::new().with_field_capacity(0);
    }
}
