//! Card definitions - static catalog data.
//!
//! `CardDefinition` holds the immutable properties of a catalog card:
//! name, type, attribute, level, ATK/DEF and effect text. These arrive
//! already normalized from the deck-import step.
//!
//! Instance-specific data (location, face, battle position, ATK changes)
//! is stored separately in `CardInstance`.

use serde::{Deserialize, Serialize};

/// `type_ability` keywords that mark a card as belonging to the extra deck.
pub const EXTRA_DECK_KEYWORDS: [&str; 4] = ["equilibrium", "chaos", "synchro", "xyz"];

/// Unique identifier for a card definition.
///
/// This identifies the catalog entry (e.g., "Dark Magician"),
/// not a specific copy in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Broad card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Monster,
    Spell,
    Trap,
    /// Created during play; never part of a deck list.
    Token,
}

impl CardType {
    /// Monsters and tokens carry ATK/DEF and can battle.
    #[must_use]
    pub const fn is_monster(self) -> bool {
        matches!(self, CardType::Monster | CardType::Token)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardId, CardType};
///
/// let dragon = CardDefinition::monster(CardId::new(1), "Blue-Eyes", 3000, 2500)
///     .with_attribute("LIGHT")
///     .with_level(8);
///
/// assert_eq!(dragon.atk, Some(3000));
/// assert_eq!(dragon.card_type, CardType::Monster);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    pub card_type: CardType,

    /// Monster attribute (LIGHT, DARK, ...).
    #[serde(default)]
    pub attribute: Option<String>,

    /// Level / star count.
    #[serde(default)]
    pub level: Option<u8>,

    /// Monster type and abilities line (e.g. "Dragon/Synchro").
    #[serde(default)]
    pub type_ability: Option<String>,

    #[serde(default)]
    pub effect: String,

    /// Monsters only.
    #[serde(default)]
    pub atk: Option<i32>,

    /// Monsters only.
    #[serde(default)]
    pub def: Option<i32>,

    #[serde(default)]
    pub art_link: Option<String>,

    /// Starts the match in the extra deck rather than the main deck.
    #[serde(default)]
    pub extra_deck: bool,
}

impl CardDefinition {
    /// Create a new card definition with no stats.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            attribute: None,
            level: None,
            type_ability: None,
            effect: String::new(),
            atk: None,
            def: None,
            art_link: None,
            extra_deck: false,
        }
    }

    /// Create a monster with ATK and DEF.
    #[must_use]
    pub fn monster(id: CardId, name: impl Into<String>, atk: i32, def: i32) -> Self {
        let mut card = Self::new(id, name, CardType::Monster);
        card.atk = Some(atk);
        card.def = Some(def);
        card
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = effect.into();
        self
    }

    #[must_use]
    pub fn with_art_link(mut self, link: impl Into<String>) -> Self {
        self.art_link = Some(link.into());
        self
    }

    /// Set the type/ability line.
    ///
    /// Cards whose line contains an extra deck keyword are flagged
    /// `extra_deck`.
    #[must_use]
    pub fn with_type_ability(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        let lower = line.to_lowercase();
        if EXTRA_DECK_KEYWORDS.iter().any(|k| lower.contains(k)) {
            self.extra_deck = true;
        }
        self.type_ability = Some(line);
        self
    }

    /// Force extra deck placement.
    #[must_use]
    pub fn in_extra_deck(mut self) -> Self {
        self.extra_deck = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_monster_builder() {
        let card = CardDefinition::monster(CardId::new(1), "Test Monster", 1800, 1000)
            .with_attribute("DARK")
            .with_level(4)
            .with_effect("Does nothing.")
            .with_art_link("https://example.invalid/art.png");

        assert_eq!(card.name, "Test Monster");
        assert_eq!(card.atk, Some(1800));
        assert_eq!(card.def, Some(1000));
        assert_eq!(card.attribute.as_deref(), Some("DARK"));
        assert_eq!(card.level, Some(4));
        assert!(card.card_type.is_monster());
        assert!(!card.extra_deck);
    }

    #[test]
    fn test_spell_has_no_stats() {
        let card = CardDefinition::new(CardId::new(2), "Pot", CardType::Spell);

        assert_eq!(card.atk, None);
        assert_eq!(card.def, None);
        assert!(!card.card_type.is_monster());
    }

    #[test]
    fn test_extra_deck_keywords() {
        let synchro = CardDefinition::monster(CardId::new(3), "Stardust", 2500, 2000)
            .with_type_ability("Dragon/Synchro/Effect");
        let normal = CardDefinition::monster(CardId::new(4), "Goblin", 1000, 1000)
            .with_type_ability("Warrior/Normal");

        assert!(synchro.extra_deck);
        assert!(!normal.extra_deck);
        assert!(CardDefinition::new(CardId::new(5), "X", CardType::Monster)
            .in_extra_deck()
            .extra_deck);
    }

    #[test]
    fn test_normalized_record_deserializes_with_defaults() {
        let json = r#"{ "id": 7, "name": "Mirror Force", "card_type": "Trap" }"#;
        let card: CardDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(card.id, CardId::new(7));
        assert_eq!(card.card_type, CardType::Trap);
        assert!(card.effect.is_empty());
        assert_eq!(card.atk, None);
    }
}
