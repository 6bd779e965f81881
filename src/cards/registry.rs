//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores the catalog for a match. It provides fast
//! lookup by `CardId` and supports iteration.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::monster(CardId::new(1), "Kuriboh", 300, 200));
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Kuriboh");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from normalized catalog records.
    ///
    /// Panics on duplicate IDs, like `register`.
    pub fn from_definitions(cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card);
        }
        registry
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Register a card unless its ID is already taken.
    ///
    /// Returns `true` if the definition was added. Token definitions go
    /// through here since the same token kind is created repeatedly.
    pub fn register_if_absent(&mut self, card: CardDefinition) -> bool {
        if self.cards.contains_key(&card.id) {
            return false;
        }
        self.cards.insert(card.id, card);
        true
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "Test Card", CardType::Spell));

        assert_eq!(registry.get(CardId::new(1)).map(|c| c.name.as_str()), Some("Test Card"));
        assert!(registry.get(CardId::new(99)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();

        registry.register(CardDefinition::new(CardId::new(1), "Card A", CardType::Spell));
        registry.register(CardDefinition::new(CardId::new(1), "Card B", CardType::Spell));
    }

    #[test]
    fn test_register_if_absent() {
        let mut registry = CardRegistry::new();
        let token = CardDefinition::monster(CardId::new(500), "Sheep Token", 0, 0);

        assert!(registry.register_if_absent(token.clone()));
        assert!(!registry.register_if_absent(token));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_contains() {
        let registry = CardRegistry::from_definitions([CardDefinition::new(
            CardId::new(1),
            "Test",
            CardType::Trap,
        )]);

        assert!(registry.contains(CardId::new(1)));
        assert!(!registry.contains(CardId::new(99)));
        assert!(!registry.is_empty());
    }
}
