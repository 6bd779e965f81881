//! Deck lists.
//!
//! A `DeckList` is the already-normalized list of catalog IDs a player
//! brings to a match. `validate` enforces the copy limit and checks every
//! ID against the catalog before any card enters a zone.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::CardId;
use super::registry::CardRegistry;
use crate::core::error::{EngineError, EngineResult};

/// A player's deck list, main and extra deck together.
///
/// ```
/// use duel_engine::cards::{CardId, DeckList};
///
/// let deck = DeckList::new()
///     .with_copies(CardId::new(1), 3)
///     .with_card(CardId::new(2));
///
/// assert_eq!(deck.len(), 4);
/// assert_eq!(deck.copies_of(CardId::new(1)), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub cards: Vec<CardId>,
}

impl DeckList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.cards.push(card);
        self
    }

    #[must_use]
    pub fn with_copies(mut self, card: CardId, copies: usize) -> Self {
        self.cards.extend(std::iter::repeat(card).take(copies));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of copies of `card` in the list.
    #[must_use]
    pub fn copies_of(&self, card: CardId) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Check the list against the catalog and the copy limit.
    ///
    /// Reports the first offending card in list order.
    pub fn validate(&self, registry: &CardRegistry, max_copies: usize) -> EngineResult<()> {
        let mut counts: FxHashMap<CardId, usize> = FxHashMap::default();

        for &card in &self.cards {
            if !registry.contains(card) {
                return Err(EngineError::UnknownCatalogCard(card));
            }
            *counts.entry(card).or_default() += 1;
        }

        for &card in &self.cards {
            let count = counts[&card];
            if count > max_copies {
                return Err(EngineError::TooManyCopies {
                    card,
                    count,
                    limit: max_copies,
                });
            }
        }

        Ok(())
    }
}
