//! Card system: catalog definitions, match instances, registry, deck lists.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for catalog entries
//! - `CardDefinition`: Static catalog data (name, type, ATK/DEF, ...)
//! - `CardInstance`: One copy of a card in a match
//! - `CardRegistry`: Catalog lookup
//! - `DeckList`: A player's deck before the match starts

pub mod definition;
pub mod instance;
pub mod registry;
pub mod deck;

pub use definition::{CardDefinition, CardId, CardType, EXTRA_DECK_KEYWORDS};
pub use instance::{BattlePosition, CardInstance};
pub use registry::CardRegistry;
pub use deck::DeckList;
