//! Card instance identification.
//!
//! Every card that enters a match (deck cards, extra deck cards, tokens)
//! gets a unique `EntityId`. The catalog identifier (`CardId`) says *what*
//! the card is; the `EntityId` says *which copy* it is. Two copies of the
//! same catalog card in one deck have the same `CardId` and different
//! `EntityId`s.
//!
//! ```
//! use duel_engine::core::EntityId;
//!
//! let mut alloc = EntityId::FIRST;
//! let a = alloc.next_id();
//! let b = alloc.next_id();
//! assert_ne!(a, b);
//! assert_eq!(b.raw(), a.raw() + 1);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The first id handed out in a fresh match.
    pub const FIRST: EntityId = EntityId(1);

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Return the current id and advance `self` to the following one.
    ///
    /// Used as a monotonic allocator: ids are never reused, so a card that
    /// was banished or destroyed can never be confused with a new token.
    pub fn next_id(&mut self) -> EntityId {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_monotonic() {
        let mut alloc = EntityId::FIRST;
        let ids: Vec<_> = (0..5).map(|_| alloc.next_id()).collect();

        assert_eq!(ids[0], EntityId(1));
        assert_eq!(ids[4], EntityId(5));
        assert_eq!(alloc, EntityId(6));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
