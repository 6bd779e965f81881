//! Zone store: card ownership and movement.
//!
//! The `ZoneStore` owns every `CardInstance` in a match together with the
//! per-player membership lists of each zone. It supports:
//! - Ordered decks with top/bottom/index/shuffled insertion
//! - Unordered zones (hand, extra deck, dead zone, banished)
//! - A slotted field with fixed capacity
//! - Draw, mill and validated moves between zones
//!
//! Each operation validates first and mutates second, so a failed call
//! leaves the store exactly as it was and a successful one never exposes
//! a card that is in two zones or in none.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::cards::{CardId, CardInstance};
use crate::core::config::{ZoneKind, ZoneRef};
use crate::core::entity::EntityId;
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::{PlayerId, PlayerMap, SEATS};
use crate::core::rng::GameRng;

/// Where a card is.
///
/// `slot` is set for field cards only. Deck position is derived from the
/// deck order (`ZoneStore::deck_position`) rather than stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub zone: ZoneRef,
    pub slot: Option<usize>,
}

impl Location {
    #[must_use]
    pub const fn unslotted(zone: ZoneRef) -> Self {
        Self { zone, slot: None }
    }

    #[must_use]
    pub const fn in_slot(zone: ZoneRef, slot: usize) -> Self {
        Self { zone, slot: Some(slot) }
    }
}

/// Where to put a card in its destination zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// Zone default: top of deck, end of unordered zones.
    #[default]
    Auto,
    /// A field slot; for decks, an index counted from the bottom.
    Slot(usize),
    DeckTop,
    DeckBottom,
    /// Add to the deck, then shuffle it.
    DeckShuffled,
}

/// Outcome of a mill.
///
/// Milling past the end of the deck is not an error: the report records
/// how many cards were actually moved and the shortfall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillReport {
    pub player: PlayerId,
    pub requested: usize,
    /// Milled cards, in the order they left the deck.
    pub milled: SmallVec<[EntityId; 8]>,
}

impl MillReport {
    /// Cards requested but not available.
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.requested - self.milled.len()
    }

    /// Did the deck run out before the mill completed?
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.shortfall() > 0
    }
}

/// Membership lists of one player's zones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PlayerZones {
    /// Index 0 is the bottom, the last entry is the top.
    deck: Vec<EntityId>,
    extra_deck: Vec<EntityId>,
    hand: Vec<EntityId>,
    field: Vec<Option<EntityId>>,
    dead_zone: Vec<EntityId>,
    banished: Vec<EntityId>,
}

impl PlayerZones {
    fn new(field_capacity: usize) -> Self {
        Self {
            deck: Vec::new(),
            extra_deck: Vec::new(),
            hand: Vec::new(),
            field: vec![None; field_capacity],
            dead_zone: Vec::new(),
            banished: Vec::new(),
        }
    }

    /// The list backing an unslotted zone.
    fn list(&self, kind: ZoneKind) -> &Vec<EntityId> {
        match kind {
            ZoneKind::Deck => &self.deck,
            ZoneKind::ExtraDeck => &self.extra_deck,
            ZoneKind::Hand => &self.hand,
            ZoneKind::DeadZone => &self.dead_zone,
            ZoneKind::Banished => &self.banished,
            ZoneKind::Field => unreachable!("field is slotted"),
        }
    }

    fn list_mut(&mut self, kind: ZoneKind) -> &mut Vec<EntityId> {
        match kind {
            ZoneKind::Deck => &mut self.deck,
            ZoneKind::ExtraDeck => &mut self.extra_deck,
            ZoneKind::Hand => &mut self.hand,
            ZoneKind::DeadZone => &mut self.dead_zone,
            ZoneKind::Banished => &mut self.banished,
            ZoneKind::Field => unreachable!("field is slotted"),
        }
    }

    fn members(&self, kind: ZoneKind) -> Vec<EntityId> {
        if kind == ZoneKind::Field {
            self.field.iter().flatten().copied().collect()
        } else {
            self.list(kind).clone()
        }
    }
}

/// Owns every card instance and the zone membership lists.
///
/// ## Usage
///
/// ```
/// use duel_engine::cards::CardId;
/// use duel_engine::core::{EntityId, PlayerId, ZoneKind, ZoneRef};
/// use duel_engine::zones::ZoneStore;
///
/// let player = PlayerId::FIRST_SEAT;
/// let mut store = ZoneStore::new(5);
/// store.insert(EntityId(1), CardId::new(10), player, ZoneKind::Deck);
/// store.insert(EntityId(2), CardId::new(11), player, ZoneKind::Deck);
///
/// // The last card inserted is on top.
/// assert_eq!(store.draw(player), Ok(EntityId(2)));
/// assert_eq!(store.zone_size(ZoneRef::new(player, ZoneKind::Hand)), 1);
/// assert!(store.check_integrity().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStore {
    cards: FxHashMap<EntityId, CardInstance>,
    zones: PlayerMap<PlayerZones>,
    field_capacity: usize,
}

impl ZoneStore {
    /// Create an empty store with `field_capacity` field slots per player.
    #[must_use]
    pub fn new(field_capacity: usize) -> Self {
        Self {
            cards: FxHashMap::default(),
            zones: PlayerMap::new(|_| PlayerZones::new(field_capacity)),
            field_capacity,
        }
    }

    /// Number of field slots per player.
    #[must_use]
    pub fn field_capacity(&self) -> usize {
        self.field_capacity
    }

    // === Setup ===

    /// Put a new card into an unslotted zone of its owner.
    ///
    /// Decks receive the card on top. Panics if the entity already exists
    /// or `kind` is the field (use `insert_token` for field placement).
    pub fn insert(&mut self, entity: EntityId, card_id: CardId, owner: PlayerId, kind: ZoneKind) {
        assert!(kind != ZoneKind::Field, "Cards enter the field through a slot");
        if self.cards.contains_key(&entity) {
            panic!("Entity {:?} already exists in zone store", entity);
        }

        let zone = ZoneRef::new(owner, kind);
        self.zones[owner].list_mut(kind).push(entity);
        self.cards
            .insert(entity, CardInstance::new(entity, card_id, owner, Location::unslotted(zone)));
    }

    /// Create a token directly in a field slot.
    ///
    /// Panics if the entity already exists.
    pub fn insert_token(
        &mut self,
        entity: EntityId,
        card_id: CardId,
        owner: PlayerId,
        slot: usize,
    ) -> EngineResult<Location> {
        if self.cards.contains_key(&entity) {
            panic!("Entity {:?} already exists in zone store", entity);
        }
        self.check_slot_free(owner, slot)?;

        let location = Location::in_slot(ZoneRef::new(owner, ZoneKind::Field), slot);
        self.zones[owner].field[slot] = Some(entity);
        self.cards
            .insert(entity, CardInstance::token(entity, card_id, owner, location));

        debug!(card = %entity, player = %owner, slot, "token created");
        Ok(location)
    }

    // === Primitives ===

    /// Move the top card of `player`'s deck to their hand.
    pub fn draw(&mut self, player: PlayerId) -> EngineResult<EntityId> {
        let Some(entity) = self.zones[player].deck.pop() else {
            warn!(player = %player, "draw from empty deck");
            return Err(EngineError::DeckEmpty { player });
        };

        let hand = ZoneRef::new(player, ZoneKind::Hand);
        self.zones[player].hand.push(entity);
        self.set_location(entity, Location::unslotted(hand));

        debug!(player = %player, card = %entity, "drew card");
        Ok(entity)
    }

    /// Move up to `count` cards from the top of the deck to the dead zone.
    pub fn mill(&mut self, player: PlayerId, count: usize) -> MillReport {
        let dead_zone = ZoneRef::new(player, ZoneKind::DeadZone);
        let mut milled = SmallVec::new();

        for _ in 0..count {
            let Some(entity) = self.zones[player].deck.pop() else {
                break;
            };
            self.zones[player].dead_zone.push(entity);
            self.set_location(entity, Location::unslotted(dead_zone));
            milled.push(entity);
        }

        let report = MillReport {
            player,
            requested: count,
            milled,
        };
        if report.is_partial() {
            warn!(
                player = %player,
                requested = count,
                milled = report.milled.len(),
                "mill ran out of cards"
            );
        } else {
            debug!(player = %player, count, "milled cards");
        }
        report
    }

    /// Move a card between zones.
    ///
    /// `from` must be the card's current zone. Field destinations need
    /// `Placement::Slot` naming a free slot. When `from` and `to` are the
    /// same zone the card stays where it is and the call succeeds.
    ///
    /// Returns the card's new location.
    pub fn move_card(
        &mut self,
        entity: EntityId,
        from: ZoneRef,
        to: ZoneRef,
        placement: Placement,
        rng: &mut GameRng,
    ) -> EngineResult<Location> {
        let current = self.location(entity).ok_or(EngineError::UnknownCard(entity))?;

        if current.zone != from {
            return Err(EngineError::CardNotInZone { card: entity, zone: from });
        }
        if current.zone == to {
            return Ok(current);
        }
        if from.kind == ZoneKind::Banished {
            return Err(EngineError::CardBanished(entity));
        }

        self.transfer(entity, current, to, placement, rng)
    }

    /// Bring a banished card back into play.
    ///
    /// The only path out of the banished zone.
    pub fn recover(
        &mut self,
        entity: EntityId,
        to: ZoneRef,
        placement: Placement,
        rng: &mut GameRng,
    ) -> EngineResult<Location> {
        let current = self.location(entity).ok_or(EngineError::UnknownCard(entity))?;
        if current.zone.kind != ZoneKind::Banished {
            return Err(EngineError::CardNotInZone {
                card: entity,
                zone: ZoneRef::new(current.zone.owner, ZoneKind::Banished),
            });
        }
        if current.zone == to {
            return Ok(current);
        }

        self.transfer(entity, current, to, placement, rng)
    }

    /// Shuffle a player's deck.
    pub fn shuffle_deck(&mut self, player: PlayerId, rng: &mut GameRng) {
        rng.shuffle(&mut self.zones[player].deck);
    }

    /// Validate the destination, then detach and attach.
    fn transfer(
        &mut self,
        entity: EntityId,
        current: Location,
        to: ZoneRef,
        placement: Placement,
        rng: &mut GameRng,
    ) -> EngineResult<Location> {
        let destination = if to.kind.is_slotted() {
            let Placement::Slot(slot) = placement else {
                return Err(EngineError::SlotRequired);
            };
            self.check_slot_free(to.owner, slot)?;
            Location::in_slot(to, slot)
        } else {
            Location::unslotted(to)
        };

        // Validation done; from here on the move cannot fail.
        self.detach(entity, current);
        self.attach(entity, destination, placement, rng);
        self.set_location(entity, destination);

        if current.zone.kind == ZoneKind::Field {
            if let Some(card) = self.cards.get_mut(&entity) {
                card.clear_field_state();
            }
        }

        debug!(card = %entity, from = %current.zone, to = %to, "moved card");
        Ok(destination)
    }

    fn check_slot_free(&self, owner: PlayerId, slot: usize) -> EngineResult<()> {
        let field = &self.zones[owner].field;
        match field.get(slot) {
            None => Err(EngineError::SlotOutOfRange {
                slot,
                capacity: self.field_capacity,
            }),
            Some(Some(occupant)) => Err(EngineError::SlotOccupied {
                slot,
                occupant: *occupant,
            }),
            Some(None) => Ok(()),
        }
    }

    fn detach(&mut self, entity: EntityId, location: Location) {
        let zones = &mut self.zones[location.zone.owner];
        if location.zone.kind == ZoneKind::Field {
            if let Some(slot) = location.slot {
                zones.field[slot] = None;
            }
        } else {
            // Keep the remaining order stable; iteration order is observable.
            zones.list_mut(location.zone.kind).retain(|&e| e != entity);
        }
    }

    fn attach(&mut self, entity: EntityId, location: Location, placement: Placement, rng: &mut GameRng) {
        let zones = &mut self.zones[location.zone.owner];
        let kind = location.zone.kind;
        if kind.is_slotted() {
            if let Some(slot) = location.slot {
                zones.field[slot] = Some(entity);
            }
            return;
        }

        let list = zones.list_mut(kind);
        if !kind.is_ordered() {
            list.push(entity);
            return;
        }
        // Ordered zones keep the top at the end.
        match placement {
            Placement::DeckBottom => list.insert(0, entity),
            Placement::Slot(i) => {
                let idx = i.min(list.len());
                list.insert(idx, entity);
            }
            Placement::DeckShuffled => {
                list.push(entity);
                rng.shuffle(list);
            }
            Placement::Auto | Placement::DeckTop => list.push(entity),
        }
    }

    fn set_location(&mut self, entity: EntityId, location: Location) {
        if let Some(card) = self.cards.get_mut(&entity) {
            card.location = location;
        }
    }

    // === Queries ===

    /// Get a card instance.
    #[must_use]
    pub fn card(&self, entity: EntityId) -> Option<&CardInstance> {
        self.cards.get(&entity)
    }

    /// Mutable access for field-state changes. Location is not writable.
    pub(crate) fn card_mut(&mut self, entity: EntityId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&entity)
    }

    /// Get where a card is.
    #[must_use]
    pub fn location(&self, entity: EntityId) -> Option<Location> {
        self.cards.get(&entity).map(|c| c.location)
    }

    /// Check if a card is in a specific zone.
    #[must_use]
    pub fn is_in_zone(&self, entity: EntityId, zone: ZoneRef) -> bool {
        self.location(entity).is_some_and(|l| l.zone == zone)
    }

    /// Cards in a zone.
    ///
    /// Decks are listed bottom to top; the field lists occupied slots in
    /// slot order; other zones list cards in arrival order.
    #[must_use]
    pub fn cards_in(&self, zone: ZoneRef) -> Vec<EntityId> {
        self.zones[zone.owner].members(zone.kind)
    }

    /// Field slots of a player, `None` for empty slots.
    #[must_use]
    pub fn field_slots(&self, player: PlayerId) -> &[Option<EntityId>] {
        &self.zones[player].field
    }

    /// Number of cards in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: ZoneRef) -> usize {
        let zones = &self.zones[zone.owner];
        if zone.kind == ZoneKind::Field {
            zones.field.iter().flatten().count()
        } else {
            zones.list(zone.kind).len()
        }
    }

    /// Top card of a player's deck.
    #[must_use]
    pub fn deck_top(&self, player: PlayerId) -> Option<EntityId> {
        self.zones[player].deck.last().copied()
    }

    /// Position of a card in its owner's deck, 0 being the top.
    #[must_use]
    pub fn deck_position(&self, entity: EntityId) -> Option<usize> {
        let location = self.location(entity)?;
        if location.zone.kind != ZoneKind::Deck {
            return None;
        }
        let deck = &self.zones[location.zone.owner].deck;
        deck.iter().rev().position(|&e| e == entity)
    }

    /// Total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Iterate over every card instance (unordered).
    pub fn cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.cards.values()
    }

    /// Verify that every card is listed in exactly one zone and that the
    /// listing agrees with the card's recorded location.
    pub fn check_integrity(&self) -> Result<(), String> {
        let mut seen: FxHashMap<EntityId, Location> = FxHashMap::default();

        for (owner, zones) in self.zones.iter() {
            if zones.field.len() != self.field_capacity {
                return Err(format!("{} field has {} slots", owner, zones.field.len()));
            }

            for kind in ZoneKind::ALL {
                let zone = ZoneRef::new(owner, kind);
                let listed: Vec<(EntityId, Option<usize>)> = if kind == ZoneKind::Field {
                    zones
                        .field
                        .iter()
                        .enumerate()
                        .filter_map(|(slot, e)| e.map(|e| (e, Some(slot))))
                        .collect()
                } else {
                    zones.list(kind).iter().map(|&e| (e, None)).collect()
                };

                for (entity, slot) in listed {
                    let listed_at = Location { zone, slot };
                    if let Some(previous) = seen.insert(entity, listed_at) {
                        return Err(format!(
                            "{} listed in both {} and {}",
                            entity, previous.zone, zone
                        ));
                    }
                    match self.cards.get(&entity) {
                        None => return Err(format!("{} listed in {} but unknown", entity, zone)),
                        Some(card) if card.owner.index() >= SEATS => {
                            return Err(format!("{} owned by unknown {}", entity, card.owner));
                        }
                        Some(card) if card.location != listed_at => {
                            return Err(format!(
                                "{} listed at {:?} but records {:?}",
                                entity, listed_at, card.location
                            ));
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        if seen.len() != self.cards.len() {
            return Err(format!(
                "{} cards tracked but {} listed in zones",
                self.cards.len(),
                seen.len()
            ));
        }
        Ok(())
    }
}
