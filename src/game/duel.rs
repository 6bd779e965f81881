//! The match authority.
//!
//! `Match` owns the only mutable copy of a duel's state: zones, life
//! points, turn-order resolution, turn state, clock, RNG and action log.
//! Every mutation goes through one of its methods, and each method either
//! succeeds completely or returns an error with the match unchanged.
//!
//! ## Lifecycle
//!
//! 1. `Match::new` validates both deck lists, deals cards into decks and
//!    extra decks, shuffles and draws opening hands.
//! 2. `resolve_turn_order` runs the mini-game; the winner calls `choose`.
//!    Turn 1 starts in `Draw`.
//! 3. Phase commands (`advance_phase`, `advance_to`, `end_turn`) and the
//!    clock (`tick_clock`) drive the turns. Entering `Draw` always runs
//!    exactly one automatic draw for the new active player.
//!
//! Phase and battle commands fail with `TurnOrderPending` before step 2
//! completes. Zone commands (draw, mill, move) are available throughout.

use im::Vector;
use tracing::{debug, info, warn};

use crate::cards::{BattlePosition, CardDefinition, CardInstance, CardRegistry, DeckList};
use crate::core::action::{ActionRecord, Command, Issuer};
use crate::core::config::{MatchConfig, ZoneKind, ZoneRef};
use crate::core::entity::EntityId;
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::{PlayerId, PlayerMap, SEATS};
use crate::core::rng::{CoinFace, GameRng, Randomizer};
use crate::core::state::{Phase, TurnState};
use crate::rules::battle::{resolve_attack, BattleReport, Combatant};
use crate::rules::clock::{ClockTick, MatchClock};
use crate::rules::turn::{self, AutoDraw, PhaseChange};
use crate::rules::turn_order::{TurnOrderDraw, TurnOrderResolver, TurnOrderStatus, WinnerRule};
use crate::zones::{Location, MillReport, Placement, ZoneStore};

/// Result of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Winner(PlayerId),
    /// Both players lost at the same time.
    Draw,
}

impl MatchResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, MatchResult::Winner(p) if *p == player)
    }
}

/// What a clock tick did to the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    /// Clock paused or already at zero.
    Idle,
    /// Seconds remaining after this tick.
    Running(u32),
    /// The clock ran out before turn order was resolved; no turn to end.
    Expired,
    /// The clock ran out and ended the turn.
    TurnEnded(PhaseChange),
}

/// A duel between two seats.
#[derive(Clone, Debug)]
pub struct Match {
    pub(crate) config: MatchConfig,
    pub(crate) registry: CardRegistry,
    pub(crate) zones: ZoneStore,
    pub(crate) life: PlayerMap<i64>,
    pub(crate) decked_out: PlayerMap<bool>,
    pub(crate) turn_order: TurnOrderResolver,
    pub(crate) turn: Option<TurnState>,
    pub(crate) clock: MatchClock,
    pub(crate) rng: GameRng,
    pub(crate) next_entity: EntityId,
    pub(crate) history: Vector<ActionRecord>,
}

impl Match {
    /// Set up a match from two deck lists, in seat order.
    ///
    /// Fails if either list names a card missing from `registry` or holds
    /// more than `config.max_copies` of one card.
    pub fn new(
        config: MatchConfig,
        registry: CardRegistry,
        decks: [DeckList; SEATS],
        rng: GameRng,
    ) -> EngineResult<Self> {
        for deck in &decks {
            deck.validate(&registry, config.max_copies)?;
        }

        let mut game = Self {
            zones: ZoneStore::new(config.field_capacity),
            life: PlayerMap::with_value(config.starting_life),
            decked_out: PlayerMap::with_default(),
            turn_order: TurnOrderResolver::new(),
            turn: None,
            clock: MatchClock::new(config.turn_seconds),
            next_entity: EntityId::FIRST,
            history: Vector::new(),
            config,
            registry,
            rng,
        };

        for (player, deck) in PlayerId::all().zip(decks.iter()) {
            for &card_id in &deck.cards {
                let in_extra = game.registry.get(card_id).is_some_and(|d| d.extra_deck);
                let kind = if in_extra {
                    ZoneKind::ExtraDeck
                } else {
                    ZoneKind::Deck
                };
                let entity = game.next_entity.next_id();
                game.zones.insert(entity, card_id, player, kind);
            }
        }

        for player in PlayerId::all() {
            if game.config.shuffle_on_start {
                game.zones.shuffle_deck(player, &mut game.rng);
            }
            for _ in 0..game.config.opening_hand {
                if game.zones.draw(player).is_err() {
                    break;
                }
            }
        }

        info!(
            seed = game.rng.seed(),
            cards = game.zones.total_cards(),
            "match created"
        );
        Ok(game)
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneStore {
        &self.zones
    }

    /// Current turn, or `None` before turn order is resolved.
    #[must_use]
    pub fn turn_state(&self) -> Option<TurnState> {
        self.turn
    }

    #[must_use]
    pub fn turn_order(&self) -> TurnOrderStatus {
        self.turn_order.status()
    }

    #[must_use]
    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    #[must_use]
    pub fn life(&self, player: PlayerId) -> i64 {
        self.life[player]
    }

    /// Every command that changed the match, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Seed of the match RNG, for replays.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn card(&self, entity: EntityId) -> Option<&CardInstance> {
        self.zones.card(entity)
    }

    /// Catalog definition of a card instance.
    #[must_use]
    pub fn definition_of(&self, entity: EntityId) -> Option<&CardDefinition> {
        let card = self.zones.card(entity)?;
        self.registry.get(card.card_id)
    }

    #[must_use]
    pub fn cards_in(&self, zone: ZoneRef) -> Vec<EntityId> {
        self.zones.cards_in(zone)
    }

    #[must_use]
    pub fn zone_size(&self, zone: ZoneRef) -> usize {
        self.zones.zone_size(zone)
    }

    /// Did this player fail an automatic draw?
    #[must_use]
    pub fn is_decked_out(&self, player: PlayerId) -> bool {
        self.decked_out[player]
    }

    /// Life at zero or decked out.
    #[must_use]
    pub fn is_defeated(&self, player: PlayerId) -> bool {
        self.life[player] == 0 || self.decked_out[player]
    }

    /// `Some` once at least one player is defeated.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        let lost: Vec<PlayerId> = PlayerId::all().filter(|&p| self.is_defeated(p)).collect();
        match lost.as_slice() {
            [] => None,
            [loser] => Some(MatchResult::Winner(loser.opponent())),
            _ => Some(MatchResult::Draw),
        }
    }

    fn current_turn(&self) -> EngineResult<TurnState> {
        self.turn.ok_or(EngineError::TurnOrderPending)
    }

    fn record(&mut self, issuer: Issuer, command: Command) {
        let turn = self.turn.map_or(0, |t| t.turn_number);
        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(issuer, command, turn, sequence));
    }

    // === Turn order ===

    /// Run the turn-order mini-game with the match RNG.
    pub fn resolve_turn_order(&mut self, rule: &dyn WinnerRule) -> EngineResult<TurnOrderDraw> {
        let draw = self.turn_order.resolve(rule, &mut self.rng)?;
        self.record(
            Issuer::Engine,
            Command::ResolveTurnOrder {
                method: draw.method,
                winner: draw.winner,
            },
        );
        Ok(draw)
    }

    /// The mini-game winner picks first or second; turn 1 begins.
    ///
    /// Returns the outcome of turn 1's automatic draw.
    pub fn choose(&mut self, player: PlayerId, go_first: bool) -> EngineResult<AutoDraw> {
        let first_player = self.turn_order.choose(player, go_first)?;
        let state = TurnState::first_turn(first_player);
        self.turn = Some(state);
        self.record(
            Issuer::Player(player),
            Command::ChooseTurnOrder {
                go_first,
                first_player,
            },
        );

        self.start_turn_clock();
        let auto_draw = if self.config.draw_on_first_turn {
            self.auto_draw(first_player)
        } else {
            AutoDraw::Skipped
        };
        info!(player = %first_player, "turn 1 begins");
        Ok(auto_draw)
    }

    // === Phases ===

    /// Move to the next phase, or to the next turn from `End`.
    pub fn advance_phase(&mut self, issuer: impl Into<Issuer>) -> EngineResult<PhaseChange> {
        let from = self.current_turn()?;
        Ok(self.apply_transition(issuer.into(), from, turn::advance(&from)))
    }

    /// Skip forward to `target` within the turn (`Draw` ends the turn).
    pub fn advance_to(
        &mut self,
        issuer: impl Into<Issuer>,
        target: Phase,
    ) -> EngineResult<PhaseChange> {
        let from = self.current_turn()?;
        let to = turn::advance_to(&from, target)?;
        Ok(self.apply_transition(issuer.into(), from, to))
    }

    /// End the current turn from any phase.
    pub fn end_turn(&mut self, issuer: impl Into<Issuer>) -> EngineResult<PhaseChange> {
        let from = self.current_turn()?;
        Ok(self.apply_transition(issuer.into(), from, turn::next_turn(&from)))
    }

    /// End turn `turn_number`, unless it already ended.
    ///
    /// Both a player and the clock may try to end the same turn; only the
    /// first one succeeds and the other gets `StaleTurn`.
    pub fn end_turn_at(
        &mut self,
        issuer: impl Into<Issuer>,
        turn_number: u32,
    ) -> EngineResult<PhaseChange> {
        let from = self.current_turn()?;
        if from.turn_number != turn_number {
            return Err(EngineError::StaleTurn {
                expected: turn_number,
                actual: from.turn_number,
            });
        }
        self.end_turn(issuer)
    }

    fn apply_transition(&mut self, issuer: Issuer, from: TurnState, to: TurnState) -> PhaseChange {
        self.turn = Some(to);

        if to.turn_number != from.turn_number {
            self.record(
                issuer,
                Command::EndTurn {
                    next_player: to.active_player,
                    turn_number: to.turn_number,
                },
            );
            info!(
                issuer = %issuer,
                turn = to.turn_number,
                player = %to.active_player,
                "turn begins"
            );
            self.start_turn_clock();
        } else {
            self.record(
                issuer,
                Command::AdvancePhase {
                    from: from.phase,
                    to: to.phase,
                },
            );
            debug!(issuer = %issuer, from = %from.phase, to = %to.phase, "phase advanced");
        }

        let auto_draw = (to.phase == Phase::Draw).then(|| self.auto_draw(to.active_player));
        PhaseChange { from, to, auto_draw }
    }

    fn auto_draw(&mut self, player: PlayerId) -> AutoDraw {
        match self.zones.draw(player) {
            Ok(card) => {
                self.record(Issuer::Engine, Command::Draw { player, card });
                AutoDraw::Drew(card)
            }
            Err(_) => {
                warn!(player = %player, "decked out on automatic draw");
                self.decked_out[player] = true;
                AutoDraw::DeckEmpty(player)
            }
        }
    }

    // === Clock ===

    fn start_turn_clock(&mut self) {
        self.clock.reset(self.config.turn_seconds);
        if self.config.auto_start_clock {
            self.clock.start();
        } else {
            self.clock.pause();
        }
    }

    /// Elapse one second; on expiry the current turn ends.
    pub fn tick_clock(&mut self) -> ClockEvent {
        match self.clock.tick() {
            ClockTick::Idle => ClockEvent::Idle,
            ClockTick::Running(left) => ClockEvent::Running(left),
            ClockTick::Expired => {
                info!(turn = ?self.turn.map(|t| t.turn_number), "clock expired");
                match self.end_turn(Issuer::Clock) {
                    Ok(change) => ClockEvent::TurnEnded(change),
                    Err(_) => ClockEvent::Expired,
                }
            }
        }
    }

    /// Returns whether the clock is running afterwards.
    pub fn start_clock(&mut self, issuer: impl Into<Issuer>) -> bool {
        let running = self.clock.start();
        if running {
            self.record(issuer.into(), Command::StartClock);
        }
        running
    }

    pub fn pause_clock(&mut self, issuer: impl Into<Issuer>) {
        self.clock.pause();
        self.record(issuer.into(), Command::PauseClock);
    }

    pub fn reset_clock(&mut self, issuer: impl Into<Issuer>, seconds: u32) {
        self.clock.reset(seconds);
        self.record(issuer.into(), Command::ResetClock { seconds });
    }

    // === Zones ===

    /// Draw one card outside the automatic Draw-phase draw.
    pub fn draw(&mut self, issuer: impl Into<Issuer>, player: PlayerId) -> EngineResult<EntityId> {
        let card = self.zones.draw(player)?;
        self.record(issuer.into(), Command::Draw { player, card });
        Ok(card)
    }

    pub fn mill(&mut self, issuer: impl Into<Issuer>, player: PlayerId, count: usize) -> MillReport {
        let report = self.zones.mill(player, count);
        self.record(
            issuer.into(),
            Command::Mill {
                player,
                requested: count,
                milled: report.milled.len(),
            },
        );
        report
    }

    /// Move a card between zones (see `ZoneStore::move_card`).
    pub fn move_card(
        &mut self,
        issuer: impl Into<Issuer>,
        card: EntityId,
        from: ZoneRef,
        to: ZoneRef,
        placement: Placement,
    ) -> EngineResult<Location> {
        let before = self.zones.location(card);
        let location = self.zones.move_card(card, from, to, placement, &mut self.rng)?;
        if before != Some(location) {
            self.record(
                issuer.into(),
                Command::Move {
                    card,
                    from,
                    to,
                    placement,
                },
            );
        }
        Ok(location)
    }

    /// Return a banished card to play.
    pub fn recover(
        &mut self,
        issuer: impl Into<Issuer>,
        card: EntityId,
        to: ZoneRef,
        placement: Placement,
    ) -> EngineResult<Location> {
        let location = self.zones.recover(card, to, placement, &mut self.rng)?;
        self.record(issuer.into(), Command::Recover { card, to });
        Ok(location)
    }

    pub fn shuffle_deck(&mut self, issuer: impl Into<Issuer>, player: PlayerId) {
        self.zones.shuffle_deck(player, &mut self.rng);
        self.record(issuer.into(), Command::ShuffleDeck { player });
    }

    /// Put a new token onto `owner`'s field during a main phase.
    ///
    /// The token's definition joins the catalog the first time it is used.
    pub fn create_token(
        &mut self,
        issuer: impl Into<Issuer>,
        owner: PlayerId,
        definition: CardDefinition,
        slot: usize,
    ) -> EngineResult<EntityId> {
        let turn = self.current_turn()?;
        if !turn.phase.is_main() {
            return Err(EngineError::NotMainPhase(turn.phase));
        }

        let entity = self.next_entity;
        self.zones.insert_token(entity, definition.id, owner, slot)?;
        self.next_entity.next_id();
        self.registry.register_if_absent(definition);

        self.record(
            issuer.into(),
            Command::CreateToken {
                card: entity,
                owner,
                slot,
            },
        );
        Ok(entity)
    }

    fn field_card_mut(&mut self, card: EntityId) -> EngineResult<&mut CardInstance> {
        let instance = self.zones.card_mut(card).ok_or(EngineError::UnknownCard(card))?;
        if instance.location().zone.kind != ZoneKind::Field {
            return Err(EngineError::NotOnField(card));
        }
        Ok(instance)
    }

    pub fn set_face_down(
        &mut self,
        issuer: impl Into<Issuer>,
        card: EntityId,
        face_down: bool,
    ) -> EngineResult<()> {
        self.field_card_mut(card)?.face_down = face_down;
        self.record(issuer.into(), Command::SetFaceDown { card, face_down });
        Ok(())
    }

    pub fn change_position(
        &mut self,
        issuer: impl Into<Issuer>,
        card: EntityId,
        position: BattlePosition,
    ) -> EngineResult<()> {
        self.field_card_mut(card)?.position = position;
        self.record(issuer.into(), Command::ChangePosition { card, position });
        Ok(())
    }

    /// Override a field card's ATK. Cleared when the card leaves the field.
    pub fn set_atk(&mut self, issuer: impl Into<Issuer>, card: EntityId, atk: i32) -> EngineResult<()> {
        self.field_card_mut(card)?.atk_override = Some(atk);
        self.record(issuer.into(), Command::SetAtk { card, atk });
        Ok(())
    }

    // === Life ===

    /// Add `delta` (negative for damage) to a player's life, stopping at 0.
    ///
    /// Returns the new total.
    pub fn adjust_life(&mut self, issuer: impl Into<Issuer>, player: PlayerId, delta: i64) -> i64 {
        let life = self.life[player].saturating_add(delta).max(0);
        self.write_life(issuer.into(), player, delta, life)
    }

    pub fn set_life(&mut self, issuer: impl Into<Issuer>, player: PlayerId, life: i64) -> i64 {
        let life = life.max(0);
        let delta = life.saturating_sub(self.life[player]);
        self.write_life(issuer.into(), player, delta, life)
    }

    fn write_life(&mut self, issuer: Issuer, player: PlayerId, delta: i64, life: i64) -> i64 {
        self.life[player] = life;
        self.record(issuer, Command::AdjustLife { player, delta, life });
        if life == 0 {
            info!(player = %player, "life points reached zero");
        }
        life
    }

    // === Battle ===

    fn combatant(&self, card: EntityId) -> EngineResult<Combatant> {
        let instance = self.zones.card(card).ok_or(EngineError::UnknownCard(card))?;
        let zone = instance.location().zone;
        if zone.kind != ZoneKind::Field {
            return Err(EngineError::NotOnField(card));
        }
        let definition = self.registry.get(instance.card_id);
        Ok(Combatant {
            entity: card,
            controller: zone.owner,
            atk: instance.effective_atk(definition.and_then(|d| d.atk)),
            def: definition.and_then(|d| d.def).unwrap_or(0),
            position: instance.position,
        })
    }

    /// Declare an attack and compute its outcome.
    ///
    /// The attacker must be on `player`'s field, face-up and in Attack
    /// position; the target, if any, on the opponent's field. Nothing is
    /// applied until `apply_battle`.
    pub fn attack(
        &mut self,
        player: PlayerId,
        attacker: EntityId,
        target: Option<EntityId>,
    ) -> EngineResult<BattleReport> {
        let turn = self.current_turn()?;
        if turn.phase != Phase::Battle {
            return Err(EngineError::NotBattlePhase(turn.phase));
        }

        let striker = self.combatant(attacker)?;
        if striker.controller != player {
            return Err(EngineError::NotOnField(attacker));
        }
        let face_down = self.zones.card(attacker).is_some_and(|c| c.face_down);
        if face_down || striker.position != BattlePosition::Attack {
            return Err(EngineError::CannotAttack(attacker));
        }

        let defender = match target {
            Some(target) => {
                let defender = self.combatant(target)?;
                if defender.controller != player.opponent() {
                    return Err(EngineError::NotOnField(target));
                }
                Some(defender)
            }
            None => None,
        };

        let report = resolve_attack(&striker, defender.as_ref());
        self.record(Issuer::Player(player), Command::Attack { attacker, target });
        debug!(attacker = %attacker, target = ?target, damage = ?report.damage, "attack declared");
        Ok(report)
    }

    /// Apply a battle: deal the damage and send destroyed monsters to
    /// their owners' dead zones.
    pub fn apply_battle(
        &mut self,
        issuer: impl Into<Issuer>,
        report: &BattleReport,
    ) -> EngineResult<()> {
        let issuer = issuer.into();

        let mut moves = Vec::with_capacity(report.destroyed.len());
        for &card in &report.destroyed {
            let instance = self.zones.card(card).ok_or(EngineError::UnknownCard(card))?;
            let from = instance.location().zone;
            if from.kind != ZoneKind::Field {
                return Err(EngineError::NotOnField(card));
            }
            moves.push((card, from, ZoneRef::new(instance.owner, ZoneKind::DeadZone)));
        }

        for (card, from, to) in moves {
            self.move_card(issuer, card, from, to, Placement::Auto)?;
        }
        if let Some(damage) = report.damage {
            self.adjust_life(issuer, damage.player, -damage.amount);
        }
        Ok(())
    }

    // === Randomizer actions ===

    pub fn roll_dice(&mut self, issuer: impl Into<Issuer>) -> u8 {
        let result = self.rng.roll_dice();
        self.record(issuer.into(), Command::RollDice { result });
        result
    }

    pub fn flip_coin(&mut self, issuer: impl Into<Issuer>) -> CoinFace {
        let result = self.rng.flip_coin();
        self.record(issuer.into(), Command::FlipCoin { result });
        result
    }
}
