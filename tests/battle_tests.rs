//! Battle, token and field-state integration tests.
//!
//! These tests verify:
//! - Attacks are declared only in the Battle phase by face-up attackers
//! - Battle damage and destruction are applied through the match
//! - Tokens appear on the field during main phases only

use duel_engine::cards::{BattlePosition, CardDefinition, CardId, CardRegistry, DeckList};
use duel_engine::core::{EngineError, EntityId, GameRng, MatchConfig, Phase, PlayerId, ZoneKind, ZoneRef};
use duel_engine::game::{Match, MatchResult};
use duel_engine::rules::{BattleDamage, MiniGameWin};
use duel_engine::zones::Placement;

const P0: PlayerId = PlayerId::FIRST_SEAT;
const P1: PlayerId = PlayerId::SECOND_SEAT;

const SOLDIER: CardId = CardId::new(1);
const WALL: CardId = CardId::new(2);

fn registry() -> CardRegistry {
    CardRegistry::from_definitions([
        CardDefinition::monster(SOLDIER, "Soldier", 1800, 1000),
        CardDefinition::monster(WALL, "Wall", 500, 2000),
    ])
}

/// Both players hold 3 Soldiers and 3 Walls in hand; P0 is in Main 1.
fn in_main_phase() -> Match {
    let deck = DeckList::new().with_copies(SOLDIER, 3).with_copies(WALL, 3);
    let config = MatchConfig::new()
        .with_opening_hand(6)
        .with_draw_on_first_turn(false);
    let mut game = Match::new(config, registry(), [deck.clone(), deck], GameRng::new(11)).unwrap();
    game.resolve_turn_order(&MiniGameWin(P0)).unwrap();
    game.choose(P0, true).unwrap();
    game.advance_to(P0, Phase::Main1).unwrap();
    game
}

/// Put the first `card` from `player`'s hand into `slot`.
fn summon(game: &mut Match, player: PlayerId, card: CardId, slot: usize) -> EntityId {
    let hand = ZoneRef::new(player, ZoneKind::Hand);
    let entity = game
        .cards_in(hand)
        .into_iter()
        .find(|&e| game.card(e).map(|c| c.card_id) == Some(card))
        .unwrap();
    game.move_card(player, entity, hand, ZoneRef::new(player, ZoneKind::Field), Placement::Slot(slot))
        .unwrap();
    entity
}

fn dead_zone(player: PlayerId) -> ZoneRef {
    ZoneRef::new(player, ZoneKind::DeadZone)
}

// =============================================================================
// Declaring attacks
// =============================================================================

/// Attacks outside the Battle phase are rejected.
#[test]
fn test_attack_requires_battle_phase() {
    let mut game = in_main_phase();
    let soldier = summon(&mut game, P0, SOLDIER, 0);

    assert_eq!(
        game.attack(P0, soldier, None),
        Err(EngineError::NotBattlePhase(Phase::Main1))
    );
}

/// Face-down or Defense-position monsters cannot attack.
#[test]
fn test_attack_requires_face_up_attack_position() {
    let mut game = in_main_phase();
    let set = summon(&mut game, P0, SOLDIER, 0);
    let wall = summon(&mut game, P0, WALL, 1);
    game.set_face_down(P0, set, true).unwrap();
    game.change_position(P0, wall, BattlePosition::Defense).unwrap();
    game.advance_to(P0, Phase::Battle).unwrap();

    assert_eq!(game.attack(P0, set, None), Err(EngineError::CannotAttack(set)));
    assert_eq!(game.attack(P0, wall, None), Err(EngineError::CannotAttack(wall)));
}

/// The attacker must be on the attacking player's field.
#[test]
fn test_attack_with_opponent_monster_rejected() {
    let mut game = in_main_phase();
    let theirs = summon(&mut game, P1, SOLDIER, 0);
    game.advance_to(P0, Phase::Battle).unwrap();

    assert_eq!(game.attack(P0, theirs, None), Err(EngineError::NotOnField(theirs)));
}

// =============================================================================
// Applying battles
// =============================================================================

/// A direct attack deals the attacker's ATK to the opponent.
#[test]
fn test_direct_attack_damage() {
    let mut game = in_main_phase();
    let soldier = summon(&mut game, P0, SOLDIER, 2);
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, soldier, None).unwrap();
    game.apply_battle(P0, &report).unwrap();

    assert_eq!(report.damage, Some(BattleDamage { player: P1, amount: 1800 }));
    assert_eq!(game.life(P1), 8000 - 1800);
    assert_eq!(game.life(P0), 8000);
}

/// The weaker attack-position monster goes to its owner's dead zone.
#[test]
fn test_attack_destroys_weaker_monster() {
    let mut game = in_main_phase();
    let soldier = summon(&mut game, P0, SOLDIER, 0);
    let wall = summon(&mut game, P1, WALL, 3);
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, soldier, Some(wall)).unwrap();
    game.apply_battle(P0, &report).unwrap();

    assert_eq!(game.life(P1), 8000 - 1300);
    assert_eq!(game.zones().field_slots(P1)[3], None);
    assert!(game.zones().is_in_zone(wall, dead_zone(P1)));
    assert!(game.zones().is_in_zone(soldier, ZoneRef::new(P0, ZoneKind::Field)));
    assert!(game.zones().check_integrity().is_ok());
}

/// Attacking into a stronger defender damages the attacker's controller.
#[test]
fn test_attack_into_defense() {
    let mut game = in_main_phase();
    let soldier = summon(&mut game, P0, SOLDIER, 0);
    let wall = summon(&mut game, P1, WALL, 0);
    game.change_position(P1, wall, BattlePosition::Defense).unwrap();
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, soldier, Some(wall)).unwrap();
    game.apply_battle(P0, &report).unwrap();

    assert!(report.destroyed.is_empty());
    assert_eq!(game.life(P0), 8000 - 200);
    assert!(game.zones().is_in_zone(wall, ZoneRef::new(P1, ZoneKind::Field)));
}

/// Equal ATK in attack position destroys both monsters.
#[test]
fn test_mirror_match_destroys_both() {
    let mut game = in_main_phase();
    let mine = summon(&mut game, P0, SOLDIER, 0);
    let theirs = summon(&mut game, P1, SOLDIER, 0);
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, mine, Some(theirs)).unwrap();
    game.apply_battle(P0, &report).unwrap();

    assert!(game.zones().is_in_zone(mine, dead_zone(P0)));
    assert!(game.zones().is_in_zone(theirs, dead_zone(P1)));
    assert_eq!(game.life(P0), 8000);
    assert_eq!(game.life(P1), 8000);
}

/// An ATK override is used in battle and cleared when the card dies.
#[test]
fn test_atk_override_in_battle() {
    let mut game = in_main_phase();
    let wall = summon(&mut game, P0, WALL, 0);
    let soldier = summon(&mut game, P1, SOLDIER, 0);
    game.set_atk(P0, wall, 100).unwrap();
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, wall, Some(soldier)).unwrap();
    game.apply_battle(P0, &report).unwrap();

    assert_eq!(game.life(P0), 8000 - 1700);
    assert!(game.zones().is_in_zone(wall, dead_zone(P0)));
    assert_eq!(game.card(wall).unwrap().atk_override, None);
}

/// Enough battle damage ends the match.
#[test]
fn test_lethal_damage() {
    let mut game = in_main_phase();
    let soldier = summon(&mut game, P0, SOLDIER, 0);
    game.set_life(P0, P1, 1000);
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, soldier, None).unwrap();
    game.apply_battle(P0, &report).unwrap();

    assert_eq!(game.life(P1), 0);
    assert_eq!(game.result(), Some(MatchResult::Winner(P0)));
}

// =============================================================================
// Tokens
// =============================================================================

/// Tokens go straight to the field and can battle.
#[test]
fn test_token_battles() {
    let mut game = in_main_phase();
    let token = CardDefinition::monster(CardId::new(900), "Sheep Token", 2000, 0);
    let sheep = game.create_token(P0, P0, token, 4).unwrap();
    game.advance_to(P0, Phase::Battle).unwrap();

    let report = game.attack(P0, sheep, None).unwrap();

    assert_eq!(report.damage, Some(BattleDamage { player: P1, amount: 2000 }));
    assert_eq!(game.zones().field_slots(P0)[4], Some(sheep));
}

/// Token creation outside main phases fails with no side effects.
#[test]
fn test_token_outside_main_phase() {
    let mut game = in_main_phase();
    game.advance_to(P0, Phase::Battle).unwrap();
    let cards_before = game.zones().total_cards();

    let token = CardDefinition::monster(CardId::new(900), "Sheep Token", 0, 0);
    let result = game.create_token(P0, P0, token, 0);

    assert_eq!(result, Err(EngineError::NotMainPhase(Phase::Battle)));
    assert_eq!(game.zones().total_cards(), cards_before);
}

/// Tokens may be created again in Main 2, into a free slot.
#[test]
fn test_tokens_in_main2() {
    let mut game = in_main_phase();
    let token = CardDefinition::monster(CardId::new(900), "Sheep Token", 0, 0);
    let first = game.create_token(P0, P0, token.clone(), 0).unwrap();
    game.advance_to(P0, Phase::Main2).unwrap();

    assert_eq!(
        game.create_token(P0, P0, token.clone(), 0),
        Err(EngineError::SlotOccupied { slot: 0, occupant: first })
    );
    let second = game.create_token(P0, P0, token, 1).unwrap();

    assert_ne!(first, second);
    assert_eq!(game.registry().len(), 3);
}
