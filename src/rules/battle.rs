//! Battle damage calculation.
//!
//! A pure function from the two combatants to a `BattleReport`. Nothing
//! is applied here; the match authority decides when to apply the report
//! (damage to life points, destroyed monsters to the dead zone).
//!
//! | Target            | ATK higher                     | ATK lower                        | Equal        |
//! |-------------------|--------------------------------|----------------------------------|--------------|
//! | none (direct)     | ATK to opponent                |                                  |              |
//! | Attack position   | target destroyed, diff to foe  | attacker destroyed, diff to self | both destroyed |
//! | Defense position  | target destroyed, diff to foe  | diff to self                     | nothing      |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::BattlePosition;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;

/// A monster taking part in a battle, with its stats already resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub entity: EntityId,
    pub controller: PlayerId,
    pub atk: i32,
    pub def: i32,
    pub position: BattlePosition,
}

/// Life point damage from a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleDamage {
    pub player: PlayerId,
    pub amount: i64,
}

/// Outcome of one attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub attacker: EntityId,
    /// `None` for a direct attack.
    pub target: Option<EntityId>,
    pub damage: Option<BattleDamage>,
    pub destroyed: SmallVec<[EntityId; 2]>,
}

impl BattleReport {
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.target.is_none()
    }
}

/// Compute the outcome of `attacker` attacking `target` (or the opponent
/// directly when `target` is `None`).
#[must_use]
pub fn resolve_attack(attacker: &Combatant, target: Option<&Combatant>) -> BattleReport {
    let mut report = BattleReport {
        attacker: attacker.entity,
        target: target.map(|t| t.entity),
        damage: None,
        destroyed: SmallVec::new(),
    };
    let opponent = attacker.controller.opponent();

    let Some(target) = target else {
        report.damage = damage(opponent, attacker.atk);
        return report;
    };

    match target.position {
        BattlePosition::Attack => match attacker.atk.cmp(&target.atk) {
            std::cmp::Ordering::Greater => {
                report.destroyed.push(target.entity);
                report.damage = damage(target.controller, attacker.atk - target.atk);
            }
            std::cmp::Ordering::Less => {
                report.destroyed.push(attacker.entity);
                report.damage = damage(attacker.controller, target.atk - attacker.atk);
            }
            std::cmp::Ordering::Equal => {
                report.destroyed.push(attacker.entity);
                report.destroyed.push(target.entity);
            }
        },
        BattlePosition::Defense => match attacker.atk.cmp(&target.def) {
            std::cmp::Ordering::Greater => {
                report.destroyed.push(target.entity);
                report.damage = damage(target.controller, attacker.atk - target.def);
            }
            std::cmp::Ordering::Less => {
                report.damage = damage(attacker.controller, target.def - attacker.atk);
            }
            std::cmp::Ordering::Equal => {}
        },
    }

    report
}

fn damage(player: PlayerId, amount: i32) -> Option<BattleDamage> {
    (amount > 0).then_some(BattleDamage {
        player,
        amount: i64::from(amount),
    })
}
