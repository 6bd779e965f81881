//! Turn-order resolution.
//!
//! Before turn 1 a mini-game picks a winner, and the winner chooses to go
//! first or second. The mapping from random outcome to winner is a game
//! rule supplied by the caller through `WinnerRule`; `CoinCall`,
//! `HigherDie` and `MiniGameWin` cover the usual cases.
//!
//! ## Protocol
//!
//! ```text
//! Waiting ──resolve──▶ AwaitingChoice { winner } ──choose(winner)──▶ Resolved
//! ```
//!
//! - `choose` before a winner exists, or by the other player, fails with
//!   `InvalidChoice`.
//! - Once resolved, `resolve` and `choose` fail with `AlreadyResolved`
//!   and the outcome never changes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::core::error::{EngineError, EngineResult};
use crate::core::player::PlayerId;
use crate::core::rng::{CoinFace, Randomizer};

/// How the winner of turn-order resolution is picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionMethod {
    CoinFlip,
    DiceRoll,
    MiniGameWin,
}

/// Raw outcome of one resolution attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toss {
    Coin(CoinFace),
    /// One die per seat, in seat order.
    Dice([u8; 2]),
    /// Decided outside the engine.
    External,
}

/// Maps random outcomes to a winner.
pub trait WinnerRule {
    fn method(&self) -> ResolutionMethod;

    /// Run one attempt. `None` means a tie and the attempt is repeated.
    fn attempt(&self, rng: &mut dyn Randomizer) -> (Toss, Option<PlayerId>);
}

/// One player calls a coin side before the flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinCall {
    pub caller: PlayerId,
    pub call: CoinFace,
}

impl WinnerRule for CoinCall {
    fn method(&self) -> ResolutionMethod {
        ResolutionMethod::CoinFlip
    }

    fn attempt(&self, rng: &mut dyn Randomizer) -> (Toss, Option<PlayerId>) {
        let face = rng.flip_coin();
        let winner = if face == self.call {
            self.caller
        } else {
            self.caller.opponent()
        };
        (Toss::Coin(face), Some(winner))
    }
}

/// Each seat rolls a die; the higher roll wins, ties reroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HigherDie;

impl WinnerRule for HigherDie {
    fn method(&self) -> ResolutionMethod {
        ResolutionMethod::DiceRoll
    }

    fn attempt(&self, rng: &mut dyn Randomizer) -> (Toss, Option<PlayerId>) {
        let rolls = [rng.roll_dice(), rng.roll_dice()];
        let winner = match rolls[0].cmp(&rolls[1]) {
            std::cmp::Ordering::Greater => Some(PlayerId::FIRST_SEAT),
            std::cmp::Ordering::Less => Some(PlayerId::SECOND_SEAT),
            std::cmp::Ordering::Equal => None,
        };
        (Toss::Dice(rolls), winner)
    }
}

/// The winner was decided by a mini-game played outside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniGameWin(pub PlayerId);

impl WinnerRule for MiniGameWin {
    fn method(&self) -> ResolutionMethod {
        ResolutionMethod::MiniGameWin
    }

    fn attempt(&self, _rng: &mut dyn Randomizer) -> (Toss, Option<PlayerId>) {
        (Toss::External, Some(self.0))
    }
}

/// The winner and every attempt it took to find them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrderDraw {
    pub method: ResolutionMethod,
    pub winner: PlayerId,
    /// All attempts in order; every one but the last was a tie.
    pub tosses: SmallVec<[Toss; 2]>,
}

/// Where resolution stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOrderStatus {
    /// Nobody has won the mini-game yet.
    #[default]
    Waiting,
    /// `winner` must choose to go first or second.
    AwaitingChoice {
        method: ResolutionMethod,
        winner: PlayerId,
    },
    /// Final. `first_player` takes turn 1.
    Resolved {
        method: ResolutionMethod,
        winner: PlayerId,
        go_first: bool,
        first_player: PlayerId,
    },
}

/// Runs turn-order resolution once per match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrderResolver {
    status: TurnOrderStatus,
}

impl TurnOrderResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> TurnOrderStatus {
        self.status
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, TurnOrderStatus::Resolved { .. })
    }

    /// Who won the mini-game, once known.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            TurnOrderStatus::Waiting => None,
            TurnOrderStatus::AwaitingChoice { winner, .. }
            | TurnOrderStatus::Resolved { winner, .. } => Some(winner),
        }
    }

    /// Who takes turn 1, once resolved.
    #[must_use]
    pub fn first_player(&self) -> Option<PlayerId> {
        match self.status {
            TurnOrderStatus::Resolved { first_player, .. } => Some(first_player),
            _ => None,
        }
    }

    /// Run the mini-game until it produces a winner.
    ///
    /// Fails with `AlreadyResolved` once a winner exists.
    pub fn resolve(
        &mut self,
        rule: &dyn WinnerRule,
        rng: &mut dyn Randomizer,
    ) -> EngineResult<TurnOrderDraw> {
        if self.status != TurnOrderStatus::Waiting {
            return Err(EngineError::AlreadyResolved);
        }

        let method = rule.method();
        let mut tosses = SmallVec::new();
        let winner = loop {
            let (toss, winner) = rule.attempt(rng);
            tosses.push(toss);
            match winner {
                Some(winner) => break winner,
                None => debug!(?toss, "turn order tie, retrying"),
            }
        };

        self.status = TurnOrderStatus::AwaitingChoice { method, winner };
        info!(?method, winner = %winner, attempts = tosses.len(), "turn order winner decided");

        Ok(TurnOrderDraw {
            method,
            winner,
            tosses,
        })
    }

    /// The winner picks first (`go_first = true`) or second.
    ///
    /// Returns the player who takes turn 1.
    pub fn choose(&mut self, player: PlayerId, go_first: bool) -> EngineResult<PlayerId> {
        match self.status {
            TurnOrderStatus::Resolved { .. } => Err(EngineError::AlreadyResolved),
            TurnOrderStatus::Waiting => Err(EngineError::InvalidChoice { player }),
            TurnOrderStatus::AwaitingChoice { winner, .. } if winner != player => {
                Err(EngineError::InvalidChoice { player })
            }
            TurnOrderStatus::AwaitingChoice { method, winner } => {
                let first_player = if go_first { winner } else { winner.opponent() };
                self.status = TurnOrderStatus::Resolved {
                    method,
                    winner,
                    go_first,
                    first_player,
                };
                info!(winner = %winner, go_first, first = %first_player, "turn order resolved");
                Ok(first_player)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::GameRng;

    const P0: PlayerId = PlayerId::FIRST_SEAT;
    const P1: PlayerId = PlayerId::SECOND_SEAT;

    /// Scripted randomizer: replays fixed dice and coin sequences.
    struct Scripted {
        dice: Vec<u8>,
        coins: Vec<CoinFace>,
    }

    impl Randomizer for Scripted {
        fn roll_dice(&mut self) -> u8 {
            self.dice.remove(0)
        }

        fn flip_coin(&mut self) -> CoinFace {
            self.coins.remove(0)
        }
    }

    #[test]
    fn test_coin_call_winner() {
        let rule = CoinCall { caller: P1, call: CoinFace::Heads };

        let mut heads = Scripted { dice: vec![], coins: vec![CoinFace::Heads] };
        assert_eq!(rule.attempt(&mut heads), (Toss::Coin(CoinFace::Heads), Some(P1)));

        let mut tails = Scripted { dice: vec![], coins: vec![CoinFace::Tails] };
        assert_eq!(rule.attempt(&mut tails), (Toss::Coin(CoinFace::Tails), Some(P0)));
    }

    #[test]
    fn test_higher_die_rerolls_ties() {
        let mut resolver = TurnOrderResolver::new();
        let mut rng = Scripted { dice: vec![4, 4, 2, 5], coins: vec![] };

        let draw = resolver.resolve(&HigherDie, &mut rng).unwrap();

        assert_eq!(draw.winner, P1);
        assert_eq!(draw.method, ResolutionMethod::DiceRoll);
        assert_eq!(draw.tosses.as_slice(), &[Toss::Dice([4, 4]), Toss::Dice([2, 5])]);
        assert_eq!(
            resolver.status(),
            TurnOrderStatus::AwaitingChoice { method: ResolutionMethod::DiceRoll, winner: P1 }
        );
    }

    #[test]
    fn test_winner_goes_first() {
        let mut resolver = TurnOrderResolver::new();
        resolver.resolve(&MiniGameWin(P0), &mut GameRng::new(1)).unwrap();

        assert_eq!(resolver.choose(P0, true), Ok(P0));
        assert_eq!(resolver.first_player(), Some(P0));
        assert!(resolver.is_resolved());
    }

    #[test]
    fn test_winner_goes_second() {
        let mut resolver = TurnOrderResolver::new();
        resolver.resolve(&MiniGameWin(P0), &mut GameRng::new(1)).unwrap();

        assert_eq!(resolver.choose(P0, false), Ok(P1));
        assert_eq!(resolver.first_player(), Some(P1));
    }

    #[test]
    fn test_non_winner_cannot_choose() {
        let mut resolver = TurnOrderResolver::new();
        resolver.resolve(&MiniGameWin(P0), &mut GameRng::new(1)).unwrap();

        assert_eq!(resolver.choose(P1, true), Err(EngineError::InvalidChoice { player: P1 }));
        assert!(!resolver.is_resolved());
    }

    #[test]
    fn test_choose_before_resolution_fails() {
        let mut resolver = TurnOrderResolver::new();

        assert_eq!(resolver.choose(P0, true), Err(EngineError::InvalidChoice { player: P0 }));
        assert_eq!(resolver.status(), TurnOrderStatus::Waiting);
    }

    #[test]
    fn test_second_choice_fails_and_keeps_outcome() {
        let mut resolver = TurnOrderResolver::new();
        resolver.resolve(&MiniGameWin(P1), &mut GameRng::new(1)).unwrap();
        resolver.choose(P1, true).unwrap();

        assert_eq!(resolver.choose(P1, false), Err(EngineError::AlreadyResolved));
        assert_eq!(resolver.choose(P0, true), Err(EngineError::AlreadyResolved));
        assert_eq!(resolver.first_player(), Some(P1));
    }

    #[test]
    fn test_resolve_only_once() {
        let mut resolver = TurnOrderResolver::new();
        let mut rng = GameRng::new(7);
        resolver.resolve(&HigherDie, &mut rng).unwrap();

        assert_eq!(resolver.resolve(&HigherDie, &mut rng), Err(EngineError::AlreadyResolved));
    }

    #[test]
    fn test_seeded_resolution_is_reproducible() {
        let rule = CoinCall { caller: P0, call: CoinFace::Tails };

        let a = TurnOrderResolver::new().resolve(&rule, &mut GameRng::new(99)).unwrap();
        let b = TurnOrderResolver::new().resolve(&rule, &mut GameRng::new(99)).unwrap();

        assert_eq!(a, b);
    }
}
