//! Match rules: phase progression, turn order, the turn clock, battle.
//!
//! Everything here is a state machine or a pure calculation. None of it
//! touches zones directly; `game::Match` composes these pieces and
//! applies their results to the zone store.

pub mod turn;
pub mod turn_order;
pub mod clock;
pub mod battle;

pub use turn::{AutoDraw, PhaseChange};
pub use turn_order::{
    CoinCall, HigherDie, MiniGameWin, ResolutionMethod, Toss, TurnOrderDraw, TurnOrderResolver,
    TurnOrderStatus, WinnerRule,
};
pub use clock::{ClockTick, MatchClock};
pub use battle::{resolve_attack, BattleDamage, BattleReport, Combatant};
