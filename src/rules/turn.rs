//! Turn and phase transitions.
//!
//! Phases run strictly forward: `Draw → Standby → Main1 → Battle → Main2
//! → End`. Advancing from `End` starts the next turn in `Draw` with the
//! other player active and the turn counter incremented.
//!
//! These functions are pure: they compute the next `TurnState` and never
//! touch zones. The match authority applies the result and runs the
//! automatic draw whenever a transition enters `Draw`.

use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::PlayerId;
use crate::core::state::{Phase, TurnState};

/// Result of the automatic draw on entering the Draw phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoDraw {
    /// The active player drew this card.
    Drew(EntityId),
    /// The active player had no card to draw. The turn still proceeds;
    /// whether this loses the match is up to the caller.
    DeckEmpty(PlayerId),
    /// No draw this turn (first turn with drawing disabled).
    Skipped,
}

impl AutoDraw {
    #[must_use]
    pub fn is_deck_out(&self) -> bool {
        matches!(self, AutoDraw::DeckEmpty(_))
    }
}

/// A completed phase or turn transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: TurnState,
    pub to: TurnState,
    /// Present when the transition entered `Draw`.
    pub auto_draw: Option<AutoDraw>,
}

impl PhaseChange {
    /// Did this transition start a new turn?
    #[must_use]
    pub fn is_new_turn(&self) -> bool {
        self.to.turn_number != self.from.turn_number
    }
}

/// The first phase of the next turn.
#[must_use]
pub fn next_turn(state: &TurnState) -> TurnState {
    TurnState {
        active_player: state.active_player.opponent(),
        phase: Phase::Draw,
        turn_number: state.turn_number + 1,
    }
}

/// One step forward: the next phase, or the next turn from `End`.
#[must_use]
pub fn advance(state: &TurnState) -> TurnState {
    match state.phase.next() {
        Some(phase) => TurnState { phase, ..*state },
        None => next_turn(state),
    }
}

/// Jump forward to `target`.
///
/// Later phases of the current turn are reached directly; `Draw` means
/// the next turn. Targeting the current phase or an earlier one (other
/// than `Draw`) fails.
pub fn advance_to(state: &TurnState, target: Phase) -> EngineResult<TurnState> {
    if target == Phase::Draw {
        return Ok(next_turn(state));
    }
    if target <= state.phase {
        return Err(EngineError::InvalidPhaseTransition {
            from: state.phase,
            to: target,
        });
    }
    Ok(TurnState {
        phase: target,
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: PlayerId = PlayerId::FIRST_SEAT;

    #[test]
    fn test_full_turn_cycle() {
        let mut state = TurnState::first_turn(P0);
        let mut seen = vec![state.phase];

        for _ in 0..5 {
            state = advance(&state);
            seen.push(state.phase);
        }

        assert_eq!(seen, Phase::SEQUENCE.to_vec());
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.active_player, P0);
    }

    #[test]
    fn test_end_wraps_to_opponent_draw() {
        let state = TurnState {
            active_player: P0,
            phase: Phase::End,
            turn_number: 3,
        };

        let next = advance(&state);

        assert_eq!(next.phase, Phase::Draw);
        assert_eq!(next.active_player, P0.opponent());
        assert_eq!(next.turn_number, 4);
    }

    #[test]
    fn test_advance_to_later_phase() {
        let state = TurnState::first_turn(P0);

        let next = advance_to(&state, Phase::Battle).unwrap();

        assert_eq!(next.phase, Phase::Battle);
        assert_eq!(next.turn_number, 1);
    }

    #[test]
    fn test_advance_to_backward_fails() {
        let state = TurnState {
            active_player: P0,
            phase: Phase::Main2,
            turn_number: 1,
        };

        assert_eq!(
            advance_to(&state, Phase::Main1),
            Err(EngineError::InvalidPhaseTransition { from: Phase::Main2, to: Phase::Main1 })
        );
        assert!(advance_to(&state, Phase::Main2).is_err());
    }

    #[test]
    fn test_advance_to_draw_is_next_turn() {
        let state = TurnState {
            active_player: P0,
            phase: Phase::Main1,
            turn_number: 2,
        };

        assert_eq!(advance_to(&state, Phase::Draw), Ok(next_turn(&state)));
    }

    #[test]
    fn test_phase_change_new_turn() {
        let from = TurnState::first_turn(P0);
        let within = PhaseChange { from, to: advance(&from), auto_draw: None };
        let across = PhaseChange { from, to: next_turn(&from), auto_draw: Some(AutoDraw::Skipped) };

        assert!(!within.is_new_turn());
        assert!(across.is_new_turn());
    }
}
