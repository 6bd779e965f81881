//! Per-turn countdown.
//!
//! The clock holds the seconds left in the current turn and whether it is
//! counting. An external scheduler calls `tick` once per second; the tick
//! that reaches zero stops the clock and reports `ClockTick::Expired`.
//! Later ticks report `Idle`, so each expiry fires exactly once.

use serde::{Deserialize, Serialize};

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockTick {
    /// Clock paused or already expired: nothing happened.
    Idle,
    /// One second elapsed; this many remain.
    Running(u32),
    /// This tick reached zero. The turn must end.
    Expired,
}

/// Countdown for the active turn.
///
/// ```
/// use duel_engine::rules::{ClockTick, MatchClock};
///
/// let mut clock = MatchClock::new(2);
/// clock.start();
///
/// assert_eq!(clock.tick(), ClockTick::Running(1));
/// assert_eq!(clock.tick(), ClockTick::Expired);
/// assert_eq!(clock.tick(), ClockTick::Idle);
/// assert!(!clock.is_running());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClock {
    remaining: u32,
    running: bool,
}

impl MatchClock {
    /// A paused clock with `seconds` on it.
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: false,
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Start counting down.
    ///
    /// A clock at zero stays stopped until it is reset. Returns whether
    /// the clock is now running.
    pub fn start(&mut self) -> bool {
        self.running = self.remaining > 0;
        self.running
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Set the remaining time. A running clock keeps running from the new
    /// value; a paused one stays paused.
    pub fn reset(&mut self, seconds: u32) {
        self.remaining = seconds;
        if seconds == 0 {
            self.running = false;
        }
    }

    /// Elapse one second.
    pub fn tick(&mut self) -> ClockTick {
        if !self.running {
            return ClockTick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            ClockTick::Expired
        } else {
            ClockTick::Running(self.remaining)
        }
    }
}
