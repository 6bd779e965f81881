//! The match authority and its concurrent handle.
//!
//! ## Key Types
//!
//! - `Match`: Owns all state of one duel; every command goes through it
//! - `SharedMatch`: `Arc<Mutex<Match>>` handle for the clock scheduler
//!   and player sessions
//! - `MatchSnapshot`: Full state, encodable with bincode

pub mod duel;
pub mod shared;
pub mod snapshot;

pub use duel::{ClockEvent, Match, MatchResult};
pub use shared::SharedMatch;
pub use snapshot::MatchSnapshot;
