//! Core engine types: entities, players, state, actions, RNG, configuration.
//!
//! This module contains the building blocks shared by the zone store, the
//! turn rules and the match authority.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap, SEATS};
pub use rng::{CoinFace, GameRng, GameRngState, Randomizer};
pub use config::{
    MatchConfig, ZoneCapacity, ZoneKind, ZoneOrdering, ZonePolicy, ZoneRef, ZoneVisibility,
};
pub use action::{ActionRecord, Command, Issuer};
pub use state::{Phase, TurnState};
pub use error::{EngineError, EngineResult};
