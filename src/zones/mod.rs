//! Zone system for card locations.
//!
//! Every player owns the same six zone kinds (see `core::config::ZoneKind`);
//! their behavior comes from the `ZonePolicy` table. The `ZoneStore` is
//! the single owner of card instances and the only code that moves them.
//!
//! ## Key Types
//!
//! - `ZoneStore`: Card ownership, membership lists, movement
//! - `Location`: Zone plus field slot of a card
//! - `Placement`: Where a moved card lands in its destination
//! - `MillReport`: Outcome of a (possibly partial) mill

pub mod store;

pub use store::{Location, MillReport, Placement, ZoneStore};

pub use crate::core::config::{ZoneKind, ZonePolicy, ZoneRef, ZoneVisibility};
