//! Domain types for the charging station engine.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity. Station records are owned by the
//! data-loading side and only borrowed by the engine.

mod charging;
mod coordinate;
mod station;

#[cfg(test)]
pub(crate) mod fixtures;

pub use charging::{Availability, Connector};
pub use coordinate::{Coordinate, InvalidCoordinate};
pub use station::{InvalidStation, Station, StationId};
