//! Engine error types.
//!
//! Every failure here is a synchronous validation failure caused by the
//! caller's input, except `NoPathFound`, which indicates a broken graph
//! invariant. None of them are retried internally.

use crate::domain::{InvalidCoordinate, InvalidStation, StationId};
use crate::graph::NodeId;

/// Errors returned by the route and ranking engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Latitude or longitude outside the valid range (or not finite).
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A graph was requested over zero stations.
    #[error("candidate set must contain at least one station")]
    EmptyCandidateSet,

    /// Scoring was requested over zero stations.
    #[error("station input must not be empty")]
    EmptyInput,

    /// Every score weight is zero, so no composite score can be formed.
    #[error("at least one score weight must be greater than zero")]
    AllWeightsZero,

    /// A score weight is negative or not finite.
    #[error("weight for {factor} must be a finite value >= 0, got {value}")]
    NegativeWeight { factor: &'static str, value: f64 },

    /// The requested shortlist size is not positive.
    #[error("top_k must be greater than zero, got {top_k}")]
    InvalidTopK { top_k: i64 },

    /// The assumed travel speed is not a finite positive number.
    #[error("assumed speed must be a finite value > 0 km/h, got {speed_kmh}")]
    InvalidSpeed { speed_kmh: f64 },

    /// The same station id appears more than once in a query.
    #[error("duplicate station id {id}")]
    DuplicateStation { id: StationId },

    /// A station record breaks its field invariants (e.g. non-positive or
    /// non-finite power, negative price, rating outside 0-5).
    #[error(transparent)]
    InvalidStation(#[from] InvalidStation),

    /// A station id was referenced that is not part of the candidate set.
    #[error("unknown station id {id}")]
    UnknownStation { id: StationId },

    /// The destination is unreachable from the source.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },
}

impl From<InvalidCoordinate> for EngineError {
    fn from(err: InvalidCoordinate) -> Self {
        EngineError::InvalidCoordinate {
            lat: err.lat,
            lon: err.lon,
        }
    }
}

impl EngineError {
    /// Returns true if the error was caused by caller input rather than a
    /// broken engine invariant.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, EngineError::NoPathFound { .. })
    }
}
