//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::catalog::CandidateFilter;
use crate::domain::{Coordinate, Station, StationId};
use crate::error::EngineError;
use crate::graph::Path;
use crate::ranking::{RankedStation, RouteOption, TripLeg, TripPlan};
use crate::scoring::ScoreWeights;

/// A latitude/longitude pair as sent by clients.
///
/// Kept unvalidated until the handler runs so that out-of-range values
/// surface as an engine error rather than a JSON parse failure.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn coordinate(self) -> Result<Coordinate, EngineError> {
        Ok(Coordinate::new(self.lat, self.lon)?)
    }
}

/// Request to rank stations around an origin.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub origin: LatLon,

    /// Candidate pre-filter (defaults to every station)
    #[serde(default)]
    pub filter: CandidateFilter,

    /// Score weights (defaults to the standard preset)
    pub weights: Option<ScoreWeights>,

    /// Shortlist size; must be positive when given
    pub top_k: Option<i64>,

    /// Assumed travel speed in km/h
    pub speed_kmh: Option<f64>,
}

/// Ranked stations, best first.
#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub results: Vec<RankedStationResult>,

    /// Number of stations that passed the filter and were scored
    pub candidates: usize,
}

/// A station in ranking results.
#[derive(Debug, Serialize)]
pub struct RankedStationResult {
    pub station: Station,
    pub score: f64,
    pub direct_distance_km: f64,
    pub route_distance_km: f64,
    pub estimated_minutes: f64,
    pub efficiency: f64,

    /// Node ids along the route, starting with "origin"
    pub path: Vec<String>,
}

/// Query for the nearest station.
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
    pub speed_kmh: Option<f64>,
}

/// Request to plan a multi-stop trip.
#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub origin: LatLon,

    /// Station ids in visiting order
    pub stops: Vec<StationId>,

    pub speed_kmh: Option<f64>,
}

/// A planned trip.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub legs: Vec<TripLegResult>,
    pub total_distance_km: f64,
    pub total_minutes: f64,
}

/// One leg of a planned trip.
#[derive(Debug, Serialize)]
pub struct TripLegResult {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub estimated_minutes: f64,
    pub path: Vec<String>,
}

/// Request for alternative routes to a station.
#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    pub origin: LatLon,

    /// Destination station id
    pub station_id: StationId,

    /// Number of routes wanted (defaults to 3)
    pub k: Option<usize>,

    /// Stations allowed as intermediate stops (defaults to the whole catalog)
    pub via: Option<Vec<StationId>>,

    pub speed_kmh: Option<f64>,
}

/// Alternative routes, shortest first.
#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub routes: Vec<RouteResult>,
}

/// One route option.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub path: Vec<String>,
    pub distance_km: f64,
    pub estimated_minutes: f64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

/// Round to two decimal places for display.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn path_ids(path: &Path) -> Vec<String> {
    path.nodes.iter().map(ToString::to_string).collect()
}

impl RankedStationResult {
    /// Create from an engine ranking entry.
    pub fn from_ranked(entry: &RankedStation<'_>) -> Self {
        Self {
            station: entry.station.clone(),
            score: (entry.score * 10_000.0).round() / 10_000.0,
            direct_distance_km: round2(entry.direct_distance_km),
            route_distance_km: round2(entry.route_distance_km),
            estimated_minutes: round2(entry.estimated_minutes),
            efficiency: round2(entry.efficiency),
            path: path_ids(&entry.route),
        }
    }
}

impl TripLegResult {
    pub fn from_leg(leg: &TripLeg) -> Self {
        Self {
            from: leg.from.to_string(),
            to: leg.to.to_string(),
            distance_km: round2(leg.path.distance_km),
            estimated_minutes: round2(leg.estimated_minutes),
            path: path_ids(&leg.path),
        }
    }
}

impl TripResponse {
    pub fn from_plan(plan: &TripPlan) -> Self {
        Self {
            legs: plan.legs.iter().map(TripLegResult::from_leg).collect(),
            total_distance_km: round2(plan.total_distance_km),
            total_minutes: round2(plan.total_minutes),
        }
    }
}

impl RouteResult {
    pub fn from_option(option: &RouteOption) -> Self {
        Self {
            path: path_ids(&option.path),
            distance_km: round2(option.path.distance_km),
            estimated_minutes: round2(option.estimated_minutes),
        }
    }
}
