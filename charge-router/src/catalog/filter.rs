//! Candidate pre-filtering.

use serde::Deserialize;

use crate::domain::{Availability, Connector, Coordinate, Station};
use crate::geodesy::distance_km;

/// Criteria a station must meet to become a ranking candidate.
///
/// Every criterion is optional; an empty filter admits every station.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CandidateFilter {
    /// Country name, compared case-insensitively.
    pub country: Option<String>,
    pub availability: Option<Availability>,
    pub min_power_kw: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_price_per_kwh: Option<f64>,
    pub connector: Option<Connector>,
    /// Geodesic distance limit from the query origin.
    pub max_distance_km: Option<f64>,
}

impl CandidateFilter {
    /// Returns true if `station` satisfies every criterion for a query
    /// from `origin`.
    pub fn matches(&self, station: &Station, origin: Coordinate) -> bool {
        if let Some(country) = &self.country {
            if !station.country.eq_ignore_ascii_case(country) {
                return false;
            }
        }
        if self.availability.is_some_and(|a| station.availability != a) {
            return false;
        }
        if self.min_power_kw.is_some_and(|min| station.power_kw < min) {
            return false;
        }
        if self.min_rating.is_some_and(|min| station.rating < min) {
            return false;
        }
        if self
            .max_price_per_kwh
            .is_some_and(|max| station.price_per_kwh > max)
        {
            return false;
        }
        if self.connector.is_some_and(|c| !station.has_connector(c)) {
            return false;
        }
        match self.max_distance_km {
            Some(max) => distance_km(origin, station.coordinate) <= max,
            None => true,
        }
    }

    /// Stations from `stations` that pass the filter, in input order.
    pub fn apply<'a>(&self, stations: &'a [Station], origin: Coordinate) -> Vec<&'a Station> {
        stations
            .iter()
            .filter(|s| self.matches(s, origin))
            .collect()
    }
}
