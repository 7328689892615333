//! Multi-factor station scoring.
//!
//! Each factor is min-max normalized across the candidate set, cost-like
//! factors (distance, price) are inverted so that higher is always better,
//! and the composite is the weighted mean over the factors with a non-zero
//! weight. The composite therefore always lies in [0, 1].

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use super::weights::ScoreWeights;
use crate::domain::{Coordinate, Station};
use crate::error::EngineError;
use crate::geodesy::distance_km;

/// Value used for a factor whose values are all identical.
const FLAT_FACTOR: f64 = 0.5;

/// Un-normalized factor values for one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawFeatures {
    /// Direct geodesic distance from the origin.
    pub distance_km: f64,
    pub power_kw: f64,
    pub price_per_kwh: f64,
    pub rating: f64,
    /// 1.0 available, 0.5 occupied, 0.0 offline.
    pub availability: f64,
}

impl RawFeatures {
    fn of(station: &Station, origin: Coordinate) -> Self {
        Self {
            distance_km: distance_km(origin, station.coordinate),
            power_kw: station.power_kw,
            price_per_kwh: station.price_per_kwh,
            rating: station.rating,
            availability: station.availability.score_value(),
        }
    }
}

/// Factor values in [0, 1] where higher is always better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedFeatures {
    pub distance: f64,
    pub power: f64,
    pub price: f64,
    pub rating: f64,
    pub availability: f64,
}

impl NormalizedFeatures {
    /// Weighted mean over the factors with a positive weight.
    fn composite(&self, weights: &ScoreWeights) -> f64 {
        let pairs = [
            (self.distance, weights.distance),
            (self.power, weights.power),
            (self.price, weights.price),
            (self.rating, weights.rating),
            (self.availability, weights.availability),
        ];
        let (sum, total) = pairs
            .iter()
            .filter(|&&(_, w)| w > 0.0)
            .fold((0.0, 0.0), |(sum, total), &(v, w)| (sum + v * w, total + w));
        (sum / total).clamp(0.0, 1.0)
    }
}

/// A station with its factor values and composite score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredStation<'a> {
    pub station: &'a Station,
    pub features: RawFeatures,
    pub normalized: NormalizedFeatures,
    pub score: f64,
}

/// Score and rank `stations` relative to `origin`.
///
/// Output has the same length as the input, sorted by descending score;
/// ties fall back to ascending distance and then ascending station id.
///
/// Fails with `EmptyInput` for an empty slice, with `AllWeightsZero` or
/// `NegativeWeight` for unusable weights, with `InvalidStation` for a record
/// that breaks its field invariants and with `DuplicateStation` when an id
/// appears twice anywhere in `stations`.
pub fn score_stations<'a, S: Borrow<Station>>(
    stations: &'a [S],
    origin: Coordinate,
    weights: &ScoreWeights,
) -> Result<Vec<ScoredStation<'a>>, EngineError> {
    if stations.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    weights.validate()?;

    let mut seen = HashSet::with_capacity(stations.len());
    for station in stations.iter().map(<S as Borrow<Station>>::borrow) {
        station.validate()?;
        if !seen.insert(&station.id) {
            return Err(EngineError::DuplicateStation {
                id: station.id.clone(),
            });
        }
    }

    let raw: Vec<RawFeatures> = stations
        .iter()
        .map(|s| RawFeatures::of(s.borrow(), origin))
        .collect();

    let distance = min_max(raw.iter().map(|f| f.distance_km));
    let power = min_max(raw.iter().map(|f| f.power_kw));
    let price = min_max(raw.iter().map(|f| f.price_per_kwh));
    let rating = min_max(raw.iter().map(|f| f.rating));
    let availability = min_max(raw.iter().map(|f| f.availability));

    let mut scored: Vec<ScoredStation<'a>> = stations
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(i, (station, features))| {
            let normalized = NormalizedFeatures {
                distance: 1.0 - distance[i],
                power: power[i],
                price: 1.0 - price[i],
                rating: rating[i],
                availability: availability[i],
            };
            ScoredStation {
                station: station.borrow(),
                features,
                normalized,
                score: normalized.composite(weights),
            }
        })
        .collect();

    scored.sort_by(rank_order);
    Ok(scored)
}

/// Best-first ordering: score desc, distance asc, id asc.
fn rank_order(a: &ScoredStation<'_>, b: &ScoredStation<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.features.distance_km.total_cmp(&b.features.distance_km))
        .then_with(|| a.station.id.cmp(&b.station.id))
}

/// Min-max scale to [0, 1]; a constant series maps to `FLAT_FACTOR`.
fn min_max(values: impl Iterator<Item = f64> + Clone) -> Vec<f64> {
    let (min, max) = values
        .clone()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    values
        .map(|v| {
            if range > 0.0 {
                ((v - min) / range).clamp(0.0, 1.0)
            } else {
                FLAT_FACTOR
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{coord, station, station_with};
    use crate::domain::{Availability, StationId};

    fn ids(scored: &[ScoredStation<'_>]) -> Vec<String> {
        scored.iter().map(|s| s.station.id.to_string()).collect()
    }

    fn pair() -> Vec<Station> {
        vec![
            station_with("A", 0.0, 1.0, 0.10, 50.0, 4.5, Availability::Available),
            station_with("B", 0.0, 2.0, 0.05, 150.0, 3.0, Availability::Available),
        ]
    }

    #[test]
    fn empty_input_rejected() {
        let none: Vec<Station> = Vec::new();
        let err = score_stations(&none, coord(0.0, 0.0), &ScoreWeights::default()).unwrap_err();
        assert_eq!(err, EngineError::EmptyInput);
    }

    #[test]
    fn all_weights_zero_rejected() {
        let zero = ScoreWeights::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let err = score_stations(&pair(), coord(0.0, 0.0), &zero).unwrap_err();
        assert_eq!(err, EngineError::AllWeightsZero);
    }

    #[test]
    fn distance_only_prefers_closer() {
        let stations = pair();
        let scored =
            score_stations(&stations, coord(0.0, 0.0), &ScoreWeights::distance_only()).unwrap();
        assert_eq!(ids(&scored), ["A", "B"]);
        assert_eq!(scored[0].score, 1.0);
        assert_eq!(scored[1].score, 0.0);
    }

    #[test]
    fn equal_weights_tie_broken_by_distance() {
        // A wins distance and rating; B wins power and price; availability
        // is flat. Both composites are 0.5, so the closer station leads.
        let stations = pair();
        let scored = score_stations(&stations, coord(0.0, 0.0), &ScoreWeights::equal()).unwrap();
        assert!((scored[0].score - 0.5).abs() < 1e-12);
        assert!((scored[1].score - 0.5).abs() < 1e-12);
        assert_eq!(ids(&scored), ["A", "B"]);
    }

    #[test]
    fn power_only_prefers_faster_charger() {
        let stations = pair();
        let weights = ScoreWeights::new(0.0, 1.0, 0.0, 0.0, 0.0);
        let scored = score_stations(&stations, coord(0.0, 0.0), &weights).unwrap();
        assert_eq!(ids(&scored), ["B", "A"]);
    }

    #[test]
    fn cost_factors_are_inverted() {
        let stations = pair();
        let scored = score_stations(&stations, coord(0.0, 0.0), &ScoreWeights::equal()).unwrap();
        let a = scored.iter().find(|s| s.station.id.as_str() == "A").unwrap();
        let b = scored.iter().find(|s| s.station.id.as_str() == "B").unwrap();

        assert_eq!(a.normalized.distance, 1.0);
        assert_eq!(b.normalized.distance, 0.0);
        assert_eq!(a.normalized.price, 0.0);
        assert_eq!(b.normalized.price, 1.0);
        assert_eq!(a.normalized.availability, FLAT_FACTOR);
        assert_eq!(a.features.power_kw, 50.0);
    }

    #[test]
    fn identical_stations_tie_broken_by_id() {
        let stations = vec![station("C", 0.0, 1.0), station("A", 0.0, 1.0), station("B", 0.0, 1.0)];
        let scored = score_stations(&stations, coord(0.0, 0.0), &ScoreWeights::default()).unwrap();
        assert_eq!(ids(&scored), ["A", "B", "C"]);
        assert!(scored.iter().all(|s| s.score == FLAT_FACTOR));
    }

    #[test]
    fn duplicate_ids_rejected_anywhere_in_input() {
        let stations = vec![
            station("A", 0.0, 1.0),
            station("B", 0.0, 3.0),
            station("A", 0.0, 1.5),
        ];
        let err = score_stations(&stations, coord(0.0, 0.0), &ScoreWeights::distance_only())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateStation {
                id: StationId::new("A")
            }
        );
    }

    #[test]
    fn invalid_record_rejected() {
        let mut bad = station("B", 0.0, 2.0);
        bad.power_kw = f64::NAN;
        let stations = vec![station("A", 0.0, 1.0), bad];

        let err = score_stations(&stations, coord(0.0, 0.0), &ScoreWeights::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStation(ref e) if e.id == "B"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn availability_mapping() {
        let stations = vec![
            station_with("A", 0.0, 1.0, 0.1, 50.0, 4.0, Availability::Offline),
            station_with("B", 0.0, 1.0, 0.1, 50.0, 4.0, Availability::Occupied),
            station_with("C", 0.0, 1.0, 0.1, 50.0, 4.0, Availability::Available),
        ];
        let weights = ScoreWeights::new(0.0, 0.0, 0.0, 0.0, 1.0);
        let scored = score_stations(&stations, coord(0.0, 0.0), &weights).unwrap();
        assert_eq!(ids(&scored), ["C", "B", "A"]);
        let values: Vec<f64> = scored.iter().map(|s| s.score).collect();
        assert_eq!(values, [1.0, 0.5, 0.0]);
    }

    #[test]
    fn accepts_borrowed_slices() {
        let stations = pair();
        let refs: Vec<&Station> = stations.iter().collect();
        let scored = score_stations(&refs, coord(0.0, 0.0), &ScoreWeights::default()).unwrap();
        assert_eq!(scored.len(), 2);
    }

    #[test]
    fn min_max_flat_series() {
        assert_eq!(min_max([3.0, 3.0].into_iter()), [0.5, 0.5]);
        assert_eq!(min_max([1.0, 2.0, 3.0].into_iter()), [0.0, 0.5, 1.0]);
    }
}
