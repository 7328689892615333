//! Geodesic distance and travel-time estimation.
//!
//! Distances are measured on the WGS-84 ellipsoid, so they agree with
//! survey-grade tools to well under a metre for the station-to-station
//! ranges the engine deals with.

use geo::{Distance, Geodesic, Point};

use crate::domain::Coordinate;
use crate::error::EngineError;

/// Default assumed travel speed for urban driving (km/h).
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Geodesic distance between two coordinates in kilometres.
///
/// Symmetric in its arguments, and exactly zero for identical points.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    let pa = Point::new(a.lon(), a.lat());
    let pb = Point::new(b.lon(), b.lat());
    // Order the endpoints so the result is bit-identical in either direction.
    let metres = if (a.lat(), a.lon()) <= (b.lat(), b.lon()) {
        Geodesic.distance(pa, pb)
    } else {
        Geodesic.distance(pb, pa)
    };
    (metres / 1000.0).max(0.0)
}

/// Estimated travel time in minutes for `distance_km` at `speed_kmh`.
///
/// Fails with `InvalidSpeed` unless the speed is finite and positive.
pub fn estimate_minutes(distance_km: f64, speed_kmh: f64) -> Result<f64, EngineError> {
    validate_speed(speed_kmh)?;
    if distance_km <= 0.0 {
        return Ok(0.0);
    }
    Ok(distance_km / speed_kmh * 60.0)
}

/// Check that an assumed travel speed is usable.
pub fn validate_speed(speed_kmh: f64) -> Result<(), EngineError> {
    if speed_kmh.is_finite() && speed_kmh > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSpeed { speed_kmh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::coord;

    #[test]
    fn zero_distance_for_same_point() {
        let a = coord(12.9716, 77.5946);
        assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // 1 degree of longitude on the WGS-84 equator is ~111.32 km.
        let d = distance_km(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111.32).abs() < 0.01, "got {d}");
    }

    #[test]
    fn london_to_manchester() {
        let london = coord(51.5074, -0.1278);
        let manchester = coord(53.4808, -2.2426);
        let d = distance_km(london, manchester);
        assert!((d - 262.0).abs() < 2.0, "got {d}");
    }

    #[test]
    fn estimate_minutes_at_default_speed() {
        assert_eq!(estimate_minutes(40.0, DEFAULT_SPEED_KMH).unwrap(), 60.0);
        assert_eq!(estimate_minutes(10.0, 60.0).unwrap(), 10.0);
        assert_eq!(estimate_minutes(0.0, 60.0).unwrap(), 0.0);
    }

    #[test]
    fn estimate_minutes_rejects_bad_speed() {
        assert_eq!(
            estimate_minutes(10.0, 0.0),
            Err(EngineError::InvalidSpeed { speed_kmh: 0.0 })
        );
        assert!(estimate_minutes(10.0, -5.0).is_err());
        assert!(estimate_minutes(10.0, f64::NAN).is_err());
    }
}
