//! Station builders shared by unit tests.

use std::collections::BTreeSet;

use super::{Availability, Connector, Coordinate, Station, StationId};

/// An available 50 kW CCS station with a 4.0 rating at `(lat, lon)`.
pub(crate) fn station(id: &str, lat: f64, lon: f64) -> Station {
    Station {
        id: StationId::new(id),
        name: format!("Station {id}"),
        coordinate: Coordinate::new(lat, lon).unwrap(),
        country: "Testland".to_string(),
        city: "Testville".to_string(),
        address: None,
        connectors: BTreeSet::from([Connector::Ccs]),
        power_kw: 50.0,
        price_per_kwh: 0.25,
        rating: 4.0,
        availability: Availability::Available,
    }
}

/// A station with every scoring attribute set explicitly.
pub(crate) fn station_with(
    id: &str,
    lat: f64,
    lon: f64,
    price_per_kwh: f64,
    power_kw: f64,
    rating: f64,
    availability: Availability,
) -> Station {
    Station {
        price_per_kwh,
        power_kw,
        rating,
        availability,
        ..station(id, lat, lon)
    }
}

pub(crate) fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}
