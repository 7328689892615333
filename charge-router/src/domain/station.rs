//! Charging station record types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Availability, Connector, Coordinate};

/// Unique identifier of a charging station (e.g. "IN001").
///
/// Ordering is lexicographic on the underlying string, which is what the
/// engine uses for deterministic tie-breaking.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Create a station id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        StationId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a station record violates its field invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station {id}: {reason}")]
pub struct InvalidStation {
    pub id: String,
    pub reason: &'static str,
}

/// A charging station, immutable once loaded.
///
/// The engine only ever borrows stations for the duration of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub coordinate: Coordinate,
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    pub connectors: BTreeSet<Connector>,
    /// Maximum charging power in kW (> 0).
    pub power_kw: f64,
    /// Price per kWh in the local currency (>= 0).
    pub price_per_kwh: f64,
    /// User rating on a 0-5 scale.
    pub rating: f64,
    pub availability: Availability,
}

impl Station {
    /// Check the numeric field invariants of this record.
    pub fn validate(&self) -> Result<(), InvalidStation> {
        let fail = |reason| {
            Err(InvalidStation {
                id: self.id.to_string(),
                reason,
            })
        };

        if self.id.as_str().is_empty() {
            return fail("id must not be empty");
        }
        if !(self.power_kw.is_finite() && self.power_kw > 0.0) {
            return fail("power_kw must be greater than zero");
        }
        if !(self.price_per_kwh.is_finite() && self.price_per_kwh >= 0.0) {
            return fail("price_per_kwh must not be negative");
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return fail("rating must be between 0 and 5");
        }
        Ok(())
    }

    /// Returns true if the station offers the given connector.
    pub fn has_connector(&self, connector: Connector) -> bool {
        self.connectors.contains(&connector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::station;

    #[test]
    fn station_id_ordering_is_lexicographic() {
        let mut ids = vec![
            StationId::new("US002"),
            StationId::new("IN010"),
            StationId::new("IN002"),
        ];
        ids.sort();
        let ids: Vec<_> = ids.iter().map(StationId::as_str).collect();
        assert_eq!(ids, ["IN002", "IN010", "US002"]);
    }

    #[test]
    fn station_id_display() {
        let id = StationId::new("UK001");
        assert_eq!(id.to_string(), "UK001");
        assert_eq!(format!("{:?}", id), "StationId(UK001)");
    }

    #[test]
    fn validate_accepts_fixture() {
        assert!(station("A", 0.0, 1.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let mut s = station("A", 0.0, 1.0);
        s.power_kw = 0.0;
        assert_eq!(
            s.validate().unwrap_err().reason,
            "power_kw must be greater than zero"
        );

        let mut s = station("A", 0.0, 1.0);
        s.price_per_kwh = -0.01;
        assert!(s.validate().is_err());

        let mut s = station("A", 0.0, 1.0);
        s.rating = 5.5;
        assert!(s.validate().is_err());

        let s = station("", 0.0, 1.0);
        assert_eq!(s.validate().unwrap_err().reason, "id must not be empty");
    }

    #[test]
    fn deserialize_record() {
        let json = r#"{
            "id": "IN001",
            "name": "Tata Power EZ Charge - Bangalore",
            "coordinate": {"lat": 12.9716, "lon": 77.5946},
            "country": "India",
            "city": "Bangalore",
            "connectors": ["CCS", "CHAdeMO", "Type 2"],
            "power_kw": 60,
            "price_per_kwh": 0.10,
            "rating": 4.1,
            "availability": "Available"
        }"#;
        let s: Station = serde_json::from_str(json).unwrap();
        assert_eq!(s.id.as_str(), "IN001");
        assert_eq!(s.address, None);
        assert!(s.has_connector(Connector::Type2));
        assert!(!s.has_connector(Connector::J1772));
        assert!(s.validate().is_ok());
    }
}
