//! Station catalog: an immutable snapshot of known charging stations.

mod error;
mod filter;

pub use error::StationError;
pub use filter::CandidateFilter;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{Coordinate, Station, StationId};

/// Validated, read-only set of stations, ordered by id.
///
/// Shared between request handlers behind an `Arc`; nothing mutates it after
/// loading.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
    index: HashMap<StationId, usize>,
}

/// Summary figures for a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_stations: usize,
    pub countries: usize,
    pub cities: usize,
    pub avg_power_kw: Option<f64>,
    pub avg_rating: Option<f64>,
    pub avg_price_per_kwh: Option<f64>,
    /// Station count per availability status.
    pub availability: BTreeMap<String, usize>,
}

impl StationCatalog {
    /// Build a catalog from station records, validating each one.
    pub fn from_stations(mut stations: Vec<Station>) -> Result<Self, StationError> {
        for station in &stations {
            station.validate()?;
        }
        stations.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = stations.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(StationError::Duplicate {
                id: pair[0].id.clone(),
            });
        }

        let index = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Ok(Self { stations, index })
    }

    /// Parse a catalog from a JSON array of station records.
    pub fn from_json(json: &str) -> Result<Self, StationError> {
        let stations: Vec<Station> = serde_json::from_str(json)?;
        Self::from_stations(stations)
    }

    /// Load a catalog from a JSON snapshot on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), stations = catalog.len(), "loaded station catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Look up a station by id.
    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.index.get(id).map(|&i| &self.stations[i])
    }

    /// All stations, ordered by id.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Stations passing `filter` for a query from `origin`, ordered by id.
    pub fn candidates(&self, filter: &CandidateFilter, origin: Coordinate) -> Vec<&Station> {
        filter.apply(&self.stations, origin)
    }

    /// Summary figures over the whole catalog.
    pub fn statistics(&self) -> CatalogStats {
        let mean = |f: fn(&Station) -> f64| {
            (!self.is_empty())
                .then(|| self.stations.iter().map(f).sum::<f64>() / self.len() as f64)
        };

        let mut availability = BTreeMap::new();
        for station in &self.stations {
            *availability
                .entry(station.availability.to_string())
                .or_insert(0) += 1;
        }

        CatalogStats {
            total_stations: self.len(),
            countries: self.stations.iter().map(|s| &s.country).collect::<BTreeSet<_>>().len(),
            cities: self.stations.iter().map(|s| &s.city).collect::<BTreeSet<_>>().len(),
            avg_power_kw: mean(|s| s.power_kw),
            avg_rating: mean(|s| s.rating),
            avg_price_per_kwh: mean(|s| s.price_per_kwh),
            availability,
        }
    }
}
