//! Query orchestration: score, shortlist, route.

use std::borrow::Borrow;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::config::RankingConfig;
use crate::domain::{Coordinate, Station, StationId};
use crate::error::EngineError;
use crate::geodesy::{estimate_minutes, validate_speed};
use crate::graph::{NodeId, Path, PathFinder, alternative_routes};
use crate::scoring::{ScoreWeights, route_efficiency, score_stations};

/// One entry of a ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStation<'a> {
    pub station: &'a Station,
    /// Composite score in [0, 1].
    pub score: f64,
    /// Straight-line geodesic distance from the origin.
    pub direct_distance_km: f64,
    /// Length of the shortest graph route from the origin.
    pub route_distance_km: f64,
    pub estimated_minutes: f64,
    /// Absolute efficiency of the routed trip, 0-100.
    pub efficiency: f64,
    pub route: Path,
}

/// Shortlisted stations in rank order (descending score).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult<'a> {
    pub entries: Vec<RankedStation<'a>>,
    /// Size of the candidate set that was scored.
    pub candidates: usize,
}

impl<'a> RankedResult<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedStation<'a>> {
        self.entries.iter()
    }

    /// The best-ranked station.
    pub fn best(&self) -> Option<&RankedStation<'a>> {
        self.entries.first()
    }
}

/// A route option with its travel-time estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub path: Path,
    pub estimated_minutes: f64,
}

/// Entry point for ranking queries.
///
/// Holds only configuration; every query builds its own graph.
#[derive(Debug, Clone, Default)]
pub struct RankingCoordinator {
    config: RankingConfig,
}

impl RankingCoordinator {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank `stations` for a user at `origin`.
    ///
    /// Scores the whole candidate set, keeps the best `top_k` (clamped to the
    /// number of candidates), routes to each over a graph containing only
    /// the shortlist, and returns them in score order. Every record and id
    /// is checked before the shortlist is cut.
    pub fn find_best_stations<'a, S: Borrow<Station>>(
        &self,
        origin: Coordinate,
        stations: &'a [S],
        weights: &ScoreWeights,
        top_k: usize,
        assumed_speed_kmh: f64,
    ) -> Result<RankedResult<'a>, EngineError> {
        if top_k == 0 {
            return Err(EngineError::InvalidTopK { top_k: 0 });
        }
        validate_speed(assumed_speed_kmh)?;
        let started = Instant::now();

        let scored = score_stations(stations, origin, weights)?;
        let shortlist = &scored[..top_k.min(scored.len())];
        let members: Vec<&'a Station> = shortlist.iter().map(|s| s.station).collect();

        let graph = self
            .config
            .graph_builder(members.len())
            .build(origin, &members)?;
        let finder = PathFinder::new(&graph);

        let entries = shortlist
            .par_iter()
            .map(|scored| {
                let dest = NodeId::Station(scored.station.id.clone());
                let route = finder.shortest_path(&NodeId::Origin, &dest)?;
                let estimated_minutes = estimate_minutes(route.distance_km, assumed_speed_kmh)?;
                Ok(RankedStation {
                    station: scored.station,
                    score: scored.score,
                    direct_distance_km: scored.features.distance_km,
                    route_distance_km: route.distance_km,
                    estimated_minutes,
                    efficiency: route_efficiency(route.distance_km, scored.station),
                    route,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        debug!(
            candidates = stations.len(),
            shortlist = entries.len(),
            graph_edges = graph.edge_count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "ranked stations"
        );

        Ok(RankedResult {
            entries,
            candidates: stations.len(),
        })
    }

    /// Rank with this coordinator's configured `top_k` and speed.
    pub fn rank<'a, S: Borrow<Station>>(
        &self,
        origin: Coordinate,
        stations: &'a [S],
        weights: &ScoreWeights,
    ) -> Result<RankedResult<'a>, EngineError> {
        self.find_best_stations(
            origin,
            stations,
            weights,
            self.config.top_k,
            self.config.assumed_speed_kmh,
        )
    }

    /// The closest station by direct distance, with its route.
    pub fn nearest_station<'a, S: Borrow<Station>>(
        &self,
        origin: Coordinate,
        stations: &'a [S],
        assumed_speed_kmh: f64,
    ) -> Result<RankedStation<'a>, EngineError> {
        let result = self.find_best_stations(
            origin,
            stations,
            &ScoreWeights::distance_only(),
            1,
            assumed_speed_kmh,
        )?;
        result
            .entries
            .into_iter()
            .next()
            .ok_or(EngineError::EmptyInput)
    }

    /// Up to `k` alternative routes from `origin` to `destination`, using
    /// every station in `stations` as a possible intermediate stop.
    pub fn route_alternatives<S: Borrow<Station>>(
        &self,
        origin: Coordinate,
        stations: &[S],
        destination: &StationId,
        k: usize,
        assumed_speed_kmh: f64,
    ) -> Result<Vec<RouteOption>, EngineError> {
        validate_speed(assumed_speed_kmh)?;
        let members: Vec<&Station> = stations
            .iter()
            .map(<S as Borrow<Station>>::borrow)
            .collect();
        let graph = self
            .config
            .graph_builder(members.len())
            .build(origin, &members)?;

        let dest = NodeId::Station(destination.clone());
        alternative_routes(&graph, &NodeId::Origin, &dest, k)?
            .into_iter()
            .map(|path| {
                let estimated_minutes = estimate_minutes(path.distance_km, assumed_speed_kmh)?;
                Ok(RouteOption {
                    path,
                    estimated_minutes,
                })
            })
            .collect()
    }
}
