//! Multi-stop trip planning.

use std::borrow::Borrow;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::coordinator::RankingCoordinator;
use crate::domain::{Coordinate, Station, StationId};
use crate::error::EngineError;
use crate::geodesy::{estimate_minutes, validate_speed};
use crate::graph::{NodeId, Path, PathFinder};

/// One leg of a trip, between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripLeg {
    pub from: NodeId,
    pub to: NodeId,
    pub path: Path,
    pub estimated_minutes: f64,
}

/// A trip from the origin through an ordered list of stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub legs: Vec<TripLeg>,
    pub total_distance_km: f64,
    pub total_minutes: f64,
}

impl TripPlan {
    /// Every node visited, origin first, without repeating leg joints.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = vec![NodeId::Origin];
        for leg in &self.legs {
            nodes.extend(leg.path.nodes.iter().skip(1).cloned());
        }
        nodes
    }
}

impl RankingCoordinator {
    /// Plan a trip visiting `stops` in order, starting from `origin`.
    ///
    /// Each stop must name a station in `stations` and appear only once.
    /// The graph is built over the stops alone.
    pub fn plan_trip<S: Borrow<Station>>(
        &self,
        origin: Coordinate,
        stations: &[S],
        stops: &[StationId],
        assumed_speed_kmh: f64,
    ) -> Result<TripPlan, EngineError> {
        validate_speed(assumed_speed_kmh)?;
        if stops.is_empty() {
            return Err(EngineError::EmptyCandidateSet);
        }

        let mut seen = HashSet::with_capacity(stops.len());
        let mut members: Vec<&Station> = Vec::with_capacity(stops.len());
        for id in stops {
            if !seen.insert(id) {
                return Err(EngineError::DuplicateStation { id: id.clone() });
            }
            let station = stations
                .iter()
                .map(<S as Borrow<Station>>::borrow)
                .find(|s| &s.id == id)
                .ok_or_else(|| EngineError::UnknownStation { id: id.clone() })?;
            members.push(station);
        }

        let graph = self
            .config()
            .graph_builder(members.len())
            .build(origin, &members)?;
        let finder = PathFinder::new(&graph);

        let mut legs = Vec::with_capacity(stops.len());
        let mut from = NodeId::Origin;
        for id in stops {
            let to = NodeId::Station(id.clone());
            let path = finder.shortest_path(&from, &to)?;
            let estimated_minutes = estimate_minutes(path.distance_km, assumed_speed_kmh)?;
            legs.push(TripLeg {
                from,
                to: to.clone(),
                path,
                estimated_minutes,
            });
            from = to;
        }

        let total_distance_km = legs.iter().map(|l| l.path.distance_km).sum();
        let total_minutes = legs.iter().map(|l| l.estimated_minutes).sum();
        debug!(stops = stops.len(), total_distance_km, "planned trip");

        Ok(TripPlan {
            legs,
            total_distance_km,
            total_minutes,
        })
    }
}
