//! Ranking configuration.

use crate::geodesy::DEFAULT_SPEED_KMH;
use crate::graph::GraphBuilder;

/// Configuration parameters for station ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    /// Number of top-scored stations to compute routes for.
    pub top_k: usize,

    /// Travel speed used for time estimates (km/h).
    pub assumed_speed_kmh: f64,

    /// Explicit neighbour limit per graph node.
    /// When set, every graph is k-limited regardless of size.
    pub max_neighbors: Option<usize>,

    /// Largest candidate count for which a complete graph is built
    /// when no explicit neighbour limit is set.
    pub complete_graph_threshold: usize,

    /// Neighbour limit used above `complete_graph_threshold`.
    pub fallback_neighbors: usize,
}

impl RankingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        top_k: usize,
        assumed_speed_kmh: f64,
        max_neighbors: Option<usize>,
        complete_graph_threshold: usize,
        fallback_neighbors: usize,
    ) -> Self {
        Self {
            top_k,
            assumed_speed_kmh,
            max_neighbors,
            complete_graph_threshold,
            fallback_neighbors,
        }
    }

    /// Graph builder to use for a graph over `station_count` stations.
    pub fn graph_builder(&self, station_count: usize) -> GraphBuilder {
        match self.max_neighbors {
            Some(k) => GraphBuilder::k_nearest(k),
            None if station_count <= self.complete_graph_threshold => GraphBuilder::complete(),
            None => GraphBuilder::k_nearest(self.fallback_neighbors),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            assumed_speed_kmh: DEFAULT_SPEED_KMH,
            max_neighbors: None,
            complete_graph_threshold: 50,
            fallback_neighbors: 8,
        }
    }
}
