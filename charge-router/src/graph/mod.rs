//! Per-query routing graph and shortest paths.
//!
//! A graph is built over the query origin plus a candidate set, weighted by
//! geodesic distance, queried with Dijkstra, and dropped when the query ends.
//! Nothing here is cached across queries because the candidate set changes
//! every time.

mod alternatives;
mod builder;
mod dijkstra;

pub use alternatives::alternative_routes;
pub use builder::{Edge, GraphBuilder, GraphNode, NodeId, NodeIndex, StationGraph};
pub use dijkstra::{Path, PathFinder, ShortestPathTree};
