//! Per-query station graph construction.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::trace;

use crate::domain::{Coordinate, Station, StationId};
use crate::error::EngineError;
use crate::geodesy::distance_km;

/// Identity of a graph node: the query origin or a station.
///
/// `Origin` orders before every station; stations order by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    Origin,
    Station(StationId),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Origin => f.write_str("origin"),
            NodeId::Station(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<StationId> for NodeId {
    fn from(id: StationId) -> Self {
        NodeId::Station(id)
    }
}

/// Position of a node in a [`StationGraph`].
///
/// Index 0 is always the origin; stations follow in ascending id order, so
/// comparing indices is the same as comparing node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub usize);

impl NodeIndex {
    pub const ORIGIN: NodeIndex = NodeIndex(0);
}

/// A node: either the user's origin or a borrowed station.
#[derive(Debug, Clone, Copy)]
pub enum GraphNode<'a> {
    Origin(Coordinate),
    Station(&'a Station),
}

impl GraphNode<'_> {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            GraphNode::Origin(c) => *c,
            GraphNode::Station(s) => s.coordinate,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            GraphNode::Origin(_) => NodeId::Origin,
            GraphNode::Station(s) => NodeId::Station(s.id.clone()),
        }
    }
}

/// An undirected edge weighted by geodesic distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub weight_km: f64,
}

/// Weighted undirected graph over an origin and a candidate set.
///
/// Built fresh for each query and dropped with it.
#[derive(Debug, Clone)]
pub struct StationGraph<'a> {
    nodes: Vec<GraphNode<'a>>,
    edges: Vec<Edge>,
    /// Neighbours of each node as `(neighbour, weight_km)`, sorted by neighbour.
    adjacency: Vec<Vec<(usize, f64)>>,
    by_id: HashMap<&'a StationId, usize>,
}

impl<'a> StationGraph<'a> {
    /// Number of nodes, including the origin.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GraphNode<'a>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: NodeIndex) -> Option<&GraphNode<'a>> {
        self.nodes.get(index.0)
    }

    /// Look up the index of a node id.
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        match id {
            NodeId::Origin => Some(NodeIndex::ORIGIN),
            NodeId::Station(sid) => self.by_id.get(sid).map(|&i| NodeIndex(i)),
        }
    }

    /// Like [`index_of`](Self::index_of), failing with `UnknownStation`.
    pub fn require_index(&self, id: &NodeId) -> Result<NodeIndex, EngineError> {
        match id {
            NodeId::Origin => Ok(NodeIndex::ORIGIN),
            NodeId::Station(sid) => self
                .by_id
                .get(sid)
                .map(|&i| NodeIndex(i))
                .ok_or_else(|| EngineError::UnknownStation { id: sid.clone() }),
        }
    }

    /// Node id at an index. Panics if out of bounds.
    pub fn id_at(&self, index: NodeIndex) -> NodeId {
        self.nodes[index.0].id()
    }

    /// Weight of the edge between two nodes, if they are adjacent.
    pub fn edge_weight(&self, a: NodeIndex, b: NodeIndex) -> Option<f64> {
        let neighbours = self.adjacency.get(a.0)?;
        neighbours
            .binary_search_by_key(&b.0, |&(n, _)| n)
            .ok()
            .map(|pos| neighbours[pos].1)
    }

    pub(crate) fn neighbours(&self, index: usize) -> &[(usize, f64)] {
        &self.adjacency[index]
    }
}

/// Builds a [`StationGraph`] for one query.
///
/// With no neighbour limit the graph is complete. With a limit of `k`, each
/// node links to its `k` geodesically nearest other nodes, and the origin
/// always links directly to every station so every station stays reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    max_neighbors: Option<usize>,
}

impl GraphBuilder {
    /// A builder producing complete graphs.
    pub fn complete() -> Self {
        Self {
            max_neighbors: None,
        }
    }

    /// A builder limiting each node to its `k` nearest neighbours.
    pub fn k_nearest(k: usize) -> Self {
        Self {
            max_neighbors: Some(k),
        }
    }

    pub fn max_neighbors(&self) -> Option<usize> {
        self.max_neighbors
    }

    /// Build the graph over `origin` plus `stations`.
    ///
    /// Fails with `EmptyCandidateSet` when `stations` is empty and with
    /// `DuplicateStation` when an id appears twice.
    pub fn build<'a>(
        &self,
        origin: Coordinate,
        stations: &[&'a Station],
    ) -> Result<StationGraph<'a>, EngineError> {
        if stations.is_empty() {
            return Err(EngineError::EmptyCandidateSet);
        }

        let mut sorted: Vec<&'a Station> = stations.to_vec();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = sorted.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(EngineError::DuplicateStation {
                id: pair[0].id.clone(),
            });
        }

        let mut nodes = Vec::with_capacity(sorted.len() + 1);
        nodes.push(GraphNode::Origin(origin));
        nodes.extend(sorted.iter().map(|s| GraphNode::Station(*s)));

        let by_id = sorted
            .iter()
            .enumerate()
            .map(|(i, s)| (&s.id, i + 1))
            .collect();

        let n = nodes.len();
        let coords: Vec<Coordinate> = nodes.iter().map(GraphNode::coordinate).collect();
        let mut dist = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance_km(coords[i], coords[j]);
                dist[i][j] = d;
                dist[j][i] = d;
            }
        }

        // Undirected pairs stored as (low, high) so each edge appears once.
        let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
        match self.max_neighbors {
            None => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        pairs.insert((i, j));
                    }
                }
            }
            Some(k) => {
                for j in 1..n {
                    pairs.insert((0, j));
                }
                for i in 0..n {
                    let mut others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
                    others.sort_by(|&a, &b| dist[i][a].total_cmp(&dist[i][b]).then(a.cmp(&b)));
                    for &j in others.iter().take(k) {
                        pairs.insert((i.min(j), i.max(j)));
                    }
                }
            }
        }

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut edges = Vec::with_capacity(pairs.len());
        for &(i, j) in &pairs {
            let w = dist[i][j];
            adjacency[i].push((j, w));
            adjacency[j].push((i, w));
            edges.push(Edge {
                from: NodeIndex(i),
                to: NodeIndex(j),
                weight_km: w,
            });
        }
        for list in &mut adjacency {
            list.sort_by_key(|&(j, _)| j);
        }

        trace!(
            nodes = n,
            edges = edges.len(),
            max_neighbors = ?self.max_neighbors,
            "built station graph"
        );

        Ok(StationGraph {
            nodes,
            edges,
            adjacency,
            by_id,
        })
    }
}
