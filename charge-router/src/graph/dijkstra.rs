//! Dijkstra shortest paths over a [`StationGraph`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::{error, trace};

use super::builder::{NodeId, NodeIndex, StationGraph};
use crate::error::EngineError;

/// A relaxation must beat the current tentative distance by more than this
/// (in km) to replace it. Keeps rounding noise in geodesic sums from
/// preferring a detour over an equally long direct edge.
const RELAX_EPSILON_KM: f64 = 1e-9;

#[derive(Copy, Clone, PartialEq, Eq)]
struct State {
    cost: OrderedFloat<f64>,
    node: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost, then by node index (= lexicographic node id).
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nodes and edges excluded from a search.
pub(super) struct Blocked {
    nodes: Vec<bool>,
    edges: HashSet<(usize, usize)>,
}

impl Blocked {
    pub(super) fn none(node_count: usize) -> Self {
        Self {
            nodes: vec![false; node_count],
            edges: HashSet::new(),
        }
    }

    pub(super) fn block_node(&mut self, node: usize) {
        self.nodes[node] = true;
    }

    pub(super) fn block_edge(&mut self, a: usize, b: usize) {
        self.edges.insert((a.min(b), a.max(b)));
    }

    fn allows(&self, from: usize, to: usize) -> bool {
        !self.nodes[to] && !self.edges.contains(&(from.min(to), from.max(to)))
    }
}

/// Tentative distances and predecessors from one Dijkstra run.
pub(super) struct Search {
    source: usize,
    dist: Vec<f64>,
    prev: Vec<Option<usize>>,
}

impl Search {
    /// Run Dijkstra from `source`, stopping once `target` is settled.
    pub(super) fn run(
        graph: &StationGraph<'_>,
        source: usize,
        target: Option<usize>,
        blocked: &Blocked,
    ) -> Self {
        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::with_capacity(n);
        let mut pops = 0usize;

        dist[source] = 0.0;
        heap.push(State {
            cost: OrderedFloat(0.0),
            node: source,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if settled[node] {
                continue;
            }
            settled[node] = true;
            pops += 1;

            if target == Some(node) {
                break;
            }

            for &(next, weight) in graph.neighbours(node) {
                if settled[next] || !blocked.allows(node, next) {
                    continue;
                }
                let next_cost = cost.0 + weight;
                if next_cost < dist[next] - RELAX_EPSILON_KM {
                    dist[next] = next_cost;
                    prev[next] = Some(node);
                    heap.push(State {
                        cost: OrderedFloat(next_cost),
                        node: next,
                    });
                }
            }
        }

        trace!(source, pops, nodes = n, "dijkstra finished");

        Self { source, dist, prev }
    }

    /// Node indices from source to `dest`, or None if unreachable.
    pub(super) fn path_to(&self, dest: usize) -> Option<(Vec<usize>, f64)> {
        if !self.dist[dest].is_finite() {
            return None;
        }
        let mut nodes = vec![dest];
        let mut current = dest;
        while current != self.source {
            current = self.prev[current]?;
            nodes.push(current);
        }
        nodes.reverse();
        Some((nodes, self.dist[dest]))
    }
}

/// An ordered route through the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    /// Nodes from source to destination, inclusive.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along the route.
    pub distance_km: f64,
}

impl Path {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub(super) fn from_indices(
        graph: &StationGraph<'_>,
        indices: &[usize],
        distance_km: f64,
    ) -> Self {
        Self {
            nodes: indices.iter().map(|&i| graph.id_at(NodeIndex(i))).collect(),
            distance_km,
        }
    }
}

/// Shortest-path queries against one built graph.
///
/// Holds no mutable state, so any number of queries (including concurrent
/// ones) can run against the same graph.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'g, 'a> {
    graph: &'g StationGraph<'a>,
}

impl<'g, 'a> PathFinder<'g, 'a> {
    pub fn new(graph: &'g StationGraph<'a>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g StationGraph<'a> {
        self.graph
    }

    /// Shortest path from `source` to `dest`.
    ///
    /// When two frontier nodes have equal tentative distance, the one with
    /// the smaller id is expanded first, so results are reproducible.
    pub fn shortest_path(&self, source: &NodeId, dest: &NodeId) -> Result<Path, EngineError> {
        let s = self.graph.require_index(source)?;
        let d = self.graph.require_index(dest)?;
        let blocked = Blocked::none(self.graph.node_count());
        let search = Search::run(self.graph, s.0, Some(d.0), &blocked);
        match search.path_to(d.0) {
            Some((indices, distance)) => Ok(Path::from_indices(self.graph, &indices, distance)),
            None => Err(no_path(source, dest)),
        }
    }

    /// Run one full search from `source` and answer any destination from it.
    pub fn shortest_path_tree(
        &self,
        source: &NodeId,
    ) -> Result<ShortestPathTree<'g, 'a>, EngineError> {
        let s = self.graph.require_index(source)?;
        let blocked = Blocked::none(self.graph.node_count());
        let search = Search::run(self.graph, s.0, None, &blocked);
        Ok(ShortestPathTree {
            graph: self.graph,
            source: source.clone(),
            search,
        })
    }
}

/// All shortest paths from one source.
pub struct ShortestPathTree<'g, 'a> {
    graph: &'g StationGraph<'a>,
    source: NodeId,
    search: Search,
}

impl ShortestPathTree<'_, '_> {
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// Path from the tree's source to `dest`.
    pub fn path_to(&self, dest: &NodeId) -> Result<Path, EngineError> {
        let d = self.graph.require_index(dest)?;
        match self.search.path_to(d.0) {
            Some((indices, distance)) => Ok(Path::from_indices(self.graph, &indices, distance)),
            None => Err(no_path(&self.source, dest)),
        }
    }
}

pub(super) fn no_path(from: &NodeId, to: &NodeId) -> EngineError {
    // Construction links the origin to every station, so this is a defect.
    error!(%from, %to, "no path found between graph nodes");
    EngineError::NoPathFound {
        from: from.clone(),
        to: to.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{coord, station};
    use crate::domain::{Station, StationId};
    use crate::geodesy::distance_km;
    use crate::graph::GraphBuilder;

    fn sid(s: &str) -> NodeId {
        NodeId::Station(StationId::new(s))
    }

    #[test]
    fn direct_edge_in_complete_graph() {
        let a = station("A", 0.0, 1.0);
        let b = station("B", 1.0, 0.0);
        let g = GraphBuilder::complete()
            .build(coord(0.0, 0.0), &[&a, &b])
            .unwrap();
        let finder = PathFinder::new(&g);

        let path = finder.shortest_path(&NodeId::Origin, &sid("B")).unwrap();
        assert_eq!(path.nodes, vec![NodeId::Origin, sid("B")]);
        assert_eq!(path.hops(), 1);
        assert_eq!(
            path.distance_km,
            distance_km(coord(0.0, 0.0), b.coordinate)
        );
    }

    #[test]
    fn path_to_self_is_empty() {
        let a = station("A", 0.0, 1.0);
        let g = GraphBuilder::complete()
            .build(coord(0.0, 0.0), &[&a])
            .unwrap();
        let path = PathFinder::new(&g).shortest_path(&sid("A"), &sid("A")).unwrap();
        assert_eq!(path.nodes, vec![sid("A")]);
        assert_eq!(path.distance_km, 0.0);
        assert_eq!(path.hops(), 0);
    }

    #[test]
    fn k_limited_station_to_station_goes_multi_hop() {
        // Stations along the equator with growing gaps; k=1 only links
        // nearest neighbours, so A to E must walk the chain or go via origin.
        let stations = vec![
            station("A", 0.0, 1.0),
            station("B", 0.0, 2.5),
            station("C", 0.0, 4.5),
            station("D", 0.0, 7.0),
            station("E", 0.0, 10.0),
        ];
        let refs: Vec<&Station> = stations.iter().collect();
        let g = GraphBuilder::k_nearest(1)
            .build(coord(0.0, 0.0), &refs)
            .unwrap();

        let path = PathFinder::new(&g).shortest_path(&sid("A"), &sid("E")).unwrap();
        assert!(path.hops() >= 2);
        let direct = distance_km(stations[0].coordinate, stations[4].coordinate);
        assert!(path.distance_km >= direct - 1e-6);
    }

    #[test]
    fn equal_cost_frontier_expands_smaller_id_first() {
        // From Z, B and C are equally far and D hangs off both. With only
        // nearest-neighbour links the route to D must pass through B or C,
        // and the smaller id wins the tie.
        let z = station("Z", 0.0, 1.0);
        let b = station("B", 1.0, 2.0);
        let c = station("C", -1.0, 2.0);
        let d = station("D", 0.0, 3.0);
        let mut heap = BinaryHeap::new();
        heap.push(State { cost: OrderedFloat(1.0), node: 3 });
        heap.push(State { cost: OrderedFloat(1.0), node: 2 });
        heap.push(State { cost: OrderedFloat(0.5), node: 4 });
        assert_eq!(heap.pop().map(|s| s.node), Some(4));
        assert_eq!(heap.pop().map(|s| s.node), Some(2));
        assert_eq!(heap.pop().map(|s| s.node), Some(3));

        let g = GraphBuilder::k_nearest(2)
            .build(coord(0.0, -30.0), &[&d, &c, &b, &z])
            .unwrap();
        let finder = PathFinder::new(&g);
        let path = finder.shortest_path(&sid("Z"), &sid("D")).unwrap();
        let again = finder.shortest_path(&sid("Z"), &sid("D")).unwrap();
        assert_eq!(path, again);
        assert_eq!(path.nodes, vec![sid("Z"), sid("B"), sid("D")]);
    }

    #[test]
    fn unknown_node_rejected() {
        let a = station("A", 0.0, 1.0);
        let g = GraphBuilder::complete()
            .build(coord(0.0, 0.0), &[&a])
            .unwrap();
        let err = PathFinder::new(&g)
            .shortest_path(&NodeId::Origin, &sid("nope"))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownStation {
                id: StationId::new("nope")
            }
        );
    }

    #[test]
    fn tree_answers_every_destination() {
        let stations: Vec<Station> = (0..6)
            .map(|i| station(&format!("S{i}"), i as f64 * 0.3, 1.0 + i as f64 * 0.7))
            .collect();
        let refs: Vec<&Station> = stations.iter().collect();
        let g = GraphBuilder::k_nearest(2)
            .build(coord(0.0, 0.0), &refs)
            .unwrap();
        let finder = PathFinder::new(&g);
        let tree = finder.shortest_path_tree(&NodeId::Origin).unwrap();

        for s in &stations {
            let dest = NodeId::Station(s.id.clone());
            let from_tree = tree.path_to(&dest).unwrap();
            let single = finder.shortest_path(&NodeId::Origin, &dest).unwrap();
            assert_eq!(from_tree, single);
        }
    }

    #[test]
    fn no_path_error_names_both_ends() {
        let err = no_path(&NodeId::Origin, &sid("B"));
        assert_eq!(
            err,
            EngineError::NoPathFound {
                from: NodeId::Origin,
                to: sid("B"),
            }
        );
        assert!(!err.is_caller_error());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::fixtures::{coord, station};
    use crate::domain::Station;
    use crate::geodesy::distance_km;
    use crate::graph::GraphBuilder;
    use proptest::prelude::*;

    fn stations_strategy() -> impl Strategy<Value = Vec<Station>> {
        prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 1..12).prop_map(|coords| {
            coords
                .into_iter()
                .enumerate()
                .map(|(i, (lat, lon))| station(&format!("S{i:02}"), lat, lon))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn path_never_shorter_than_geodesic(
            stations in stations_strategy(),
            k in prop::option::of(0usize..4),
        ) {
            let refs: Vec<&Station> = stations.iter().collect();
            let builder = k.map_or_else(GraphBuilder::complete, GraphBuilder::k_nearest);
            let origin = coord(0.0, 0.0);
            let g = builder.build(origin, &refs).unwrap();
            let finder = PathFinder::new(&g);

            for s in &stations {
                let dest = NodeId::Station(s.id.clone());
                let path = finder.shortest_path(&NodeId::Origin, &dest).unwrap();
                let direct = distance_km(origin, s.coordinate);
                prop_assert!(path.distance_km >= direct - 1e-6);
                // The origin links to every station directly.
                prop_assert!((path.distance_km - direct).abs() < 1e-6);
            }
        }

        #[test]
        fn every_station_reachable_with_k_one(stations in stations_strategy()) {
            let refs: Vec<&Station> = stations.iter().collect();
            let g = GraphBuilder::k_nearest(1).build(coord(0.0, 0.0), &refs).unwrap();
            let finder = PathFinder::new(&g);
            for a in &stations {
                for b in &stations {
                    let from = NodeId::Station(a.id.clone());
                    let to = NodeId::Station(b.id.clone());
                    prop_assert!(finder.shortest_path(&from, &to).is_ok());
                }
            }
        }
    }
}
