//! Alternative routes between two nodes (Yen's k shortest loopless paths).

use ordered_float::OrderedFloat;
use tracing::debug;

use super::builder::{NodeId, NodeIndex, StationGraph};
use super::dijkstra::{Blocked, Path, Search, no_path};
use crate::error::EngineError;

/// Up to `k` loopless paths from `source` to `dest`, shortest first.
///
/// The first path is the one [`PathFinder::shortest_path`] returns. Paths of
/// equal length are ordered by their node sequence, smaller ids first.
///
/// [`PathFinder::shortest_path`]: super::PathFinder::shortest_path
pub fn alternative_routes(
    graph: &StationGraph<'_>,
    source: &NodeId,
    dest: &NodeId,
    k: usize,
) -> Result<Vec<Path>, EngineError> {
    let s = graph.require_index(source)?.0;
    let d = graph.require_index(dest)?.0;
    if k == 0 {
        return Ok(Vec::new());
    }

    let first = Search::run(graph, s, Some(d), &Blocked::none(graph.node_count()))
        .path_to(d)
        .map(|(nodes, cost)| (cost, nodes))
        .ok_or_else(|| no_path(source, dest))?;

    let mut accepted: Vec<(f64, Vec<usize>)> = vec![first];
    let mut candidates: Vec<(f64, Vec<usize>)> = Vec::new();

    while accepted.len() < k {
        let (_, last) = &accepted[accepted.len() - 1];

        for spur_pos in 0..last.len().saturating_sub(1) {
            let spur = last[spur_pos];
            let root = &last[..=spur_pos];

            let mut blocked = Blocked::none(graph.node_count());
            for (_, path) in &accepted {
                if path.len() > spur_pos + 1 && &path[..=spur_pos] == root {
                    blocked.block_edge(path[spur_pos], path[spur_pos + 1]);
                }
            }
            for &node in &root[..spur_pos] {
                blocked.block_node(node);
            }

            let Some((spur_path, _)) = Search::run(graph, spur, Some(d), &blocked).path_to(d)
            else {
                continue;
            };

            let mut full: Vec<usize> = root[..spur_pos].to_vec();
            full.extend(spur_path);
            let Some(cost) = path_cost(graph, &full) else {
                continue;
            };

            let known = accepted.iter().chain(candidates.iter()).any(|(_, p)| *p == full);
            if !known {
                candidates.push((cost, full));
            }
        }

        if candidates.is_empty() {
            break;
        }

        let best = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                OrderedFloat(a.0)
                    .cmp(&OrderedFloat(b.0))
                    .then_with(|| a.1.cmp(&b.1))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);
        accepted.push(candidates.swap_remove(best));
    }

    debug!(
        %source,
        %dest,
        requested = k,
        found = accepted.len(),
        "computed alternative routes"
    );

    Ok(accepted
        .into_iter()
        .map(|(cost, nodes)| Path::from_indices(graph, &nodes, cost))
        .collect())
}

/// Sum of edge weights along `nodes`, or None if two consecutive nodes are
/// not adjacent.
fn path_cost(graph: &StationGraph<'_>, nodes: &[usize]) -> Option<f64> {
    nodes.windows(2).try_fold(0.0, |acc, w| {
        graph
            .edge_weight(NodeIndex(w[0]), NodeIndex(w[1]))
            .map(|weight| acc + weight)
    })
}
