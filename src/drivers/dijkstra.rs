//! Shortest-path driver (Dijkstra)
//!
//! The next node is picked by scanning the unvisited nodes in graph order
//! and taking the first one with the smallest finite distance. This linear
//! scan stands in for a priority queue and fixes the tie-break, so traces
//! are reproducible step for step.
//!
//! Every edge to an unvisited neighbor gets a `considering` step; an edge
//! that shortens the neighbor's distance gets a further `added` step. The
//! run stops at the target, or once every remaining node is unreachable.

use super::errors::GenerateError;
use super::GenerateOptions;
use crate::model::graph::{EdgeKey, Graph, NodeId};
use crate::snapshot::{Aux, HighlightKind, Highlights, Mark, State, StepList};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Result of a Dijkstra run
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub steps: StepList,
    /// `None` means unreachable (or not settled before the run stopped)
    pub distances: BTreeMap<NodeId, Option<u64>>,
    pub previous: BTreeMap<NodeId, Option<NodeId>>,
    /// Source to target; empty when there is no target or it is unreachable
    pub shortest_path: Vec<NodeId>,
}

impl ShortestPaths {
    pub fn distance(&self, node: NodeId) -> Option<u64> {
        self.distances.get(&node).copied().flatten()
    }
}

struct Tables {
    dist: FxHashMap<NodeId, Option<u64>>,
    prev: FxHashMap<NodeId, Option<NodeId>>,
}

impl Tables {
    fn aux(&self, shortest_path: Vec<NodeId>) -> Aux {
        Aux::Distances {
            distances: self.dist.iter().map(|(k, v)| (*k, *v)).collect(),
            previous: self.prev.iter().map(|(k, v)| (*k, *v)).collect(),
            shortest_path,
        }
    }

    fn distance(&self, node: NodeId) -> Option<u64> {
        self.dist.get(&node).copied().flatten()
    }
}

fn show(distance: Option<u64>) -> String {
    distance.map_or_else(|| "inf".to_string(), |d| d.to_string())
}

/// Walk `prev` back from `target`; empty if the target was never reached
fn reconstruct(tables: &Tables, source: NodeId, target: NodeId) -> Vec<NodeId> {
    if tables.distance(target).is_none() {
        return Vec::new();
    }
    let mut path = vec![target];
    let mut node = target;
    while node != source {
        match tables.prev.get(&node).copied().flatten() {
            Some(prev) => {
                node = prev;
                path.push(node);
            }
            None => return Vec::new(),
        }
        assert!(
            path.len() <= tables.prev.len(),
            "predecessor chain from {} does not reach {}",
            target,
            source
        );
    }
    path.reverse();
    path
}

pub fn generate(
    graph: &Graph,
    source: NodeId,
    target: Option<NodeId>,
    options: &GenerateOptions,
) -> Result<ShortestPaths, GenerateError> {
    graph.validate_with_start(source)?;
    if let Some(target) = target {
        if !graph.contains(target) {
            return Err(GenerateError::UnknownNode { node: target });
        }
    }

    let adjacency = graph.adjacency();
    let mut recorder = options.recorder();
    let mut tables = Tables {
        dist: graph.node_ids().map(|id| (id, None)).collect(),
        prev: graph.node_ids().map(|id| (id, None)).collect(),
    };
    tables.dist.insert(source, Some(0));

    let mut unvisited: Vec<NodeId> = graph.node_ids().collect();
    let mut visited: Vec<NodeId> = Vec::new();
    let state = || State::Graph(graph.clone());

    recorder.record(
        state(),
        Highlights::new().with(HighlightKind::Current, [source]),
        tables.aux(Vec::new()),
        format!("Set distance of {} to 0, all others to infinity", source),
    )?;

    loop {
        let mut selected: Option<(usize, u64)> = None;
        for (position, &node) in unvisited.iter().enumerate() {
            if let Some(d) = tables.distance(node) {
                if selected.map_or(true, |(_, best)| d < best) {
                    selected = Some((position, d));
                }
            }
        }
        let Some((position, dist_u)) = selected else {
            break;
        };

        let u = unvisited.remove(position);
        visited.push(u);
        recorder.record(
            state(),
            Highlights::new()
                .with(HighlightKind::Visited, visited.iter().copied())
                .with(HighlightKind::Current, [u]),
            tables.aux(Vec::new()),
            format!("Visit node {} at distance {}", u, dist_u),
        )?;

        if Some(u) == target {
            break;
        }

        for &(v, weight) in adjacency.neighbors(u) {
            if !unvisited.contains(&v) {
                continue;
            }
            let edge = Mark::Edge(EdgeKey::new(u, v));
            let base = Highlights::new()
                .with(HighlightKind::Visited, visited.iter().copied())
                .with(HighlightKind::Current, [u])
                .with(HighlightKind::Processing, [v])
                .with(HighlightKind::Considering, [edge]);

            let candidate = dist_u + u64::from(weight);
            let known = tables.distance(v);
            recorder.record(
                state(),
                base.clone(),
                tables.aux(Vec::new()),
                format!(
                    "Evaluate edge {}-{} (weight {}): {} + {} = {} vs {}",
                    u,
                    v,
                    weight,
                    dist_u,
                    weight,
                    candidate,
                    show(known)
                ),
            )?;

            if known.map_or(true, |d| candidate < d) {
                tables.dist.insert(v, Some(candidate));
                tables.prev.insert(v, Some(u));
                recorder.record(
                    state(),
                    base.with(HighlightKind::Added, [Mark::Node(v)]),
                    tables.aux(Vec::new()),
                    format!("Update distance of {} to {} via {}", v, candidate, u),
                )?;
            }
        }
    }

    let shortest_path = target
        .map(|t| reconstruct(&tables, source, t))
        .unwrap_or_default();

    let path_edges = shortest_path
        .windows(2)
        .map(|pair| Mark::Edge(EdgeKey::new(pair[0], pair[1])));
    let highlights = Highlights::new()
        .with(HighlightKind::Visited, visited.iter().copied())
        .with(HighlightKind::Added, path_edges)
        .with(HighlightKind::Added, shortest_path.iter().copied().map(Mark::Node));

    let note = match target {
        Some(t) if shortest_path.is_empty() => format!("Node {} is unreachable from {}", t, source),
        Some(t) => format!(
            "Shortest path {} -> {}: {} (distance {})",
            source,
            t,
            shortest_path
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" -> "),
            show(tables.distance(t))
        ),
        None => format!("Settled {} of {} nodes", visited.len(), graph.nodes.len()),
    };

    let steps = recorder.finish(state(), highlights, tables.aux(shortest_path.clone()), note)?;
    debug!(%source, ?target, steps = steps.len(), "generated dijkstra trace");

    Ok(ShortestPaths {
        steps,
        distances: tables.dist.into_iter().collect(),
        previous: tables.prev.into_iter().collect(),
        shortest_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn test_path_graph_example() {
        let g = Graph::from_edges(4, &[(0, 1, 1), (1, 2, 2), (2, 3, 3)]);
        let result = generate(&g, NodeId(0), Some(NodeId(3)), &GenerateOptions::default()).unwrap();
        assert_eq!(result.distance(NodeId(3)), Some(6));
        assert_eq!(result.shortest_path, ids(&[0, 1, 2, 3]));

        match &result.steps.last().unwrap().aux {
            Aux::Distances { shortest_path, .. } => {
                assert_eq!(shortest_path, &result.shortest_path)
            }
            other => panic!("unexpected aux {:?}", other),
        }
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        let g = Graph::from_edges(3, &[(0, 2, 10), (0, 1, 2), (1, 2, 3)]);
        let result = generate(&g, NodeId(0), Some(NodeId(2)), &GenerateOptions::default()).unwrap();
        assert_eq!(result.distance(NodeId(2)), Some(5));
        assert_eq!(result.shortest_path, ids(&[0, 1, 2]));
        assert_eq!(result.previous[&NodeId(2)], Some(NodeId(1)));

        // 0-2 evaluated and improved, later improved again via 1
        let updates = result
            .steps
            .iter()
            .filter(|s| s.annotation.starts_with("Update distance of 2"))
            .count();
        assert_eq!(updates, 2);
    }

    #[test]
    fn test_evaluating_step_without_improvement() {
        let g = Graph::from_edges(3, &[(0, 1, 1), (0, 2, 1), (1, 2, 5)]);
        let result = generate(&g, NodeId(0), None, &GenerateOptions::default()).unwrap();
        let evaluations = result
            .steps
            .iter()
            .filter(|s| s.annotation.starts_with("Evaluate"))
            .count();
        let updates = result
            .steps
            .iter()
            .filter(|s| s.annotation.starts_with("Update"))
            .count();
        assert_eq!(evaluations, 3);
        assert_eq!(updates, 2);
        assert!(result.shortest_path.is_empty());
    }

    #[test]
    fn test_unreachable_target() {
        let g = Graph::from_edges(4, &[(0, 1, 4), (2, 3, 1)]);
        let result = generate(&g, NodeId(0), Some(NodeId(3)), &GenerateOptions::default()).unwrap();
        assert!(result.shortest_path.is_empty());
        assert_eq!(result.distance(NodeId(3)), None);
        assert_eq!(result.distance(NodeId(1)), Some(4));
        let last = result.steps.last().unwrap();
        assert!(last.terminal);
        assert!(last.annotation.contains("unreachable"));
    }

    #[test]
    fn test_stops_early_at_target() {
        let g = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 1)]);
        let result = generate(&g, NodeId(0), Some(NodeId(0)), &GenerateOptions::default()).unwrap();
        assert_eq!(result.shortest_path, ids(&[0]));
        // init, visit 0, terminal
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.distance(NodeId(1)), None);
    }

    #[test]
    fn test_tie_break_takes_first_in_graph_order() {
        let g = Graph::from_edges(3, &[(0, 2, 1), (0, 1, 1)]);
        let result = generate(&g, NodeId(0), None, &GenerateOptions::default()).unwrap();
        let visits: Vec<_> = result
            .steps
            .annotations()
            .filter(|a| a.starts_with("Visit"))
            .collect();
        assert_eq!(
            visits,
            [
                "Visit node 0 at distance 0",
                "Visit node 1 at distance 1",
                "Visit node 2 at distance 1"
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_target() {
        let g = Graph::from_edges(2, &[(0, 1, 1)]);
        let err =
            generate(&g, NodeId(0), Some(NodeId(5)), &GenerateOptions::default()).unwrap_err();
        assert_eq!(err, GenerateError::UnknownNode { node: NodeId(5) });
    }
}
