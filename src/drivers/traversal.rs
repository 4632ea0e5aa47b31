//! Graph traversal driver (BFS and DFS)
//!
//! # Step Policy
//!
//! - one initial step with the start node on the frontier
//! - one `processing` step per node taken off the frontier
//! - one batched `adding` step per processed node listing every neighbor it
//!   put on the frontier (skipped when there are none)
//!
//! BFS marks a node visited when it is enqueued, so it enters the queue at
//! most once. DFS marks a node visited when it is popped; a node can sit on
//! the stack several times and later copies are dropped without a step.

use super::errors::GenerateError;
use super::GenerateOptions;
use crate::model::graph::{Graph, NodeId};
use crate::snapshot::{Aux, FrontierKind, HighlightKind, Highlights, Recorder, State, StepList};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TraversalAlgorithm {
    Bfs,
    Dfs,
}

/// Bookkeeping shared by both traversals
struct Walk<'g> {
    graph: &'g Graph,
    recorder: Recorder,
    discipline: FrontierKind,
    /// Visited nodes in the order they were marked
    visited: Vec<NodeId>,
    seen: FxHashSet<NodeId>,
    /// Processing order
    order: Vec<NodeId>,
}

impl Walk<'_> {
    fn mark(&mut self, node: NodeId) -> bool {
        if self.seen.insert(node) {
            self.visited.push(node);
            true
        } else {
            false
        }
    }

    fn highlights(&self) -> Highlights {
        Highlights::new().with(HighlightKind::Visited, self.visited.iter().copied())
    }

    fn aux(&self, frontier: impl IntoIterator<Item = NodeId>) -> Aux {
        Aux::Frontier {
            discipline: self.discipline,
            items: frontier.into_iter().collect(),
            order: self.order.clone(),
        }
    }

    fn record(
        &mut self,
        highlights: Highlights,
        frontier: impl IntoIterator<Item = NodeId>,
        annotation: String,
    ) -> Result<(), GenerateError> {
        let aux = self.aux(frontier);
        self.recorder
            .record(State::Graph(self.graph.clone()), highlights, aux, annotation)
    }

    fn finish(self) -> Result<StepList, GenerateError> {
        let highlights = self.highlights();
        let aux = self.aux(std::iter::empty());
        let note = format!(
            "Traversal complete: visited {} of {} nodes",
            self.visited.len(),
            self.graph.nodes.len()
        );
        self.recorder
            .finish(State::Graph(self.graph.clone()), highlights, aux, note)
    }
}

fn list(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate(
    algorithm: TraversalAlgorithm,
    graph: &Graph,
    start: NodeId,
    options: &GenerateOptions,
) -> Result<StepList, GenerateError> {
    graph.validate_with_start(start)?;

    let discipline = match algorithm {
        TraversalAlgorithm::Bfs => FrontierKind::Queue,
        TraversalAlgorithm::Dfs => FrontierKind::Stack,
    };
    let walk = Walk {
        graph,
        recorder: options.recorder(),
        discipline,
        visited: Vec::new(),
        seen: FxHashSet::default(),
        order: Vec::new(),
    };

    let steps = match algorithm {
        TraversalAlgorithm::Bfs => bfs(walk, start)?,
        TraversalAlgorithm::Dfs => dfs(walk, start)?,
    };
    debug!(?algorithm, %start, steps = steps.len(), "generated traversal trace");
    Ok(steps)
}

fn bfs(mut walk: Walk<'_>, start: NodeId) -> Result<StepList, GenerateError> {
    let adjacency = walk.graph.adjacency();
    let mut queue = VecDeque::from([start]);
    walk.mark(start);
    walk.record(
        walk.highlights().with(HighlightKind::Current, [start]),
        queue.iter().copied(),
        format!("Enqueue start node {} and mark it visited", start),
    )?;

    while let Some(node) = queue.pop_front() {
        walk.order.push(node);
        walk.record(
            walk.highlights().with(HighlightKind::Processing, [node]),
            queue.iter().copied(),
            format!("Dequeue node {}", node),
        )?;

        let mut added = Vec::new();
        for &(neighbor, _) in adjacency.neighbors(node) {
            if walk.mark(neighbor) {
                queue.push_back(neighbor);
                added.push(neighbor);
            }
        }

        if !added.is_empty() {
            walk.record(
                walk.highlights()
                    .with(HighlightKind::Current, [node])
                    .with(HighlightKind::Adding, added.iter().copied()),
                queue.iter().copied(),
                format!("Enqueue neighbors of {}: {}", node, list(&added)),
            )?;
        }
    }

    walk.finish()
}

fn dfs(mut walk: Walk<'_>, start: NodeId) -> Result<StepList, GenerateError> {
    let adjacency = walk.graph.adjacency();
    let mut stack = vec![start];
    walk.record(
        walk.highlights().with(HighlightKind::Current, [start]),
        stack.iter().copied(),
        format!("Push start node {}", start),
    )?;

    while let Some(node) = stack.pop() {
        if !walk.mark(node) {
            continue;
        }
        walk.order.push(node);
        walk.record(
            walk.highlights().with(HighlightKind::Processing, [node]),
            stack.iter().copied(),
            format!("Pop node {} and mark it visited", node),
        )?;

        let pending: Vec<NodeId> = adjacency
            .neighbors(node)
            .iter()
            .map(|&(neighbor, _)| neighbor)
            .filter(|neighbor| !walk.seen.contains(neighbor))
            .collect();

        if !pending.is_empty() {
            // Reverse so the first neighbor is popped first
            stack.extend(pending.iter().rev().copied());
            walk.record(
                walk.highlights()
                    .with(HighlightKind::Current, [node])
                    .with(HighlightKind::Adding, pending.iter().copied()),
                stack.iter().copied(),
                format!("Push unvisited neighbors of {}: {}", node, list(&pending)),
            )?;
        }
    }

    walk.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_of(steps: &StepList) -> Vec<NodeId> {
        match &steps.last().unwrap().aux {
            Aux::Frontier { order, .. } => order.clone(),
            other => panic!("unexpected aux {:?}", other),
        }
    }

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    fn diamond() -> Graph {
        // 0 - 1, 0 - 2, 1 - 3, 2 - 3, 3 - 4
        Graph::from_edges(5, &[(0, 1, 1), (0, 2, 1), (1, 3, 1), (2, 3, 1), (3, 4, 1)])
    }

    #[test]
    fn test_bfs_order_and_batching() {
        let steps = generate(
            TraversalAlgorithm::Bfs,
            &diamond(),
            NodeId(0),
            &GenerateOptions::default(),
        )
        .unwrap();
        assert_eq!(order_of(&steps), ids(&[0, 1, 2, 3, 4]));

        // initial + 5 processing + adding for 0, 1 and 3 + terminal
        assert_eq!(steps.len(), 1 + 5 + 3 + 1);
        let first_batch = steps.at(2).unwrap();
        assert_eq!(first_batch.highlights.count(HighlightKind::Adding), 2);
    }

    #[test]
    fn test_bfs_covers_connected_graph() {
        let g = diamond();
        let steps =
            generate(TraversalAlgorithm::Bfs, &g, NodeId(2), &GenerateOptions::default()).unwrap();
        let last = steps.last().unwrap();
        assert_eq!(last.highlights.count(HighlightKind::Visited), g.nodes.len());
        for id in g.node_ids() {
            let processing = steps
                .iter()
                .filter(|s| s.highlights.contains(HighlightKind::Processing, id.into()))
                .count();
            assert_eq!(processing, 1, "node {}", id);
        }
    }

    #[test]
    fn test_dfs_follows_adjacency_order() {
        let steps = generate(
            TraversalAlgorithm::Dfs,
            &diamond(),
            NodeId(0),
            &GenerateOptions::default(),
        )
        .unwrap();
        assert_eq!(order_of(&steps), ids(&[0, 1, 3, 2, 4]));
        let processing = steps
            .iter()
            .filter(|s| s.highlights.get(HighlightKind::Processing).is_some())
            .count();
        assert_eq!(processing, 5);
    }

    #[test]
    fn test_disconnected_graph_stops_at_component() {
        let g = Graph::from_edges(4, &[(0, 1, 1), (2, 3, 1)]);
        for algorithm in [TraversalAlgorithm::Bfs, TraversalAlgorithm::Dfs] {
            let steps = generate(algorithm, &g, NodeId(0), &GenerateOptions::default()).unwrap();
            assert_eq!(order_of(&steps), ids(&[0, 1]));
            assert!(steps.last().unwrap().terminal);
        }
    }

    #[test]
    fn test_frontier_snapshots_are_independent() {
        let steps = generate(
            TraversalAlgorithm::Bfs,
            &diamond(),
            NodeId(0),
            &GenerateOptions::default(),
        )
        .unwrap();
        match (&steps.at(0).unwrap().aux, &steps.at(2).unwrap().aux) {
            (Aux::Frontier { items: a, .. }, Aux::Frontier { items: b, .. }) => {
                assert_eq!(a, &ids(&[0]));
                assert_eq!(b, &ids(&[1, 2]));
            }
            other => panic!("unexpected aux {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_start() {
        let err = generate(
            TraversalAlgorithm::Dfs,
            &diamond(),
            NodeId(9),
            &GenerateOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, GenerateError::UnknownNode { node: NodeId(9) });
    }
}
