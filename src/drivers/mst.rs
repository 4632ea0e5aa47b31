//! Minimum-spanning-tree driver (Prim and Kruskal)
//!
//! # Prim
//!
//! Grows the tree from the first node. Candidate edges go into an
//! append-only pool; each round stable-sorts the pool by weight and takes
//! the cheapest. Edges whose far endpoint joined the tree after they were
//! pooled are only noticed when selected: they get a `considering` step
//! flagged `rejected` and are dropped.
//!
//! # Kruskal
//!
//! Walks all edges by ascending weight (stable, so ties keep input order)
//! and keeps an edge when its endpoints are in different components of a
//! [`DisjointSetForest`]. Stops once `|V| - 1` edges are chosen.
//!
//! On a disconnected graph both return a forest with fewer than `|V| - 1`
//! edges; that is a normal outcome, not an error.

use super::errors::GenerateError;
use super::GenerateOptions;
use crate::model::dsu::DisjointSetForest;
use crate::model::graph::{Edge, Graph, NodeId};
use crate::snapshot::{Aux, HighlightKind, Highlights, Mark, Recorder, State, StepList};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MstAlgorithm {
    Prim,
    Kruskal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimumSpanningTree {
    pub steps: StepList,
    pub edges: Vec<Edge>,
    pub total_weight: u64,
}

impl MinimumSpanningTree {
    /// True if the edges connect every node of `graph`
    pub fn spans(&self, graph: &Graph) -> bool {
        self.edges.len() + 1 == graph.nodes.len()
    }
}

pub fn generate(
    algorithm: MstAlgorithm,
    graph: &Graph,
    options: &GenerateOptions,
) -> Result<MinimumSpanningTree, GenerateError> {
    graph.validate()?;
    let mut build = Build {
        graph,
        recorder: options.recorder(),
        edges: Vec::new(),
        total_weight: 0,
    };

    match algorithm {
        MstAlgorithm::Prim => prim(&mut build)?,
        MstAlgorithm::Kruskal => kruskal(&mut build)?,
    }

    let result = build.finish()?;
    debug!(
        ?algorithm,
        edges = result.edges.len(),
        total_weight = result.total_weight,
        steps = result.steps.len(),
        "generated spanning tree trace"
    );
    Ok(result)
}

struct Build<'g> {
    graph: &'g Graph,
    recorder: Recorder,
    edges: Vec<Edge>,
    total_weight: u64,
}

impl Build<'_> {
    fn target_edges(&self) -> usize {
        self.graph.nodes.len().saturating_sub(1)
    }

    fn tree_marks(&self) -> impl Iterator<Item = Mark> + '_ {
        self.edges.iter().map(|e| Mark::Edge(e.key()))
    }

    fn aux(&self) -> Aux {
        Aux::Mst {
            edges: self.edges.clone(),
            total_weight: self.total_weight,
        }
    }

    fn record(&mut self, highlights: Highlights, annotation: String) -> Result<(), GenerateError> {
        let highlights = highlights.with(HighlightKind::Added, self.tree_marks());
        let aux = self.aux();
        self.recorder
            .record(State::Graph(self.graph.clone()), highlights, aux, annotation)
    }

    fn accept(&mut self, edge: Edge) {
        self.edges.push(edge);
        self.total_weight += u64::from(edge.weight);
    }

    fn finish(self) -> Result<MinimumSpanningTree, GenerateError> {
        let highlights = Highlights::new().with(HighlightKind::Added, self.tree_marks());
        let aux = self.aux();
        let note = if self.edges.len() == self.target_edges() {
            format!(
                "Spanning tree complete: {} edges, total weight {}",
                self.edges.len(),
                self.total_weight
            )
        } else {
            format!(
                "Graph is disconnected: {} of {} edges found, total weight {}",
                self.edges.len(),
                self.target_edges(),
                self.total_weight
            )
        };
        let steps = self
            .recorder
            .finish(State::Graph(self.graph.clone()), highlights, aux, note)?;
        Ok(MinimumSpanningTree {
            steps,
            edges: self.edges,
            total_weight: self.total_weight,
        })
    }
}

fn prim(build: &mut Build<'_>) -> Result<(), GenerateError> {
    let graph = build.graph;
    let Some(start) = graph.nodes.first().map(|n| n.id) else {
        return Ok(());
    };

    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut order = vec![start];
    visited.insert(start);

    let incident = |node: NodeId, visited: &FxHashSet<NodeId>| -> Vec<Edge> {
        graph
            .edges
            .iter()
            .filter(|e| e.other(node).is_some_and(|far| !visited.contains(&far)))
            .copied()
            .collect()
    };

    let mut pool = incident(start, &visited);
    build.record(
        Highlights::new()
            .with(HighlightKind::Visited, [start])
            .with(HighlightKind::Considering, pool.iter().map(|e| Mark::Edge(e.key()))),
        format!("Start at node {} with {} candidate edges", start, pool.len()),
    )?;

    while !pool.is_empty() && build.edges.len() < build.target_edges() {
        pool.sort_by_key(|e| e.weight);
        let edge = pool.remove(0);
        let far = [edge.source, edge.target]
            .into_iter()
            .find(|n| !visited.contains(n));
        let key = Mark::Edge(edge.key());
        let visited_marks = order.iter().copied().map(Mark::Node).collect::<Vec<_>>();

        let Some(far) = far else {
            build.record(
                Highlights::new()
                    .with(HighlightKind::Visited, visited_marks)
                    .with(HighlightKind::Considering, [key])
                    .with(HighlightKind::Rejected, [key]),
                format!(
                    "Consider edge {} (weight {}): both ends already in tree, skip",
                    edge.key(),
                    edge.weight
                ),
            )?;
            continue;
        };

        build.record(
            Highlights::new()
                .with(HighlightKind::Visited, visited_marks.iter().copied())
                .with(HighlightKind::Considering, [key]),
            format!("Consider cheapest edge {} (weight {})", edge.key(), edge.weight),
        )?;

        visited.insert(far);
        order.push(far);
        build.accept(edge);
        let fresh = incident(far, &visited);
        let note = format!(
            "Add edge {} (weight {}) and node {}; {} new candidate edges",
            edge.key(),
            edge.weight,
            far,
            fresh.len()
        );
        pool.extend(fresh);
        build.record(
            Highlights::new()
                .with(HighlightKind::Visited, order.iter().copied())
                .with(HighlightKind::Current, [far]),
            note,
        )?;
    }

    Ok(())
}

fn kruskal(build: &mut Build<'_>) -> Result<(), GenerateError> {
    let graph = build.graph;
    let mut sorted = graph.edges.clone();
    sorted.sort_by_key(|e| e.weight);
    let mut forest = DisjointSetForest::new(graph.node_ids());

    build.record(
        Highlights::new(),
        format!("Sort {} edges by weight", sorted.len()),
    )?;

    for edge in sorted {
        if build.edges.len() >= build.target_edges() {
            break;
        }
        let key = Mark::Edge(edge.key());
        let ends = [Mark::Node(edge.source), Mark::Node(edge.target)];
        build.record(
            Highlights::new()
                .with(HighlightKind::Considering, [key])
                .with(HighlightKind::Current, ends),
            format!("Consider edge {} (weight {})", edge.key(), edge.weight),
        )?;

        match forest.union(edge.source, edge.target) {
            Some(true) => {
                build.accept(edge);
                build.record(
                    Highlights::new().with(HighlightKind::Current, ends),
                    format!("Add edge {}: joins two components", edge.key()),
                )?;
            }
            Some(false) => {
                build.record(
                    Highlights::new()
                        .with(HighlightKind::Rejected, [key])
                        .with(HighlightKind::Current, ends),
                    format!("Reject edge {}: would form a cycle", edge.key()),
                )?;
            }
            None => return Err(GenerateError::UnknownNode { node: edge.source }),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(algorithm: MstAlgorithm, graph: &Graph) -> MinimumSpanningTree {
        generate(algorithm, graph, &GenerateOptions::default()).unwrap()
    }

    #[test]
    fn test_triangle_example() {
        let g = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 2), (0, 2, 3)]);
        for algorithm in [MstAlgorithm::Prim, MstAlgorithm::Kruskal] {
            let mst = run(algorithm, &g);
            assert_eq!(mst.total_weight, 3, "{:?}", algorithm);
            assert_eq!(mst.edges.len(), 2);
            assert!(mst.edges.iter().all(|e| e.weight != 3));
            assert!(mst.spans(&g));
        }
    }

    #[test]
    fn test_sample_graph_agrees() {
        let g = Graph::sample();
        let prim = run(MstAlgorithm::Prim, &g);
        let kruskal = run(MstAlgorithm::Kruskal, &g);
        assert_eq!(prim.total_weight, 39);
        assert_eq!(kruskal.total_weight, 39);
        assert_eq!(prim.edges.len(), g.nodes.len() - 1);
    }

    #[test]
    fn test_kruskal_rejects_cycle_and_stops_early() {
        // 0-1 (1), 1-2 (1), 0-2 (2) forms a cycle; 2-3 (5) completes the tree
        let g = Graph::from_edges(4, &[(0, 1, 1), (1, 2, 1), (0, 2, 2), (2, 3, 5), (0, 3, 9)]);
        let mst = run(MstAlgorithm::Kruskal, &g);
        let notes: Vec<_> = mst.steps.annotations().collect();
        assert!(notes.iter().any(|n| n.starts_with("Reject edge 0-2")));
        assert!(!notes.iter().any(|n| n.contains("0-3")));
        assert_eq!(mst.total_weight, 7);
    }

    #[test]
    fn test_prim_flags_stale_candidates() {
        // After 0-1 and 1-2 join, the pooled 0-2 edge is stale
        let g = Graph::from_edges(4, &[(0, 1, 1), (0, 2, 4), (1, 2, 2), (2, 3, 7)]);
        let mst = run(MstAlgorithm::Prim, &g);
        let stale = mst
            .steps
            .iter()
            .filter(|s| s.highlights.get(HighlightKind::Rejected).is_some())
            .count();
        assert_eq!(stale, 1);
        assert_eq!(mst.total_weight, 10);
    }

    #[test]
    fn test_disconnected_graph_gives_forest() {
        let g = Graph::from_edges(4, &[(0, 1, 3), (2, 3, 1)]);
        let prim = run(MstAlgorithm::Prim, &g);
        assert_eq!(prim.edges.len(), 1);
        assert!(!prim.spans(&g));

        let kruskal = run(MstAlgorithm::Kruskal, &g);
        assert_eq!(kruskal.edges.len(), 2);
        assert!(kruskal.steps.last().unwrap().annotation.contains("disconnected"));
    }

    #[test]
    fn test_single_node() {
        let g = Graph::from_edges(1, &[]);
        let mst = run(MstAlgorithm::Prim, &g);
        assert!(mst.edges.is_empty());
        assert!(mst.spans(&g));
        assert!(mst.steps.last().unwrap().terminal);
    }
}
