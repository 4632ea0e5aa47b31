//! Scenario files: one driver invocation described as JSON
//!
//! ```json
//! { "driver": "shortest_path", "source": 0, "target": 6 }
//! ```
//!
//! Graph scenarios without a `graph` run on [`Graph::sample`]. A traversal
//! or shortest-path scenario without a start node starts at the graph's
//! first node.

use crate::drivers::avl::{self, TreeOp};
use crate::drivers::errors::GenerateError;
use crate::drivers::mst::{self, MstAlgorithm};
use crate::drivers::searching::{self, SearchAlgorithm};
use crate::drivers::sorting::{self, SortAlgorithm};
use crate::drivers::traversal::{self, TraversalAlgorithm};
use crate::drivers::{dijkstra, GenerateOptions};
use crate::model::graph::{Graph, NodeId};
use crate::model::tree::{AvlTree, TraversalOrder};
use crate::snapshot::StepList;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("cannot read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "snake_case")]
pub enum Scenario {
    Sort {
        algorithm: SortAlgorithm,
        values: Vec<i64>,
    },
    Search {
        algorithm: SearchAlgorithm,
        values: Vec<i64>,
        target: i64,
    },
    Traverse {
        algorithm: TraversalAlgorithm,
        #[serde(default)]
        graph: Option<Graph>,
        #[serde(default)]
        start: Option<NodeId>,
    },
    ShortestPath {
        #[serde(default)]
        graph: Option<Graph>,
        #[serde(default)]
        source: Option<NodeId>,
        #[serde(default)]
        target: Option<NodeId>,
    },
    Mst {
        algorithm: MstAlgorithm,
        #[serde(default)]
        graph: Option<Graph>,
    },
    Avl {
        ops: Vec<TreeOp>,
    },
    /// Apply `ops` without recording, then trace one traversal of the tree
    TreeTraversal {
        ops: Vec<TreeOp>,
        order: TraversalOrder,
    },
}

/// The scenario's own graph, or the sample graph
fn graph_or_sample(graph: &Option<Graph>) -> Graph {
    graph.clone().unwrap_or_else(Graph::sample)
}

fn start_or_first(graph: &Graph, start: Option<NodeId>) -> Result<NodeId, GenerateError> {
    start
        .or_else(|| graph.nodes.first().map(|n| n.id))
        .ok_or(GenerateError::EmptyGraph)
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Short description shown in the player's title bar
    pub fn title(&self) -> String {
        match self {
            Scenario::Sort { algorithm, values } => {
                format!("{} of {} values", algorithm, values.len())
            }
            Scenario::Search {
                algorithm, target, ..
            } => match algorithm {
                SearchAlgorithm::Linear => format!("linear search for {}", target),
                SearchAlgorithm::Binary => format!("binary search for {}", target),
            },
            Scenario::Traverse { algorithm, .. } => match algorithm {
                TraversalAlgorithm::Bfs => "breadth-first traversal".to_string(),
                TraversalAlgorithm::Dfs => "depth-first traversal".to_string(),
            },
            Scenario::ShortestPath { .. } => "dijkstra shortest paths".to_string(),
            Scenario::Mst { algorithm, .. } => match algorithm {
                MstAlgorithm::Prim => "prim minimum spanning tree".to_string(),
                MstAlgorithm::Kruskal => "kruskal minimum spanning tree".to_string(),
            },
            Scenario::Avl { ops } => format!("avl tree, {} operations", ops.len()),
            Scenario::TreeTraversal { order, .. } => match order {
                TraversalOrder::InOrder => "avl in-order traversal".to_string(),
                TraversalOrder::PreOrder => "avl pre-order traversal".to_string(),
                TraversalOrder::PostOrder => "avl post-order traversal".to_string(),
                TraversalOrder::LevelOrder => "avl level-order traversal".to_string(),
            },
        }
    }

    /// Validate the input and run the named driver
    pub fn generate(&self, options: &GenerateOptions) -> Result<StepList, GenerateError> {
        match self {
            Scenario::Sort { algorithm, values } => sorting::generate(*algorithm, values, options),
            Scenario::Search {
                algorithm,
                values,
                target,
            } => match algorithm {
                SearchAlgorithm::Linear => searching::linear(values, *target, options),
                SearchAlgorithm::Binary => {
                    searching::binary(values, *target, options).map(|result| result.steps)
                }
            },
            Scenario::Traverse {
                algorithm,
                graph,
                start,
            } => {
                let graph = graph_or_sample(graph);
                let start = start_or_first(&graph, *start)?;
                traversal::generate(*algorithm, &graph, start, options)
            }
            Scenario::ShortestPath {
                graph,
                source,
                target,
            } => {
                let graph = graph_or_sample(graph);
                let source = start_or_first(&graph, *source)?;
                dijkstra::generate(&graph, source, *target, options).map(|result| result.steps)
            }
            Scenario::Mst { algorithm, graph } => {
                let graph = graph_or_sample(graph);
                mst::generate(*algorithm, &graph, options).map(|result| result.steps)
            }
            Scenario::Avl { ops } => avl::generate(ops, options).map(|run| run.steps),
            Scenario::TreeTraversal { ops, order } => {
                if ops.is_empty() {
                    return Err(GenerateError::EmptyInput);
                }
                let mut tree = AvlTree::new();
                for op in ops {
                    match *op {
                        TreeOp::Insert(value) => tree.insert(value),
                        TreeOp::Delete(value) => tree.delete(value),
                    };
                }
                avl::traversal(&tree, *order, options)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_scenario() {
        let json = r#"{"driver": "sort", "algorithm": "bubble", "values": [5, 3, 4, 1, 2]}"#;
        let scenario = Scenario::from_json(json).unwrap();
        let steps = scenario.generate(&GenerateOptions::default()).unwrap();
        assert_eq!(steps.last().unwrap().state.as_array(), Some(&[1, 2, 3, 4, 5][..]));
        assert_eq!(scenario.title(), "bubble sort of 5 values");
    }

    #[test]
    fn test_graph_defaults_to_sample() {
        let scenario = Scenario::from_json(r#"{"driver": "mst", "algorithm": "kruskal"}"#).unwrap();
        let steps = scenario.generate(&GenerateOptions::default()).unwrap();
        assert_eq!(
            steps.last().unwrap().state.as_graph(),
            Some(&Graph::sample())
        );

        let scenario = Scenario::from_json(r#"{"driver": "shortest_path", "target": 6}"#).unwrap();
        assert!(scenario.generate(&GenerateOptions::default()).is_ok());
    }

    #[test]
    fn test_avl_scenario_ops() {
        let json = r#"{"driver": "avl", "ops": [
            {"op": "insert", "value": 10},
            {"op": "insert", "value": 20},
            {"op": "delete", "value": 10}
        ]}"#;
        let scenario = Scenario::from_json(json).unwrap();
        let steps = scenario.generate(&GenerateOptions::default()).unwrap();
        let layout = steps.last().unwrap().state.as_tree().unwrap();
        assert_eq!(layout.values(), vec![20]);
    }

    #[test]
    fn test_tree_traversal_scenario() {
        let scenario = Scenario::TreeTraversal {
            ops: vec![TreeOp::Insert(2), TreeOp::Insert(1), TreeOp::Insert(3), TreeOp::Delete(1)],
            order: TraversalOrder::PostOrder,
        };
        let steps = scenario.generate(&GenerateOptions::default()).unwrap();
        assert_eq!(steps.last().unwrap().annotation, "Post-order traversal: 3, 2");
    }

    #[test]
    fn test_validation_errors_surface() {
        let scenario = Scenario::Search {
            algorithm: SearchAlgorithm::Binary,
            values: vec![],
            target: 3,
        };
        assert_eq!(
            scenario.generate(&GenerateOptions::default()).unwrap_err(),
            GenerateError::EmptyInput
        );
        assert!(matches!(
            Scenario::from_json(r#"{"driver": "juggle"}"#),
            Err(ScenarioError::Json(_))
        ));
    }
}
