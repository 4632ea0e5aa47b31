//! Undirected weighted graph used by the traversal, shortest-path and MST drivers
//!
//! - [`Graph`]: the owned `{nodes, edges}` pair recorded into every graph step
//! - [`Adjacency`]: neighbor lists built once per generation, in edge-list order
//! - [`EdgeKey`]: order-independent identity of an edge, used in highlights
//!
//! # Validation
//!
//! [`Graph::validate`] rejects graphs that no driver can run on: no nodes,
//! duplicate node ids, edges to unknown nodes, self-loops and parallel edges.
//! Disconnected graphs are valid.

use crate::drivers::errors::GenerateError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout position of a node (renderer hint only)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: u32,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target)
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Endpoints of an undirected edge, smaller id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub a: NodeId,
    pub b: NodeId,
}

impl EdgeKey {
    pub fn new(u: NodeId, v: NodeId) -> Self {
        if u <= v {
            EdgeKey { a: u, b: v }
        } else {
            EdgeKey { a: v, b: u }
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Build a graph with nodes `0..node_count` placed on a circle.
    ///
    /// Edges are `(source, target, weight)` triples; no validation happens
    /// here, call [`Graph::validate`] before handing the graph to a driver.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, u32)]) -> Self {
        let nodes = (0..node_count)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / node_count.max(1) as f32;
                Node {
                    id: NodeId(i),
                    label: i.to_string(),
                    position: Position {
                        x: 0.5 + 0.4 * angle.cos(),
                        y: 0.5 + 0.4 * angle.sin(),
                    },
                }
            })
            .collect();

        let edges = edges
            .iter()
            .map(|&(source, target, weight)| Edge {
                source: NodeId(source),
                target: NodeId(target),
                weight,
            })
            .collect();

        Graph { nodes, edges }
    }

    /// The graph shown when no input graph is supplied
    pub fn sample() -> Self {
        Graph::from_edges(
            7,
            &[
                (0, 1, 7),
                (0, 3, 5),
                (1, 2, 8),
                (1, 3, 9),
                (1, 4, 7),
                (2, 4, 5),
                (3, 4, 15),
                (3, 5, 6),
                (4, 5, 8),
                (4, 6, 9),
                (5, 6, 11),
            ],
        )
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.label.as_str())
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.iter().find(|e| e.key() == key)
    }

    /// Check the structural rules every driver relies on
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.nodes.is_empty() {
            return Err(GenerateError::EmptyGraph);
        }

        let mut ids = FxHashSet::default();
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(GenerateError::DuplicateNode { node: node.id });
            }
        }

        let mut keys = FxHashSet::default();
        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if !ids.contains(&endpoint) {
                    return Err(GenerateError::UnknownNode { node: endpoint });
                }
            }
            if edge.source == edge.target {
                return Err(GenerateError::SelfLoop { node: edge.source });
            }
            if !keys.insert(edge.key()) {
                return Err(GenerateError::DuplicateEdge { edge: edge.key() });
            }
        }

        Ok(())
    }

    /// Validate and additionally require `start` to be one of the nodes
    pub fn validate_with_start(&self, start: NodeId) -> Result<(), GenerateError> {
        self.validate()?;
        if !self.contains(start) {
            return Err(GenerateError::UnknownNode { node: start });
        }
        Ok(())
    }

    pub fn adjacency(&self) -> Adjacency {
        Adjacency::new(self)
    }
}

/// Neighbor lists keyed by node id
///
/// Neighbors appear in the order their edges appear in [`Graph::edges`], so
/// traversal order is a function of the input alone.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: FxHashMap<NodeId, Vec<(NodeId, u32)>>,
}

impl Adjacency {
    pub fn new(graph: &Graph) -> Self {
        let mut lists: FxHashMap<NodeId, Vec<(NodeId, u32)>> = FxHashMap::default();
        for node in &graph.nodes {
            lists.entry(node.id).or_default();
        }
        for edge in &graph.edges {
            lists
                .entry(edge.source)
                .or_default()
                .push((edge.target, edge.weight));
            lists
                .entry(edge.target)
                .or_default()
                .push((edge.source, edge.weight));
        }
        Adjacency { lists }
    }

    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, u32)] {
        self.lists.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_is_order_independent() {
        assert_eq!(EdgeKey::new(NodeId(3), NodeId(1)), EdgeKey::new(NodeId(1), NodeId(3)));
        assert_eq!(EdgeKey::new(NodeId(3), NodeId(1)).to_string(), "1-3");
    }

    #[test]
    fn test_validate_rejects_bad_graphs() {
        assert!(matches!(Graph::default().validate(), Err(GenerateError::EmptyGraph)));

        let self_loop = Graph::from_edges(2, &[(1, 1, 4)]);
        assert!(matches!(self_loop.validate(), Err(GenerateError::SelfLoop { .. })));

        let unknown = Graph::from_edges(2, &[(0, 5, 4)]);
        assert!(matches!(
            unknown.validate(),
            Err(GenerateError::UnknownNode { node: NodeId(5) })
        ));

        let parallel = Graph::from_edges(2, &[(0, 1, 4), (1, 0, 2)]);
        assert!(matches!(parallel.validate(), Err(GenerateError::DuplicateEdge { .. })));

        let mut dup = Graph::from_edges(2, &[]);
        dup.nodes[1].id = NodeId(0);
        assert!(matches!(dup.validate(), Err(GenerateError::DuplicateNode { .. })));
    }

    #[test]
    fn test_disconnected_graph_is_valid() {
        let g = Graph::from_edges(4, &[(0, 1, 1), (2, 3, 1)]);
        assert!(g.validate().is_ok());
        assert!(g.validate_with_start(NodeId(9)).is_err());
    }

    #[test]
    fn test_adjacency_keeps_edge_order() {
        let g = Graph::from_edges(4, &[(0, 2, 1), (0, 1, 5), (3, 0, 2)]);
        let adj = g.adjacency();
        assert_eq!(
            adj.neighbors(NodeId(0)),
            &[(NodeId(2), 1), (NodeId(1), 5), (NodeId(3), 2)]
        );
        assert_eq!(adj.neighbors(NodeId(3)), &[(NodeId(0), 2)]);
        assert!(adj.neighbors(NodeId(42)).is_empty());
    }

    #[test]
    fn test_sample_graph_is_valid() {
        assert!(Graph::sample().validate().is_ok());
    }
}
