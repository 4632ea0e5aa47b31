//! Payloads carried by a step: the primary state and the per-driver
//! auxiliary state

use crate::model::graph::{Edge, Graph, NodeId};
use crate::model::tree::{Rotation, TreeLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owned copy of the data structure an algorithm works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum State {
    Array(Vec<i64>),
    Graph(Graph),
    Tree(TreeLayout),
}

impl State {
    pub fn as_array(&self) -> Option<&[i64]> {
        match self {
            State::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            State::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeLayout> {
        match self {
            State::Tree(layout) => Some(layout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierKind {
    Queue,
    Stack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Searching,
    Found { index: usize },
    NotFound,
}

/// Algorithm-specific state recorded next to the primary state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aux {
    #[default]
    None,
    /// BFS queue or DFS stack, front/bottom first, plus the visit order so far
    Frontier {
        discipline: FrontierKind,
        items: Vec<NodeId>,
        order: Vec<NodeId>,
    },
    /// Dijkstra bookkeeping; `None` distance means infinity
    Distances {
        distances: BTreeMap<NodeId, Option<u64>>,
        previous: BTreeMap<NodeId, Option<NodeId>>,
        shortest_path: Vec<NodeId>,
    },
    /// Edges accepted into the spanning tree so far
    Mst { edges: Vec<Edge>, total_weight: u64 },
    Search { target: i64, outcome: SearchOutcome },
    /// Rotations performed so far, and values emitted by a traversal
    Tree {
        rotations: Vec<Rotation>,
        visited: Vec<i64>,
    },
}
