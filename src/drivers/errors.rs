//! Input validation errors for the drivers
//!
//! [`GenerateError`] covers input a driver refuses to run on. These are
//! reported before a single step is recorded, so a caller never sees a
//! partial trace. Outcomes such as "target not found" or "node unreachable"
//! are not errors; they end the trace with a normal terminal step.

use crate::model::graph::{EdgeKey, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("input array is empty")]
    EmptyInput,

    #[error("{input:?} is not a number")]
    NotANumber { input: String },

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("node {node} is not in the graph")]
    UnknownNode { node: NodeId },

    #[error("node id {node} is used more than once")]
    DuplicateNode { node: NodeId },

    #[error("edge {node}-{node} is a self-loop")]
    SelfLoop { node: NodeId },

    #[error("edge {edge} appears more than once")]
    DuplicateEdge { edge: EdgeKey },

    #[error("{input:?} is not a tree operation (expected +N or -N)")]
    InvalidTreeOp { input: String },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: usize },
}
