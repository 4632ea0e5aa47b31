//! Data structures the drivers run on
//!
//! - [`graph`]: undirected weighted graph, adjacency lists and edge keys
//! - [`tree`]: arena-backed AVL tree, its owned layout and lazy traversals
//! - [`dsu`]: disjoint-set forest used by Kruskal's algorithm
//!
//! Everything here is plain data plus the operations on it; recording steps
//! is the drivers' job.

pub mod dsu;
pub mod graph;
pub mod tree;

pub use dsu::DisjointSetForest;
pub use graph::{Adjacency, Edge, EdgeKey, Graph, Node, NodeId, Position};
pub use tree::{AvlTree, Rotation, RotationCase, TraversalOrder, Traversal, TreeEvent, TreeLayout};
