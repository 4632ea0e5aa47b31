//! # Introduction
//!
//! algotrace runs classic algorithms to completion and records a snapshot of
//! their state at every meaningful transition.  The recorded trace is then
//! replayed forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui), or dumped as JSON.
//!
//! ## Pipeline
//!
//! ```text
//! Input → Driver → Recorder → StepList → Player → TUI
//! ```
//!
//! 1. [`model`] - the data structures the drivers work on: an undirected
//!    weighted [`model::Graph`], an arena-backed [`model::AvlTree`] and a
//!    [`model::DisjointSetForest`].
//! 2. [`drivers`] - sorting, searching, graph traversal, Dijkstra, minimum
//!    spanning trees and AVL insert/delete, each producing a
//!    [`snapshot::StepList`].
//! 3. [`snapshot`] - the [`snapshot::Step`] record, the highlight
//!    vocabulary and the step-capped [`snapshot::Recorder`].
//! 4. [`scenario`] - JSON descriptions of a single driver run.
//! 5. [`playback`] - the replay cursor over a finished trace.
//! 6. [`ui`] - ratatui-based TUI; not part of the stable library API.

pub mod drivers;
pub mod model;
pub mod playback;
pub mod scenario;
pub mod snapshot;
pub mod ui;
