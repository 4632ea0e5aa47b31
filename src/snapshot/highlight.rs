//! Highlight vocabulary shared by every driver
//!
//! The set of [`HighlightKind`]s is fixed so a renderer only has to learn one
//! mapping. New kinds may be appended; existing names keep their meaning.

use crate::model::graph::{EdgeKey, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Comparing,
    Swapping,
    Visited,
    Current,
    Processing,
    Adding,
    Considering,
    Added,
    Rejected,
    Pivot,
    Range,
}

impl HighlightKind {
    pub const ALL: [HighlightKind; 11] = [
        HighlightKind::Comparing,
        HighlightKind::Swapping,
        HighlightKind::Visited,
        HighlightKind::Current,
        HighlightKind::Processing,
        HighlightKind::Adding,
        HighlightKind::Considering,
        HighlightKind::Added,
        HighlightKind::Rejected,
        HighlightKind::Pivot,
        HighlightKind::Range,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HighlightKind::Comparing => "comparing",
            HighlightKind::Swapping => "swapping",
            HighlightKind::Visited => "visited",
            HighlightKind::Current => "current",
            HighlightKind::Processing => "processing",
            HighlightKind::Adding => "adding",
            HighlightKind::Considering => "considering",
            HighlightKind::Added => "added",
            HighlightKind::Rejected => "rejected",
            HighlightKind::Pivot => "pivot",
            HighlightKind::Range => "range",
        }
    }
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier a highlight can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// Array index
    Index(usize),
    Node(NodeId),
    Edge(EdgeKey),
    /// Tree key (AVL nodes are identified by their value)
    Value(i64),
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Index(i) => write!(f, "[{}]", i),
            Mark::Node(id) => write!(f, "{}", id),
            Mark::Edge(key) => write!(f, "{}", key),
            Mark::Value(v) => write!(f, "{}", v),
        }
    }
}

impl From<NodeId> for Mark {
    fn from(id: NodeId) -> Self {
        Mark::Node(id)
    }
}

impl From<EdgeKey> for Mark {
    fn from(key: EdgeKey) -> Self {
        Mark::Edge(key)
    }
}

/// Named sets of marks; a kind that is absent means an empty set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Highlights(BTreeMap<HighlightKind, BTreeSet<Mark>>);

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `marks` under `kind`; empty iterators leave the kind absent
    pub fn with<I>(mut self, kind: HighlightKind, marks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Mark>,
    {
        let mut marks = marks.into_iter().map(Into::into).peekable();
        if marks.peek().is_some() {
            self.0.entry(kind).or_default().extend(marks);
        }
        self
    }

    pub fn get(&self, kind: HighlightKind) -> Option<&BTreeSet<Mark>> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: HighlightKind, mark: Mark) -> bool {
        self.0.get(&kind).is_some_and(|set| set.contains(&mark))
    }

    /// Number of marks under `kind`
    pub fn count(&self, kind: HighlightKind) -> usize {
        self.0.get(&kind).map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HighlightKind, &BTreeSet<Mark>)> {
        self.0.iter().map(|(kind, set)| (*kind, set))
    }

    /// First kind in `precedence` that contains `mark`
    pub fn first_of(&self, mark: Mark, precedence: &[HighlightKind]) -> Option<HighlightKind> {
        precedence
            .iter()
            .copied()
            .find(|kind| self.contains(*kind, mark))
    }
}
