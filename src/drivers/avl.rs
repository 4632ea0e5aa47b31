//! Balanced-tree driver (AVL)
//!
//! Applies a list of [`TreeOp`]s to a fresh [`AvlTree`] and turns every
//! [`TreeEvent`] the tree reports into a step: descent comparisons, the
//! insertion or removal itself, imbalance detection and each rotation.
//! Because the tree re-links a rotated subtree before reporting it, every
//! recorded layout is a complete tree.

use super::errors::GenerateError;
use super::GenerateOptions;
use crate::model::tree::{AvlTree, Rotation, TraversalOrder, TreeEvent};
use crate::snapshot::{Aux, HighlightKind, Highlights, Mark, Recorder, State, StepList};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum TreeOp {
    Insert(i64),
    Delete(i64),
}

impl fmt::Display for TreeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeOp::Insert(value) => write!(f, "+{}", value),
            TreeOp::Delete(value) => write!(f, "-{}", value),
        }
    }
}

/// Parse `"+10, +20 -5"` style input.
///
/// A bare number is an insert. The sign is the operation, so negative keys
/// are written `+-3` and `--3`.
pub fn parse_ops(input: &str) -> Result<Vec<TreeOp>, GenerateError> {
    let ops = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_op)
        .collect::<Result<Vec<_>, _>>()?;

    if ops.is_empty() {
        return Err(GenerateError::EmptyInput);
    }
    Ok(ops)
}

fn parse_op(token: &str) -> Result<TreeOp, GenerateError> {
    let (delete, rest) = if let Some(rest) = token.strip_prefix('-') {
        (true, rest)
    } else {
        (false, token.strip_prefix('+').unwrap_or(token))
    };
    let value = rest
        .parse::<i64>()
        .map_err(|_| GenerateError::InvalidTreeOp {
            input: token.to_string(),
        })?;
    Ok(if delete {
        TreeOp::Delete(value)
    } else {
        TreeOp::Insert(value)
    })
}

/// Result of an AVL run
#[derive(Debug, Clone)]
pub struct AvlRun {
    pub steps: StepList,
    pub tree: AvlTree,
    /// Every rotation in the order it happened
    pub rotations: Vec<Rotation>,
}

struct Trace {
    recorder: Recorder,
    rotations: Vec<Rotation>,
}

impl Trace {
    fn aux(&self) -> Aux {
        Aux::Tree {
            rotations: self.rotations.clone(),
            visited: Vec::new(),
        }
    }

    fn record(
        &mut self,
        tree: &AvlTree,
        highlights: Highlights,
        annotation: String,
    ) -> Result<(), GenerateError> {
        let aux = self.aux();
        self.recorder
            .record(State::Tree(tree.layout()), highlights, aux, annotation)
    }

    fn observe(&mut self, tree: &AvlTree, event: TreeEvent) -> Result<(), GenerateError> {
        let (highlights, note) = describe(event);
        if let TreeEvent::Rotated(rotation) = event {
            trace!(%rotation, "rotated");
            self.rotations.push(rotation);
        }
        self.record(tree, highlights, note)
    }
}

fn values<const N: usize>(values: [i64; N]) -> impl Iterator<Item = Mark> {
    values.into_iter().map(Mark::Value)
}

fn describe(event: TreeEvent) -> (Highlights, String) {
    let h = Highlights::new();
    match event {
        TreeEvent::Compare { value, against } => {
            let direction = match value.cmp(&against) {
                std::cmp::Ordering::Less => "go left",
                std::cmp::Ordering::Greater => "go right",
                std::cmp::Ordering::Equal => "match",
            };
            (
                h.with(HighlightKind::Comparing, values([against])),
                format!("Compare {} with {}: {}", value, against, direction),
            )
        }
        TreeEvent::Inserted { value } => (
            h.with(HighlightKind::Added, values([value])),
            format!("Insert {}", value),
        ),
        TreeEvent::Duplicate { value } => (
            h.with(HighlightKind::Rejected, values([value])),
            format!("{} is already in the tree, skip", value),
        ),
        TreeEvent::NotFound { value } => (h, format!("{} is not in the tree", value)),
        TreeEvent::Removed { value } => (h, format!("Remove {}", value)),
        TreeEvent::Successor { value, successor } => (
            h.with(HighlightKind::Current, values([value]))
                .with(HighlightKind::Pivot, values([successor])),
            format!(
                "{} has two children: replace it with in-order successor {}",
                value, successor
            ),
        ),
        TreeEvent::Replaced { value, successor } => (
            h.with(HighlightKind::Swapping, values([successor])),
            format!("Move {} into the place of {}", successor, value),
        ),
        TreeEvent::Unbalanced { at, balance, case } => (
            h.with(HighlightKind::Pivot, values([at])),
            format!("Node {} is unbalanced (balance {}): {} case", at, balance, case),
        ),
        TreeEvent::Rotated(rotation) => {
            let (at, new_root) = match rotation {
                Rotation::Left { at, new_root } | Rotation::Right { at, new_root } => {
                    (at, new_root)
                }
            };
            (
                h.with(HighlightKind::Current, values([new_root]))
                    .with(HighlightKind::Swapping, values([at])),
                rotation.to_string(),
            )
        }
    }
}

pub fn generate(ops: &[TreeOp], options: &GenerateOptions) -> Result<AvlRun, GenerateError> {
    if ops.is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let mut tree = AvlTree::new();
    let mut trace = Trace {
        recorder: options.recorder(),
        rotations: Vec::new(),
    };
    trace.record(&tree, Highlights::new(), "Start with an empty tree".to_string())?;

    for op in ops {
        trace.record(&tree, Highlights::new(), format!("Apply {}", op))?;
        match *op {
            TreeOp::Insert(value) => {
                tree.insert_with(value, |t, event| trace.observe(t, event))?;
            }
            TreeOp::Delete(value) => {
                tree.delete_with(value, |t, event| trace.observe(t, event))?;
            }
        }
    }

    let note = format!(
        "Applied {} operations: {} nodes, height {}, {} rotations",
        ops.len(),
        tree.len(),
        tree.height(),
        trace.rotations.len()
    );
    let aux = trace.aux();
    let Trace {
        recorder,
        rotations,
    } = trace;
    let steps = recorder.finish(State::Tree(tree.layout()), Highlights::new(), aux, note)?;
    debug!(
        ops = ops.len(),
        rotations = rotations.len(),
        steps = steps.len(),
        "generated avl trace"
    );

    Ok(AvlRun {
        steps,
        tree,
        rotations,
    })
}

/// Record one step per value a traversal of `tree` emits
pub fn traversal(
    tree: &AvlTree,
    order: TraversalOrder,
    options: &GenerateOptions,
) -> Result<StepList, GenerateError> {
    let mut recorder = options.recorder();
    let layout = tree.layout();
    let mut visited = Vec::with_capacity(tree.len());

    for value in tree.traverse(order) {
        let highlights = Highlights::new()
            .with(HighlightKind::Visited, visited.iter().copied().map(Mark::Value))
            .with(HighlightKind::Current, values([value]));
        visited.push(value);
        recorder.record(
            State::Tree(layout.clone()),
            highlights,
            Aux::Tree {
                rotations: Vec::new(),
                visited: visited.clone(),
            },
            format!("Visit {}", value),
        )?;
    }

    let name = match order {
        TraversalOrder::InOrder => "In-order",
        TraversalOrder::PreOrder => "Pre-order",
        TraversalOrder::PostOrder => "Post-order",
        TraversalOrder::LevelOrder => "Level-order",
    };
    let note = if visited.is_empty() {
        format!("{} traversal: tree is empty", name)
    } else {
        format!(
            "{} traversal: {}",
            name,
            visited
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    let highlights =
        Highlights::new().with(HighlightKind::Visited, visited.iter().copied().map(Mark::Value));
    let steps = recorder.finish(
        State::Tree(layout),
        highlights,
        Aux::Tree {
            rotations: Vec::new(),
            visited,
        },
        note,
    )?;
    debug!(?order, steps = steps.len(), "generated tree traversal trace");
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inserts(values: &[i64]) -> Vec<TreeOp> {
        values.iter().copied().map(TreeOp::Insert).collect()
    }

    #[test]
    fn test_parse_ops() {
        assert_eq!(
            parse_ops("+10, +20 -5 7").unwrap(),
            vec![
                TreeOp::Insert(10),
                TreeOp::Insert(20),
                TreeOp::Delete(5),
                TreeOp::Insert(7)
            ]
        );
        assert_eq!(parse_ops("").unwrap_err(), GenerateError::EmptyInput);
        assert!(matches!(parse_ops("+x"), Err(GenerateError::InvalidTreeOp { .. })));
        assert_eq!(parse_ops("--4 +-4").unwrap(), vec![TreeOp::Delete(-4), TreeOp::Insert(-4)]);
        assert!(matches!(parse_ops("+"), Err(GenerateError::InvalidTreeOp { .. })));
    }

    #[test]
    fn test_single_left_rotation() {
        let run = generate(&inserts(&[10, 20, 30]), &GenerateOptions::default()).unwrap();
        assert_eq!(run.rotations, vec![Rotation::Left { at: 10, new_root: 20 }]);
        assert_eq!(run.tree.root_value(), Some(20));
        assert!(run.tree.is_valid());

        let notes: Vec<_> = run.steps.annotations().collect();
        assert!(notes.contains(&"Node 10 is unbalanced (balance -2): RR case"));
        assert!(notes.contains(&"Left rotation at 10: 20 becomes subtree root"));
    }

    #[test]
    fn test_every_layout_is_a_whole_tree() {
        let run =
            generate(&inserts(&[30, 10, 20, 40, 50, 25]), &GenerateOptions::default()).unwrap();
        for step in &run.steps {
            let layout = step.state.as_tree().unwrap();
            let mut sorted = layout.values();
            sorted.sort();
            assert_eq!(layout.values(), sorted, "step {}", step.index);
        }
        // LR at 30 (two rotations), RR at 30 after 50, RL at 20 after 25
        assert_eq!(run.rotations.len(), 5);
        assert_eq!(run.tree.root_value(), Some(30));
        assert_eq!(run.tree.len(), 6);
        assert!(run.tree.is_valid());
    }

    #[test]
    fn test_duplicate_and_missing_delete() {
        let ops = vec![TreeOp::Insert(5), TreeOp::Insert(5), TreeOp::Delete(9)];
        let run = generate(&ops, &GenerateOptions::default()).unwrap();
        assert_eq!(run.tree.len(), 1);
        let notes: Vec<_> = run.steps.annotations().collect();
        assert!(notes.contains(&"5 is already in the tree, skip"));
        assert!(notes.contains(&"9 is not in the tree"));
    }

    #[test]
    fn test_delete_with_two_children_uses_successor() {
        let ops = vec![
            TreeOp::Insert(20),
            TreeOp::Insert(10),
            TreeOp::Insert(30),
            TreeOp::Insert(25),
            TreeOp::Delete(20),
        ];
        let run = generate(&ops, &GenerateOptions::default()).unwrap();
        assert_eq!(run.tree.root_value(), Some(25));
        assert!(!run.tree.contains(20));
        assert!(run
            .steps
            .annotations()
            .any(|n| n == "20 has two children: replace it with in-order successor 25"));
    }

    #[test]
    fn test_two_child_delete_never_shows_a_value_twice() {
        let ops = parse_ops("+50,+30,+70,+20,+40,+60,+80,+65,-50,-70").unwrap();
        let run = generate(&ops, &GenerateOptions::default()).unwrap();
        for step in &run.steps {
            let values = step.state.as_tree().unwrap().values();
            assert!(
                values.windows(2).all(|w| w[0] < w[1]),
                "step {}: {:?}",
                step.index,
                values
            );
        }
        let notes: Vec<_> = run.steps.annotations().collect();
        let announce = notes
            .iter()
            .position(|n| *n == "50 has two children: replace it with in-order successor 60")
            .unwrap();
        let moved = notes
            .iter()
            .position(|n| *n == "Move 60 into the place of 50")
            .unwrap();
        assert!(notes[announce..moved].contains(&"Remove 60"));
        assert_eq!(run.tree.root_value(), Some(60));
        assert!(run.tree.is_valid());
    }

    #[test]
    fn test_traversal_steps() {
        let run = generate(&inserts(&[2, 1, 3]), &GenerateOptions::default()).unwrap();
        let steps =
            traversal(&run.tree, TraversalOrder::PreOrder, &GenerateOptions::default()).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps.last().unwrap().annotation, "Pre-order traversal: 2, 1, 3");
        assert!(steps.at(1).unwrap().highlights.contains(HighlightKind::Current, Mark::Value(1)));

        let empty =
            traversal(&AvlTree::new(), TraversalOrder::InOrder, &GenerateOptions::default())
                .unwrap();
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_step_cap_aborts_run() {
        let err =
            generate(&inserts(&[1, 2, 3, 4, 5]), &GenerateOptions { max_steps: 4 }).unwrap_err();
        assert_eq!(err, GenerateError::StepLimitExceeded { limit: 4 });
    }
}
