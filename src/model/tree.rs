//! AVL tree stored in an arena of slots
//!
//! Nodes live in a `Vec` and refer to their children by slot index, so a
//! rotation is a handful of index reassignments. Every child link is held by
//! exactly one parent (or by the root), and freed slots are recycled.
//!
//! The recursive insert and delete report each thing they do to an observer
//! as a [`TreeEvent`]. The observer always sees a fully linked tree: a
//! rotated subtree is re-attached to its parent before the event fires.
//!
//! Traversals are exposed as [`Traversal`], a lazy iterator that can be
//! restarted or cloned; pacing the values out is left to the caller.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;

/// Index of a node in the arena
pub type Slot = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub value: i64,
    pub left: Option<Slot>,
    pub right: Option<Slot>,
    pub height: i32,
}

/// Where a subtree hangs: the root reference or a parent's child field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Root,
    Left(Slot),
    Right(Slot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationCase {
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
}

impl fmt::Display for RotationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationCase::LeftLeft => "LL",
            RotationCase::RightRight => "RR",
            RotationCase::LeftRight => "LR",
            RotationCase::RightLeft => "RL",
        };
        f.write_str(name)
    }
}

/// A single rotation; `at` is the value of the node that moved down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum Rotation {
    Left { at: i64, new_root: i64 },
    Right { at: i64, new_root: i64 },
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left { at, new_root } => {
                write!(f, "Left rotation at {}: {} becomes subtree root", at, new_root)
            }
            Rotation::Right { at, new_root } => {
                write!(f, "Right rotation at {}: {} becomes subtree root", at, new_root)
            }
        }
    }
}

/// Something the tree did during an insert or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// `value` was compared against the node holding `against`
    Compare { value: i64, against: i64 },
    Inserted { value: i64 },
    Duplicate { value: i64 },
    NotFound { value: i64 },
    Removed { value: i64 },
    /// `value` has two children; `successor` is about to be removed from
    /// its right subtree
    Successor { value: i64, successor: i64 },
    /// The node that held `value` now holds `successor`. Each value is
    /// held by at most one node in every reported tree.
    Replaced { value: i64, successor: i64 },
    Unbalanced { at: i64, balance: i32, case: RotationCase },
    Rotated(Rotation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    InOrder,
    PreOrder,
    PostOrder,
    LevelOrder,
}

/// One node of a [`TreeLayout`], addressed by value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub value: i64,
    pub height: i32,
    pub depth: usize,
    /// In-order rank, usable as a horizontal coordinate
    pub column: usize,
    pub left: Option<i64>,
    pub right: Option<i64>,
}

/// Owned picture of a tree, recorded into tree steps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeLayout {
    pub root: Option<i64>,
    /// Nodes in in-order sequence
    pub nodes: Vec<LayoutNode>,
}

impl TreeLayout {
    pub fn node(&self, value: i64) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.value == value)
    }

    pub fn values(&self) -> Vec<i64> {
        self.nodes.iter().map(|n| n.value).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    slots: Vec<Option<TreeNode>>,
    free: Vec<Slot>,
    root: Option<Slot>,
    len: usize,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root_value(&self) -> Option<i64> {
        self.root.map(|slot| self.node(slot).value)
    }

    pub fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    pub fn contains(&self, value: i64) -> bool {
        let mut cursor = self.root;
        while let Some(slot) = cursor {
            let node = self.node(slot);
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Children of the node holding `value`, as values
    pub fn children(&self, value: i64) -> Option<(Option<i64>, Option<i64>)> {
        let slot = self.find_slot(value)?;
        let node = self.node(slot);
        Some((
            node.left.map(|s| self.node(s).value),
            node.right.map(|s| self.node(s).value),
        ))
    }

    /// Insert without observing; returns false for a duplicate
    pub fn insert(&mut self, value: i64) -> bool {
        match self.insert_with(value, |_, _| Ok::<(), Infallible>(())) {
            Ok(inserted) => inserted,
            Err(never) => match never {},
        }
    }

    /// Delete without observing; returns false if `value` was absent
    pub fn delete(&mut self, value: i64) -> bool {
        match self.delete_with(value, |_, _| Ok::<(), Infallible>(())) {
            Ok(removed) => removed,
            Err(never) => match never {},
        }
    }

    /// Insert `value`, reporting every step to `observer`.
    ///
    /// Duplicates are rejected (a [`TreeEvent::Duplicate`] is reported and
    /// the tree is untouched). An observer error aborts the operation and
    /// is returned as-is.
    pub fn insert_with<E, F>(&mut self, value: i64, mut observer: F) -> Result<bool, E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        self.insert_at(Link::Root, value, &mut observer)
    }

    /// Delete `value`, reporting every step to `observer`
    pub fn delete_with<E, F>(&mut self, value: i64, mut observer: F) -> Result<bool, E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        self.delete_at(Link::Root, value, &mut observer)
    }

    fn insert_at<E, F>(&mut self, link: Link, value: i64, observer: &mut F) -> Result<bool, E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        let Some(slot) = self.get_link(link) else {
            let slot = self.alloc(value);
            self.set_link(link, Some(slot));
            observer(self, TreeEvent::Inserted { value })?;
            return Ok(true);
        };

        let against = self.node(slot).value;
        observer(self, TreeEvent::Compare { value, against })?;

        let inserted = match value.cmp(&against) {
            Ordering::Less => self.insert_at(Link::Left(slot), value, observer)?,
            Ordering::Greater => self.insert_at(Link::Right(slot), value, observer)?,
            Ordering::Equal => {
                observer(self, TreeEvent::Duplicate { value })?;
                false
            }
        };

        if inserted {
            self.update_height(slot);
            let balance = self.balance(slot);
            let case = if balance > 1 {
                let left = self.child_value(self.node(slot).left);
                Some(if value < left {
                    RotationCase::LeftLeft
                } else {
                    RotationCase::LeftRight
                })
            } else if balance < -1 {
                let right = self.child_value(self.node(slot).right);
                Some(if value > right {
                    RotationCase::RightRight
                } else {
                    RotationCase::RightLeft
                })
            } else {
                None
            };

            if let Some(case) = case {
                self.rebalance(link, slot, balance, case, observer)?;
            }
        }

        Ok(inserted)
    }

    fn delete_at<E, F>(&mut self, link: Link, value: i64, observer: &mut F) -> Result<bool, E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        let Some(slot) = self.get_link(link) else {
            observer(self, TreeEvent::NotFound { value })?;
            return Ok(false);
        };

        let against = self.node(slot).value;
        observer(self, TreeEvent::Compare { value, against })?;

        let removed = match value.cmp(&against) {
            Ordering::Less => self.delete_at(Link::Left(slot), value, observer)?,
            Ordering::Greater => self.delete_at(Link::Right(slot), value, observer)?,
            Ordering::Equal => {
                let node = self.node(slot);
                match (node.left, node.right) {
                    (Some(_), Some(right)) => {
                        let successor = self.min_value(right);
                        observer(self, TreeEvent::Successor { value, successor })?;
                        let removed = self.delete_at(Link::Right(slot), successor, observer)?;
                        self.node_mut(slot).value = successor;
                        observer(self, TreeEvent::Replaced { value, successor })?;
                        removed
                    }
                    (left, right) => {
                        self.set_link(link, left.or(right));
                        self.release(slot);
                        observer(self, TreeEvent::Removed { value })?;
                        return Ok(true);
                    }
                }
            }
        };

        if removed {
            self.update_height(slot);
            let balance = self.balance(slot);
            let case = if balance > 1 {
                if self.balance_of(self.node(slot).left) >= 0 {
                    Some(RotationCase::LeftLeft)
                } else {
                    Some(RotationCase::LeftRight)
                }
            } else if balance < -1 {
                if self.balance_of(self.node(slot).right) <= 0 {
                    Some(RotationCase::RightRight)
                } else {
                    Some(RotationCase::RightLeft)
                }
            } else {
                None
            };

            if let Some(case) = case {
                self.rebalance(link, slot, balance, case, observer)?;
            }
        }

        Ok(removed)
    }

    fn rebalance<E, F>(
        &mut self,
        link: Link,
        slot: Slot,
        balance: i32,
        case: RotationCase,
        observer: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        let at = self.node(slot).value;
        observer(self, TreeEvent::Unbalanced { at, balance, case })?;

        match case {
            RotationCase::LeftLeft => {
                self.rotate_right(link, slot, observer)?;
            }
            RotationCase::RightRight => {
                self.rotate_left(link, slot, observer)?;
            }
            RotationCase::LeftRight => {
                if let Some(left) = self.node(slot).left {
                    self.rotate_left(Link::Left(slot), left, observer)?;
                }
                self.rotate_right(link, slot, observer)?;
            }
            RotationCase::RightLeft => {
                if let Some(right) = self.node(slot).right {
                    self.rotate_right(Link::Right(slot), right, observer)?;
                }
                self.rotate_left(link, slot, observer)?;
            }
        }
        Ok(())
    }

    fn rotate_left<E, F>(&mut self, link: Link, slot: Slot, observer: &mut F) -> Result<Slot, E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        let Some(pivot) = self.node(slot).right else {
            return Ok(slot);
        };
        let inner = self.node(pivot).left;
        self.node_mut(slot).right = inner;
        self.node_mut(pivot).left = Some(slot);
        self.update_height(slot);
        self.update_height(pivot);
        self.set_link(link, Some(pivot));

        let rotation = Rotation::Left {
            at: self.node(slot).value,
            new_root: self.node(pivot).value,
        };
        observer(self, TreeEvent::Rotated(rotation))?;
        Ok(pivot)
    }

    fn rotate_right<E, F>(&mut self, link: Link, slot: Slot, observer: &mut F) -> Result<Slot, E>
    where
        F: FnMut(&AvlTree, TreeEvent) -> Result<(), E>,
    {
        let Some(pivot) = self.node(slot).left else {
            return Ok(slot);
        };
        let inner = self.node(pivot).right;
        self.node_mut(slot).left = inner;
        self.node_mut(pivot).right = Some(slot);
        self.update_height(slot);
        self.update_height(pivot);
        self.set_link(link, Some(pivot));

        let rotation = Rotation::Right {
            at: self.node(slot).value,
            new_root: self.node(pivot).value,
        };
        observer(self, TreeEvent::Rotated(rotation))?;
        Ok(pivot)
    }

    /// Owned layout of the current tree
    pub fn layout(&self) -> TreeLayout {
        let mut nodes = Vec::with_capacity(self.len);
        let mut stack: Vec<(Slot, usize)> = Vec::new();
        let mut cursor = self.root.map(|s| (s, 0));

        while cursor.is_some() || !stack.is_empty() {
            while let Some((slot, depth)) = cursor {
                stack.push((slot, depth));
                cursor = self.node(slot).left.map(|s| (s, depth + 1));
            }
            if let Some((slot, depth)) = stack.pop() {
                let node = self.node(slot);
                nodes.push(LayoutNode {
                    value: node.value,
                    height: node.height,
                    depth,
                    column: nodes.len(),
                    left: node.left.map(|s| self.node(s).value),
                    right: node.right.map(|s| self.node(s).value),
                });
                cursor = node.right.map(|s| (s, depth + 1));
            }
        }

        TreeLayout {
            root: self.root_value(),
            nodes,
        }
    }

    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_> {
        Traversal::new(self, order)
    }

    /// Check heights, balance factors, ordering and single ownership of
    /// every live slot
    pub fn is_valid(&self) -> bool {
        let mut seen = vec![false; self.slots.len()];
        let mut count = 0;
        let ok = self.check_subtree(self.root, None, None, &mut seen, &mut count);
        ok.is_some() && count == self.len
    }

    fn check_subtree(
        &self,
        slot: Option<Slot>,
        lo: Option<i64>,
        hi: Option<i64>,
        seen: &mut [bool],
        count: &mut usize,
    ) -> Option<i32> {
        let Some(slot) = slot else {
            return Some(0);
        };
        if std::mem::replace(&mut seen[slot], true) {
            return None;
        }
        *count += 1;

        let node = self.slots[slot].as_ref()?;
        if lo.is_some_and(|lo| node.value <= lo) || hi.is_some_and(|hi| node.value >= hi) {
            return None;
        }
        let lh = self.check_subtree(node.left, lo, Some(node.value), seen, count)?;
        let rh = self.check_subtree(node.right, Some(node.value), hi, seen, count)?;
        let height = 1 + lh.max(rh);
        if (lh - rh).abs() > 1 || node.height != height {
            return None;
        }
        Some(height)
    }

    fn find_slot(&self, value: i64) -> Option<Slot> {
        let mut cursor = self.root;
        while let Some(slot) = cursor {
            let node = self.node(slot);
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(slot),
            };
        }
        None
    }

    fn min_value(&self, mut slot: Slot) -> i64 {
        while let Some(left) = self.node(slot).left {
            slot = left;
        }
        self.node(slot).value
    }

    fn node(&self, slot: Slot) -> &TreeNode {
        match &self.slots[slot] {
            Some(node) => node,
            None => panic!("AVL slot {} is linked but free", slot),
        }
    }

    fn node_mut(&mut self, slot: Slot) -> &mut TreeNode {
        match &mut self.slots[slot] {
            Some(node) => node,
            None => panic!("AVL slot {} is linked but free", slot),
        }
    }

    fn child_value(&self, slot: Option<Slot>) -> i64 {
        slot.map(|s| self.node(s).value).unwrap_or_default()
    }

    fn height_of(&self, slot: Option<Slot>) -> i32 {
        slot.map(|s| self.node(s).height).unwrap_or(0)
    }

    fn balance(&self, slot: Slot) -> i32 {
        let node = self.node(slot);
        self.height_of(node.left) - self.height_of(node.right)
    }

    fn balance_of(&self, slot: Option<Slot>) -> i32 {
        slot.map(|s| self.balance(s)).unwrap_or(0)
    }

    fn update_height(&mut self, slot: Slot) {
        let node = self.node(slot);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.node_mut(slot).height = height;
    }

    fn get_link(&self, link: Link) -> Option<Slot> {
        match link {
            Link::Root => self.root,
            Link::Left(parent) => self.node(parent).left,
            Link::Right(parent) => self.node(parent).right,
        }
    }

    fn set_link(&mut self, link: Link, child: Option<Slot>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.node_mut(parent).left = child,
            Link::Right(parent) => self.node_mut(parent).right = child,
        }
    }

    fn alloc(&mut self, value: i64) -> Slot {
        let node = TreeNode {
            value,
            left: None,
            right: None,
            height: 1,
        };
        self.len += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: Slot) {
        self.slots[slot] = None;
        self.free.push(slot);
        self.len -= 1;
    }
}

/// Lazy walk over a tree's values in one of the four standard orders.
///
/// Finite, and restartable with [`Traversal::restart`]; a clone continues
/// independently from the same point.
#[derive(Debug, Clone)]
pub struct Traversal<'a> {
    tree: &'a AvlTree,
    order: TraversalOrder,
    /// `(slot, expanded)`: expanded entries are emitted when reached
    frontier: VecDeque<(Slot, bool)>,
}

impl<'a> Traversal<'a> {
    fn new(tree: &'a AvlTree, order: TraversalOrder) -> Self {
        let mut traversal = Traversal {
            tree,
            order,
            frontier: VecDeque::new(),
        };
        traversal.restart();
        traversal
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }

    /// Rewind to the first value
    pub fn restart(&mut self) {
        self.frontier.clear();
        if let Some(root) = self.tree.root {
            self.frontier.push_back((root, false));
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.order == TraversalOrder::LevelOrder {
            let (slot, _) = self.frontier.pop_front()?;
            let node = self.tree.node(slot);
            for child in [node.left, node.right].into_iter().flatten() {
                self.frontier.push_back((child, false));
            }
            return Some(node.value);
        }

        while let Some((slot, expanded)) = self.frontier.pop_back() {
            let node = self.tree.node(slot);
            if expanded {
                return Some(node.value);
            }
            // Pushed in reverse of emission order
            let left = node.left.map(|s| (s, false));
            let right = node.right.map(|s| (s, false));
            let this = Some((slot, true));
            let entries = match self.order {
                TraversalOrder::PreOrder => [right, left, this],
                TraversalOrder::InOrder => [right, this, left],
                _ => [this, right, left],
            };
            self.frontier.extend(entries.into_iter().flatten());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(values: &[i64]) -> AvlTree {
        let mut tree = AvlTree::new();
        for &v in values {
            tree.insert(v);
        }
        tree
    }

    #[test]
    fn test_ascending_inserts_rotate_left() {
        let mut rotations = Vec::new();
        let mut tree = AvlTree::new();
        for v in [10, 20, 30] {
            tree.insert_with(v, |_, event| {
                if let TreeEvent::Rotated(r) = event {
                    rotations.push(r);
                }
                Ok::<(), Infallible>(())
            })
            .unwrap();
        }

        assert_eq!(rotations, vec![Rotation::Left { at: 10, new_root: 20 }]);
        assert_eq!(tree.root_value(), Some(20));
        assert_eq!(tree.children(20), Some((Some(10), Some(30))));
        assert!(tree.is_valid());
    }

    #[test]
    fn test_double_rotation_cases() {
        let lr = tree_of(&[30, 10, 20]);
        assert_eq!(lr.root_value(), Some(20));
        assert_eq!(lr.children(20), Some((Some(10), Some(30))));

        let rl = tree_of(&[10, 30, 20]);
        assert_eq!(rl.root_value(), Some(20));
        assert!(rl.is_valid());
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut tree = tree_of(&[5, 3, 8]);
        assert!(!tree.insert(3));
        assert_eq!(tree.len(), 3);
        assert!(tree.is_valid());
    }

    #[test]
    fn test_delete_cases() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80, 65]);

        // leaf
        assert!(tree.delete(20));
        // one child
        assert!(tree.delete(60));
        assert_eq!(tree.children(70), Some((Some(65), Some(80))));
        // two children: successor of 50 is 65
        assert!(tree.delete(50));
        assert_eq!(tree.root_value(), Some(65));
        assert!(!tree.delete(999));

        assert!(tree.is_valid());
        assert_eq!(
            tree.traverse(TraversalOrder::InOrder).collect::<Vec<_>>(),
            vec![30, 40, 65, 70, 80]
        );
    }

    #[test]
    fn test_delete_triggers_rebalance() {
        let mut tree = tree_of(&[20, 10, 30, 40]);
        let mut cases = Vec::new();
        tree.delete_with(10, |_, event| {
            if let TreeEvent::Unbalanced { case, .. } = event {
                cases.push(case);
            }
            Ok::<(), Infallible>(())
        })
        .unwrap();
        assert_eq!(cases, vec![RotationCase::RightRight]);
        assert_eq!(tree.root_value(), Some(30));
        assert!(tree.is_valid());
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.delete(1);
        tree.insert(4);
        assert_eq!(tree.slots.len(), 3);
        assert!(tree.is_valid());
    }

    #[test]
    fn test_traversal_orders() {
        let tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let walk = |order| tree.traverse(order).collect::<Vec<_>>();
        assert_eq!(walk(TraversalOrder::InOrder), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(walk(TraversalOrder::PreOrder), vec![4, 2, 1, 3, 6, 5, 7]);
        assert_eq!(walk(TraversalOrder::PostOrder), vec![1, 3, 2, 5, 7, 6, 4]);
        assert_eq!(walk(TraversalOrder::LevelOrder), vec![4, 2, 6, 1, 3, 5, 7]);
    }

    #[test]
    fn test_traversal_restart() {
        let tree = tree_of(&[2, 1, 3]);
        let mut walk = tree.traverse(TraversalOrder::PreOrder);
        assert_eq!(walk.next(), Some(2));
        let fork = walk.clone();
        assert_eq!(walk.by_ref().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(walk.next(), None);
        walk.restart();
        assert_eq!(walk.collect::<Vec<_>>(), vec![2, 1, 3]);
        assert_eq!(fork.collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = AvlTree::new();
        assert_eq!(tree.traverse(TraversalOrder::LevelOrder).count(), 0);
        assert_eq!(tree.layout(), TreeLayout::default());
        assert!(tree.is_valid());
    }

    #[test]
    fn test_layout_columns_and_depths() {
        let tree = tree_of(&[2, 1, 3]);
        let layout = tree.layout();
        assert_eq!(layout.root, Some(2));
        assert_eq!(layout.values(), vec![1, 2, 3]);
        let root = layout.node(2).unwrap();
        assert_eq!((root.depth, root.column, root.height), (0, 1, 2));
        assert_eq!(layout.node(3).unwrap().depth, 1);
    }
}
