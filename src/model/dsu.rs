//! Disjoint-set forest with path compression and union by rank

use super::graph::NodeId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct DisjointSetForest {
    parent: FxHashMap<NodeId, NodeId>,
    rank: FxHashMap<NodeId, u32>,
}

impl DisjointSetForest {
    /// Create one singleton set per id
    pub fn new(ids: impl IntoIterator<Item = NodeId>) -> Self {
        let mut forest = DisjointSetForest::default();
        for id in ids {
            forest.parent.insert(id, id);
            forest.rank.insert(id, 0);
        }
        forest
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set, or `None` if `x` was never added.
    ///
    /// Every element on the walked path is re-pointed at the root.
    ///
    /// # Panics
    ///
    /// Panics if the parent pointers contain a cycle, which only a bug in
    /// this type can produce.
    pub fn find(&mut self, x: NodeId) -> Option<NodeId> {
        let mut root = *self.parent.get(&x)?;
        let mut hops = 0;
        while let Some(&next) = self.parent.get(&root) {
            if next == root {
                break;
            }
            root = next;
            hops += 1;
            assert!(
                hops <= self.parent.len(),
                "disjoint-set forest has a parent cycle through {}",
                x
            );
        }

        let mut node = x;
        while node != root {
            let next = self.parent[&node];
            self.parent.insert(node, root);
            node = next;
        }

        Some(root)
    }

    /// Merge the sets of `a` and `b`.
    ///
    /// Returns `Some(true)` if they were in different sets, `Some(false)` if
    /// they already shared one, and `None` if either id is unknown.
    pub fn union(&mut self, a: NodeId, b: NodeId) -> Option<bool> {
        let ra = self.find(a)?;
        let rb = self.find(b)?;
        if ra == rb {
            return Some(false);
        }

        let rank_a = self.rank[&ra];
        let rank_b = self.rank[&rb];
        if rank_a < rank_b {
            self.parent.insert(ra, rb);
        } else if rank_a > rank_b {
            self.parent.insert(rb, ra);
        } else {
            self.parent.insert(rb, ra);
            self.rank.insert(ra, rank_a + 1);
        }
        Some(true)
    }

    pub fn connected(&mut self, a: NodeId, b: NodeId) -> bool {
        matches!((self.find(a), self.find(b)), (Some(ra), Some(rb)) if ra == rb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> impl Iterator<Item = NodeId> {
        (0..n).map(NodeId)
    }

    #[test]
    fn test_union_and_find() {
        let mut dsu = DisjointSetForest::new(ids(5));
        assert_eq!(dsu.union(NodeId(0), NodeId(1)), Some(true));
        assert_eq!(dsu.union(NodeId(2), NodeId(3)), Some(true));
        assert_eq!(dsu.union(NodeId(1), NodeId(0)), Some(false));
        assert!(dsu.connected(NodeId(0), NodeId(1)));
        assert!(!dsu.connected(NodeId(1), NodeId(2)));

        assert_eq!(dsu.union(NodeId(1), NodeId(3)), Some(true));
        let root = dsu.find(NodeId(0));
        for i in 0..4 {
            assert_eq!(dsu.find(NodeId(i)), root);
        }
        assert_ne!(dsu.find(NodeId(4)), root);
    }

    #[test]
    fn test_unknown_ids() {
        let mut dsu = DisjointSetForest::new(ids(2));
        assert_eq!(dsu.find(NodeId(7)), None);
        assert_eq!(dsu.union(NodeId(0), NodeId(7)), None);
        assert!(!dsu.connected(NodeId(0), NodeId(7)));
    }

    #[test]
    fn test_path_compression_flattens_chain() {
        let mut dsu = DisjointSetForest::new(ids(6));
        for i in 0..5 {
            dsu.union(NodeId(i), NodeId(i + 1));
        }
        let root = dsu.find(NodeId(5)).unwrap();
        for i in 0..6 {
            assert_eq!(dsu.parent[&NodeId(i)], root);
        }
    }
}
