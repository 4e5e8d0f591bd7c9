//! In-memory k-NN graph: a mapping from [`Node`] to [`NeighborList`].
//!
//! Entries keep their insertion order and keys are unique. The partitioner only
//! reads keys and writes the `partition` attribute of each key; neighbour lists
//! are never touched.

pub mod neighbor_list;
pub mod node;

pub use neighbor_list::{Neighbor, NeighborList};
pub use node::{Node, PARTITION_KEY, PartitionId};

use hashbrown::HashMap;
use std::hash::Hash;

/// A k-NN graph held in memory.
#[derive(Debug, Clone)]
pub struct Graph<T: Eq + Hash> {
    entries: Vec<(Node<T>, NeighborList<T>)>,
    index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> Graph<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
            index: HashMap::with_capacity(cap),
        }
    }

    /// Adds an entry. Returns `false` and leaves the graph unchanged if a node
    /// with the same payload is already present.
    pub fn insert(&mut self, node: Node<T>, neighbors: NeighborList<T>) -> bool {
        if self.index.contains_key(&node.value) {
            return false;
        }
        self.index.insert(node.value.clone(), self.entries.len());
        self.entries.push((node, neighbors));
        true
    }

    /// Builds a graph from `(node, neighbours)` pairs; later duplicates of a key are dropped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Node<T>, NeighborList<T>)>,
    {
        let it = entries.into_iter();
        let mut g = Self::with_capacity(it.size_hint().0);
        for (n, nl) in it {
            g.insert(n, nl);
        }
        g
    }

    pub fn node(&self, value: &T) -> Option<&Node<T>> {
        self.index.get(value).map(|&i| &self.entries[i].0)
    }

    pub fn neighbors(&self, value: &T) -> Option<&NeighborList<T>> {
        self.index.get(value).map(|&i| &self.entries[i].1)
    }

    /// Partition of the node with payload `value`, if present and assigned.
    pub fn partition_of(&self, value: &T) -> Option<PartitionId> {
        self.node(value).and_then(Node::partition)
    }
}

impl<T: Clone + Eq + Hash> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> Graph<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node<T>, &NeighborList<T>)> {
        self.entries.iter().map(|(n, nl)| (n, nl))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.entries.iter().map(|(n, _)| n)
    }

    pub(crate) fn raw_entries(&self) -> &[(Node<T>, NeighborList<T>)] {
        &self.entries
    }

    /// Mutable access to the node keys only; payloads must not be changed
    /// through it, the index is keyed by them.
    pub(crate) fn raw_entries_mut(&mut self) -> &mut [(Node<T>, NeighborList<T>)] {
        &mut self.entries
    }

    pub fn into_entries(self) -> Vec<(Node<T>, NeighborList<T>)> {
        self.entries
    }
}
