// Graph trait abstraction for partitioning
use crate::graph::{Graph, NeighborList, Node, PartitionId};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator};
use std::hash::Hash;

/// A key/value collection of `(node, neighbour-list)` entries that can be
/// processed by many workers at once.
///
/// Workers receive disjoint entries: `entries_mut` hands each worker exclusive
/// access to the nodes it processes, so writing a node's own attribute needs
/// no synchronization. Neighbour lists are only ever exposed read-only.
pub trait DistributedGraph: Sync {
    /// Node payload type (must be hashable and thread-safe).
    type Value: Clone + Eq + Hash + Send + Sync;

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parallel, indexable iterator over the graph's keys.
    fn keys(&self) -> impl IndexedParallelIterator<Item = &Node<Self::Value>> + '_;

    /// Parallel iterator over entries, read-only.
    fn entries(
        &self,
    ) -> impl IndexedParallelIterator<Item = (&Node<Self::Value>, &NeighborList<Self::Value>)> + '_;

    /// Parallel iterator over entries with exclusive access to each key.
    fn entries_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = (&mut Node<Self::Value>, &NeighborList<Self::Value>)> + '_;

    /// Parallel iterator over the neighbour-list lengths, in key order.
    fn degrees(&self) -> impl IndexedParallelIterator<Item = usize> + '_;

    /// Whether `value` is a key of the graph.
    fn contains_key(&self, value: &Self::Value) -> bool;

    /// Partition of the key `value`, if present and assigned.
    fn partition_of(&self, value: &Self::Value) -> Option<PartitionId>;
}

impl<T> DistributedGraph for Graph<T>
where
    T: Clone + Eq + Hash + Send + Sync,
{
    type Value = T;

    fn len(&self) -> usize {
        Graph::len(self)
    }

    fn keys(&self) -> impl IndexedParallelIterator<Item = &Node<T>> + '_ {
        self.raw_entries().par_iter().map(|(n, _)| n)
    }

    fn entries(&self) -> impl IndexedParallelIterator<Item = (&Node<T>, &NeighborList<T>)> + '_ {
        self.raw_entries().par_iter().map(|(n, nl)| (n, nl))
    }

    fn entries_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = (&mut Node<T>, &NeighborList<T>)> + '_ {
        self.raw_entries_mut().par_iter_mut().map(|(n, nl)| (n, &*nl))
    }

    fn degrees(&self) -> impl IndexedParallelIterator<Item = usize> + '_ {
        self.raw_entries().par_iter().map(|(_, nl)| nl.len())
    }

    fn contains_key(&self, value: &T) -> bool {
        self.node(value).is_some()
    }

    fn partition_of(&self, value: &T) -> Option<PartitionId> {
        Graph::partition_of(self, value)
    }
}
