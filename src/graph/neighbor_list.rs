//! Bounded neighbour lists.

use serde::{Deserialize, Serialize};

/// One edge of a k-NN graph: a neighbouring payload and its similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor<T> {
    pub node: T,
    pub similarity: f64,
}

impl<T> Neighbor<T> {
    pub fn new(node: T, similarity: f64) -> Self {
        Self { node, similarity }
    }
}

/// The `k` most similar neighbours of a node, most similar first.
///
/// Adding to a full list evicts the least similar entry when the newcomer is
/// more similar; otherwise the newcomer is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborList<T> {
    capacity: usize,
    neighbors: Vec<Neighbor<T>>,
}

impl<T: PartialEq> NeighborList<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            neighbors: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `n`, keeping the list sorted and bounded.
    ///
    /// Returns `true` if the list changed.
    pub fn add(&mut self, n: Neighbor<T>) -> bool {
        if self.capacity == 0 || self.neighbors.iter().any(|m| m.node == n.node) {
            return false;
        }
        if self.neighbors.len() == self.capacity {
            match self.neighbors.last() {
                Some(worst) if worst.similarity >= n.similarity => return false,
                _ => {
                    self.neighbors.pop();
                }
            }
        }
        // stable: equal similarities keep insertion order
        let pos = self
            .neighbors
            .partition_point(|m| m.similarity >= n.similarity);
        self.neighbors.insert(pos, n);
        true
    }

    pub fn contains(&self, node: &T) -> bool {
        self.neighbors.iter().any(|m| &m.node == node)
    }
}

impl<T> NeighborList<T> {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor<T>> {
        self.neighbors.iter()
    }
}

impl<'a, T> IntoIterator for &'a NeighborList<T> {
    type Item = &'a Neighbor<T>;
    type IntoIter = std::slice::Iter<'a, Neighbor<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
