//! Node handles of a k-NN graph.
//!
//! A [`Node`] wraps a domain payload and carries the single piece of metadata
//! the partitioner writes: the id of the partition it was assigned to.
//! Identity (equality, hashing) is defined by the payload alone.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Index of a partition, equal to the position of its medoid in the medoid set.
pub type PartitionId = usize;

/// Attribute name under which the partition id is stored and serialized.
pub const PARTITION_KEY: &str = "partition";

/// A graph node: an opaque payload plus its partition attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<T> {
    /// Domain payload; the node's identity.
    pub value: T,
    #[serde(rename = "partition", default)]
    partition: Option<PartitionId>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            partition: None,
        }
    }

    /// Returns the partition this node was assigned to, if any.
    pub fn partition(&self) -> Option<PartitionId> {
        self.partition
    }

    pub fn set_partition(&mut self, p: PartitionId) {
        self.partition = Some(p);
    }

    pub fn clear_partition(&mut self) {
        self.partition = None;
    }
}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: Hash> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> From<T> for Node<T> {
    fn from(value: T) -> Self {
        Node::new(value)
    }
}
