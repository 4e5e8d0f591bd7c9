#![cfg_attr(docsrs, feature(doc_cfg))]
//! # knn-partition
//!
//! knn-partition splits large k-NN similarity graphs into a fixed number of
//! disjoint partitions so that distributed graph algorithms can work on each
//! partition with little cross-partition traffic.
//!
//! ## Pipeline
//! - Select up to `P` representative nodes (medoids) with budget-bounded
//!   k-medoids clustering under a domain similarity.
//! - Label every node with the index of its most similar medoid, stored in the
//!   node's `partition` attribute.
//!
//! Both stages run on Rayon's thread pool. Assignment writes only each node's own
//! attribute, so it needs no locking; the medoid set is shared read-only.
//!
//! ## Determinism
//!
//! Seeding and candidate generation use `SmallRng` seeds drawn from
//! configuration, and assignment is a pure function of the node, the medoid set
//! and the similarity. With an iteration budget a run is fully reproducible; a
//! time budget bounds the run by wall-clock instead.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! knn-partition = "0.3"
//! ```

pub mod debug_invariants;
pub mod graph;
pub mod partitioning;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::graph::{Graph, Neighbor, NeighborList, Node, PARTITION_KEY, PartitionId};
    pub use crate::partitioning::{
        Budget, BudgetPolicy, DistributedGraph, KMedoidsPartitioner, NeighborGenerator,
        PartitionerConfig, PartitionerError, Partitioning, Similarity, SimilarityError,
        WindowNeighborGenerator,
    };
}

static_assertions::assert_impl_all!(graph::Node<u64>: Send, Sync);
static_assertions::assert_impl_all!(graph::Graph<u64>: partitioning::DistributedGraph, Send);
static_assertions::assert_impl_all!(partitioning::Budget: partitioning::BudgetPolicy, Copy);
