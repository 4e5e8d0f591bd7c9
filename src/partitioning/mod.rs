//! Entry-point for medoid-based k-NN graph partitioning.
//!
//! [`KMedoidsPartitioner::partition`] runs the whole pipeline:
//!
//! 1. extract the distinct node keys of the graph;
//! 2. select up to `n_parts` medoids with budget-bounded k-medoids
//!    ([`kmedoids`]);
//! 3. stamp every node with the index of its most similar medoid
//!    ([`assign`]);
//! 4. record the completion time once every entry has been processed.

pub mod assign;
pub mod budget;
pub mod error;
pub mod graph_traits;
pub mod kmedoids;
pub mod metrics;
pub mod neighbor_gen;
pub mod seed_select;
pub mod similarity;

pub use self::assign::{AssignToMedoids, assign_to_medoid};
pub use self::budget::{Budget, BudgetPolicy, ClusteringState, IterationBudget, TimeBudget};
pub use self::error::{PartitionerError, SimilarityError};
pub use self::graph_traits::DistributedGraph;
pub use self::kmedoids::{KMedoids, Solution};
pub use self::neighbor_gen::{NeighborGenerator, Swap, WindowNeighborGenerator};
pub use self::similarity::{NodeSimilarity, Similarity};

use crate::debug_invariants::DebugInvariants;
use crate::graph::{Node, PartitionId};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionerConfig {
    pub n_parts: usize,
    pub rng_seed: u64,
    /// Half-width of the candidate window around a medoid.
    pub window: usize,
    pub budget: Option<Budget>,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            n_parts: 2,
            rng_seed: 42,
            window: 8,
            budget: None,
        }
    }
}

/// Result of a partitioning run.
#[derive(Debug, Clone)]
pub struct Partitioning<G: DistributedGraph> {
    /// The input graph, every key stamped with its partition.
    pub graph: G,
    /// Medoid payloads; the partition id of a medoid is its index.
    pub medoids: Vec<G::Value>,
    /// Number of partitions that were requested.
    pub requested: usize,
    /// Number of entries the assignment step processed.
    pub processed: usize,
    /// Clustering iterations performed.
    pub iterations: usize,
    /// When assignment finished for every entry.
    pub end_time: SystemTime,
}

impl<G: DistributedGraph> Partitioning<G> {
    pub fn n_parts(&self) -> usize {
        self.medoids.len()
    }

    pub fn sizes(&self) -> Vec<usize> {
        metrics::partition_sizes(&self.graph, self.n_parts())
    }

    pub fn edge_cut_ratio(&self) -> f64 {
        metrics::edge_cut_ratio(&self.graph)
    }

    pub fn replication_factor(&self) -> f64 {
        metrics::replication_factor(&self.graph)
    }
}

impl<G: DistributedGraph> DebugInvariants for Partitioning<G> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Partitioning");
    }

    fn validate_invariants(&self) -> Result<(), PartitionerError> {
        let m = self.medoids.len();
        if m > self.requested {
            return Err(PartitionerError::InvariantViolation(format!(
                "{m} medoids exceed the {} requested partitions",
                self.requested
            )));
        }
        if self.processed != self.graph.len() {
            return Err(PartitionerError::InvariantViolation(format!(
                "processed {} of {} entries",
                self.processed,
                self.graph.len()
            )));
        }
        let bad: Option<Option<PartitionId>> = self
            .graph
            .keys()
            .map(|n| n.partition())
            .find_any(|p| !matches!(p, Some(q) if *q < m));
        match bad {
            Some(p) => Err(PartitionerError::InvariantViolation(format!(
                "node partition {p:?} outside 0..{m}"
            ))),
            None => Ok(()),
        }
    }
}

/// Partitions a k-NN graph around k-medoids.
///
/// ```
/// use knn_partition::graph::{Graph, NeighborList, Node};
/// use knn_partition::partitioning::{Budget, KMedoidsPartitioner};
///
/// let graph = Graph::from_entries(
///     (0..10u32).map(|i| (Node::new(i), NeighborList::with_capacity(4))),
/// );
/// let sim = |a: &u32, b: &u32| 1.0 / (1.0 + a.abs_diff(*b) as f64);
/// let partitioner = KMedoidsPartitioner::new(sim, 2).with_budget(Budget::iterations(20));
/// let result = partitioner.partition(graph).unwrap();
/// assert!(result.graph.nodes().all(|n| n.partition().unwrap() < 2));
/// ```
#[derive(Debug, Clone)]
pub struct KMedoidsPartitioner<S> {
    similarity: S,
    cfg: PartitionerConfig,
}

impl<S> KMedoidsPartitioner<S> {
    pub fn new(similarity: S, partitions: usize) -> Self {
        Self {
            similarity,
            cfg: PartitionerConfig {
                n_parts: partitions,
                ..Default::default()
            },
        }
    }

    pub fn from_config(similarity: S, cfg: PartitionerConfig) -> Self {
        Self { similarity, cfg }
    }

    pub fn set_budget(&mut self, budget: Budget) {
        self.cfg.budget = Some(budget);
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.set_budget(budget);
        self
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.cfg.rng_seed = rng_seed;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.cfg.window = window;
        self
    }

    pub fn config(&self) -> &PartitionerConfig {
        &self.cfg
    }

    pub fn similarity(&self) -> &S {
        &self.similarity
    }

    /// Partitions `graph`, returning it with every key's `partition` set.
    ///
    /// # Errors
    /// - [`PartitionerError::MissingBudget`] if no budget was configured;
    /// - [`PartitionerError::InvalidPartitionCount`] if zero partitions were requested;
    /// - [`PartitionerError::Similarity`] if the similarity function fails.
    ///
    /// Configuration errors are reported before any clustering work starts.
    pub fn partition<G>(&self, mut graph: G) -> Result<Partitioning<G>, PartitionerError>
    where
        G: DistributedGraph,
        S: Similarity<G::Value>,
    {
        let budget = self.cfg.budget.ok_or(PartitionerError::MissingBudget)?;
        if self.cfg.n_parts == 0 {
            return Err(PartitionerError::InvalidPartitionCount(0));
        }
        if graph.is_empty() {
            return Ok(Partitioning {
                graph,
                medoids: Vec::new(),
                requested: self.cfg.n_parts,
                processed: 0,
                iterations: 0,
                end_time: SystemTime::now(),
            });
        }

        let keyed: Vec<(G::Value, u64)> = graph
            .keys()
            .zip(graph.degrees())
            .map(|(n, d)| (n.value.clone(), d as u64))
            .collect();
        let (nodes, weights): (Vec<Node<G::Value>>, Vec<u64>) = keyed
            .into_iter()
            .unique_by(|(v, _)| v.clone())
            .map(|(v, w)| (Node::new(v), w))
            .unzip();
        if nodes.len() < self.cfg.n_parts {
            log::warn!(
                "graph has {} distinct nodes, fewer than the {} requested partitions",
                nodes.len(),
                self.cfg.n_parts
            );
        }

        let adapter = NodeSimilarity::new(&self.similarity);
        let solution = KMedoids::new(self.cfg.n_parts, self.cfg.rng_seed).cluster(
            &nodes,
            &weights,
            &adapter,
            &WindowNeighborGenerator::new(self.cfg.window),
            &budget,
        )?;
        let iterations = solution.state.iterations;
        let medoids: Vec<G::Value> = solution.medoids.into_iter().map(|n| n.value).collect();

        let processed = AssignToMedoids::new(&medoids, &self.similarity)?.execute(&mut graph)?;
        let end_time = SystemTime::now();
        if log::log_enabled!(log::Level::Info) {
            log::info!(
                "partitioned {} nodes into {} partitions ({} iterations, {} clustering similarities, budget {}): edge cut ratio {:.4}, replication factor {:.3}",
                processed,
                medoids.len(),
                iterations,
                adapter.evaluations(),
                budget,
                metrics::edge_cut_ratio(&graph),
                metrics::replication_factor(&graph)
            );
        }

        let result = Partitioning {
            graph,
            medoids,
            requested: self.cfg.n_parts,
            processed,
            iterations,
            end_time,
        };
        result.debug_assert_invariants();
        Ok(result)
    }
}

#[cfg(test)]
mod tests;
