//! Partitioning metrics utilities.
//!
//! Functions for evaluating a partitioned k-NN graph: partition sizes, edge cut
//! and replication factor. The partitioner logs the edge-cut ratio and the
//! replication factor in its run summary; they are not on the assignment path.
//!
//! Edges are the `(node, neighbour)` pairs of the neighbour lists. Neighbours
//! that are not keys of the graph, and unassigned nodes, are ignored.

use crate::graph::PartitionId;
use crate::partitioning::graph_traits::DistributedGraph;
use hashbrown::HashSet;
use rayon::prelude::*;

/// Number of nodes per partition, for partitions `0..n_parts`.
///
/// Nodes whose partition is `>= n_parts` are not counted.
pub fn partition_sizes<G: DistributedGraph>(g: &G, n_parts: usize) -> Vec<usize> {
    let parts: Vec<PartitionId> = g.keys().filter_map(|n| n.partition()).collect();
    let mut sizes = vec![0usize; n_parts];
    for p in parts {
        if let Some(s) = sizes.get_mut(p) {
            *s += 1;
        }
    }
    sizes
}

/// Ratio of the largest partition to the mean partition size (1.0 is perfect).
///
/// Returns 0.0 for no partitions or no nodes.
pub fn imbalance(sizes: &[usize]) -> f64 {
    let total: usize = sizes.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let max = sizes.iter().copied().max().unwrap_or(0);
    max as f64 / (total as f64 / sizes.len() as f64)
}

/// Counts the neighbour edges whose endpoints lie in different partitions.
pub fn edge_cut<G: DistributedGraph>(g: &G) -> usize {
    g.entries()
        .filter_map(|(n, nl)| n.partition().map(|p| (p, nl)))
        .map(|(p, nl)| {
            nl.iter()
                .filter_map(|nb| g.partition_of(&nb.node))
                .filter(|&q| q != p)
                .count()
        })
        .sum()
}

/// Fraction of neighbour edges that cross partitions.
pub fn edge_cut_ratio<G: DistributedGraph>(g: &G) -> f64 {
    let edges: usize = g
        .entries()
        .filter(|(n, _)| n.partition().is_some())
        .map(|(_, nl)| nl.iter().filter(|nb| g.partition_of(&nb.node).is_some()).count())
        .sum();
    if edges == 0 {
        return 0.0;
    }
    edge_cut(g) as f64 / edges as f64
}

/// Average number of partitions each node must be present in.
///
/// A node lives in its own partition and is replicated into the partition of
/// every node that lists it as a neighbour.
pub fn replication_factor<G: DistributedGraph>(g: &G) -> f64 {
    let n = g.len();
    if n == 0 {
        return 0.0;
    }
    let owners: HashSet<(&G::Value, PartitionId)> = g
        .entries()
        .filter_map(|(node, nl)| node.partition().map(|p| (node, nl, p)))
        .flat_map_iter(|(node, nl, p)| {
            std::iter::once((&node.value, p)).chain(
                nl.iter()
                    .filter(move |nb| g.contains_key(&nb.node))
                    .map(move |nb| (&nb.node, p)),
            )
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect();
    owners.len() as f64 / n as f64
}
