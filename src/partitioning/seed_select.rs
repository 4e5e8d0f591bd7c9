//! Seed selection for k-medoids.
//!
//! This module provides [`pick_seeds`], which chooses the initial medoids of a
//! clustering run: distinct positions into the node sequence, drawn without
//! replacement with probability proportional to each node's weight (its
//! neighbour-list length in a k-NN graph).

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Picks `min(k, weights.len())` distinct positions in `0..weights.len()`.
///
/// Selection is weighted by `weights` and reproducible from `rng_seed`. Nodes
/// with zero weight are only picked once every positive-weight node has been
/// chosen; if all weights are zero the choice is uniform.
pub fn pick_seeds(weights: &[u64], k: usize, rng_seed: u64) -> Vec<usize> {
    let n = weights.len();
    let num_seeds = k.min(n);
    if num_seeds == 0 {
        return Vec::new();
    }
    let mut rng = SmallRng::seed_from_u64(rng_seed);
    let mut weights = weights.to_vec();
    let mut prefix: Vec<u64> = Vec::with_capacity(n);
    let mut sum = 0u64;
    for &w in &weights {
        sum += w;
        prefix.push(sum);
    }
    let mut chosen = Vec::with_capacity(num_seeds);
    while chosen.len() < num_seeds {
        let total_weight = prefix[n - 1];
        if total_weight == 0 {
            break;
        }
        let t = rng.gen_range(0..total_weight);
        // first position whose prefix sum exceeds t
        let i = prefix.partition_point(|&p| p <= t);
        chosen.push(i);
        // remove this node from future selection
        let w = weights[i];
        weights[i] = 0;
        for p in &mut prefix[i..] {
            *p -= w;
        }
    }
    if chosen.len() < num_seeds {
        // remaining zero-weight nodes, picked uniformly
        let mut pool: Vec<usize> = (0..n).filter(|&i| weights[i] == 0 && !chosen.contains(&i)).collect();
        while chosen.len() < num_seeds && !pool.is_empty() {
            let idx = rng.gen_range(0..pool.len());
            chosen.push(pool.swap_remove(idx));
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seeds_are_distinct() {
        let weights = vec![3, 1, 4, 1, 5, 9, 2, 6];
        let seeds = pick_seeds(&weights, 5, 7);
        assert_eq!(seeds.len(), 5);
        let set: HashSet<_> = seeds.iter().collect();
        assert_eq!(set.len(), 5);
        assert!(seeds.iter().all(|&s| s < weights.len()));
    }

    #[test]
    fn more_seeds_than_nodes() {
        let seeds = pick_seeds(&[1, 1, 1], 5, 42);
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let seeds = pick_seeds(&[0, 0, 0, 0], 2, 3);
        assert_eq!(seeds.len(), 2);
        assert_ne!(seeds[0], seeds[1]);
    }

    #[test]
    fn positive_weights_are_preferred() {
        // only position 2 carries weight, so it must be drawn first
        let seeds = pick_seeds(&[0, 0, 10, 0], 2, 11);
        assert_eq!(seeds[0], 2);
        assert_eq!(seeds.len(), 2);
    }

    #[test]
    fn reproducible_from_seed() {
        let w = vec![2; 50];
        assert_eq!(pick_seeds(&w, 6, 99), pick_seeds(&w, 6, 99));
    }

    #[test]
    fn empty_or_zero_k() {
        assert!(pick_seeds(&[], 3, 1).is_empty());
        assert!(pick_seeds(&[1, 2], 0, 1).is_empty());
    }
}
