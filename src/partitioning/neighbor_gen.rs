//! Candidate generation for medoid swaps.
//!
//! Each clustering iteration asks a [`NeighborGenerator`] which medoid swaps to
//! evaluate. Medoids and candidates are positions in the node sequence handed
//! to the engine.

use hashbrown::HashSet;
use rand::Rng;
use rand::rngs::SmallRng;

/// Proposal to replace the medoid in `slot` by the node at position `candidate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Swap {
    pub slot: usize,
    pub candidate: usize,
}

/// Strategy proposing swaps likely to improve the medoid set.
///
/// Implementations must only propose candidates in `0..n_nodes` that are not
/// current medoids, and slots in `0..medoids.len()`.
pub trait NeighborGenerator: Send + Sync {
    fn generate(&self, medoids: &[usize], n_nodes: usize, rng: &mut SmallRng) -> Vec<Swap>;
}

/// Proposes, for one randomly chosen medoid, every non-medoid node whose
/// position lies within `window` of that medoid's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowNeighborGenerator {
    pub window: usize,
}

impl WindowNeighborGenerator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for WindowNeighborGenerator {
    fn default() -> Self {
        Self { window: 8 }
    }
}

impl NeighborGenerator for WindowNeighborGenerator {
    fn generate(&self, medoids: &[usize], n_nodes: usize, rng: &mut SmallRng) -> Vec<Swap> {
        if medoids.is_empty() || n_nodes <= medoids.len() {
            return Vec::new();
        }
        let slot = rng.gen_range(0..medoids.len());
        let center = medoids[slot];
        let taken: HashSet<usize> = medoids.iter().copied().collect();
        let lo = center.saturating_sub(self.window);
        let hi = center.saturating_add(self.window).min(n_nodes - 1);
        (lo..=hi)
            .filter(|c| !taken.contains(c))
            .map(|candidate| Swap { slot, candidate })
            .collect()
    }
}
