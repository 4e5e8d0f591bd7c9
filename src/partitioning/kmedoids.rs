//! Budget-bounded k-medoids clustering.
//!
//! ## Objective
//!
//! For a medoid set `M` over nodes `V` the engine maximizes
//!
//! ```text
//! Q(M) = Σ_{v ∈ V} max(0, max_{m ∈ M} sim(v, m))
//! ```
//!
//! i.e. the total similarity of every node to its most similar medoid. The
//! inner maximum is seeded at zero, the same convention the assignment step
//! uses, so `Q` measures exactly the similarity the final labelling realizes.
//!
//! ## Iteration
//!
//! Medoids are seeded with [`pick_seeds`]. Each iteration asks the
//! [`NeighborGenerator`] for candidate swaps, evaluates `Q` for every swap in
//! parallel and commits the best strictly improving one. Ties between equally
//! good swaps go to the lowest `(slot, candidate)` pair so runs are
//! reproducible. There is no convergence test: the loop runs until the
//! [`BudgetPolicy`] reports exhaustion, checked before each iteration.
//!
//! The main entry point is [`KMedoids::cluster`], which returns a [`Solution`].

use crate::partitioning::budget::{BudgetPolicy, ClusteringState};
use crate::partitioning::error::{PartitionerError, SimilarityError};
use crate::partitioning::neighbor_gen::{NeighborGenerator, Swap};
use crate::partitioning::seed_select::pick_seeds;
use crate::partitioning::similarity::Similarity;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;

/// Outcome of a clustering run.
#[derive(Debug, Clone)]
pub struct Solution<N> {
    /// Selected medoids; a medoid's index is its partition id.
    pub medoids: Vec<N>,
    /// Positions of the medoids in the clustered node sequence.
    pub positions: Vec<usize>,
    /// Final engine state (start time, iterations, similarity count).
    pub state: ClusteringState,
    /// Objective value of the returned medoid set.
    pub objective: f64,
}

impl<N> Solution<N> {
    pub fn len(&self) -> usize {
        self.medoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medoids.is_empty()
    }
}

/// k-medoids engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct KMedoids {
    /// Requested number of medoids.
    pub k: usize,
    /// Seed for medoid seeding and candidate generation.
    pub rng_seed: u64,
}

impl KMedoids {
    pub fn new(k: usize, rng_seed: u64) -> Self {
        Self { k, rng_seed }
    }

    /// Clusters `nodes` into at most `k` groups and returns the medoid set.
    ///
    /// `weights[i]` biases seeding towards node `i` (pass neighbour-list lengths
    /// for a k-NN graph). `nodes` must not contain duplicates.
    ///
    /// # Errors
    /// - [`PartitionerError::InvalidPartitionCount`] if `k == 0`;
    /// - [`PartitionerError::WeightLengthMismatch`] if `weights` and `nodes` differ in length;
    /// - [`PartitionerError::Similarity`] if any similarity evaluation fails.
    pub fn cluster<N, S, G, B>(
        &self,
        nodes: &[N],
        weights: &[u64],
        similarity: &S,
        generator: &G,
        budget: &B,
    ) -> Result<Solution<N>, PartitionerError>
    where
        N: Clone + Send + Sync,
        S: Similarity<N> + ?Sized,
        G: NeighborGenerator + ?Sized,
        B: BudgetPolicy + ?Sized,
    {
        if self.k == 0 {
            return Err(PartitionerError::InvalidPartitionCount(0));
        }
        if weights.len() != nodes.len() {
            return Err(PartitionerError::WeightLengthMismatch {
                expected: nodes.len(),
                got: weights.len(),
            });
        }

        let mut state = ClusteringState::start();
        let mut positions = pick_seeds(weights, self.k, self.rng_seed);
        if positions.is_empty() {
            return Ok(Solution {
                medoids: Vec::new(),
                positions,
                state,
                objective: 0.0,
            });
        }
        log::debug!("seeded {} medoids from {} nodes", positions.len(), nodes.len());

        let per_eval = (nodes.len() * positions.len()) as u64;
        let mut score = total_similarity(nodes, &positions, similarity)?;
        state.similarities += per_eval;

        // offset so that generation does not replay the seeding stream
        let mut rng = SmallRng::seed_from_u64(self.rng_seed.wrapping_add(1));
        while !budget.is_exhausted(&state) {
            let mut swaps = generator.generate(&positions, nodes.len(), &mut rng);
            if swaps.is_empty() {
                // nothing to score: every node is a medoid or the window is empty
                state.iterations += 1;
                std::thread::yield_now();
                continue;
            }
            swaps.sort_unstable();
            swaps.dedup();
            let scored: Vec<(f64, Swap)> = swaps
                .par_iter()
                .map(|&swap| {
                    let mut trial = positions.clone();
                    trial[swap.slot] = swap.candidate;
                    total_similarity(nodes, &trial, similarity).map(|q| (q, swap))
                })
                .collect::<Result<_, _>>()?;
            state.similarities += per_eval * scored.len() as u64;

            let mut best: Option<(f64, Swap)> = None;
            for (q, swap) in scored {
                let to_beat = best.map_or(score, |(b, _)| b);
                if q > to_beat {
                    best = Some((q, swap));
                }
            }
            if let Some((q, swap)) = best {
                log::debug!(
                    "iteration {}: medoid slot {} -> node {} (objective {:.6} -> {:.6})",
                    state.iterations,
                    swap.slot,
                    swap.candidate,
                    score,
                    q
                );
                positions[swap.slot] = swap.candidate;
                score = q;
            }
            state.iterations += 1;
        }

        Ok(Solution {
            medoids: positions.iter().map(|&p| nodes[p].clone()).collect(),
            positions,
            state,
            objective: score,
        })
    }
}

/// Total similarity of every node to its most similar medoid.
fn total_similarity<N, S>(nodes: &[N], medoids: &[usize], similarity: &S) -> Result<f64, SimilarityError>
where
    N: Sync,
    S: Similarity<N> + ?Sized,
{
    let best: Vec<f64> = nodes
        .par_iter()
        .map(|v| {
            medoids.iter().try_fold(0.0f64, |acc, &m| {
                let s = similarity.similarity(v, &nodes[m])?;
                Ok::<f64, SimilarityError>(if s > acc { s } else { acc })
            })
        })
        .collect::<Result<_, SimilarityError>>()?;
    // summed in order so the value does not depend on work splitting
    Ok(best.iter().sum())
}
