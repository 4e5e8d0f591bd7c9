//! Assignment of every graph node to its most similar medoid.
//!
//! Assignment is a two-phase pipeline: [`AssignToMedoids::new`] describes the
//! step (medoid set plus similarity), [`AssignToMedoids::execute`] runs it over
//! every entry of a [`DistributedGraph`] and returns only once all entries have
//! been stamped.

use crate::graph::PartitionId;
use crate::partitioning::error::{PartitionerError, SimilarityError};
use crate::partitioning::graph_traits::DistributedGraph;
use crate::partitioning::similarity::Similarity;
use rayon::prelude::*;

/// Index of the medoid most similar to `value`.
///
/// Medoids are scanned in order against a running best seeded at `0.0` and
/// replaced only on a strictly greater score, so ties go to the lowest index
/// and a value with no positive similarity to any medoid lands in partition 0.
pub fn assign_to_medoid<T, S>(value: &T, medoids: &[T], similarity: &S) -> Result<PartitionId, SimilarityError>
where
    S: Similarity<T> + ?Sized,
{
    let mut most_similar = 0;
    let mut highest = 0.0f64;
    for (i, medoid) in medoids.iter().enumerate() {
        let s = similarity.similarity(value, medoid)?;
        if s > highest {
            highest = s;
            most_similar = i;
        }
    }
    Ok(most_similar)
}

/// The assignment step over a whole graph, ready to execute.
///
/// The medoid set is borrowed immutably for the lifetime of the step and shared
/// by every worker.
pub struct AssignToMedoids<'a, T, S: ?Sized> {
    medoids: &'a [T],
    similarity: &'a S,
}

impl<'a, T, S> AssignToMedoids<'a, T, S>
where
    T: Sync,
    S: Similarity<T> + ?Sized,
{
    /// # Errors
    /// [`PartitionerError::NoMedoids`] if `medoids` is empty.
    pub fn new(medoids: &'a [T], similarity: &'a S) -> Result<Self, PartitionerError> {
        if medoids.is_empty() {
            return Err(PartitionerError::NoMedoids);
        }
        Ok(Self { medoids, similarity })
    }

    pub fn medoids(&self) -> &'a [T] {
        self.medoids
    }

    /// Stamps every node of `graph` with its partition and returns the number
    /// of processed entries.
    ///
    /// Each worker writes only the nodes it was handed. The first similarity
    /// failure aborts the step; nodes already stamped keep their new value and
    /// the result must be discarded.
    pub fn execute<G>(&self, graph: &mut G) -> Result<usize, PartitionerError>
    where
        G: DistributedGraph<Value = T>,
    {
        let processed = graph
            .entries_mut()
            .map(|(node, _neighbors)| {
                let p = assign_to_medoid(&node.value, self.medoids, self.similarity)?;
                node.set_partition(p);
                Ok::<usize, SimilarityError>(1)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))?;
        Ok(processed)
    }
}
