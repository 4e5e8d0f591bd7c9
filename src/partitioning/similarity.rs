//! Similarity functions and their adapter to node handles.
//!
//! Domain code supplies a [`Similarity`] over raw payloads. The clustering
//! engine compares [`Node`] handles through [`NodeSimilarity`], which forwards
//! to the payload similarity and counts how many comparisons were made.

use crate::graph::Node;
use crate::partitioning::error::SimilarityError;
use std::sync::atomic::{AtomicU64, Ordering};

/// A pure, reentrant similarity measure over payloads of type `T`.
///
/// Implementations are called concurrently from many workers without
/// synchronization; they must not mutate shared state observable by callers.
/// Scores are expected to be non-negative, larger meaning more similar.
pub trait Similarity<T>: Send + Sync {
    fn similarity(&self, a: &T, b: &T) -> Result<f64, SimilarityError>;
}

impl<T, F> Similarity<T> for F
where
    F: Fn(&T, &T) -> f64 + Send + Sync,
{
    #[inline]
    fn similarity(&self, a: &T, b: &T) -> Result<f64, SimilarityError> {
        Ok(self(a, b))
    }
}

/// Compares node handles by the similarity of their payloads.
pub struct NodeSimilarity<'s, S: ?Sized> {
    inner: &'s S,
    evaluations: AtomicU64,
}

impl<'s, S: ?Sized> NodeSimilarity<'s, S> {
    pub fn new(inner: &'s S) -> Self {
        Self {
            inner,
            evaluations: AtomicU64::new(0),
        }
    }

    /// Payload-level similarity, counted.
    #[inline]
    pub fn between<T>(&self, a: &T, b: &T) -> Result<f64, SimilarityError>
    where
        S: Similarity<T>,
    {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.inner.similarity(a, b)
    }

    /// Number of similarity evaluations performed through this adapter.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl<T, S> Similarity<Node<T>> for NodeSimilarity<'_, S>
where
    S: Similarity<T> + ?Sized,
{
    fn similarity(&self, a: &Node<T>, b: &Node<T>) -> Result<f64, SimilarityError> {
        self.between(&a.value, &b.value)
    }
}
