//! Partitioning errors for knn-partition

use thiserror::Error;

/// Failure reported by a domain similarity function.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("similarity evaluation failed: {0}")]
pub struct SimilarityError(pub String);

/// Errors from medoid selection and partition assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartitionerError {
    /// `partition()` was called before a budget was configured.
    #[error("Budget is undefined: configure a budget before partitioning")]
    MissingBudget,
    /// The budget kind is not one the clustering engine knows how to enforce.
    #[error("Unsupported budget type `{0}` (expected `time` or `iterations`)")]
    UnsupportedBudget(String),
    /// The budget kind is known but its value could not be parsed.
    #[error("Invalid budget `{0}`")]
    InvalidBudget(String),
    /// Zero partitions were requested.
    #[error("Partition count must be positive, got {0}")]
    InvalidPartitionCount(usize),
    /// Seeding weights do not line up with the node sequence.
    #[error("Weight length mismatch: expected {expected}, got {got}")]
    WeightLengthMismatch { expected: usize, got: usize },
    /// Assignment was requested against an empty medoid set.
    #[error("Cannot assign nodes: the medoid set is empty")]
    NoMedoids,
    /// The domain similarity function failed.
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
    /// A partitioning result broke one of its invariants.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}
