use super::*;
use crate::graph::{Graph, Neighbor, NeighborList, Node};
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

fn identity(a: &char, b: &char) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

/// Graph over `values`, each node listing the next two values as neighbours.
fn chain<T: Clone + Eq + Hash>(values: &[T]) -> Graph<T> {
    let n = values.len();
    Graph::from_entries(values.iter().enumerate().map(|(i, v)| {
        let mut nl = NeighborList::with_capacity(2);
        for j in 1..=2 {
            if n > 1 {
                nl.add(Neighbor::new(values[(i + j) % n].clone(), 0.5));
            }
        }
        (Node::new(v.clone()), nl)
    }))
}

struct Counting(AtomicUsize);
impl Similarity<char> for Counting {
    fn similarity(&self, a: &char, b: &char) -> Result<f64, SimilarityError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(identity(a, b))
    }
}

#[test]
fn missing_budget_fails_before_any_work() {
    let p = KMedoidsPartitioner::new(Counting(AtomicUsize::new(0)), 2);
    let err = p.partition(chain(&['a', 'b', 'c'])).unwrap_err();
    assert_eq!(err, PartitionerError::MissingBudget);
    assert_eq!(p.similarity().0.load(Ordering::Relaxed), 0);
}

#[test]
fn zero_partitions_is_a_configuration_error() {
    let p = KMedoidsPartitioner::new(Counting(AtomicUsize::new(0)), 0).with_budget(Budget::seconds(0));
    let err = p.partition(chain(&['a', 'b'])).unwrap_err();
    assert_eq!(err, PartitionerError::InvalidPartitionCount(0));
    assert_eq!(p.similarity().0.load(Ordering::Relaxed), 0);
}

#[test]
fn empty_graph_yields_empty_partitioning() {
    let p = KMedoidsPartitioner::new(identity, 3).with_budget(Budget::iterations(5));
    let res = p.partition(Graph::<char>::new()).unwrap();
    assert!(res.medoids.is_empty());
    assert_eq!(res.processed, 0);
    assert!(res.graph.is_empty());
    assert!(res.validate_invariants().is_ok());
}

#[test]
fn six_nodes_identity_similarity_exhausted_budget() {
    let values = ['A', 'B', 'C', 'D', 'E', 'F'];
    let p = KMedoidsPartitioner::new(identity, 2).with_budget(Budget::seconds(0));
    let res = p.partition(chain(&values)).unwrap();
    assert_eq!(res.n_parts(), 2);
    assert_eq!(res.iterations, 0);
    assert_eq!(res.processed, 6);
    for n in res.graph.nodes() {
        let expected = res.medoids.iter().position(|m| *m == n.value).unwrap_or(0);
        assert_eq!(n.partition(), Some(expected), "node {}", n.value);
    }
    // the second medoid's partition holds only itself
    assert_eq!(res.sizes(), vec![5, 1]);
}

#[test]
fn more_partitions_than_distinct_nodes() {
    let p = KMedoidsPartitioner::new(identity, 5).with_budget(Budget::iterations(3));
    let res = p.partition(chain(&['x', 'y'])).unwrap();
    assert_eq!(res.medoids.len(), 2);
    assert_eq!(res.requested, 5);
    for n in res.graph.nodes() {
        assert!(matches!(n.partition(), Some(0 | 1)));
    }
    res.validate_invariants().unwrap();
}

#[test]
fn similarity_failure_is_fatal() {
    struct Flaky;
    impl Similarity<char> for Flaky {
        fn similarity(&self, a: &char, b: &char) -> Result<f64, SimilarityError> {
            if *a == 'q' || *b == 'q' {
                Err(SimilarityError("q is not comparable".into()))
            } else {
                Ok(identity(a, b))
            }
        }
    }
    let p = KMedoidsPartitioner::new(Flaky, 2).with_budget(Budget::seconds(0));
    let err = p.partition(chain(&['a', 'b', 'q', 'c'])).unwrap_err();
    assert!(matches!(err, PartitionerError::Similarity(_)));
}

#[test]
fn config_deserializes_from_json() {
    let cfg: PartitionerConfig =
        serde_json::from_str(r#"{ "n_parts": 4, "budget": "iterations:12" }"#).unwrap();
    assert_eq!(cfg.n_parts, 4);
    assert_eq!(cfg.budget, Some(Budget::iterations(12)));
    assert_eq!(cfg.window, PartitionerConfig::default().window);

    let p = KMedoidsPartitioner::from_config(identity, cfg);
    let res = p.partition(chain(&['a', 'b', 'c', 'd', 'e'])).unwrap();
    assert_eq!(res.iterations, 12);
    assert_eq!(res.medoids.len(), 4);
}

#[test]
fn unsupported_budget_in_config_is_rejected() {
    let err = serde_json::from_str::<PartitionerConfig>(r#"{ "budget": "similarities:100" }"#)
        .unwrap_err();
    assert!(err.to_string().contains("Unsupported budget type `similarities`"), "{err}");
}

#[test]
fn invariant_check_catches_out_of_range_partition() {
    let p = KMedoidsPartitioner::new(identity, 2).with_budget(Budget::seconds(0));
    let mut res = p.partition(chain(&['a', 'b', 'c'])).unwrap();
    res.graph.raw_entries_mut()[0].0.set_partition(7);
    assert!(matches!(
        res.validate_invariants(),
        Err(PartitionerError::InvariantViolation(_))
    ));
}

#[test]
fn end_time_is_recorded_after_assignment() {
    let before = SystemTime::now();
    let p = KMedoidsPartitioner::new(identity, 2).with_budget(Budget::iterations(1));
    let res = p.partition(chain(&['a', 'b', 'c', 'd'])).unwrap();
    assert!(res.end_time >= before);
}
