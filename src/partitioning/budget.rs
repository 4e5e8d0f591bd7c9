//! Termination budgets for the clustering engine.
//!
//! A [`Budget`] is configuration: a tagged value naming the kind of limit and
//! its parameter. The engine consults it through [`BudgetPolicy`] once per
//! iteration, before the iteration starts, so a run can overshoot a budget by
//! at most the cost of one iteration.
//!
//! Budgets can be written as text, which is how they appear in configuration
//! files:
//!
//! | text | meaning |
//! |---|---|
//! | `time:30`, `30s` | stop once 30 whole seconds have elapsed |
//! | `iterations:200` | stop after 200 iterations |

use crate::partitioning::error::PartitionerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Running state of a clustering run, as seen by budget policies.
#[derive(Debug, Clone, Copy)]
pub struct ClusteringState {
    /// When the run started.
    pub started_at: Instant,
    /// Completed iterations.
    pub iterations: usize,
    /// Similarity evaluations performed so far.
    pub similarities: u64,
}

impl ClusteringState {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            iterations: 0,
            similarities: 0,
        }
    }
}

/// Decides whether a clustering run must stop.
pub trait BudgetPolicy: Send + Sync {
    fn is_exhausted(&self, state: &ClusteringState) -> bool;
}

/// Wall-clock budget with whole-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBudget {
    secs: u64,
}

impl TimeBudget {
    pub fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    pub fn secs(&self) -> u64 {
        self.secs
    }

    /// Elapsed time is truncated to whole seconds: 9.9 s is not 10 s.
    pub fn is_exhausted_at(&self, state: &ClusteringState, now: Instant) -> bool {
        now.saturating_duration_since(state.started_at).as_secs() >= self.secs
    }
}

impl BudgetPolicy for TimeBudget {
    fn is_exhausted(&self, state: &ClusteringState) -> bool {
        self.is_exhausted_at(state, Instant::now())
    }
}

/// Budget on the number of completed clustering iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationBudget {
    max: usize,
}

impl IterationBudget {
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl BudgetPolicy for IterationBudget {
    fn is_exhausted(&self, state: &ClusteringState) -> bool {
        state.iterations >= self.max
    }
}

/// Every budget kind the engine can enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Budget {
    Time(TimeBudget),
    Iterations(IterationBudget),
}

impl Budget {
    pub fn time(d: Duration) -> Self {
        Budget::Time(TimeBudget::from_secs(d.as_secs()))
    }

    pub fn seconds(secs: u64) -> Self {
        Budget::Time(TimeBudget::from_secs(secs))
    }

    pub fn iterations(max: usize) -> Self {
        Budget::Iterations(IterationBudget::new(max))
    }
}

impl BudgetPolicy for Budget {
    fn is_exhausted(&self, state: &ClusteringState) -> bool {
        match self {
            Budget::Time(b) => b.is_exhausted(state),
            Budget::Iterations(b) => b.is_exhausted(state),
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Time(b) => write!(f, "time:{}", b.secs),
            Budget::Iterations(b) => write!(f, "iterations:{}", b.max),
        }
    }
}

impl FromStr for Budget {
    type Err = PartitionerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, value) = match s.split_once(':') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => match s.strip_suffix('s') {
                Some(v) if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) => ("time", v),
                _ => return Err(PartitionerError::UnsupportedBudget(s.to_string())),
            },
        };
        let parse = |v: &str| {
            v.parse::<u64>()
                .map_err(|_| PartitionerError::InvalidBudget(s.to_string()))
        };
        match kind {
            "time" | "seconds" => Ok(Budget::seconds(parse(value)?)),
            "iterations" => Ok(Budget::iterations(parse(value)? as usize)),
            other => Err(PartitionerError::UnsupportedBudget(other.to_string())),
        }
    }
}

impl TryFrom<String> for Budget {
    type Error = PartitionerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Budget> for String {
    fn from(b: Budget) -> Self {
        b.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_budget_truncates_to_whole_seconds() {
        let state = ClusteringState::start();
        let b = TimeBudget::from_secs(10);
        let at = |ms| state.started_at + Duration::from_millis(ms);
        assert!(!b.is_exhausted_at(&state, at(9_900)));
        assert!(b.is_exhausted_at(&state, at(10_000)));
        assert!(b.is_exhausted_at(&state, at(12_345)));
    }

    #[test]
    fn zero_time_budget_is_exhausted_immediately() {
        let state = ClusteringState::start();
        assert!(Budget::seconds(0).is_exhausted(&state));
    }

    #[test]
    fn iteration_budget_counts_iterations() {
        let mut state = ClusteringState::start();
        let b = Budget::iterations(2);
        assert!(!b.is_exhausted(&state));
        state.iterations = 2;
        assert!(b.is_exhausted(&state));
    }

    #[test]
    fn parses_supported_kinds() {
        assert_eq!("time:10".parse::<Budget>().unwrap(), Budget::seconds(10));
        assert_eq!("5s".parse::<Budget>().unwrap(), Budget::seconds(5));
        assert_eq!(
            " iterations : 40 ".parse::<Budget>().unwrap(),
            Budget::iterations(40)
        );
        assert_eq!(Budget::time(Duration::from_millis(2_700)), Budget::seconds(2));
    }

    #[test]
    fn unsupported_kind_is_a_configuration_error() {
        let err = "similarities:1000".parse::<Budget>().unwrap_err();
        assert_eq!(err, PartitionerError::UnsupportedBudget("similarities".into()));
        assert!(err.to_string().contains("Unsupported budget type `similarities`"));
        assert!(matches!(
            "forever".parse::<Budget>(),
            Err(PartitionerError::UnsupportedBudget(_))
        ));
    }

    #[test]
    fn malformed_value_is_rejected() {
        assert_eq!(
            "time:ten".parse::<Budget>().unwrap_err(),
            PartitionerError::InvalidBudget("time:ten".into())
        );
    }

    #[test]
    fn serde_uses_text_form() {
        let b: Budget = serde_json::from_str("\"iterations:3\"").unwrap();
        assert_eq!(b, Budget::iterations(3));
        assert_eq!(serde_json::to_string(&Budget::seconds(7)).unwrap(), "\"time:7\"");
        assert!(serde_json::from_str::<Budget>("\"trials:3\"").is_err());
    }
}
