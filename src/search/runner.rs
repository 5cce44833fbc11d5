//! Search execution engine.
//!
//! # Algorithm
//!
//! 1. Build the initial assignment with the greedy construction
//! 2. At each iteration:
//!    a. Generate a randomized neighborhood around the incumbent
//!    b. For each candidate, in generation order: skip layouts present
//!       in the recency memory; a strictly better score replaces the
//!       incumbent and pushes the layout into the memory
//! 3. Terminate on the iteration budget, or early when the generator
//!    cannot fill a neighborhood

use std::collections::{HashSet, VecDeque};
use std::error::Error;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::SearchConfig;
use crate::construct;
use crate::fitness::{self, FitnessError};
use crate::model::{Instance, Solution};
use crate::neighborhood;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The configured iteration budget ran out.
    IterationBudget,
    /// The generator exhausted its attempt budget mid-run.
    NeighborhoodExhausted,
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best assignment found.
    pub best: Solution,
    /// Score of the best assignment.
    pub best_score: f64,
    /// Score of the constructed baseline.
    pub initial_score: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Iteration at which the last improvement happened.
    pub best_iteration: usize,
    /// Incumbent score after each iteration (non-decreasing).
    pub score_history: Vec<f64>,
    /// Why the run stopped.
    pub termination: Termination,
}

/// The search could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The constructed baseline cannot be scored, so no candidate can
    /// ever be compared against it.
    DegenerateBaseline(FitnessError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateBaseline(err) => {
                write!(f, "initial assignment cannot be scored: {err}")
            }
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DegenerateBaseline(err) => Some(err),
        }
    }
}

/// Bounded recency memory of accepted layouts.
///
/// New layouts are pushed to the front; once over capacity the oldest
/// entry falls off the back. Membership is O(1) via a shadow set.
#[derive(Debug, Default)]
struct RecencyMemory {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
}

impl RecencyMemory {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    fn insert(&mut self, key: String) {
        self.members.insert(key.clone());
        self.order.push_front(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.members.remove(&oldest);
            }
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Improvement search runner.
pub struct SearchRunner;

impl SearchRunner {
    /// Runs construction followed by the improvement loop.
    pub fn run(instance: &Instance, config: &SearchConfig) -> Result<SearchResult, SearchError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let initial = construct::build(instance);
        let initial_score = fitness::score(instance, &initial, config.gap_policy)
            .map_err(SearchError::DegenerateBaseline)?;

        let mut best = initial;
        let mut best_score = initial_score;
        let mut best_iteration = 0;
        let mut memory = RecencyMemory::new(config.memory_capacity);
        let mut score_history = Vec::with_capacity(config.iterations);
        let mut termination = Termination::IterationBudget;

        for iteration in 0..config.iterations {
            let candidates = match neighborhood::generate(
                instance,
                &best,
                config.neighborhood_size,
                config.max_attempts,
                &mut rng,
            ) {
                Ok(candidates) => candidates,
                Err(err) => {
                    tracing::debug!(iteration, error = %err, "neighborhood exhausted, stopping");
                    termination = Termination::NeighborhoodExhausted;
                    break;
                }
            };

            for candidate in candidates {
                let key = candidate.layout_key();
                if memory.contains(&key) {
                    continue;
                }
                let candidate_score =
                    match fitness::score(instance, &candidate, config.gap_policy) {
                        Ok(score) => score,
                        Err(err) => {
                            tracing::debug!(iteration, error = %err, "unscorable candidate skipped");
                            continue;
                        }
                    };
                if candidate_score > best_score {
                    tracing::debug!(iteration, score = candidate_score, "incumbent improved");
                    best = candidate;
                    best_score = candidate_score;
                    best_iteration = iteration;
                    memory.insert(key);
                }
            }

            score_history.push(best_score);
        }

        Ok(SearchResult {
            best,
            best_score,
            initial_score,
            iterations: score_history.len(),
            best_iteration,
            score_history,
            termination,
        })
    }
}
