//! Search configuration.

use crate::fitness::GapPolicy;

/// Configuration parameters for the improvement search.
///
/// # Examples
///
/// ```
/// use trackyard::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_iterations(200)
///     .with_neighborhood_size(8)
///     .with_seed(42);
/// assert_eq!(config.iterations, 200);
/// assert_eq!(config.neighborhood_size, 8);
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of search iterations.
    pub iterations: usize,
    /// Candidates requested from the generator per iteration.
    pub neighborhood_size: usize,
    /// Capacity of the recency memory of accepted layouts.
    pub memory_capacity: usize,
    /// Perturbation attempt budget per neighborhood.
    pub max_attempts: usize,
    /// Departure-gap scoring policy.
    pub gap_policy: GapPolicy,
    /// Random seed (None for OS entropy).
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            neighborhood_size: 10,
            memory_capacity: 20,
            max_attempts: 1_000,
            gap_policy: GapPolicy::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Sets the iteration budget.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets how many candidates each iteration requests.
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    /// Sets the recency-memory capacity.
    pub fn with_memory_capacity(mut self, n: usize) -> Self {
        self.memory_capacity = n;
        self
    }

    /// Sets the per-neighborhood perturbation attempt budget.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Sets the departure-gap scoring policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.neighborhood_size, 10);
        assert_eq!(config.memory_capacity, 20);
        assert_eq!(config.max_attempts, 1_000);
        assert_eq!(config.gap_policy, GapPolicy::Banded);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::default()
            .with_iterations(50)
            .with_neighborhood_size(4)
            .with_memory_capacity(5)
            .with_max_attempts(200)
            .with_gap_policy(GapPolicy::Uniform)
            .with_seed(123);

        assert_eq!(config.iterations, 50);
        assert_eq!(config.neighborhood_size, 4);
        assert_eq!(config.memory_capacity, 5);
        assert_eq!(config.max_attempts, 200);
        assert_eq!(config.gap_policy, GapPolicy::Uniform);
        assert_eq!(config.seed, Some(123));
    }
}
