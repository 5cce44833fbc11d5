//! Garage/yard track assignment solver.
//!
//! Assigns vehicles (rail cars/buses) to a fixed set of storage tracks,
//! respecting physical capacity, series homogeneity, per-vehicle track
//! restrictions, and track-blocking precedence, then improves the
//! assignment with a tabu-style local search.
//!
//! # Modules
//!
//! - **`model`**: problem data — [`model::Instance`] — and assignment
//!   state — [`model::Solution`].
//! - **`construct`**: deterministic greedy construction of an initial
//!   assignment.
//! - **`validation`**: hard-constraint checker; violations are data.
//! - **`fitness`**: structural and timing goal functions and the
//!   combined score.
//! - **`neighborhood`**: randomized swap-or-move candidate generation
//!   with a bounded retry budget.
//! - **`search`**: the improvement loop with bounded recency memory.
//! - **`io`**: instance text format, result rendering.
//!
//! # Example
//!
//! ```
//! use trackyard::model::{Instance, Track, Vehicle};
//! use trackyard::search::{SearchConfig, SearchRunner};
//!
//! let instance = Instance::new(
//!     vec![
//!         Vehicle::new(10, 1, 5, 0),
//!         Vehicle::new(10, 1, 15, 1),
//!         Vehicle::new(10, 2, 25, 0),
//!     ],
//!     vec![Track::new(25), Track::new(15)],
//!     vec![vec![true; 2]; 3],
//!     &[],
//! )
//! .unwrap();
//!
//! let config = SearchConfig::default().with_iterations(20).with_seed(42);
//! let result = SearchRunner::run(&instance, &config).unwrap();
//! assert!(result.best_score >= result.initial_score);
//! ```

pub mod construct;
pub mod fitness;
pub mod io;
pub mod model;
pub mod neighborhood;
pub mod search;
pub mod validation;
