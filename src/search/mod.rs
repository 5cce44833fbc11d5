//! Tabu-style improvement search.
//!
//! A single-solution trajectory search over assignments: greedy
//! construction seeds the incumbent, then each iteration samples a
//! randomized neighborhood and accepts the first candidates that beat
//! the incumbent's score while absent from a bounded recency memory of
//! recently accepted layouts. The incumbent never worsens; the memory
//! only prevents immediately revisiting an accepted layout. This is a
//! deliberate simplification of classical tabu search, kept as designed.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

mod config;
mod runner;

pub use config::SearchConfig;
pub use runner::{SearchError, SearchResult, SearchRunner, Termination};
