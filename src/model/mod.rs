//! Domain model for the yard assignment problem.
//!
//! - [`Instance`]: immutable problem data — vehicles, tracks, the
//!   restriction grid, and the track-blocking relation.
//! - [`Solution`]: mutable assignment state — per-track vehicle sequences
//!   plus derived summaries (occupying series, leftover capacity,
//!   used-track count, unscheduled set).

mod instance;
mod solution;

pub use instance::{Instance, ModelError, Track, Vehicle};
pub use solution::{Solution, CLEARANCE_MARGIN};
