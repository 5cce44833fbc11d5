//! Randomized swap-or-move neighborhood generation.
//!
//! A perturbation picks two distinct slots at random — the T real tracks
//! plus the unscheduled pool as a peer slot — and either swaps one
//! randomly chosen vehicle between two occupied slots or moves one
//! vehicle into an empty slot. Every candidate is produced on a fresh
//! deep copy of the base solution, has its derived fields recomputed,
//! and is kept only if the validity checker accepts it and its layout
//! differs from the base and from every candidate already collected.
//!
//! The retry loop is bounded: running out of attempts before the
//! requested count is collected yields [`NeighborhoodError::Exhausted`].

use std::error::Error;
use std::fmt;

use rand::Rng;

use crate::model::{Instance, Solution};
use crate::validation;

/// The generator could not collect enough distinct valid candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighborhoodError {
    /// Attempt budget ran out.
    Exhausted {
        requested: usize,
        found: usize,
        attempts: usize,
    },
}

impl fmt::Display for NeighborhoodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                requested,
                found,
                attempts,
            } => write!(
                f,
                "found {found} of {requested} requested candidates in {attempts} attempts"
            ),
        }
    }
}

impl Error for NeighborhoodError {}

/// Generates `count` distinct valid candidates around `base`.
///
/// `max_attempts` bounds the total number of perturbation attempts,
/// successful or not.
pub fn generate<R: Rng>(
    instance: &Instance,
    base: &Solution,
    count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<Solution>, NeighborhoodError> {
    // Slot indices 0..T are tracks; slot T is the unscheduled pool.
    let pool_slot = instance.track_count();
    let mut candidates: Vec<Solution> = Vec::with_capacity(count);
    let mut attempts = 0usize;

    while candidates.len() < count {
        if attempts >= max_attempts {
            return Err(NeighborhoodError::Exhausted {
                requested: count,
                found: candidates.len(),
                attempts,
            });
        }
        attempts += 1;

        let first = rng.random_range(0..=pool_slot);
        let second = rng.random_range(0..=pool_slot);
        if first == second {
            continue;
        }

        let mut candidate = base.clone();
        if !perturb(&mut candidate, pool_slot, first, second, rng) {
            continue;
        }
        candidate.refresh(instance);

        if validation::check(instance, &candidate).is_err() {
            continue;
        }
        if candidate.same_layout(base) {
            continue;
        }
        if candidates.iter().any(|c| c.same_layout(&candidate)) {
            continue;
        }
        candidates.push(candidate);
    }

    Ok(candidates)
}

/// Applies one swap-or-move between two slots. Returns `false` when both
/// slots are empty (nothing to perturb).
fn perturb<R: Rng>(
    solution: &mut Solution,
    pool_slot: usize,
    first: usize,
    second: usize,
    rng: &mut R,
) -> bool {
    let first_len = slot_len(solution, pool_slot, first);
    let second_len = slot_len(solution, pool_slot, second);

    match (first_len, second_len) {
        (0, 0) => false,
        (_, 0) => {
            let vehicle = take_random(solution, pool_slot, first, rng);
            put(solution, pool_slot, second, vehicle);
            true
        }
        (0, _) => {
            let vehicle = take_random(solution, pool_slot, second, rng);
            put(solution, pool_slot, first, vehicle);
            true
        }
        (_, _) => {
            swap_random(solution, pool_slot, first, second, rng);
            true
        }
    }
}

fn slot_len(solution: &Solution, pool_slot: usize, slot: usize) -> usize {
    if slot == pool_slot {
        solution.unscheduled.len()
    } else {
        solution.tracks[slot].len()
    }
}

/// Removes one randomly chosen vehicle from a non-empty slot.
fn take_random<R: Rng>(
    solution: &mut Solution,
    pool_slot: usize,
    slot: usize,
    rng: &mut R,
) -> usize {
    if slot == pool_slot {
        let pool: Vec<usize> = solution.unscheduled.iter().copied().collect();
        let vehicle = pool[rng.random_range(0..pool.len())];
        solution.unscheduled.remove(&vehicle);
        vehicle
    } else {
        let position = rng.random_range(0..solution.tracks[slot].len());
        solution.tracks[slot].remove(position)
    }
}

/// Adds a vehicle to a slot: appended to a track, inserted into the pool.
fn put(solution: &mut Solution, pool_slot: usize, slot: usize, vehicle: usize) {
    if slot == pool_slot {
        solution.unscheduled.insert(vehicle);
    } else {
        solution.tracks[slot].push(vehicle);
    }
}

/// Swaps one randomly chosen vehicle between two occupied slots; track
/// positions are preserved, the pool is unordered.
fn swap_random<R: Rng>(
    solution: &mut Solution,
    pool_slot: usize,
    first: usize,
    second: usize,
    rng: &mut R,
) {
    if first == pool_slot || second == pool_slot {
        let track = if first == pool_slot { second } else { first };
        let pool: Vec<usize> = solution.unscheduled.iter().copied().collect();
        let idle = pool[rng.random_range(0..pool.len())];
        let position = rng.random_range(0..solution.tracks[track].len());
        let parked = solution.tracks[track][position];

        solution.unscheduled.remove(&idle);
        solution.unscheduled.insert(parked);
        solution.tracks[track][position] = idle;
    } else {
        let first_pos = rng.random_range(0..solution.tracks[first].len());
        let second_pos = rng.random_range(0..solution.tracks[second].len());
        let a = solution.tracks[first][first_pos];
        let b = solution.tracks[second][second_pos];
        solution.tracks[first][first_pos] = b;
        solution.tracks[second][second_pos] = a;
    }
}
