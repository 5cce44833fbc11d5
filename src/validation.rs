//! Hard-constraint checker for assignments.
//!
//! Walks the solution invariants in a fixed order and reports the first
//! breach as data — a [`Violation`] value, not an error type. The search
//! uses this as a synchronous gate before accepting any candidate:
//! 1. series marker set iff the track is occupied; one series per track;
//! 2. every parked vehicle is permitted on its track;
//! 3. summed vehicle lengths never exceed track capacity;
//! 4. within a track, departures are non-decreasing;
//! 5. a blocking track clears out before its blocked track starts;
//! 6. every vehicle is parked exactly once or unscheduled, never both.

use crate::model::{Instance, Solution};

/// Outcome of a validity check.
pub type CheckResult = Result<(), Violation>;

/// A single invariant breach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which invariant was breached.
    pub kind: ViolationKind,
    /// Human-readable reason naming the vehicles/tracks involved.
    pub message: String,
}

/// Categories of invariant breaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Series marker out of sync with the track's occupancy.
    SeriesMarker,
    /// A track holds vehicles of more than one series.
    MixedSeries,
    /// A vehicle is parked on a track its restriction row forbids.
    RestrictionBreach,
    /// Summed vehicle lengths exceed the track capacity.
    OverCapacity,
    /// Departures within a track are not non-decreasing.
    DepartureOrder,
    /// A blocking track clears out after its blocked track starts.
    BlockingOrder,
    /// A vehicle is placed twice, or both parked and unscheduled,
    /// or neither.
    AssignmentConflict,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks every invariant, returning the first violation found.
pub fn check(instance: &Instance, solution: &Solution) -> CheckResult {
    check_series(instance, solution)?;
    check_restrictions(instance, solution)?;
    check_capacity(instance, solution)?;
    check_departure_order(instance, solution)?;
    check_blocking_order(instance, solution)?;
    check_assignment_partition(instance, solution)
}

fn check_series(instance: &Instance, solution: &Solution) -> CheckResult {
    for (track, sequence) in solution.tracks.iter().enumerate() {
        let marker = solution.series_on_track[track];
        match (marker, sequence.is_empty()) {
            (Some(series), true) => {
                return Err(Violation::new(
                    ViolationKind::SeriesMarker,
                    format!("track {track} is marked series {series} but holds no vehicles"),
                ));
            }
            (None, false) => {
                return Err(Violation::new(
                    ViolationKind::SeriesMarker,
                    format!("track {track} holds vehicles but has no series marker"),
                ));
            }
            (Some(series), false) => {
                for &vehicle in sequence {
                    let actual = instance.vehicle(vehicle).series;
                    if actual != series {
                        return Err(Violation::new(
                            ViolationKind::MixedSeries,
                            format!(
                                "vehicle {vehicle} (series {actual}) parked on track {track} occupied by series {series}"
                            ),
                        ));
                    }
                }
            }
            (None, true) => {}
        }
    }
    Ok(())
}

fn check_restrictions(instance: &Instance, solution: &Solution) -> CheckResult {
    for (track, sequence) in solution.tracks.iter().enumerate() {
        for &vehicle in sequence {
            if !instance.is_permitted(vehicle, track) {
                return Err(Violation::new(
                    ViolationKind::RestrictionBreach,
                    format!("vehicle {vehicle} is not permitted on track {track}"),
                ));
            }
        }
    }
    Ok(())
}

fn check_capacity(instance: &Instance, solution: &Solution) -> CheckResult {
    for (track, sequence) in solution.tracks.iter().enumerate() {
        let occupied: u64 = sequence
            .iter()
            .map(|&v| u64::from(instance.vehicle(v).length))
            .sum();
        let capacity = u64::from(instance.track(track).capacity);
        if occupied > capacity {
            return Err(Violation::new(
                ViolationKind::OverCapacity,
                format!("track {track} over capacity: {occupied} > {capacity}"),
            ));
        }
    }
    Ok(())
}

fn check_departure_order(instance: &Instance, solution: &Solution) -> CheckResult {
    for (track, sequence) in solution.tracks.iter().enumerate() {
        for pair in sequence.windows(2) {
            let (ahead, behind) = (pair[0], pair[1]);
            let first = instance.vehicle(ahead).departure;
            let second = instance.vehicle(behind).departure;
            if second < first {
                return Err(Violation::new(
                    ViolationKind::DepartureOrder,
                    format!(
                        "track {track}: vehicle {behind} (departs {second}) parked behind vehicle {ahead} (departs {first})"
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn check_blocking_order(instance: &Instance, solution: &Solution) -> CheckResult {
    for blocking in 0..instance.track_count() {
        let Some(clears_at) = solution.last_departure(instance, blocking) else {
            continue;
        };
        for &blocked in instance.blocks(blocking) {
            let Some(starts_at) = solution.first_departure(instance, blocked) else {
                continue;
            };
            if clears_at > starts_at {
                return Err(Violation::new(
                    ViolationKind::BlockingOrder,
                    format!(
                        "track {blocking} clears at {clears_at}, after blocked track {blocked} starts departing at {starts_at}"
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn check_assignment_partition(instance: &Instance, solution: &Solution) -> CheckResult {
    let mut seen_on: Vec<Option<usize>> = vec![None; instance.vehicle_count()];
    for (track, sequence) in solution.tracks.iter().enumerate() {
        for &vehicle in sequence {
            if let Some(earlier) = seen_on[vehicle] {
                return Err(Violation::new(
                    ViolationKind::AssignmentConflict,
                    format!("vehicle {vehicle} appears on track {earlier} and track {track}"),
                ));
            }
            seen_on[vehicle] = Some(track);
        }
    }
    for vehicle in 0..instance.vehicle_count() {
        let parked = seen_on[vehicle].is_some();
        let idle = solution.unscheduled.contains(&vehicle);
        if parked && idle {
            return Err(Violation::new(
                ViolationKind::AssignmentConflict,
                format!("vehicle {vehicle} is both parked and unscheduled"),
            ));
        }
        if !parked && !idle {
            return Err(Violation::new(
                ViolationKind::AssignmentConflict,
                format!("vehicle {vehicle} is neither parked nor unscheduled"),
            ));
        }
    }
    Ok(())
}
