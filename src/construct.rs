//! Deterministic greedy construction of an initial assignment.
//!
//! Vehicles are placed in ascending departure order (the vehicle leaving
//! soonest is pinned down first; later departures keep more freedom).
//! For each vehicle:
//!
//! 1. prefer an occupied track already carrying its series, tightest
//!    fit first;
//! 2. otherwise open an empty permitted track, preferring tracks outside
//!    any blocking relation and, among those, the track permitted to the
//!    fewest vehicles (scarce tracks get claimed before flexible ones);
//! 3. otherwise record the vehicle as unscheduled.
//!
//! Construction never fails; ties break on the lowest track index, so
//! the result is fully deterministic for a fixed instance.

use crate::model::{Instance, Solution, CLEARANCE_MARGIN};

/// Builds the initial assignment for an instance.
pub fn build(instance: &Instance) -> Solution {
    let mut solution = Solution::empty(instance);

    let mut order: Vec<usize> = (0..instance.vehicle_count()).collect();
    order.sort_by_key(|&v| (instance.vehicle(v).departure, v));

    for vehicle in order {
        if let Some(track) = matching_series_track(instance, &solution, vehicle) {
            solution.place(instance, track, vehicle);
        } else if let Some(track) = open_track(instance, &solution, vehicle) {
            solution.place(instance, track, vehicle);
        } else {
            solution.unscheduled.insert(vehicle);
        }
    }

    solution
}

/// Tightest-fitting occupied track of the vehicle's series, if any.
fn matching_series_track(
    instance: &Instance,
    solution: &Solution,
    vehicle: usize,
) -> Option<usize> {
    let series = instance.vehicle(vehicle).series;
    let length = f64::from(instance.vehicle(vehicle).length);

    let mut best: Option<(usize, f64)> = None;
    for track in 0..instance.track_count() {
        if solution.series_on_track[track] != Some(series) {
            continue;
        }
        if !instance.is_permitted(vehicle, track) {
            continue;
        }
        if !append_keeps_precedence(instance, solution, track, vehicle) {
            continue;
        }
        let leftover = solution.free_capacity[track] - length - CLEARANCE_MARGIN;
        if leftover < 0.0 {
            continue;
        }
        if best.map_or(true, |(_, tightest)| leftover < tightest) {
            best = Some((track, leftover));
        }
    }
    best.map(|(track, _)| track)
}

/// Empty permitted track for opening, preferring tracks outside any
/// blocking relation, then the most restricted track (fewest permitted
/// vehicles), ties on the first index.
fn open_track(instance: &Instance, solution: &Solution, vehicle: usize) -> Option<usize> {
    let length = instance.vehicle(vehicle).length;

    let mut unconstrained: Option<(usize, usize)> = None;
    let mut constrained: Option<(usize, usize)> = None;
    for track in 0..instance.track_count() {
        if solution.is_used(track) {
            continue;
        }
        if !instance.is_permitted(vehicle, track) {
            continue;
        }
        if instance.track(track).capacity < length {
            continue;
        }
        if !opening_keeps_precedence(instance, solution, track, vehicle) {
            continue;
        }
        let scarcity = instance.permitted_vehicle_count(track);
        let slot = if instance.in_blocking_relation(track) {
            &mut constrained
        } else {
            &mut unconstrained
        };
        if slot.map_or(true, |(_, best)| scarcity < best) {
            *slot = Some((track, scarcity));
        }
    }

    unconstrained.or(constrained).map(|(track, _)| track)
}

/// Appending makes the vehicle the track's new last departure; every
/// track this one blocks must not start departing earlier.
fn append_keeps_precedence(
    instance: &Instance,
    solution: &Solution,
    track: usize,
    vehicle: usize,
) -> bool {
    let departure = instance.vehicle(vehicle).departure;
    instance.blocks(track).iter().all(|&blocked| {
        solution
            .first_departure(instance, blocked)
            .map_or(true, |starts_at| departure <= starts_at)
    })
}

/// Opening makes the vehicle both first and last in line, so both
/// blocking directions must stay consistent.
fn opening_keeps_precedence(
    instance: &Instance,
    solution: &Solution,
    track: usize,
    vehicle: usize,
) -> bool {
    let departure = instance.vehicle(vehicle).departure;
    append_keeps_precedence(instance, solution, track, vehicle)
        && instance.blocked_by(track).iter().all(|&blocking| {
            solution
                .last_departure(instance, blocking)
                .map_or(true, |clears_at| clears_at <= departure)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Track, Vehicle};
    use crate::validation;
    use proptest::prelude::*;

    fn all_permitted(vehicles: usize, tracks: usize) -> Vec<Vec<bool>> {
        vec![vec![true; tracks]; vehicles]
    }

    /// Two same-series vehicles share the large track, the third opens
    /// the small one.
    #[test]
    fn test_small_yard_example() {
        let instance = Instance::new(
            vec![
                Vehicle::new(10, 1, 5, 0),
                Vehicle::new(10, 1, 15, 0),
                Vehicle::new(10, 2, 25, 0),
            ],
            vec![Track::new(25), Track::new(15)],
            all_permitted(3, 2),
            &[],
        )
        .unwrap();

        let solution = build(&instance);

        assert_eq!(solution.tracks[0], vec![0, 1]);
        assert_eq!(solution.tracks[1], vec![2]);
        assert!((solution.free_capacity[0] - 4.5).abs() < 1e-9);
        assert!((solution.free_capacity[1] - 5.0).abs() < 1e-9);
        assert!(solution.unscheduled.is_empty());
        assert_eq!(solution.used_tracks, 2);
    }

    #[test]
    fn test_deterministic() {
        let instance = Instance::new(
            vec![
                Vehicle::new(8, 1, 30, 0),
                Vehicle::new(10, 2, 5, 1),
                Vehicle::new(9, 1, 12, 0),
                Vehicle::new(7, 2, 20, 1),
            ],
            vec![Track::new(20), Track::new(20), Track::new(20)],
            all_permitted(4, 3),
            &[],
        )
        .unwrap();

        let first = build(&instance);
        for _ in 0..10 {
            assert!(first.same_layout(&build(&instance)));
        }
    }

    #[test]
    fn test_respects_restrictions() {
        // Vehicle 0 may only use track 1.
        let instance = Instance::new(
            vec![Vehicle::new(10, 1, 5, 0), Vehicle::new(10, 1, 15, 0)],
            vec![Track::new(30), Track::new(30)],
            vec![vec![false, true], vec![true, true]],
            &[],
        )
        .unwrap();

        let solution = build(&instance);
        assert_eq!(solution.tracks[1], vec![0, 1]);
        assert!(solution.tracks[0].is_empty());
    }

    #[test]
    fn test_tightest_fit_preferred() {
        // Restrictions pin v0 to track 0 and v1 to track 1, so both
        // tracks end up carrying series 1. v2 fits either; track 1
        // leaves less slack and wins.
        let instance = Instance::new(
            vec![
                Vehicle::new(10, 1, 5, 0),
                Vehicle::new(10, 1, 6, 0),
                Vehicle::new(10, 1, 15, 0),
            ],
            vec![Track::new(40), Track::new(21)],
            vec![vec![true, false], vec![false, true], vec![true, true]],
            &[],
        )
        .unwrap();

        let solution = build(&instance);
        assert_eq!(solution.tracks[0], vec![0]);
        assert_eq!(solution.tracks[1], vec![1, 2]);
    }

    #[test]
    fn test_most_restricted_track_claimed_first() {
        // Track 1 admits only vehicle 0; both empty and unconstrained.
        let instance = Instance::new(
            vec![Vehicle::new(10, 1, 5, 0), Vehicle::new(10, 2, 15, 0)],
            vec![Track::new(30), Track::new(30)],
            vec![vec![true, true], vec![true, false]],
            &[],
        )
        .unwrap();

        let solution = build(&instance);
        // v0 claims the scarcer track 1, leaving track 0 for v1.
        assert_eq!(solution.tracks[1], vec![0]);
        assert_eq!(solution.tracks[0], vec![1]);
        assert!(solution.unscheduled.is_empty());
    }

    #[test]
    fn test_blocking_free_tracks_preferred() {
        // Track 0 blocks track 1; track 2 is free of relations and is
        // chosen even though track 0 comes first.
        let instance = Instance::new(
            vec![Vehicle::new(10, 1, 5, 0)],
            vec![Track::new(30), Track::new(30), Track::new(30)],
            all_permitted(1, 3),
            &[(0, 1)],
        )
        .unwrap();

        let solution = build(&instance);
        assert_eq!(solution.tracks[2], vec![0]);
    }

    #[test]
    fn test_append_respects_blocking() {
        // Track 0 blocks track 1. v0 (series 1) opens track 0, v1
        // (series 2) has only track 1 left. v2 (series 1) would fit
        // track 0 but departs after track 1 starts, so it must not
        // append there.
        let instance = Instance::new(
            vec![
                Vehicle::new(10, 1, 5, 0),
                Vehicle::new(10, 2, 10, 0),
                Vehicle::new(10, 1, 20, 0),
            ],
            vec![Track::new(40), Track::new(15)],
            all_permitted(3, 2),
            &[(0, 1)],
        )
        .unwrap();

        let solution = build(&instance);
        assert_eq!(solution.tracks[0], vec![0]);
        assert_eq!(solution.tracks[1], vec![1]);
        // No feasible track remains for v2.
        assert!(solution.unscheduled.contains(&2));
        assert_eq!(validation::check(&instance, &solution), Ok(()));
    }

    #[test]
    fn test_unplaceable_vehicle_goes_unscheduled() {
        let instance = Instance::new(
            vec![Vehicle::new(50, 1, 5, 0), Vehicle::new(10, 1, 15, 0)],
            vec![Track::new(30)],
            all_permitted(2, 1),
            &[],
        )
        .unwrap();

        let solution = build(&instance);
        assert!(solution.unscheduled.contains(&0));
        assert_eq!(solution.tracks[0], vec![1]);
    }

    #[test]
    fn test_margin_blocks_overtight_append() {
        // 10 + 10 = capacity exactly; the 0.5 clearance forbids sharing.
        let instance = Instance::new(
            vec![Vehicle::new(10, 1, 5, 0), Vehicle::new(10, 1, 15, 0)],
            vec![Track::new(20), Track::new(20)],
            all_permitted(2, 2),
            &[],
        )
        .unwrap();

        let solution = build(&instance);
        assert_eq!(solution.tracks[0], vec![0]);
        assert_eq!(solution.tracks[1], vec![1]);
    }

    proptest! {
        /// Whatever the instance, construction output passes the checker.
        #[test]
        fn prop_construction_is_valid(
            lengths in proptest::collection::vec(1u32..20, 1..12),
            capacities in proptest::collection::vec(5u32..40, 1..6),
            series_seed in proptest::collection::vec(0u32..3, 1..12),
            departure_seed in proptest::collection::vec(0i64..100, 1..12),
        ) {
            let n = lengths.len().min(series_seed.len()).min(departure_seed.len());
            let vehicles: Vec<Vehicle> = (0..n)
                .map(|i| Vehicle::new(lengths[i], series_seed[i], departure_seed[i], series_seed[i] % 2))
                .collect();
            let tracks: Vec<Track> = capacities.iter().map(|&c| Track::new(c)).collect();
            let permitted = vec![vec![true; tracks.len()]; vehicles.len()];
            let instance = Instance::new(vehicles, tracks, permitted, &[]).unwrap();

            let solution = build(&instance);
            prop_assert_eq!(crate::validation::check(&instance, &solution), Ok(()));
        }
    }
}
