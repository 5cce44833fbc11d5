//! Two-goal fitness evaluation.
//!
//! An assignment is scored by two goal functions over a read-only
//! `(instance, solution)` pair:
//!
//! - the **structural goal** rewards tight packing and track reuse
//!   (series breaks between occupied tracks, occupied-track count,
//!   summed leftover capacity), lower is better;
//! - the **timing goal** scores within-track and boundary schedule-type
//!   adjacency plus departure spacing, higher is better.
//!
//! The combined score is `timing / structural`. Every denominator that
//! can reach zero is an explicit [`FitnessError`]; no infinity or NaN
//! ever leaves this module.

use std::error::Error;
use std::fmt;

use crate::model::{Instance, Solution};

/// Full score awarded to a well-spaced departure pair; also the scale
/// constant of the spacing weight.
const FULL_GAP_SCORE: f64 = 15.0;

/// Departure-gap scoring policy.
///
/// The gap between two consecutively parked vehicles is
/// `departure(second) − departure(first)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapPolicy {
    /// Banded scoring: a gap of 10–20 scores the full 15, a longer gap
    /// scores 10, a shorter gap is penalized `−4 × (10 − gap)`.
    #[default]
    Banded,
    /// Every pair scores the full 15 regardless of spacing.
    Uniform,
}

/// Score contribution of one within-track departure pair.
pub fn gap_factor(gap: i64, policy: GapPolicy) -> f64 {
    match policy {
        GapPolicy::Uniform => FULL_GAP_SCORE,
        GapPolicy::Banded => {
            if (10..=20).contains(&gap) {
                FULL_GAP_SCORE
            } else if gap > 20 {
                10.0
            } else {
                -4.0 * (10 - gap) as f64
            }
        }
    }
}

/// A degenerate layout that cannot be scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitnessError {
    /// Fewer than two occupied tracks; the series-break and boundary
    /// weights are undefined.
    TooFewUsedTracks(usize),
    /// Total track capacity does not exceed total vehicle length; the
    /// leftover-capacity weight is undefined.
    NoCapacitySlack,
    /// Every vehicle sits alone on its own track; the within-track
    /// adjacency weight is undefined.
    NoTrackSharing,
    /// No track holds two consecutive vehicles; the spacing weight is
    /// undefined.
    NoStackedPairs,
}

impl fmt::Display for FitnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewUsedTracks(used) => {
                write!(f, "cannot score a layout with {used} occupied tracks")
            }
            Self::NoCapacitySlack => {
                write!(f, "total track capacity does not exceed total vehicle length")
            }
            Self::NoTrackSharing => {
                write!(f, "every vehicle occupies its own track")
            }
            Self::NoStackedPairs => {
                write!(f, "no track holds two consecutive vehicles")
            }
        }
    }
}

impl Error for FitnessError {}

/// Structural goal: series fragmentation, track usage, wasted capacity.
/// Lower is better.
pub fn structural_score(instance: &Instance, solution: &Solution) -> Result<f64, FitnessError> {
    let used = solution.used_tracks;
    if used <= 1 {
        return Err(FitnessError::TooFewUsedTracks(used));
    }
    let slack =
        instance.total_track_capacity() as i64 - instance.total_vehicle_length() as i64;
    if slack <= 0 {
        return Err(FitnessError::NoCapacitySlack);
    }

    // Series breaks between consecutive occupied tracks; empty runs in
    // between carry the earlier series forward.
    let mut breaks = 0u32;
    let mut previous_series: Option<u32> = None;
    for track in 0..instance.track_count() {
        let Some(series) = solution.series_on_track[track] else {
            continue;
        };
        if let Some(previous) = previous_series {
            if previous != series {
                breaks += 1;
            }
        }
        previous_series = Some(series);
    }

    let leftover: f64 = (0..instance.track_count())
        .filter(|&t| solution.is_used(t))
        .map(|t| solution.free_capacity[t])
        .sum();

    let break_weight = 1.0 / (used - 1) as f64;
    let usage_weight = 1.0 / instance.track_count() as f64;
    let leftover_weight = 1.0 / slack as f64;

    Ok(break_weight * f64::from(breaks)
        + usage_weight * used as f64
        + leftover_weight * leftover)
}

/// Timing goal: schedule-type adjacency and departure spacing.
/// Higher is better.
pub fn timing_score(
    instance: &Instance,
    solution: &Solution,
    policy: GapPolicy,
) -> Result<f64, FitnessError> {
    let used = solution.used_tracks;
    if used <= 1 {
        return Err(FitnessError::TooFewUsedTracks(used));
    }
    if instance.vehicle_count() == used {
        return Err(FitnessError::NoTrackSharing);
    }

    // Within-track adjacent pairs of equal schedule type, and the
    // departure-gap factors over the same pairs.
    let mut same_type_inside = 0u32;
    let mut gap_total = 0.0;
    let mut pair_count = 0u32;
    for sequence in &solution.tracks {
        for pair in sequence.windows(2) {
            let first = instance.vehicle(pair[0]);
            let second = instance.vehicle(pair[1]);
            if first.schedule_type == second.schedule_type {
                same_type_inside += 1;
            }
            gap_total += gap_factor(second.departure - first.departure, policy);
            pair_count += 1;
        }
    }
    if pair_count == 0 {
        return Err(FitnessError::NoStackedPairs);
    }

    // Boundary pairs between consecutive occupied tracks, empty runs
    // carrying the earlier track's last vehicle forward.
    let mut same_type_boundary = 0u32;
    let mut previous_last: Option<usize> = None;
    for sequence in &solution.tracks {
        if sequence.is_empty() {
            continue;
        }
        if let Some(last) = previous_last {
            let first = sequence[0];
            if instance.vehicle(last).schedule_type == instance.vehicle(first).schedule_type {
                same_type_boundary += 1;
            }
        }
        previous_last = sequence.last().copied();
    }

    let inside_weight = 1.0 / (instance.vehicle_count() - used) as f64;
    let boundary_weight = 1.0 / (used - 1) as f64;
    let gap_weight = 1.0 / (FULL_GAP_SCORE * f64::from(pair_count));

    Ok(inside_weight * f64::from(same_type_inside)
        + boundary_weight * f64::from(same_type_boundary)
        + gap_weight * gap_total)
}

/// Combined score: `timing / structural`. Higher is better.
///
/// The structural goal is strictly positive whenever it is defined (its
/// usage term alone is at least `2 / track_count`), so the ratio is
/// always finite.
pub fn score(
    instance: &Instance,
    solution: &Solution,
    policy: GapPolicy,
) -> Result<f64, FitnessError> {
    let structural = structural_score(instance, solution)?;
    let timing = timing_score(instance, solution, policy)?;
    Ok(timing / structural)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Track, Vehicle};

    /// 4 vehicles on 3 tracks; t0=[0,1] (series 1), t1=[2,3] (series 2).
    fn scored_pair() -> (Instance, Solution) {
        let instance = Instance::new(
            vec![
                Vehicle::new(10, 1, 5, 0),
                Vehicle::new(10, 1, 15, 1),
                Vehicle::new(10, 2, 25, 0),
                Vehicle::new(6, 2, 30, 1),
            ],
            vec![Track::new(25), Track::new(20), Track::new(12)],
            vec![vec![true; 3]; 4],
            &[],
        )
        .unwrap();
        let mut solution = Solution::empty(&instance);
        solution.place(&instance, 0, 0);
        solution.place(&instance, 0, 1);
        solution.place(&instance, 1, 2);
        solution.place(&instance, 1, 3);
        (instance, solution)
    }

    #[test]
    fn test_gap_factor_banded() {
        assert_eq!(gap_factor(10, GapPolicy::Banded), 15.0);
        assert_eq!(gap_factor(20, GapPolicy::Banded), 15.0);
        assert_eq!(gap_factor(15, GapPolicy::Banded), 15.0);
        assert_eq!(gap_factor(21, GapPolicy::Banded), 10.0);
        assert_eq!(gap_factor(100, GapPolicy::Banded), 10.0);
        assert_eq!(gap_factor(9, GapPolicy::Banded), -4.0);
        assert_eq!(gap_factor(5, GapPolicy::Banded), -20.0);
        assert_eq!(gap_factor(0, GapPolicy::Banded), -40.0);
    }

    #[test]
    fn test_gap_factor_uniform() {
        for gap in [-5, 0, 9, 15, 25] {
            assert_eq!(gap_factor(gap, GapPolicy::Uniform), 15.0);
        }
    }

    #[test]
    fn test_structural_score_value() {
        let (instance, solution) = scored_pair();
        // breaks = 1 (series 1 then 2), weight 1/(2-1);
        // usage = 2/3; leftover = 4.5 + 3.5 = 8 over slack 57-36 = 21.
        let expected = 1.0 + 2.0 / 3.0 + 8.0 / 21.0;
        let got = structural_score(&instance, &solution).unwrap();
        assert!((got - expected).abs() < 1e-12, "got {got}");
    }

    #[test]
    fn test_timing_score_value() {
        let (instance, solution) = scored_pair();
        // No equal-type pairs inside or across tracks; gaps 10 (→15) and
        // 5 (→ −20) give −5 over weight 1/(15·2).
        let expected = -5.0 / 30.0;
        let got = timing_score(&instance, &solution, GapPolicy::Banded).unwrap();
        assert!((got - expected).abs() < 1e-12, "got {got}");
    }

    #[test]
    fn test_combined_score_value() {
        let (instance, solution) = scored_pair();
        let expected = (-5.0 / 30.0) / (1.0 + 2.0 / 3.0 + 8.0 / 21.0);
        let got = score(&instance, &solution, GapPolicy::Banded).unwrap();
        assert!((got - expected).abs() < 1e-12, "got {got}");
    }

    #[test]
    fn test_uniform_policy_flattens_gaps() {
        let (instance, solution) = scored_pair();
        // Both pairs score 15; the spacing term saturates at 1.
        let got = timing_score(&instance, &solution, GapPolicy::Uniform).unwrap();
        assert!((got - 1.0).abs() < 1e-12, "got {got}");
    }

    #[test]
    fn test_empty_gap_carries_series() {
        let (instance, mut solution) = scored_pair();
        // Move the series-2 pair from track 1 to track 2, leaving a gap.
        solution.tracks[2] = std::mem::take(&mut solution.tracks[1]);
        solution.refresh(&instance);
        let with_gap = structural_score(&instance, &solution).unwrap();

        // The break count must be identical to the adjacent layout; only
        // the leftover term moves (track 2 is tighter than track 1).
        // breaks = 1, usage = 2/3, leftover = 4.5 + (12 - 16 - 0.5).
        let expected = 1.0 + 2.0 / 3.0 + (4.5 + (12.0 - 16.5)) / 21.0;
        assert!((with_gap - expected).abs() < 1e-12, "got {with_gap}");
    }

    #[test]
    fn test_empty_gap_carries_boundary_type() {
        let (instance, mut solution) = scored_pair();
        solution.tracks[2] = std::mem::take(&mut solution.tracks[1]);
        solution.refresh(&instance);
        // Boundary pair is still (v1, v2): types 1 vs 0, no hit.
        let got = timing_score(&instance, &solution, GapPolicy::Banded).unwrap();
        assert!((got - (-5.0 / 30.0)).abs() < 1e-12);
    }

    #[test]
    fn test_single_used_track_is_error() {
        let (instance, mut solution) = scored_pair();
        solution.tracks[0].clear();
        solution.unscheduled.extend([0, 1]);
        solution.refresh(&instance);
        assert_eq!(
            structural_score(&instance, &solution),
            Err(FitnessError::TooFewUsedTracks(1))
        );
        assert_eq!(
            timing_score(&instance, &solution, GapPolicy::Banded),
            Err(FitnessError::TooFewUsedTracks(1))
        );
    }

    #[test]
    fn test_zero_capacity_slack_is_error() {
        let instance = Instance::new(
            vec![Vehicle::new(10, 1, 5, 0), Vehicle::new(15, 2, 15, 1)],
            vec![Track::new(10), Track::new(15)],
            vec![vec![true; 2]; 2],
            &[],
        )
        .unwrap();
        let mut solution = Solution::empty(&instance);
        solution.place(&instance, 0, 0);
        solution.place(&instance, 1, 1);
        assert_eq!(
            structural_score(&instance, &solution),
            Err(FitnessError::NoCapacitySlack)
        );
    }

    #[test]
    fn test_all_singletons_is_error() {
        let instance = Instance::new(
            vec![Vehicle::new(10, 1, 5, 0), Vehicle::new(10, 2, 15, 1)],
            vec![Track::new(25), Track::new(25)],
            vec![vec![true; 2]; 2],
            &[],
        )
        .unwrap();
        let mut solution = Solution::empty(&instance);
        solution.place(&instance, 0, 0);
        solution.place(&instance, 1, 1);
        assert_eq!(
            timing_score(&instance, &solution, GapPolicy::Banded),
            Err(FitnessError::NoTrackSharing)
        );
    }

    #[test]
    fn test_no_stacked_pairs_is_error() {
        let (instance, mut solution) = scored_pair();
        // Two singleton tracks plus unscheduled leftovers.
        solution.tracks[0] = vec![0];
        solution.tracks[1] = vec![2];
        solution.unscheduled.extend([1, 3]);
        solution.refresh(&instance);
        assert_eq!(
            timing_score(&instance, &solution, GapPolicy::Banded),
            Err(FitnessError::NoStackedPairs)
        );
    }
}
