//! Mutable assignment state.
//!
//! A [`Solution`] stores one ordered vehicle sequence per track (append
//! order = physical parking order, first in line departs first) together
//! with derived summaries kept in sync by [`Solution::place`] and
//! [`Solution::refresh`]. Vehicles with no feasible track live in the
//! `unscheduled` set. Copies are deep: mutating a cloned candidate never
//! touches its source.

use std::collections::BTreeSet;

use super::Instance;

/// Clearance reserved between consecutive vehicles on a track, in
/// capacity units. Charged per append after the first vehicle.
pub const CLEARANCE_MARGIN: f64 = 0.5;

/// One assignment of vehicles to tracks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Per-track vehicle sequence, parking order.
    pub tracks: Vec<Vec<usize>>,
    /// Series occupying each track; `None` iff the track is empty.
    pub series_on_track: Vec<Option<u32>>,
    /// Bookkeeping leftover per track:
    /// `capacity − Σ lengths − margin × (occupants − 1)`.
    pub free_capacity: Vec<f64>,
    /// Number of non-empty tracks.
    pub used_tracks: usize,
    /// Vehicles that could not be placed.
    pub unscheduled: BTreeSet<usize>,
}

impl Solution {
    /// An all-empty assignment for the given instance.
    pub fn empty(instance: &Instance) -> Self {
        Self {
            tracks: vec![Vec::new(); instance.track_count()],
            series_on_track: vec![None; instance.track_count()],
            free_capacity: instance
                .tracks()
                .iter()
                .map(|t| f64::from(t.capacity))
                .collect(),
            used_tracks: 0,
            unscheduled: BTreeSet::new(),
        }
    }

    /// Appends a vehicle to a track and updates the derived fields.
    ///
    /// Opening an empty track charges the plain vehicle length; every
    /// later append additionally charges [`CLEARANCE_MARGIN`].
    pub fn place(&mut self, instance: &Instance, track: usize, vehicle: usize) {
        let length = f64::from(instance.vehicle(vehicle).length);
        if self.tracks[track].is_empty() {
            self.series_on_track[track] = Some(instance.vehicle(vehicle).series);
            self.free_capacity[track] -= length;
            self.used_tracks += 1;
        } else {
            self.free_capacity[track] -= length + CLEARANCE_MARGIN;
        }
        self.tracks[track].push(vehicle);
    }

    /// Recomputes every derived field from the raw sequences.
    ///
    /// Used after a perturbation has edited the sequences directly.
    pub fn refresh(&mut self, instance: &Instance) {
        self.used_tracks = 0;
        for track in 0..self.tracks.len() {
            let sequence = &self.tracks[track];
            if sequence.is_empty() {
                self.series_on_track[track] = None;
                self.free_capacity[track] = f64::from(instance.track(track).capacity);
                continue;
            }
            self.used_tracks += 1;
            self.series_on_track[track] = Some(instance.vehicle(sequence[0]).series);
            let occupied: f64 = sequence
                .iter()
                .map(|&v| f64::from(instance.vehicle(v).length))
                .sum();
            let margin = CLEARANCE_MARGIN * (sequence.len() - 1) as f64;
            self.free_capacity[track] = f64::from(instance.track(track).capacity) - occupied - margin;
        }
    }

    /// Whether the track holds at least one vehicle.
    pub fn is_used(&self, track: usize) -> bool {
        !self.tracks[track].is_empty()
    }

    /// Departure time of the first vehicle in line, if any.
    pub fn first_departure(&self, instance: &Instance, track: usize) -> Option<i64> {
        self.tracks[track]
            .first()
            .map(|&v| instance.vehicle(v).departure)
    }

    /// Departure time of the last vehicle in line, if any.
    pub fn last_departure(&self, instance: &Instance, track: usize) -> Option<i64> {
        self.tracks[track]
            .last()
            .map(|&v| instance.vehicle(v).departure)
    }

    /// Canonical key over the track layout and the unscheduled set.
    ///
    /// Two solutions with equal keys hold the same vehicles in the same
    /// order everywhere. Used for recency-memory membership and candidate
    /// distinctness.
    pub fn layout_key(&self) -> String {
        let mut key = String::new();
        for sequence in &self.tracks {
            for (i, v) in sequence.iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                key.push_str(&v.to_string());
            }
            key.push('|');
        }
        key.push('u');
        for v in &self.unscheduled {
            key.push(',');
            key.push_str(&v.to_string());
        }
        key
    }

    /// Whether two solutions share the same layout (sequences and
    /// unscheduled set; derived fields are ignored).
    pub fn same_layout(&self, other: &Self) -> bool {
        self.tracks == other.tracks && self.unscheduled == other.unscheduled
    }
}
