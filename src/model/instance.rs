//! Immutable problem instance.
//!
//! An [`Instance`] bundles the vehicle fleet, the yard's storage tracks,
//! the per-vehicle track restriction grid, and the directed blocking
//! relation between tracks. All indices are validated once at
//! construction; the rest of the crate indexes without re-checking.

use std::error::Error;
use std::fmt;

/// A vehicle awaiting assignment to a storage track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Physical length in capacity units.
    pub length: u32,
    /// Homogeneity group; vehicles of different series never share a track.
    pub series: u32,
    /// Departure time; totally ordered within a run.
    pub departure: i64,
    /// Schedule-type tag, used only for adjacency scoring.
    pub schedule_type: u32,
}

impl Vehicle {
    /// Creates a vehicle.
    pub fn new(length: u32, series: u32, departure: i64, schedule_type: u32) -> Self {
        Self {
            length,
            series,
            departure,
            schedule_type,
        }
    }
}

/// A storage track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// Usable length in capacity units.
    pub capacity: u32,
}

impl Track {
    /// Creates a track.
    pub fn new(capacity: u32) -> Self {
        Self { capacity }
    }
}

/// Errors raised while assembling an [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The restriction grid does not have one row per vehicle.
    RestrictionRowCount { rows: usize, vehicles: usize },
    /// A restriction row does not have one flag per track.
    RestrictionRowWidth {
        vehicle: usize,
        width: usize,
        tracks: usize,
    },
    /// A blocking pair references a track outside `0..track_count`.
    BlockingOutOfRange { track: usize, tracks: usize },
    /// A track is declared to block itself.
    SelfBlocking { track: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RestrictionRowCount { rows, vehicles } => write!(
                f,
                "restriction grid has {rows} rows but there are {vehicles} vehicles"
            ),
            Self::RestrictionRowWidth {
                vehicle,
                width,
                tracks,
            } => write!(
                f,
                "restriction row for vehicle {vehicle} has {width} flags but there are {tracks} tracks"
            ),
            Self::BlockingOutOfRange { track, tracks } => write!(
                f,
                "blocking relation references track {track} but there are only {tracks} tracks"
            ),
            Self::SelfBlocking { track } => {
                write!(f, "track {track} cannot block itself")
            }
        }
    }
}

impl Error for ModelError {}

/// Immutable problem definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    vehicles: Vec<Vehicle>,
    tracks: Vec<Track>,
    /// Restriction grid, `permitted[vehicle][track]`.
    permitted: Vec<Vec<bool>>,
    /// `blocks[a]` lists the tracks whose departures track `a` gates.
    blocks: Vec<Vec<usize>>,
    /// Inverse of `blocks`.
    blocked_by: Vec<Vec<usize>>,
    total_track_capacity: u64,
    total_vehicle_length: u64,
}

impl Instance {
    /// Assembles an instance, validating the restriction grid shape and
    /// every blocking pair (`(blocking, blocked)`, 0-indexed).
    pub fn new(
        vehicles: Vec<Vehicle>,
        tracks: Vec<Track>,
        permitted: Vec<Vec<bool>>,
        blocking_pairs: &[(usize, usize)],
    ) -> Result<Self, ModelError> {
        if permitted.len() != vehicles.len() {
            return Err(ModelError::RestrictionRowCount {
                rows: permitted.len(),
                vehicles: vehicles.len(),
            });
        }
        for (vehicle, row) in permitted.iter().enumerate() {
            if row.len() != tracks.len() {
                return Err(ModelError::RestrictionRowWidth {
                    vehicle,
                    width: row.len(),
                    tracks: tracks.len(),
                });
            }
        }

        let mut blocks = vec![Vec::new(); tracks.len()];
        let mut blocked_by = vec![Vec::new(); tracks.len()];
        for &(blocking, blocked) in blocking_pairs {
            for track in [blocking, blocked] {
                if track >= tracks.len() {
                    return Err(ModelError::BlockingOutOfRange {
                        track,
                        tracks: tracks.len(),
                    });
                }
            }
            if blocking == blocked {
                return Err(ModelError::SelfBlocking { track: blocking });
            }
            blocks[blocking].push(blocked);
            blocked_by[blocked].push(blocking);
        }

        let total_track_capacity = tracks.iter().map(|t| u64::from(t.capacity)).sum();
        let total_vehicle_length = vehicles.iter().map(|v| u64::from(v.length)).sum();

        Ok(Self {
            vehicles,
            tracks,
            permitted,
            blocks,
            blocked_by,
            total_track_capacity,
            total_vehicle_length,
        })
    }

    /// Number of vehicles.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// All vehicles, indexed by id.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// All tracks, indexed by id.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The vehicle with the given index.
    pub fn vehicle(&self, vehicle: usize) -> &Vehicle {
        &self.vehicles[vehicle]
    }

    /// The track with the given index.
    pub fn track(&self, track: usize) -> &Track {
        &self.tracks[track]
    }

    /// Whether the vehicle's restriction row allows the track.
    pub fn is_permitted(&self, vehicle: usize, track: usize) -> bool {
        self.permitted[vehicle][track]
    }

    /// Tracks whose departures the given track gates.
    pub fn blocks(&self, track: usize) -> &[usize] {
        &self.blocks[track]
    }

    /// Tracks gating the given track's departures.
    pub fn blocked_by(&self, track: usize) -> &[usize] {
        &self.blocked_by[track]
    }

    /// Whether the track participates in any blocking pair, either side.
    pub fn in_blocking_relation(&self, track: usize) -> bool {
        !self.blocks[track].is_empty() || !self.blocked_by[track].is_empty()
    }

    /// Sum of all track capacities.
    pub fn total_track_capacity(&self) -> u64 {
        self.total_track_capacity
    }

    /// Sum of all vehicle lengths.
    pub fn total_vehicle_length(&self) -> u64 {
        self.total_vehicle_length
    }

    /// How many vehicles are permitted on the track (restriction column
    /// count). Construction claims scarce tracks first using this.
    pub fn permitted_vehicle_count(&self, track: usize) -> usize {
        self.permitted.iter().filter(|row| row[track]).count()
    }
}
