//! Instance text format and result rendering.
//!
//! The instance format is line-oriented: vehicle count; track count; a
//! separator line; vehicle lengths; separator; series ids; separator;
//! one restriction row of `1`/`0` flags per vehicle; separator; track
//! lengths; separator; departure times; separator; schedule types;
//! separator; then one blocking relation per remaining line as
//! `blocking_track blocked_track...` (1-indexed). Any malformed or
//! missing numeric content is an [`InputFormatError`] naming the
//! offending line.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::model::{Instance, Solution, Track, Vehicle};

/// Malformed instance or layout text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormatError {
    /// 1-based line number of the offending content.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl InputFormatError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for InputFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl Error for InputFormatError {}

/// Line cursor that reports 1-based positions.
struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            position: 0,
        }
    }

    fn next_line(&mut self) -> Result<&'a str, InputFormatError> {
        self.position += 1;
        self.lines
            .next()
            .ok_or_else(|| InputFormatError::new(self.position, "unexpected end of input"))
    }

    /// Consumes a separator line; content is not inspected.
    fn skip_line(&mut self) -> Result<(), InputFormatError> {
        self.next_line().map(|_| ())
    }

    fn parse_value<T: FromStr>(&mut self, what: &str) -> Result<T, InputFormatError> {
        let line = self.next_line()?;
        line.trim()
            .parse()
            .map_err(|_| InputFormatError::new(self.position, format!("expected {what}, got {line:?}")))
    }

    fn parse_row<T: FromStr>(
        &mut self,
        what: &str,
        expected: usize,
    ) -> Result<Vec<T>, InputFormatError> {
        let line = self.next_line()?;
        let values: Result<Vec<T>, _> = line
            .split_whitespace()
            .map(|token| {
                token.parse().map_err(|_| {
                    InputFormatError::new(
                        self.position,
                        format!("expected {what}, got token {token:?}"),
                    )
                })
            })
            .collect();
        let values = values?;
        if values.len() != expected {
            return Err(InputFormatError::new(
                self.position,
                format!("expected {expected} {what} values, got {}", values.len()),
            ));
        }
        Ok(values)
    }

    fn parse_flag_row(&mut self, expected: usize) -> Result<Vec<bool>, InputFormatError> {
        let line = self.next_line()?;
        let flags: Result<Vec<bool>, _> = line
            .split_whitespace()
            .map(|token| match token {
                "1" => Ok(true),
                "0" => Ok(false),
                other => Err(InputFormatError::new(
                    self.position,
                    format!("expected restriction flag 1 or 0, got {other:?}"),
                )),
            })
            .collect();
        let flags = flags?;
        if flags.len() != expected {
            return Err(InputFormatError::new(
                self.position,
                format!("expected {expected} restriction flags, got {}", flags.len()),
            ));
        }
        Ok(flags)
    }
}

/// Parses an instance from its text form.
pub fn load_instance(text: &str) -> Result<Instance, InputFormatError> {
    let mut cursor = Cursor::new(text);

    let vehicle_count: usize = cursor.parse_value("vehicle count")?;
    let track_count: usize = cursor.parse_value("track count")?;
    cursor.skip_line()?;

    let lengths: Vec<u32> = cursor.parse_row("vehicle length", vehicle_count)?;
    cursor.skip_line()?;

    let series: Vec<u32> = cursor.parse_row("series id", vehicle_count)?;
    cursor.skip_line()?;

    let mut permitted = Vec::with_capacity(vehicle_count);
    for _ in 0..vehicle_count {
        permitted.push(cursor.parse_flag_row(track_count)?);
    }
    cursor.skip_line()?;

    let capacities: Vec<u32> = cursor.parse_row("track length", track_count)?;
    cursor.skip_line()?;

    let departures: Vec<i64> = cursor.parse_row("departure time", vehicle_count)?;
    cursor.skip_line()?;

    let schedule_types: Vec<u32> = cursor.parse_row("schedule type", vehicle_count)?;
    cursor.skip_line().ok();

    let mut blocking_pairs = Vec::new();
    while let Ok(line) = cursor.next_line() {
        if line.trim().is_empty() {
            continue;
        }
        let position = cursor.position;
        let ids: Result<Vec<usize>, _> = line
            .split_whitespace()
            .map(|token| {
                token.parse::<usize>().map_err(|_| {
                    InputFormatError::new(
                        position,
                        format!("expected track id, got token {token:?}"),
                    )
                })
            })
            .collect();
        let ids = ids?;
        for &id in &ids {
            if id == 0 || id > track_count {
                return Err(InputFormatError::new(
                    position,
                    format!("track id {id} out of range 1..={track_count}"),
                ));
            }
        }
        let Some((&blocking, blocked)) = ids.split_first() else {
            continue;
        };
        for &b in blocked {
            blocking_pairs.push((blocking - 1, b - 1));
        }
    }

    let vehicles: Vec<Vehicle> = (0..vehicle_count)
        .map(|i| Vehicle::new(lengths[i], series[i], departures[i], schedule_types[i]))
        .collect();
    let tracks: Vec<Track> = capacities.into_iter().map(Track::new).collect();

    Instance::new(vehicles, tracks, permitted, &blocking_pairs)
        .map_err(|err| InputFormatError::new(0, err.to_string()))
}

/// Renders an assignment: one line per track, space-separated 1-indexed
/// vehicle ids in parking order, empty line for an unused track.
pub fn render(solution: &Solution) -> String {
    solution
        .tracks
        .iter()
        .map(|sequence| {
            sequence
                .iter()
                .map(|&v| (v + 1).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses rendered output back into 0-indexed track sequences.
pub fn parse_layout(text: &str) -> Result<Vec<Vec<usize>>, InputFormatError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            line.split_whitespace()
                .map(|token| {
                    let id: usize = token.parse().map_err(|_| {
                        InputFormatError::new(
                            index + 1,
                            format!("expected vehicle id, got token {token:?}"),
                        )
                    })?;
                    if id == 0 {
                        return Err(InputFormatError::new(
                            index + 1,
                            "vehicle ids are 1-indexed",
                        ));
                    }
                    Ok(id - 1)
                })
                .collect()
        })
        .collect()
}
