//! Scan parsing: text lines into rock paths.
//!
//! Each non-blank line is one path: `x1,y1 -> x2,y2 -> ... -> xn,yn`.

use std::fmt;
use std::io::BufRead;

use crate::types::{Coord, ObstaclePath};

/// Separator between waypoints.
pub const ARROW: &str = "->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// A waypoint is empty (e.g. `1,2 -> -> 3,4`).
    EmptyWaypoint,
    /// A waypoint has no `,` between x and y.
    MissingComma(String),
    /// A coordinate is not an integer.
    BadNumber(String),
    /// The input could not be read.
    Io(String),
}

impl ScanErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ScanErrorKind::EmptyWaypoint => "empty_waypoint",
            ScanErrorKind::MissingComma(_) => "missing_comma",
            ScanErrorKind::BadNumber(_) => "bad_number",
            ScanErrorKind::Io(_) => "io",
        }
    }
}

/// A scan error with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub line: usize,
    pub kind: ScanErrorKind,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScanErrorKind::EmptyWaypoint => write!(f, "line {}: empty waypoint", self.line),
            ScanErrorKind::MissingComma(w) => {
                write!(f, "line {}: waypoint {:?} is missing ','", self.line, w)
            }
            ScanErrorKind::BadNumber(w) => {
                write!(f, "line {}: waypoint {:?} is not an integer pair", self.line, w)
            }
            ScanErrorKind::Io(e) => write!(f, "line {}: read failed: {}", self.line, e),
        }
    }
}

impl std::error::Error for ScanError {}

/// Parse one path line.
pub fn parse_path(line: &str) -> Result<ObstaclePath, ScanErrorKind> {
    let mut points = Vec::new();
    for waypoint in line.split(ARROW) {
        let waypoint = waypoint.trim();
        if waypoint.is_empty() {
            return Err(ScanErrorKind::EmptyWaypoint);
        }
        if !waypoint.contains(',') {
            return Err(ScanErrorKind::MissingComma(waypoint.to_string()));
        }
        let coord = Coord::from_str(waypoint)
            .ok_or_else(|| ScanErrorKind::BadNumber(waypoint.to_string()))?;
        points.push(coord);
    }
    Ok(ObstaclePath::new(points))
}

/// Parse a whole scan. Blank lines are skipped.
pub fn parse_scan(text: &str) -> Result<Vec<ObstaclePath>, ScanError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_path(line).map_err(|kind| ScanError { line: idx + 1, kind }))
        .collect()
}

/// Parse a scan from a reader, line by line.
pub fn read_scan<R: BufRead>(reader: R) -> Result<Vec<ObstaclePath>, ScanError> {
    let mut paths = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ScanError {
            line: idx + 1,
            kind: ScanErrorKind::Io(e.to_string()),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let path = parse_path(&line).map_err(|kind| ScanError { line: idx + 1, kind })?;
        paths.push(path);
    }
    Ok(paths)
}
