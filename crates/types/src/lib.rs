//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation core, scan parsing, terminal rendering).
//!
//! # Coordinates
//!
//! The cave is a vertical slice:
//!
//! - **x**: distance to the right
//! - **y**: distance down (larger `y` is deeper)
//! - **Source**: sand pours in at (500, 0) unless configured otherwise
//!
//! # Floor
//!
//! In [`Mode::Floor`] a synthetic rock line lies [`FLOOR_GAP`] rows below the
//! deepest rock of the scan.
//!
//! # Examples
//!
//! ```
//! use regolith_types::{CellState, Coord, Mode, DEFAULT_SOURCE};
//!
//! assert_eq!(DEFAULT_SOURCE, Coord::new(500, 0));
//!
//! // Parse a mode (case-insensitive)
//! assert_eq!(Mode::from_str("Floor"), Some(Mode::Floor));
//!
//! // Cell glyphs
//! assert_eq!(CellState::Rock.as_char(), '#');
//! assert_eq!(CellState::from_char('o'), Some(CellState::Sand));
//!
//! // Neighbouring cells below a grain
//! let c = Coord::new(500, 0);
//! assert_eq!(c.below(), Coord::new(500, 1));
//! assert_eq!(c.below_left(), Coord::new(499, 1));
//! assert_eq!(c.below_right(), Coord::new(501, 1));
//! ```

use std::fmt;

/// Default sand source, top of the scan.
pub const DEFAULT_SOURCE: Coord = Coord::new(500, 0);

/// Rows between the deepest rock and the synthetic floor.
pub const FLOOR_GAP: i32 = 2;

/// An absolute cave coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight down.
    #[inline]
    pub const fn below(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    /// Diagonally down and to the left.
    #[inline]
    pub const fn below_left(self) -> Self {
        Self::new(self.x - 1, self.y + 1)
    }

    /// Diagonally down and to the right.
    #[inline]
    pub const fn below_right(self) -> Self {
        Self::new(self.x + 1, self.y + 1)
    }

    /// The three candidate next cells in strict priority order.
    #[inline]
    pub const fn fall_candidates(self) -> [Self; 3] {
        [self.below(), self.below_left(), self.below_right()]
    }

    /// Parse `"x,y"` (surrounding whitespace allowed).
    pub fn from_str(s: &str) -> Option<Self> {
        let (x, y) = s.trim().split_once(',')?;
        let x = x.trim().parse().ok()?;
        let y = y.trim().parse().ok()?;
        Some(Self::new(x, y))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// State of one grid cell.
///
/// The only legal transition during a run is `Empty -> Sand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    Rock,
    Sand,
    Source,
}

impl CellState {
    /// Rock and sand stop a grain; the source never lies below a grain.
    #[inline]
    pub fn is_blocking(self) -> bool {
        match self {
            CellState::Empty => false,
            CellState::Rock | CellState::Sand | CellState::Source => true,
        }
    }

    /// Glyph used by the diagnostic rendering.
    pub fn as_char(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Rock => '#',
            CellState::Sand => 'o',
            CellState::Source => '+',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(CellState::Empty),
            '#' => Some(CellState::Rock),
            'o' => Some(CellState::Sand),
            '+' => Some(CellState::Source),
            _ => None,
        }
    }
}

/// Termination semantics of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Sand falls past the deepest rock into the void.
    #[default]
    Abyss,
    /// An infinite floor lies [`FLOOR_GAP`] rows below the deepest rock.
    Floor,
}

impl Mode {
    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "abyss" | "void" => Some(Mode::Abyss),
            "floor" => Some(Mode::Floor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Abyss => "abyss",
            Mode::Floor => "floor",
        }
    }
}

/// One rock structure from the scan: waypoints joined by straight segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObstaclePath {
    pub points: Vec<Coord>,
}

impl ObstaclePath {
    pub fn new(points: Vec<Coord>) -> Self {
        Self { points }
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

impl From<Vec<(i32, i32)>> for ObstaclePath {
    fn from(points: Vec<(i32, i32)>) -> Self {
        Self::new(points.into_iter().map(Coord::from).collect())
    }
}
