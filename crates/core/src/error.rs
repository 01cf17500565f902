//! Error types for the simulation core.

use std::fmt;

use crate::types::Coord;

/// A rock segment the rasterizer cannot draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// Index of the offending path in the obstacle list.
    pub path: usize,
    pub from: Coord,
    pub to: Coord,
}

impl ParseError {
    pub fn code(self) -> &'static str {
        "diagonal_segment"
    }

    pub fn message(self) -> &'static str {
        "segment is neither horizontal nor vertical"
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "path {}: {} ({} -> {})",
            self.path,
            self.message(),
            self.from,
            self.to
        )
    }
}

impl std::error::Error for ParseError {}

/// Fatal simulation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    Parse(ParseError),
    /// A grain left the grid while the floor was active: the margin is too small.
    Bounds { grain: u64, at: Coord },
    /// A grain took more steps than the grid allows.
    StepLimit { grain: u64, limit: usize },
    /// The source lies on or below the synthetic floor.
    InvalidSource { source: Coord, floor_y: i32 },
    /// The field would need more cells than the simulator allocates.
    GridTooLarge { width: u64, height: u64 },
    /// A grid edge lands at or beyond the limits of `i32` coordinates.
    OutOfRange { edge: i64 },
}

impl SimError {
    pub fn code(self) -> &'static str {
        match self {
            SimError::Parse(e) => e.code(),
            SimError::Bounds { .. } => "bounds",
            SimError::StepLimit { .. } => "step_limit",
            SimError::InvalidSource { .. } => "invalid_source",
            SimError::GridTooLarge { .. } => "grid_too_large",
            SimError::OutOfRange { .. } => "out_of_range",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SimError::Parse(e) => e.message(),
            SimError::Bounds { .. } => "grain left the grid in floor mode",
            SimError::StepLimit { .. } => "grain exceeded the per-grain step limit",
            SimError::InvalidSource { .. } => "source is not above the floor",
            SimError::GridTooLarge { .. } => "scan spans too many cells",
            SimError::OutOfRange { .. } => "scan reaches the coordinate limits",
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SimError::Parse(e) => fmt::Display::fmt(&e, f),
            SimError::Bounds { grain, at } => {
                write!(f, "{} (grain {}, last cell {})", self.message(), grain, at)
            }
            SimError::StepLimit { grain, limit } => {
                write!(f, "{} (grain {}, limit {})", self.message(), grain, limit)
            }
            SimError::InvalidSource { source, floor_y } => {
                write!(f, "{} (source {}, floor y={})", self.message(), source, floor_y)
            }
            SimError::GridTooLarge { width, height } => {
                write!(f, "{} ({}x{})", self.message(), width, height)
            }
            SimError::OutOfRange { edge } => write!(f, "{} (edge at {})", self.message(), edge),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for SimError {
    fn from(value: ParseError) -> Self {
        SimError::Parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let parse = ParseError {
            path: 0,
            from: Coord::new(0, 0),
            to: Coord::new(1, 1),
        };
        assert_eq!(SimError::from(parse).code(), "diagonal_segment");
        assert_eq!(
            SimError::Bounds {
                grain: 3,
                at: Coord::new(0, 0)
            }
            .code(),
            "bounds"
        );
        assert_eq!(
            SimError::StepLimit { grain: 1, limit: 9 }.code(),
            "step_limit"
        );
    }

    #[test]
    fn display_names_the_segment() {
        let err = ParseError {
            path: 2,
            from: Coord::new(1, 1),
            to: Coord::new(3, 4),
        };
        assert_eq!(
            err.to_string(),
            "path 2: segment is neither horizontal nor vertical (1,1 -> 3,4)"
        );
    }
}
