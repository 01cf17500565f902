//! Obstacle map builder - rasterizes rock paths into cells
//!
//! Each path is a chain of axis-aligned segments. Every cell on a segment,
//! both endpoints included, is rock. The resulting [`RockSet`] is built once and
//! never modified afterwards.

use std::collections::BTreeSet;

use crate::error::ParseError;
use crate::types::{Coord, ObstaclePath};

/// Immutable set of rock cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RockSet {
    cells: BTreeSet<Coord>,
}

impl RockSet {
    /// Rasterize every segment of every path.
    ///
    /// A single-point path contributes that point; an empty path contributes nothing.
    pub fn rasterize(paths: &[ObstaclePath]) -> Result<Self, ParseError> {
        let mut cells = BTreeSet::new();

        for (path_idx, path) in paths.iter().enumerate() {
            if let [only] = path.points.as_slice() {
                cells.insert(*only);
                continue;
            }

            for (from, to) in path.segments() {
                if from.x == to.x {
                    let (lo, hi) = (from.y.min(to.y), from.y.max(to.y));
                    cells.extend((lo..=hi).map(|y| Coord::new(from.x, y)));
                } else if from.y == to.y {
                    let (lo, hi) = (from.x.min(to.x), from.x.max(to.x));
                    cells.extend((lo..=hi).map(|x| Coord::new(x, from.y)));
                } else {
                    return Err(ParseError {
                        path: path_idx,
                        from,
                        to,
                    });
                }
            }
        }

        Ok(Self { cells })
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in (x, y) order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    /// Deepest rock row, if any rock exists.
    pub fn max_y(&self) -> Option<i32> {
        self.cells.iter().map(|c| c.y).max()
    }

    pub fn min_y(&self) -> Option<i32> {
        self.cells.iter().map(|c| c.y).min()
    }

    /// Leftmost and rightmost rock columns.
    pub fn x_range(&self) -> Option<(i32, i32)> {
        // BTreeSet orders by x first.
        let first = self.cells.first()?;
        let last = self.cells.last()?;
        Some((first.x, last.x))
    }
}
