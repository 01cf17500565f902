//! Grid module - the bounded occupancy field
//!
//! The grid is a dense row-major array of [`CellState`] covering a rectangle of
//! absolute cave coordinates. All coordinate math goes through [`Grid::index`],
//! which offsets by the top-left corner and returns `None` outside the field.
//!
//! # Floor margin
//!
//! In [`Mode::Floor`] the rock line at `floor_y` is infinite in principle. A grain
//! moves at most one column per row it falls, and it rests no deeper than
//! `floor_y - 1`, so from a source at `(sx, sy)` it can only ever inspect cells with
//! `|x - sx| <= floor_y - sy`. The grid therefore spans
//! `sx - (floor_y - sy) ..= sx + (floor_y - sy)` (widened further if rocks stick out)
//! and a floor-mode grain can never reach a side edge.

use crate::error::SimError;
use crate::obstacles::RockSet;
use crate::types::{CellState, Coord, Mode, FLOOR_GAP};

/// Inclusive absolute bounds of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Bounds {
    /// Compute bounds (and the floor row in floor mode) for a rock set and source.
    ///
    /// Extents are worked out in `i64`. Every edge must sit strictly inside the
    /// `i32` range so the fall candidates of any in-grid cell are representable,
    /// and the field may hold at most [`MAX_CELLS`] cells.
    pub fn compute(rocks: &RockSet, source: Coord, mode: Mode) -> Result<(Self, Option<i32>), SimError> {
        let (rock_x_min, rock_x_max) = rocks.x_range().unwrap_or((source.x, source.x));
        let (sx, sy) = (i64::from(source.x), i64::from(source.y));
        let deepest = i64::from(rocks.max_y().unwrap_or(source.y));
        let y_min = sy.min(0).min(i64::from(rocks.min_y().unwrap_or(0)));

        let (x_min, x_max, y_max, floor_y) = match mode {
            Mode::Abyss => (
                i64::from(rock_x_min).min(sx),
                i64::from(rock_x_max).max(sx),
                deepest.max(sy),
                None,
            ),
            Mode::Floor => {
                let floor_y = deepest + i64::from(FLOOR_GAP);
                if sy >= floor_y {
                    // floor_y <= source.y here, so it fits.
                    return Err(SimError::InvalidSource {
                        source,
                        floor_y: floor_y as i32,
                    });
                }
                let margin = floor_y - sy;
                (
                    i64::from(rock_x_min).min(sx - margin),
                    i64::from(rock_x_max).max(sx + margin),
                    floor_y,
                    Some(floor_y),
                )
            }
        };

        let bounds = Self {
            x_min: narrow(x_min)?,
            x_max: narrow(x_max)?,
            y_min: narrow(y_min)?,
            y_max: narrow(y_max)?,
        };

        let (width, height) = (bounds.width() as u64, bounds.height() as u64);
        if width.saturating_mul(height) > MAX_CELLS {
            return Err(SimError::GridTooLarge { width, height });
        }

        Ok((bounds, floor_y.map(|_| bounds.y_max)))
    }

    pub fn width(&self) -> usize {
        (i64::from(self.x_max) - i64::from(self.x_min) + 1) as usize
    }

    pub fn height(&self) -> usize {
        (i64::from(self.y_max) - i64::from(self.y_min) + 1) as usize
    }

    pub fn contains(&self, c: Coord) -> bool {
        (self.x_min..=self.x_max).contains(&c.x) && (self.y_min..=self.y_max).contains(&c.y)
    }
}

/// Largest field [`Grid::rasterize`] will allocate.
pub const MAX_CELLS: u64 = 1 << 27;

/// Keep one spare unit on each side of an edge for the fall candidates.
fn narrow(v: i64) -> Result<i32, SimError> {
    match i32::try_from(v) {
        Ok(n) if n > i32::MIN && n < i32::MAX => Ok(n),
        _ => Err(SimError::OutOfRange { edge: v }),
    }
}

/// Columns needed on each side of the source so no grain reaches a side edge.
pub fn floor_margin(source: Coord, floor_y: i32) -> i32 {
    floor_y.saturating_sub(source.y)
}

/// The occupancy field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    bounds: Bounds,
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<CellState>,
    source: Coord,
    mode: Mode,
    floor_y: Option<i32>,
    source_blocked: bool,
    sand: usize,
}

impl Grid {
    /// Size the field for `rocks` and `source`, then paint rock and source cells.
    pub fn rasterize(rocks: &RockSet, source: Coord, mode: Mode) -> Result<Self, SimError> {
        let (bounds, floor_y) = Bounds::compute(rocks, source, mode)?;
        let mut grid = Self::empty(bounds, source, mode, floor_y);

        for rock in rocks.iter() {
            grid.paint_rock(rock);
        }
        if let Some(floor_y) = floor_y {
            for x in bounds.x_min..=bounds.x_max {
                grid.paint_rock(Coord::new(x, floor_y));
            }
        }

        Ok(grid)
    }

    fn empty(bounds: Bounds, source: Coord, mode: Mode, floor_y: Option<i32>) -> Self {
        let width = bounds.width();
        let height = bounds.height();
        let mut grid = Self {
            bounds,
            width,
            height,
            cells: vec![CellState::Empty; width * height],
            source,
            mode,
            floor_y,
            source_blocked: false,
            sand: 0,
        };
        if let Some(idx) = grid.index(source) {
            grid.cells[idx] = CellState::Source;
        }
        grid
    }

    fn paint_rock(&mut self, c: Coord) {
        if c == self.source {
            return;
        }
        if let Some(idx) = self.index(c) {
            self.cells[idx] = CellState::Rock;
        }
    }

    /// Build a grid from text rows (`.`, `#`, `o`, `+`) whose top-left cell is `origin`.
    ///
    /// Exactly one `+` is required. Returns `None` for ragged rows or unknown glyphs.
    pub fn from_ascii(origin: Coord, rows: &[&str], mode: Mode) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.chars().count();
        if width == 0 || rows.iter().any(|r| r.chars().count() != width) {
            return None;
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut source = None;
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let cell = CellState::from_char(ch)?;
                if cell == CellState::Source {
                    if source.is_some() {
                        return None;
                    }
                    source = Some(Coord::new(origin.x + col as i32, origin.y + row as i32));
                }
                cells.push(cell);
            }
        }

        let bounds = Bounds {
            x_min: origin.x,
            x_max: origin.x + width as i32 - 1,
            y_min: origin.y,
            y_max: origin.y + height as i32 - 1,
        };
        let sand = cells.iter().filter(|c| **c == CellState::Sand).count();
        Some(Self {
            bounds,
            width,
            height,
            cells,
            source: source?,
            mode,
            floor_y: (mode == Mode::Floor).then_some(bounds.y_max),
            source_blocked: false,
            sand,
        })
    }

    /// Flat index of an absolute coordinate, `None` outside the field.
    #[inline(always)]
    pub fn index(&self, c: Coord) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let col = (c.x - self.bounds.x_min) as usize;
        let row = (c.y - self.bounds.y_min) as usize;
        Some(row * self.width + col)
    }

    /// Cell at an absolute coordinate, `None` outside the field.
    pub fn get(&self, c: Coord) -> Option<CellState> {
        self.index(c).map(|idx| self.cells[idx])
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.bounds.contains(c)
    }

    /// Settle a grain at `c`.
    ///
    /// Empty cells become sand. The source keeps its state and is flagged as
    /// blocked. Returns false (and changes nothing) for any other cell.
    pub fn settle(&mut self, c: Coord) -> bool {
        let Some(idx) = self.index(c) else {
            return false;
        };
        match self.cells[idx] {
            CellState::Empty => {
                self.cells[idx] = CellState::Sand;
                self.sand += 1;
                true
            }
            CellState::Source if !self.source_blocked => {
                self.source_blocked = true;
                true
            }
            CellState::Source | CellState::Rock | CellState::Sand => false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn source(&self) -> Coord {
        self.source
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn floor_y(&self) -> Option<i32> {
        self.floor_y
    }

    pub fn source_blocked(&self) -> bool {
        self.source_blocked
    }

    /// Sand cells in the field (a grain resting on the source is not counted here).
    pub fn sand_count(&self) -> usize {
        self.sand
    }

    /// Upper bound on the moves a single grain can make.
    ///
    /// Every move descends one row, so a grain makes fewer than `height` moves and
    /// this limit never trips on a well-formed grid.
    pub fn step_limit(&self) -> usize {
        self.height + self.width
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Rows top to bottom, each `width` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Absolute coordinates of all sand cells.
    pub fn sand_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let (x0, y0, w) = (self.bounds.x_min, self.bounds.y_min, self.width);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == CellState::Sand)
            .map(move |(i, _)| Coord::new(x0 + (i % w) as i32, y0 + (i / w) as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObstaclePath;

    fn sample_rocks() -> RockSet {
        RockSet::rasterize(&[
            ObstaclePath::from(vec![(498, 4), (498, 6), (496, 6)]),
            ObstaclePath::from(vec![(503, 4), (502, 4), (502, 9), (494, 9)]),
        ])
        .unwrap()
    }

    #[test]
    fn abyss_bounds_cover_rocks_and_source() {
        let grid = Grid::rasterize(&sample_rocks(), Coord::new(500, 0), Mode::Abyss).unwrap();
        assert_eq!(
            grid.bounds(),
            Bounds {
                x_min: 494,
                x_max: 503,
                y_min: 0,
                y_max: 9
            }
        );
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 10);
        assert_eq!(grid.floor_y(), None);
        assert_eq!(grid.get(Coord::new(500, 0)), Some(CellState::Source));
        assert_eq!(grid.get(Coord::new(498, 5)), Some(CellState::Rock));
        assert_eq!(grid.get(Coord::new(500, 5)), Some(CellState::Empty));
    }

    #[test]
    fn floor_bounds_use_fall_depth_margin() {
        let grid = Grid::rasterize(&sample_rocks(), Coord::new(500, 0), Mode::Floor).unwrap();
        assert_eq!(grid.floor_y(), Some(11));
        assert_eq!(
            grid.bounds(),
            Bounds {
                x_min: 489,
                x_max: 511,
                y_min: 0,
                y_max: 11
            }
        );
        assert_eq!(grid.width(), 2 * 11 + 1);
        for x in 489..=511 {
            assert_eq!(grid.get(Coord::new(x, 11)), Some(CellState::Rock));
        }
    }

    #[test]
    fn floor_margin_widens_for_wide_rocks() {
        let rocks = RockSet::rasterize(&[ObstaclePath::from(vec![(400, 3), (600, 3)])]).unwrap();
        let grid = Grid::rasterize(&rocks, Coord::new(500, 0), Mode::Floor).unwrap();
        assert_eq!(grid.bounds().x_min, 400);
        assert_eq!(grid.bounds().x_max, 600);
        assert_eq!(floor_margin(Coord::new(500, 0), 5), 5);
    }

    #[test]
    fn source_below_floor_is_rejected() {
        let rocks = RockSet::rasterize(&[ObstaclePath::from(vec![(0, 1), (2, 1)])]).unwrap();
        let err = Grid::rasterize(&rocks, Coord::new(1, 3), Mode::Floor).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidSource {
                source: Coord::new(1, 3),
                floor_y: 3
            }
        );
    }

    #[test]
    fn floor_row_past_i32_is_out_of_range() {
        let rocks = RockSet::rasterize(&[ObstaclePath::from(vec![
            (500, i32::MAX - 1),
            (501, i32::MAX - 1),
        ])])
        .unwrap();
        assert!(matches!(
            Grid::rasterize(&rocks, Coord::new(500, 0), Mode::Floor),
            Err(SimError::OutOfRange { .. })
        ));
        // The bottom edge must leave room for the row below it.
        let rocks = RockSet::rasterize(&[ObstaclePath::from(vec![(0, i32::MAX)])]).unwrap();
        assert_eq!(
            Grid::rasterize(&rocks, Coord::new(0, 0), Mode::Abyss).unwrap_err(),
            SimError::OutOfRange {
                edge: i64::from(i32::MAX)
            }
        );
    }

    #[test]
    fn oversized_field_is_rejected_before_allocating() {
        let rocks =
            RockSet::rasterize(&[ObstaclePath::from(vec![(0, 0), (0, 2_000_000_000)])]).unwrap();
        let err = Grid::rasterize(&rocks, Coord::new(500, 0), Mode::Abyss).unwrap_err();
        assert_eq!(
            err,
            SimError::GridTooLarge {
                width: 501,
                height: 2_000_000_001
            }
        );
        assert_eq!(err.code(), "grid_too_large");

        let err = Grid::rasterize(&rocks, Coord::new(500, 0), Mode::Floor).unwrap_err();
        assert!(matches!(err, SimError::GridTooLarge { .. }));
    }

    #[test]
    fn rock_never_overwrites_source() {
        let rocks = RockSet::rasterize(&[ObstaclePath::from(vec![(498, 0), (502, 0)])]).unwrap();
        let grid = Grid::rasterize(&rocks, Coord::new(500, 0), Mode::Abyss).unwrap();
        assert_eq!(grid.get(Coord::new(500, 0)), Some(CellState::Source));
        assert_eq!(grid.get(Coord::new(499, 0)), Some(CellState::Rock));
    }

    #[test]
    fn index_is_offset_and_bounds_checked() {
        let grid = Grid::rasterize(&sample_rocks(), Coord::new(500, 0), Mode::Abyss).unwrap();
        assert_eq!(grid.index(Coord::new(494, 0)), Some(0));
        assert_eq!(grid.index(Coord::new(503, 0)), Some(9));
        assert_eq!(grid.index(Coord::new(494, 1)), Some(10));
        assert_eq!(grid.index(Coord::new(503, 9)), Some(99));
        assert_eq!(grid.index(Coord::new(493, 0)), None);
        assert_eq!(grid.index(Coord::new(504, 0)), None);
        assert_eq!(grid.index(Coord::new(500, 10)), None);
        assert_eq!(grid.index(Coord::new(500, -1)), None);
    }

    #[test]
    fn settle_only_fills_empty_cells() {
        let mut grid = Grid::rasterize(&sample_rocks(), Coord::new(500, 0), Mode::Abyss).unwrap();
        assert!(grid.settle(Coord::new(500, 8)));
        assert_eq!(grid.get(Coord::new(500, 8)), Some(CellState::Sand));
        assert!(!grid.settle(Coord::new(500, 8)));
        assert!(!grid.settle(Coord::new(502, 9)));
        assert!(!grid.settle(Coord::new(600, 0)));
        assert_eq!(grid.sand_count(), 1);

        assert!(grid.settle(Coord::new(500, 0)));
        assert!(grid.source_blocked());
        assert_eq!(grid.get(Coord::new(500, 0)), Some(CellState::Source));
        assert!(!grid.settle(Coord::new(500, 0)));
    }

    #[test]
    fn from_ascii_locates_source() {
        let grid = Grid::from_ascii(Coord::new(10, 0), &["..+..", ".....", "##o##"], Mode::Abyss)
            .unwrap();
        assert_eq!(grid.source(), Coord::new(12, 0));
        assert_eq!(grid.sand_count(), 1);
        assert_eq!(grid.get(Coord::new(10, 2)), Some(CellState::Rock));
        assert_eq!(grid.sand_cells().collect::<Vec<_>>(), vec![Coord::new(12, 2)]);

        assert!(Grid::from_ascii(Coord::new(0, 0), &["...", ".."], Mode::Abyss).is_none());
        assert!(Grid::from_ascii(Coord::new(0, 0), &["+.+"], Mode::Abyss).is_none());
        assert!(Grid::from_ascii(Coord::new(0, 0), &["..."], Mode::Abyss).is_none());
    }
}
