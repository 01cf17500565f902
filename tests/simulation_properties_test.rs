//! Property checks over generated caves.
//!
//! Caves come from a small xorshift generator so every run sees the same inputs.

use std::collections::BTreeSet;

use regolith::core::{
    drop_grain, floor_margin, next_step, GrainOutcome, Grid, RockSet, RunController, SimError,
    Step, Termination,
};
use regolith::types::{CellState, Coord, Mode, ObstaclePath, DEFAULT_SOURCE};

struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next() % (hi - lo + 1) as u64) as i32
    }
}

/// Random axis-aligned paths below the default source.
fn cave(seed: u64) -> Vec<ObstaclePath> {
    let mut rng = XorShift(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1);
    let count = rng.range(1, 6);
    (0..count)
        .map(|_| {
            let mut at = Coord::new(rng.range(480, 520), rng.range(2, 25));
            let mut points = vec![at];
            for step in 0..rng.range(1, 4) {
                at = if step % 2 == 0 {
                    Coord::new(rng.range(475, 525), at.y)
                } else {
                    Coord::new(at.x, rng.range(2, 30))
                };
                points.push(at);
            }
            ObstaclePath::new(points)
        })
        .collect()
}

fn segment_cells(a: Coord, b: Coord) -> Vec<Coord> {
    let mut out = Vec::new();
    for x in a.x.min(b.x)..=a.x.max(b.x) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            out.push(Coord::new(x, y));
        }
    }
    out
}

#[test]
fn rasterization_is_complete_and_sound() {
    for seed in 0..40 {
        let paths = cave(seed);
        let rocks = RockSet::rasterize(&paths).unwrap();

        let mut expected = BTreeSet::new();
        for path in &paths {
            if path.points.len() == 1 {
                expected.insert(path.points[0]);
            }
            for (a, b) in path.segments() {
                expected.extend(segment_cells(a, b));
            }
        }

        let actual: BTreeSet<Coord> = rocks.iter().collect();
        assert_eq!(actual, expected, "seed {}", seed);
        assert_eq!(RockSet::rasterize(&paths).unwrap(), rocks, "seed {}", seed);
    }
}

#[test]
fn floor_runs_never_leave_the_grid() {
    for seed in 0..40 {
        let paths = cave(seed);
        let rocks = RockSet::rasterize(&paths).unwrap();
        let grid = Grid::rasterize(&rocks, DEFAULT_SOURCE, Mode::Floor).unwrap();

        let floor_y = grid.floor_y().unwrap();
        assert_eq!(floor_y, rocks.max_y().unwrap() + 2);
        let margin = floor_margin(DEFAULT_SOURCE, floor_y);
        assert!(grid.bounds().x_min <= DEFAULT_SOURCE.x - margin);
        assert!(grid.bounds().x_max >= DEFAULT_SOURCE.x + margin);

        let report = RunController::new(grid).run().unwrap_or_else(|e| {
            panic!("seed {}: {}", seed, e);
        });
        assert_eq!(report.termination, Termination::SourceBlocked);
        assert!(report.grid.source_blocked());
        assert_eq!(report.rested, report.grid.sand_count() as u64 + 1);
    }
}

#[test]
fn floor_width_follows_the_margin_formula() {
    // A single short ledge well inside the margin.
    let paths = vec![ObstaclePath::from(vec![(499, 7), (501, 7)])];
    let rocks = RockSet::rasterize(&paths).unwrap();

    for source in [Coord::new(500, 0), Coord::new(500, 3), Coord::new(497, -2)] {
        let grid = Grid::rasterize(&rocks, source, Mode::Floor).unwrap();
        let floor_y = 9;
        assert_eq!(grid.floor_y(), Some(floor_y));
        assert_eq!(grid.width() as i32, 2 * (floor_y - source.y) + 1, "source {}", source);
        assert!(RunController::new(grid).run().is_ok());
    }
}

#[test]
fn abyss_runs_stop_at_the_first_exit() {
    for seed in 0..40 {
        let paths = cave(seed);
        let rocks = RockSet::rasterize(&paths).unwrap();
        let grid = Grid::rasterize(&rocks, DEFAULT_SOURCE, Mode::Abyss).unwrap();
        let report = RunController::new(grid).run().unwrap();

        match report.termination {
            Termination::Abyss => assert_eq!(report.rested, report.grid.sand_count() as u64),
            Termination::SourceBlocked => {
                assert_eq!(report.rested, report.grid.sand_count() as u64 + 1)
            }
        }

        // The next grain on the final grid must exit again.
        let mut grid = report.grid.clone();
        if report.termination == Termination::Abyss {
            let next = drop_grain(&mut grid, report.rested + 1).unwrap();
            assert!(matches!(next.outcome, GrainOutcome::Exited { .. }));
            assert_eq!(grid, report.grid);
        }
    }
}

#[test]
fn sand_only_accumulates_and_rock_is_untouched() {
    for seed in 0..20 {
        let paths = cave(seed);
        let rocks = RockSet::rasterize(&paths).unwrap();
        let mut grid = Grid::rasterize(&rocks, DEFAULT_SOURCE, Mode::Floor).unwrap();
        let initial = grid.clone();

        let mut sand: BTreeSet<Coord> = BTreeSet::new();
        for grain in 1.. {
            let r = drop_grain(&mut grid, grain).unwrap();
            let now: BTreeSet<Coord> = grid.sand_cells().collect();
            assert!(sand.is_subset(&now));
            sand = now;
            if r.outcome == GrainOutcome::Rested(DEFAULT_SOURCE) {
                break;
            }
        }

        for (before, after) in initial.cells().iter().zip(grid.cells()) {
            match before {
                CellState::Rock | CellState::Source | CellState::Sand => assert_eq!(before, after),
                CellState::Empty => assert!(matches!(after, CellState::Empty | CellState::Sand)),
            }
        }
    }
}

#[test]
fn priority_law_on_open_air() {
    let grid = Grid::from_ascii(
        Coord::new(0, 0),
        &["...+...", ".......", ".......", "#######"],
        Mode::Abyss,
    )
    .unwrap();
    for x in 1..6 {
        assert_eq!(next_step(&grid, Coord::new(x, 1)), Step::Move(Coord::new(x, 2)));
    }

    let grid = Grid::from_ascii(
        Coord::new(0, 0),
        &["...+...", "...o...", "#######"],
        Mode::Abyss,
    )
    .unwrap();
    assert_eq!(next_step(&grid, Coord::new(3, 0)), Step::Move(Coord::new(2, 1)));
}

#[test]
fn identical_grids_rest_grains_identically() {
    let paths = cave(7);
    let rocks = RockSet::rasterize(&paths).unwrap();
    let mut a = Grid::rasterize(&rocks, DEFAULT_SOURCE, Mode::Floor).unwrap();
    let mut b = a.clone();
    for grain in 1..=50 {
        let ra = drop_grain(&mut a, grain).unwrap();
        let rb = drop_grain(&mut b, grain).unwrap();
        assert_eq!(ra, rb);
    }
}

#[test]
fn bounds_error_reports_the_grain() {
    let grid = Grid::from_ascii(
        Coord::new(10, 0),
        &[".+.", "...", "###"],
        Mode::Floor,
    )
    .unwrap();
    // Grain 1 rests at (11,1); grain 2 slides to (10,1) and spills off the left edge.
    let err = RunController::new(grid).run().unwrap_err();
    assert_eq!(
        err,
        SimError::Bounds {
            grain: 2,
            at: Coord::new(10, 1)
        }
    );
}
