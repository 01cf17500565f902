//! Simulation engine - moves one grain from the source to rest
//!
//! A grain is a small state machine: it keeps falling while one of the three cells
//! below it is free, trying straight down first, then down-left, then down-right.
//! When all three are blocked it rests and becomes sand. If the preferred candidate
//! lies outside the grid the grain has left the field.

use crate::error::SimError;
use crate::grid::Grid;
use crate::types::Coord;

/// One transition of the grain state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep falling into this cell.
    Move(Coord),
    /// All three candidates are blocked.
    Rest,
    /// A candidate lies outside the grid.
    Exit,
}

/// How a grain's life ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrainOutcome {
    Rested(Coord),
    /// Left the grid; `last` is the final in-grid cell.
    Exited { last: Coord },
}

/// Outcome plus the number of moves the grain made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrainResult {
    pub outcome: GrainOutcome,
    pub steps: usize,
}

/// Decide the next transition from `pos` without mutating the grid.
pub fn next_step(grid: &Grid, pos: Coord) -> Step {
    for candidate in pos.fall_candidates() {
        match grid.get(candidate) {
            None => return Step::Exit,
            Some(cell) if !cell.is_blocking() => return Step::Move(candidate),
            Some(_) => {}
        }
    }
    Step::Rest
}

/// Drop grain number `grain` from the source and run it to completion.
pub fn drop_grain(grid: &mut Grid, grain: u64) -> Result<GrainResult, SimError> {
    run_grain(grid, grain, None)
}

/// Like [`drop_grain`], also recording every cell the grain occupies (source included).
pub fn drop_grain_traced(
    grid: &mut Grid,
    grain: u64,
    trace: &mut Vec<Coord>,
) -> Result<GrainResult, SimError> {
    trace.clear();
    run_grain(grid, grain, Some(trace))
}

fn run_grain(
    grid: &mut Grid,
    grain: u64,
    mut trace: Option<&mut Vec<Coord>>,
) -> Result<GrainResult, SimError> {
    let mut pos = grid.source();
    if let Some(t) = trace.as_deref_mut() {
        t.push(pos);
    }

    if grid.source_blocked() {
        return Ok(GrainResult {
            outcome: GrainOutcome::Rested(pos),
            steps: 0,
        });
    }

    let limit = grid.step_limit();
    let mut steps = 0usize;

    loop {
        match next_step(grid, pos) {
            Step::Move(next) => {
                steps += 1;
                if steps > limit {
                    return Err(SimError::StepLimit { grain, limit });
                }
                pos = next;
                if let Some(t) = trace.as_deref_mut() {
                    t.push(pos);
                }
            }
            Step::Rest => {
                grid.settle(pos);
                return Ok(GrainResult {
                    outcome: GrainOutcome::Rested(pos),
                    steps,
                });
            }
            Step::Exit => {
                return Ok(GrainResult {
                    outcome: GrainOutcome::Exited { last: pos },
                    steps,
                });
            }
        }
    }
}
