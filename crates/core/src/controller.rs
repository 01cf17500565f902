//! Run controller - drops grains until the run terminates
//!
//! The controller owns the grid for the whole run and lends it to the engine one
//! grain at a time. Each grain depends on every grain before it, so grains are
//! simulated strictly in order.
//!
//! A run ends in one of two ways:
//!
//! - a grain leaves the grid (the abyss): it is not counted
//! - a grain rests on the source: it is counted and the source is blocked
//!
//! With the floor active, a grain leaving the grid means the floor margin was
//! too small. That is reported as [`SimError::Bounds`], never as a normal end.

use log::{debug, info};
use serde::Serialize;

use crate::engine::{drop_grain, drop_grain_traced, GrainOutcome, GrainResult};
use crate::error::SimError;
use crate::grid::Grid;
use crate::obstacles::RockSet;
use crate::types::{Coord, Mode, ObstaclePath};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The next grain fell into the void.
    Abyss,
    /// The last grain came to rest on the source.
    SourceBlocked,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Abyss => "abyss",
            Termination::SourceBlocked => "source_blocked",
        }
    }
}

/// Final state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Grains at rest when the run stopped.
    pub rested: u64,
    pub termination: Termination,
    pub grid: Grid,
    /// Cells visited by the grain that fell into the void (empty unless traced).
    pub exit_path: Vec<Coord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Rested,
    Exited,
}

/// Per-grain record handed to a [`RunObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrainRecord {
    pub grain: u64,
    pub mode: &'static str,
    pub outcome: RecordOutcome,
    pub x: i32,
    pub y: i32,
    pub steps: usize,
}

impl GrainRecord {
    fn new(grain: u64, mode: Mode, result: GrainResult) -> Self {
        let (outcome, at) = match result.outcome {
            GrainOutcome::Rested(at) => (RecordOutcome::Rested, at),
            GrainOutcome::Exited { last } => (RecordOutcome::Exited, last),
        };
        Self {
            grain,
            mode: mode.as_str(),
            outcome,
            x: at.x,
            y: at.y,
            steps: result.steps,
        }
    }
}

/// Receives one record per simulated grain.
pub trait RunObserver {
    fn on_grain(&mut self, record: &GrainRecord);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_grain(&mut self, _record: &GrainRecord) {}
}

impl RunObserver for Vec<GrainRecord> {
    fn on_grain(&mut self, record: &GrainRecord) {
        self.push(*record);
    }
}

pub struct RunController {
    grid: Grid,
    rested: u64,
    trace_exit: bool,
}

impl RunController {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rested: 0,
            trace_exit: false,
        }
    }

    /// Record the path of the grain that falls into the void.
    pub fn with_exit_trace(mut self, enabled: bool) -> Self {
        self.trace_exit = enabled;
        self
    }

    pub fn run(self) -> Result<RunReport, SimError> {
        self.run_with(&mut NoopObserver)
    }

    pub fn run_with(mut self, observer: &mut dyn RunObserver) -> Result<RunReport, SimError> {
        let mode = self.grid.mode();
        let source = self.grid.source();
        let mut trace = Vec::new();

        loop {
            let grain = self.rested + 1;
            let result = if self.trace_exit {
                drop_grain_traced(&mut self.grid, grain, &mut trace)?
            } else {
                drop_grain(&mut self.grid, grain)?
            };
            observer.on_grain(&GrainRecord::new(grain, mode, result));

            match result.outcome {
                GrainOutcome::Exited { last } => {
                    if mode == Mode::Floor {
                        return Err(SimError::Bounds { grain, at: last });
                    }
                    info!(
                        "grain {} fell into the void from {}; {} at rest",
                        grain, last, self.rested
                    );
                    return Ok(self.finish(Termination::Abyss, trace));
                }
                GrainOutcome::Rested(at) if at == source => {
                    self.rested += 1;
                    info!("source {} blocked; {} at rest", source, self.rested);
                    return Ok(self.finish(Termination::SourceBlocked, Vec::new()));
                }
                GrainOutcome::Rested(at) => {
                    self.rested += 1;
                    debug!("grain {} rested at {} after {} steps", grain, at, result.steps);
                }
            }
        }
    }

    fn finish(self, termination: Termination, exit_path: Vec<Coord>) -> RunReport {
        RunReport {
            rested: self.rested,
            termination,
            grid: self.grid,
            exit_path,
        }
    }
}

/// Rasterize `paths`, size the grid for `mode`, and run to termination.
pub fn simulate(paths: &[ObstaclePath], source: Coord, mode: Mode) -> Result<RunReport, SimError> {
    let rocks = RockSet::rasterize(paths)?;
    let grid = Grid::rasterize(&rocks, source, mode)?;
    RunController::new(grid).run()
}
