//! Core simulation logic - pure, deterministic, and testable
//!
//! This crate contains the falling-sand rules, grid sizing and run termination.
//! It performs **no I/O**: text parsing lives in `regolith-input`, rendering in
//! `regolith-term`, and diagnostics leave through the `log` facade and the
//! [`RunObserver`] trait.
//!
//! # Module Structure
//!
//! - [`obstacles`]: rasterizes rock paths into a [`RockSet`]
//! - [`grid`]: sizes and allocates the occupancy field, including the floor margin
//! - [`engine`]: moves a single grain to rest (or out of the field)
//! - [`controller`]: drops grains until the run terminates and counts them
//! - [`error`]: parse and simulation failures
//!
//! # Rules
//!
//! - A grain falls straight down if it can, else down-left, else down-right
//! - A grain with all three cells below blocked rests and becomes sand
//! - **Abyss mode**: the run stops when a grain leaves the field; that grain is not counted
//! - **Floor mode**: an infinite floor lies two rows below the deepest rock; the run
//!   stops when a grain rests on the source; that grain is counted
//!
//! # Example
//!
//! ```
//! use regolith_core::{simulate, Termination};
//! use regolith_types::{Mode, ObstaclePath, DEFAULT_SOURCE};
//!
//! let scan = vec![
//!     ObstaclePath::from(vec![(498, 4), (498, 6), (496, 6)]),
//!     ObstaclePath::from(vec![(503, 4), (502, 4), (502, 9), (494, 9)]),
//! ];
//!
//! let abyss = simulate(&scan, DEFAULT_SOURCE, Mode::Abyss).unwrap();
//! assert_eq!(abyss.rested, 24);
//! assert_eq!(abyss.termination, Termination::Abyss);
//!
//! let floor = simulate(&scan, DEFAULT_SOURCE, Mode::Floor).unwrap();
//! assert_eq!(floor.rested, 93);
//! ```

pub mod controller;
pub mod engine;
pub mod error;
pub mod grid;
pub mod obstacles;

pub use regolith_types as types;

// Re-export commonly used types for convenience
pub use controller::{
    simulate, GrainRecord, NoopObserver, RecordOutcome, RunController, RunObserver, RunReport,
    Termination,
};
pub use engine::{drop_grain, drop_grain_traced, next_step, GrainOutcome, GrainResult, Step};
pub use error::{ParseError, SimError};
pub use grid::{floor_margin, Bounds, Grid, MAX_CELLS};
pub use obstacles::RockSet;
