//! Scan input module.
//!
//! Turns the textual cave scan into [`ObstaclePath`](crate::types::ObstaclePath)
//! lists for the simulation core. Nothing here knows about grids or grains.

pub mod scan;

pub use regolith_types as types;

pub use scan::{parse_path, parse_scan, read_scan, ScanError, ScanErrorKind};
