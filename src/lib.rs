//! Regolith reservoir (workspace facade crate).
//!
//! Re-exports the workspace crates under stable paths
//! (`regolith::{core,input,term,types}`) and hosts the pieces of the command-line
//! front end that are worth testing: configuration, logging and the JSONL grain log.

pub mod config;
pub mod jsonl;
pub mod logging;

pub use regolith_core as core;
pub use regolith_input as input;
pub use regolith_term as term;
pub use regolith_types as types;
