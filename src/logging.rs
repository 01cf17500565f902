//! Stderr logging through `env_logger`.
//!
//! Lines look like `[regolith] INFO  source 500,0 blocked; 93 at rest`.

use std::io::Write;

use log::{LevelFilter, Record, SetLoggerError};

fn format_record(record: &Record) -> String {
    format!("[regolith] {:<5} {}", record.level(), record.args())
}

/// Install the stderr logger at `level`.
///
/// Fails if a logger is already installed for this process.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", format_record(record)))
        .try_init()
}
