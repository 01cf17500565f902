//! JSON Lines grain log.
//!
//! One object per grain as the run progresses, then one summary object per run:
//!
//! ```text
//! {"grain":1,"mode":"abyss","outcome":"rested","x":500,"y":8,"steps":8}
//! ...
//! {"summary":true,"mode":"abyss","rested":24,"termination":"abyss"}
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{GrainRecord, RunObserver, RunReport};
use crate::types::Mode;

/// Final line written for each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub summary: bool,
    pub mode: &'static str,
    pub rested: u64,
    pub termination: &'static str,
}

impl RunSummary {
    pub fn new(mode: Mode, report: &RunReport) -> Self {
        Self {
            summary: true,
            mode: mode.as_str(),
            rested: report.rested,
            termination: report.termination.as_str(),
        }
    }
}

/// Writes grain records as JSON lines.
///
/// The observer callback cannot fail, so the first write error is kept and
/// returned from [`JsonlObserver::finish`].
pub struct JsonlObserver<W: Write> {
    out: W,
    buf: Vec<u8>,
    error: Option<io::Error>,
}

impl JsonlObserver<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed.
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening grain log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlObserver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(128),
            error: None,
        }
    }

    fn write_line<T: Serialize>(&mut self, value: &T) {
        if self.error.is_some() {
            return;
        }
        self.buf.clear();
        if let Err(e) = serde_json::to_writer(&mut self.buf, value) {
            self.error = Some(e.into());
            return;
        }
        self.buf.push(b'\n');
        if let Err(e) = self.out.write_all(&self.buf) {
            self.error = Some(e);
        }
    }

    /// Write the run summary line.
    pub fn summary(&mut self, summary: &RunSummary) {
        self.write_line(summary);
    }

    /// Flush and hand back the writer, or the first error seen.
    pub fn finish(mut self) -> Result<W> {
        if let Some(e) = self.error.take() {
            return Err(anyhow::Error::new(e).context("writing grain log"));
        }
        self.out.flush().context("flushing grain log")?;
        Ok(self.out)
    }
}

impl<W: Write> RunObserver for JsonlObserver<W> {
    fn on_grain(&mut self, record: &GrainRecord) {
        self.write_line(record);
    }
}
