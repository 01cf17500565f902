//! Run configuration: environment variables first, then command-line arguments.
//!
//! Environment:
//!
//! - `REGOLITH_SOURCE`: source coordinate as `x,y` (default `500,0`)
//! - `REGOLITH_MODE`: `abyss`, `floor` or `both` (default `abyss`)
//! - `REGOLITH_RENDER`: `none`, `plain`, `labelled` or `color` (default `none`)
//! - `REGOLITH_LOG_PATH`: append one JSON line per grain to this file
//! - `REGOLITH_LOG`: stderr log level (`off`, `error`, `warn`, `info`, `debug`, `trace`)

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::LevelFilter;

use crate::types::{Coord, Mode, DEFAULT_SOURCE};

pub const USAGE: &str = "\
usage: regolith [OPTIONS] [SCAN]

Simulate falling sand over the rock scan in SCAN (stdin when omitted).

options:
  --abyss              stop when sand falls into the void (default)
  --floor              add the infinite floor; stop when the source is blocked
  --mode MODE          abyss, floor or both
  --source X,Y         sand source (default 500,0)
  --render KIND        none, plain, labelled or color
  --log-path PATH      append one JSON line per grain to PATH
  --log-level LEVEL    stderr log level (default warn)
  -h, --help           show this help";

/// Which termination semantics to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    One(Mode),
    Both,
}

impl ModeSelection {
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("both") {
            return Some(ModeSelection::Both);
        }
        Mode::from_str(s).map(ModeSelection::One)
    }

    pub fn modes(&self) -> Vec<Mode> {
        match self {
            ModeSelection::One(mode) => vec![*mode],
            ModeSelection::Both => vec![Mode::Abyss, Mode::Floor],
        }
    }
}

/// Diagnostic rendering of the final grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    None,
    Plain,
    Labelled,
    Color,
}

impl RenderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Some(RenderKind::None),
            "plain" | "ascii" => Some(RenderKind::Plain),
            "labelled" | "labeled" => Some(RenderKind::Labelled),
            "color" | "colour" => Some(RenderKind::Color),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub source: Coord,
    pub modes: ModeSelection,
    pub render: RenderKind,
    pub log_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    /// Scan file; `None` reads stdin.
    pub input: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE,
            modes: ModeSelection::One(Mode::Abyss),
            render: RenderKind::None,
            log_path: None,
            log_level: LevelFilter::Warn,
            input: None,
        }
    }
}

impl RunConfig {
    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup (used by `from_env` and tests).
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let non_empty = |key: &str| {
            var(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        if let Some(v) = non_empty("REGOLITH_SOURCE") {
            config.source = parse_source(&v)?;
        }
        if let Some(v) = non_empty("REGOLITH_MODE") {
            config.modes = parse_modes(&v)?;
        }
        if let Some(v) = non_empty("REGOLITH_RENDER") {
            config.render = parse_render(&v)?;
        }
        if let Some(v) = non_empty("REGOLITH_LOG") {
            config.log_level = parse_level(&v)?;
        }
        config.log_path = non_empty("REGOLITH_LOG_PATH").map(PathBuf::from);

        Ok(config)
    }

    /// Apply command-line arguments (without the program name) on top of `self`.
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn with_args(mut self, args: &[String]) -> Result<Option<Self>> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => return Ok(None),
                "--abyss" => self.modes = ModeSelection::One(Mode::Abyss),
                "--floor" => self.modes = ModeSelection::One(Mode::Floor),
                "--mode" => {
                    i += 1;
                    self.modes = parse_modes(value(args, i, "--mode")?)?;
                }
                "--source" => {
                    i += 1;
                    self.source = parse_source(value(args, i, "--source")?)?;
                }
                "--render" => {
                    i += 1;
                    self.render = parse_render(value(args, i, "--render")?)?;
                }
                "--log-path" => {
                    i += 1;
                    self.log_path = Some(PathBuf::from(value(args, i, "--log-path")?));
                }
                "--log-level" => {
                    i += 1;
                    self.log_level = parse_level(value(args, i, "--log-level")?)?;
                }
                other if other.starts_with('-') && other != "-" => {
                    return Err(anyhow!("unknown argument: {}", other));
                }
                path => {
                    if self.input.is_some() {
                        return Err(anyhow!("unexpected extra argument: {}", path));
                    }
                    // `-` means stdin.
                    self.input = (path != "-").then(|| PathBuf::from(path));
                }
            }
            i += 1;
        }
        Ok(Some(self))
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_source(s: &str) -> Result<Coord> {
    Coord::from_str(s).ok_or_else(|| anyhow!("invalid source {:?}, expected x,y", s))
}

fn parse_modes(s: &str) -> Result<ModeSelection> {
    ModeSelection::from_str(s).ok_or_else(|| anyhow!("invalid mode {:?}, expected abyss, floor or both", s))
}

fn parse_render(s: &str) -> Result<RenderKind> {
    RenderKind::from_str(s).ok_or_else(|| anyhow!("invalid render kind {:?}", s))
}

fn parse_level(s: &str) -> Result<LevelFilter> {
    s.parse::<LevelFilter>()
        .map_err(|_| anyhow!("invalid log level {:?}", s))
}
