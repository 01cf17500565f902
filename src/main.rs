//! Regolith reservoir runner (default binary).
//!
//! Reads a rock scan, runs the simulation in the configured mode(s) and prints
//! the number of grains at rest, optionally followed by a rendering of the grid.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use log::{info, warn};

use regolith::config::{RenderKind, RunConfig, USAGE};
use regolith::core::{Grid, RockSet, RunController, RunReport};
use regolith::input::read_scan;
use regolith::jsonl::{JsonlObserver, RunSummary};
use regolith::logging;
use regolith::term::{print_frame, render_labelled, render_plain, GridView};
use regolith::types::{Mode, ObstaclePath};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = RunConfig::from_env()?.with_args(&args)? else {
        println!("{}", USAGE);
        return Ok(());
    };
    logging::init(config.log_level).context("installing stderr logger")?;

    let paths = load_scan(&config)?;
    info!("scan has {} rock paths", paths.len());

    let mut grain_log = match &config.log_path {
        Some(path) => Some(JsonlObserver::append(path)?),
        None => None,
    };

    let modes = config.modes.modes();
    for mode in &modes {
        let report = run_mode(&paths, &config, *mode, grain_log.as_mut())?;

        if modes.len() > 1 {
            println!("{}: {}", mode.as_str(), report.rested);
        } else {
            println!("{}", report.rested);
        }
        render(&config, *mode, &report)?;
    }

    if let Some(grain_log) = grain_log {
        grain_log.finish()?;
    }
    Ok(())
}

fn load_scan(config: &RunConfig) -> Result<Vec<ObstaclePath>> {
    match &config.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening scan {}", path.display()))?;
            read_scan(BufReader::new(file)).with_context(|| format!("parsing scan {}", path.display()))
        }
        None => read_scan(io::stdin().lock()).context("parsing scan from stdin"),
    }
}

fn run_mode<W: io::Write>(
    paths: &[ObstaclePath],
    config: &RunConfig,
    mode: Mode,
    grain_log: Option<&mut JsonlObserver<W>>,
) -> Result<RunReport> {
    let rocks = RockSet::rasterize(paths).context("rasterizing rock paths")?;
    let grid = Grid::rasterize(&rocks, config.source, mode).context("sizing the grid")?;
    info!(
        "{} mode: {}x{} grid, {} rock cells",
        mode.as_str(),
        grid.width(),
        grid.height(),
        rocks.len()
    );

    let controller = RunController::new(grid).with_exit_trace(config.render != RenderKind::None);
    let report = match grain_log {
        Some(observer) => {
            let report = controller
                .run_with(&mut *observer)
                .with_context(|| format!("{} run failed", mode.as_str()))?;
            observer.summary(&RunSummary::new(mode, &report));
            report
        }
        None => controller
            .run()
            .with_context(|| format!("{} run failed", mode.as_str()))?,
    };

    if report.rested == 0 {
        warn!("{} mode: no sand came to rest", mode.as_str());
    }
    Ok(report)
}

fn render(config: &RunConfig, mode: Mode, report: &RunReport) -> Result<()> {
    match config.render {
        RenderKind::None => {}
        RenderKind::Plain => print!("{}", render_plain(&report.grid, &report.exit_path)),
        RenderKind::Labelled => print!("{}", render_labelled(&report.grid, &report.exit_path)),
        RenderKind::Color => {
            let status = format!(
                "{}: {} at rest ({})",
                mode.as_str(),
                report.rested,
                report.termination.as_str()
            );
            let fb = GridView::default().render(&report.grid, &report.exit_path, &status);
            print_frame(&fb)?;
        }
    }
    Ok(())
}
