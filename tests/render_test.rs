//! Rendering of finished runs through the facade crate.

use regolith::core::{simulate, Grid, RockSet, RunController};
use regolith::input::parse_scan;
use regolith::term::{render_labelled, GridView, TRAIL};
use regolith::types::{Mode, DEFAULT_SOURCE};

const SAMPLE: &str = "498,4 -> 498,6 -> 496,6\n503,4 -> 502,4 -> 502,9 -> 494,9\n";

#[test]
fn labelled_floor_grid_pads_row_numbers() {
    let paths = parse_scan(SAMPLE).unwrap();
    let report = simulate(&paths, DEFAULT_SOURCE, Mode::Floor).unwrap();
    let text = render_labelled(&report.grid, &[]);
    let lines: Vec<&str> = text.lines().collect();

    // Three label rows, then rows 0..=11 with a two-character row column.
    assert_eq!(lines.len(), 3 + 12);
    assert_eq!(lines[0], "   4          5          5");
    assert_eq!(lines[1], "   8          0          1");
    assert_eq!(lines[2], "   9          0          1");
    assert!(lines[3].starts_with(" 0 ..........."));
    assert!(lines[14].starts_with("11 ####"));
}

#[test]
fn color_view_shows_trail_and_status() {
    let paths = parse_scan(SAMPLE).unwrap();
    let rocks = RockSet::rasterize(&paths).unwrap();
    let grid = Grid::rasterize(&rocks, DEFAULT_SOURCE, Mode::Abyss).unwrap();
    let report = RunController::new(grid).with_exit_trace(true).run().unwrap();

    let fb = GridView::default().render(&report.grid, &report.exit_path, "abyss: 24");
    assert_eq!(fb.height() as usize, report.grid.height() + 3);

    let trail_cells = fb.cells().iter().filter(|c| c.ch == TRAIL).count();
    assert_eq!(trail_cells, report.exit_path.len() - 1);
    assert_eq!(fb.row_text(fb.height() - 1).trim_end(), "abyss: 24");
}
