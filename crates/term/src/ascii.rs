//! Plain-text rendering of a grid.
//!
//! Glyphs: `.` air, `#` rock, `o` sand, `+` source, `~` the path of the grain
//! that fell into the void. A blocked source is drawn as sand.

use std::collections::HashSet;

use crate::core::Grid;
use crate::types::{CellState, Coord};

/// Glyph marking the path of the grain that fell into the void.
pub const TRAIL: char = '~';

/// Glyph for a cell, honouring a blocked source.
pub fn glyph(grid: &Grid, cell: CellState) -> char {
    match cell {
        CellState::Source if grid.source_blocked() => CellState::Sand.as_char(),
        other => other.as_char(),
    }
}

/// One line per row, no labels.
pub fn render_plain(grid: &Grid, trail: &[Coord]) -> String {
    let trail: HashSet<Coord> = trail.iter().copied().collect();
    let b = grid.bounds();
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());

    for (row, cells) in grid.rows().enumerate() {
        let y = b.y_min + row as i32;
        for (col, cell) in cells.iter().enumerate() {
            let c = Coord::new(b.x_min + col as i32, y);
            if *cell == CellState::Empty && trail.contains(&c) {
                out.push(TRAIL);
            } else {
                out.push(glyph(grid, *cell));
            }
        }
        out.push('\n');
    }
    out
}

/// Rendering with stacked column labels (leftmost x, source x, rightmost x) and
/// right-aligned row numbers.
pub fn render_labelled(grid: &Grid, trail: &[Coord]) -> String {
    let b = grid.bounds();
    let row_w = b.y_min.to_string().len().max(b.y_max.to_string().len());

    let mut labels: Vec<(usize, String)> = [b.x_min, grid.source().x, b.x_max]
        .iter()
        .map(|&x| ((x - b.x_min) as usize, x.to_string()))
        .collect();
    labels.dedup_by_key(|(col, _)| *col);
    let digits = labels.iter().map(|(_, s)| s.len()).max().unwrap_or(0);

    let mut out = String::new();
    for d in 0..digits {
        let mut line = vec![' '; row_w + 1 + grid.width()];
        for (col, text) in &labels {
            let pad = digits - text.len();
            if d >= pad {
                if let Some(ch) = text.chars().nth(d - pad) {
                    line[row_w + 1 + col] = ch;
                }
            }
        }
        let line: String = line.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    for (row, body) in render_plain(grid, trail).lines().enumerate() {
        let y = b.y_min + row as i32;
        out.push_str(&format!("{:>w$} {}\n", y, body, w = row_w));
    }
    out
}
