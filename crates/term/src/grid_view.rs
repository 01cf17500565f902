//! GridView: maps a simulation grid into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use std::collections::HashSet;

use crate::ascii::{glyph, TRAIL};
use crate::core::Grid;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CellState, Coord};

const BG: Rgb = Rgb::new(20, 20, 26);

/// Colored renderer for a finished (or in-progress) grid.
pub struct GridView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
}

impl Default for GridView {
    fn default() -> Self {
        Self { cell_w: 1 }
    }
}

impl GridView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render the grid inside a border, with `status` on the line below.
    pub fn render(&self, grid: &Grid, trail: &[Coord], status: &str) -> FrameBuffer {
        let inner_w = (grid.width() as u16).saturating_mul(self.cell_w);
        let inner_h = grid.height() as u16;
        let frame_w = inner_w.saturating_add(2);
        let frame_h = inner_h.saturating_add(2);
        let status_w = status.chars().count() as u16;

        let mut fb = FrameBuffer::new(frame_w.max(status_w), frame_h + 1);

        let border = CellStyle::fg(Rgb::new(200, 200, 200));
        self.draw_border(&mut fb, frame_w, frame_h, border);

        let trail: HashSet<Coord> = trail.iter().copied().collect();
        let b = grid.bounds();
        for (row, cells) in grid.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let c = Coord::new(b.x_min + col as i32, b.y_min + row as i32);
                let (ch, style) = if *cell == CellState::Empty && trail.contains(&c) {
                    (TRAIL, trail_style())
                } else {
                    (glyph(grid, *cell), cell_style(grid, *cell))
                };
                let px = 1 + col as u16 * self.cell_w;
                fb.fill_rect(px, 1 + row as u16, self.cell_w, 1, ch, style);
            }
        }

        fb.put_str(0, frame_h, status, CellStyle::fg(Rgb::new(220, 220, 220)));
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(0, 0, '┌', style);
        fb.put_char(w - 1, 0, '┐', style);
        fb.put_char(0, h - 1, '└', style);
        fb.put_char(w - 1, h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(dx, 0, '─', style);
            fb.put_char(dx, h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(0, dy, '│', style);
            fb.put_char(w - 1, dy, '│', style);
        }
    }
}

fn cell_style(grid: &Grid, cell: CellState) -> CellStyle {
    let fg = match cell {
        CellState::Empty => Rgb::new(70, 70, 80),
        CellState::Rock => Rgb::new(150, 150, 160),
        CellState::Sand => Rgb::new(230, 200, 110),
        CellState::Source if grid.source_blocked() => Rgb::new(230, 200, 110),
        CellState::Source => Rgb::new(120, 220, 120),
    };
    CellStyle {
        fg,
        bg: BG,
        bold: matches!(cell, CellState::Rock | CellState::Source),
        dim: cell == CellState::Empty,
    }
}

fn trail_style() -> CellStyle {
    CellStyle {
        fg: Rgb::new(90, 160, 230),
        bg: BG,
        bold: false,
        dim: false,
    }
}
