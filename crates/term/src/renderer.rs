//! Flushes a framebuffer to a real terminal.
//!
//! Output is a single static frame written inline (no alternate screen, no raw
//! mode), so it can be scrolled back or piped through a pager that keeps colors.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Encode every row of `fb` into `out`, newline-terminated.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_frame_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current_style: Option<CellStyle> = None;
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        // Reset before the newline so the background does not bleed to the right edge.
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        current_style = None;
        out.queue(Print("\n"))?;
    }
    Ok(())
}

/// Write one frame to stdout.
pub fn print_frame(fb: &FrameBuffer) -> Result<()> {
    let mut buf = Vec::with_capacity(fb.cells().len() * 16);
    encode_frame_into(fb, &mut buf)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&buf)?;
    stdout.flush()?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
