//! Terminal rendering for finished runs.
//!
//! Two outputs, both pure apart from [`print_frame`]:
//!
//! - [`ascii`]: plain text, the `.#o+~` glyph set, optionally with column and row labels
//! - [`grid_view`]: colored rendering into a [`FrameBuffer`] flushed with crossterm
//!
//! Goals:
//! - Keep `core` deterministic and free of I/O
//! - Make every rendering testable as text

pub mod ascii;
pub mod fb;
pub mod grid_view;
pub mod renderer;

pub use regolith_core as core;
pub use regolith_types as types;

pub use ascii::{glyph, render_labelled, render_plain, TRAIL};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use grid_view::GridView;
pub use renderer::{encode_frame_into, print_frame};
