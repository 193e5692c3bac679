//! Terminal module: everything that touches the terminal device.
//!
//! - [`OutputBuffer`]: the ANSI escape vocabulary, accumulated for one write
//! - [`FrameWriter`]: repaints the dashboard block in place
//! - [`TerminalSize`]: width and height detection for interactive output

mod output;
mod size;
mod writer;

pub use output::{OutputBuffer, CLEAR_BELOW, CLEAR_LINE_REST, HIDE_CURSOR, SHOW_CURSOR};
pub use size::{TerminalError, TerminalSize};
pub use writer::{CommitStats, FrameWriter};
