//! Terminal size detection.
//!
//! The dashboard only runs interactively. When stdout is not a terminal or
//! the size cannot be read, callers get a [`TerminalError`] and should fall
//! back to a plain, line-oriented formatter.

use crossterm::tty::IsTty;
use std::io;
use thiserror::Error;

/// Why the terminal cannot host the dashboard.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Stdout is redirected to a file or pipe.
    #[error("stdout is not a terminal")]
    NotATerminal,
    /// The size query failed.
    #[error("failed to detect terminal size: {0}")]
    SizeUnavailable(#[source] io::Error),
    /// The terminal reported a zero dimension.
    #[error("terminal reported an unusable size {width}x{height}")]
    ZeroSize {
        /// Reported columns.
        width: u16,
        /// Reported rows.
        height: u16,
    },
}

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl TerminalSize {
    /// Validate a width and height.
    pub fn new(width: u16, height: u16) -> Result<Self, TerminalError> {
        if width == 0 || height == 0 {
            return Err(TerminalError::ZeroSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Query the size of the terminal attached to stdout.
    pub fn detect() -> Result<Self, TerminalError> {
        if !io::stdout().is_tty() {
            return Err(TerminalError::NotATerminal);
        }
        let (width, height) =
            crossterm::terminal::size().map_err(TerminalError::SizeUnavailable)?;
        Self::new(width, height)
    }
}
