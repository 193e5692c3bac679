//! Frame writer: repaint a block of lines in place.
//!
//! The writer remembers how many rows the previous frame occupied. Each
//! commit moves the cursor back up over that block and overwrites it line
//! by line, clearing the tail of every row so a shorter line never leaves
//! residue from a longer one. The screen is never cleared wholesale, so
//! whatever was printed above the dashboard stays in scrollback.
//!
//! ```text
//! hide ─ up N ─ \r ─ line₀ EL \n line₁ EL \n … lineₖ EL ─ [ED] ─ show
//! ```

use super::output::{OutputBuffer, SHOW_CURSOR};
use std::io::{self, Write};

/// Result of a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Rows the cursor was moved up (the previous frame's row count).
    pub rows_up: usize,
    /// Lines written for the new frame.
    pub lines: usize,
    /// Bytes handed to the transport.
    pub bytes: usize,
}

impl CommitStats {
    /// Whether the commit wrote nothing at all.
    pub const fn is_noop(&self) -> bool {
        self.bytes == 0
    }
}

/// Buffers a frame until [`commit`](Self::commit), then overwrites the
/// previously committed frame with it.
#[derive(Debug)]
pub struct FrameWriter<W: Write> {
    /// Terminal transport.
    out: W,
    /// Bytes staged for the next commit.
    staged: Vec<u8>,
    /// Bytes of the last committed frame.
    previous: Vec<u8>,
    /// Rows the cursor sits below the top of the last committed frame.
    previous_rows: usize,
    /// Scratch space for the escape sequence stream.
    output: OutputBuffer,
}

impl<W: Write> FrameWriter<W> {
    /// Create a writer on top of `out`. Nothing is written until a commit.
    pub fn new(out: W) -> Self {
        Self {
            out,
            staged: Vec::new(),
            previous: Vec::new(),
            previous_rows: 0,
            output: OutputBuffer::new(),
        }
    }

    /// Append bytes to the next frame.
    pub fn stage(&mut self, bytes: &[u8]) {
        self.staged.extend_from_slice(bytes);
    }

    /// Bytes staged so far.
    pub fn staged(&self) -> &[u8] {
        &self.staged
    }

    /// Row count of the last committed frame.
    pub const fn previous_rows(&self) -> usize {
        self.previous_rows
    }

    /// Bytes of the last committed frame.
    pub fn previous_frame(&self) -> &[u8] {
        &self.previous
    }

    /// Borrow the transport.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the transport.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Replace the previous frame on screen with the staged bytes.
    ///
    /// Nothing is written when the stage is empty or identical to the frame
    /// already on screen. Otherwise the full escape sequence is assembled
    /// first and handed to the transport in one write, then flushed.
    ///
    /// If the transport fails, a show-cursor sequence is still attempted so
    /// the user's cursor is not left hidden.
    pub fn commit(&mut self) -> io::Result<CommitStats> {
        if self.staged.is_empty() {
            return Ok(CommitStats::default());
        }
        if self.staged == self.previous {
            self.staged.clear();
            return Ok(CommitStats::default());
        }

        let rows_up = self.previous_rows;
        let rows = self.staged.iter().filter(|&&b| b == b'\n').count();

        self.output.clear();
        self.output.cursor_hide();
        self.output.cursor_up(rows_up);
        self.output.carriage_return();
        let mut lines = 0;
        for line in self.staged.split(|&b| b == b'\n') {
            if lines > 0 {
                self.output.newline();
            }
            self.output.write_raw(line);
            self.output.clear_line_rest();
            lines += 1;
        }
        if rows < rows_up {
            // The old frame was taller; wipe its leftover rows.
            self.output.clear_below();
        }
        self.output.cursor_show();

        self.previous_rows = rows;
        std::mem::swap(&mut self.previous, &mut self.staged);
        self.staged.clear();

        let mut guard = CursorGuard::new(&mut self.out);
        self.output.flush_to(&mut *guard.out)?;
        guard.disarm();

        Ok(CommitStats {
            rows_up,
            lines,
            bytes: self.output.len(),
        })
    }
}

/// Writes a show-cursor sequence on drop unless disarmed.
struct CursorGuard<'a, W: Write> {
    out: &'a mut W,
    armed: bool,
}

impl<'a, W: Write> CursorGuard<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<W: Write> Drop for CursorGuard<'_, W> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.out.write_all(SHOW_CURSOR);
            let _ = self.out.flush();
        }
    }
}
