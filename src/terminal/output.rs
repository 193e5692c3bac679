//! `OutputBuffer`: Single-syscall output buffer for the frame vocabulary.

use std::io::Write;

/// Hide the cursor.
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";

/// Show the cursor.
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";

/// Clear from the cursor to the end of the current line.
pub const CLEAR_LINE_REST: &[u8] = b"\x1b[0K";

/// Clear from the cursor to the end of the screen.
pub const CLEAR_BELOW: &[u8] = b"\x1b[0J";

/// Pre-allocated buffer for building a frame's ANSI escape sequences.
///
/// A whole commit is accumulated here, then flushed in a single `write()`
/// so the terminal never sees a half-drawn frame.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical dashboard (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Move the cursor up `rows` rows. Zero emits nothing, since most
    /// terminals read `CSI 0 A` as a move of one row.
    #[inline]
    pub fn cursor_up(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        // CSI n A
        let _ = write!(self.data, "\x1b[{rows}A");
    }

    /// Return the cursor to column one.
    #[inline]
    pub fn carriage_return(&mut self) {
        self.data.push(b'\r');
    }

    /// Start a new line.
    #[inline]
    pub fn newline(&mut self) {
        self.data.push(b'\n');
    }

    /// Clear the rest of the current line.
    #[inline]
    pub fn clear_line_rest(&mut self) {
        self.data.extend_from_slice(CLEAR_LINE_REST);
    }

    /// Clear everything below the cursor.
    #[inline]
    pub fn clear_below(&mut self) {
        self.data.extend_from_slice(CLEAR_BELOW);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(HIDE_CURSOR);
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(SHOW_CURSOR);
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
