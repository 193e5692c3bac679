//! Fixtures shared by the unit tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A cloneable in-memory transport, so a test can keep reading what a
/// render thread writes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Feed `bytes` through a terminal emulator. Newlines are expanded to
/// CRLF the way a tty in cooked mode does.
pub fn emulate(bytes: &[u8], rows: u16, cols: u16) -> vt100::Parser {
    let mut cooked = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if b == b'\n' {
            cooked.push(b'\r');
        }
        cooked.push(b);
    }
    let mut parser = vt100::Parser::new(rows, cols, 0);
    parser.process(&cooked);
    parser
}

/// Visible screen rows with trailing blanks trimmed.
pub fn visible_rows(parser: &vt100::Parser, cols: u16) -> Vec<String> {
    parser
        .screen()
        .rows(0, cols)
        .map(|row| row.trim_end().to_string())
        .collect()
}
