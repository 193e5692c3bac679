//! One dashboard row per tracked entity.

use super::event::Outcome;
use std::time::SystemTime;

/// Render state of a single entity.
///
/// Glyphs only ever accumulate. Once the composed line reaches the width
/// budget the line is frozen: later glyphs are dropped, while the
/// timestamp, outcome and prefix keep updating.
#[derive(Debug, Clone)]
pub struct RenderLine {
    /// Display name (package path, possibly shortened).
    name: String,
    /// Accumulated glyphs.
    glyphs: String,
    /// Number of glyphs in `glyphs`.
    glyph_count: usize,
    /// Width budget reached; no more glyphs.
    frozen: bool,
    last_update: SystemTime,
    outcome: Outcome,
    empty: bool,
    /// prefix + name + " " + glyphs, recomposed on every update.
    display: String,
}

impl RenderLine {
    pub(crate) fn new(name: String, time: SystemTime) -> Self {
        Self {
            name,
            glyphs: String::new(),
            glyph_count: 0,
            frozen: false,
            last_update: time,
            outcome: Outcome::Running,
            empty: false,
            display: String::new(),
        }
    }

    pub(crate) fn touch(&mut self, time: SystemTime, outcome: Outcome, empty: bool) {
        self.last_update = time;
        self.outcome = outcome;
        self.empty = empty;
    }

    pub(crate) fn push_glyph(&mut self, glyph: &str) {
        if glyph.is_empty() || self.frozen {
            return;
        }
        self.glyphs.push_str(glyph);
        self.glyph_count += 1;
    }

    /// Freeze once `prefix_width + glyphs` would reach the last column.
    /// Writing into the last column makes some terminals wrap early.
    pub(crate) fn check_width(&mut self, prefix_width: usize, terminal_width: u16) {
        if prefix_width + self.glyph_count >= usize::from(terminal_width).saturating_sub(1) {
            self.frozen = true;
        }
    }

    pub(crate) fn compose(&mut self, prefix: &str) {
        self.display.clear();
        self.display.push_str(prefix);
        self.display.push_str(&self.name);
        self.display.push(' ');
        self.display.push_str(&self.glyphs);
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accumulated glyphs.
    pub fn glyphs(&self) -> &str {
        &self.glyphs
    }

    /// Number of glyphs accepted so far.
    pub const fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    /// Whether the line has hit its width budget.
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Time of the most recent event.
    pub const fn last_update(&self) -> SystemTime {
        self.last_update
    }

    /// Current outcome.
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the entity has finished.
    pub const fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Whether the producer reported no work for the entity.
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    /// The fully composed row.
    pub fn display(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
impl RenderLine {
    /// A line whose display is just `text`.
    pub(crate) fn stub(text: &str, outcome: Outcome) -> Self {
        let mut line = Self::new(text.to_string(), SystemTime::UNIX_EPOCH);
        line.outcome = outcome;
        line.display = text.to_string();
        line
    }
}
