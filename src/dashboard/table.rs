//! Line-state table: the ingestion side of the dashboard.

use super::event::{EventKind, TestEvent};
use super::line::RenderLine;
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// How entities are ordered on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineOrder {
    /// First-seen order, never changed.
    #[default]
    InsertionOrder,
    /// Stable re-sort by last update after every non-output event. Finished
    /// entities settle at the top; active ones sink to the bottom.
    MostRecentLast,
}

/// Entity lines keyed by identity, plus their display order.
#[derive(Debug, Default)]
pub struct LineTable {
    lines: Vec<RenderLine>,
    index: HashMap<String, usize>,
    /// Slots into `lines`, in display order.
    order: Vec<usize>,
    policy: LineOrder,
    /// Stripped from package paths for display.
    module_prefix: Option<String>,
}

impl LineTable {
    /// Create an empty table.
    pub fn new(policy: LineOrder) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Show package paths relative to `prefix`.
    #[must_use]
    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = Some(prefix.into());
        self
    }

    /// Apply one event. `width` is the terminal width in columns.
    pub fn record(&mut self, event: &TestEvent, width: u16) {
        let slot = match self.index.get(&event.package) {
            Some(&slot) => slot,
            None => {
                let slot = self.lines.len();
                let name = relative_name(self.module_prefix.as_deref(), &event.package);
                self.lines.push(RenderLine::new(name, event.time));
                self.index.insert(event.package.clone(), slot);
                self.order.push(slot);
                slot
            }
        };

        let line = &mut self.lines[slot];
        if event.kind != EventKind::Lifecycle {
            if let Some(glyph) = &event.glyph {
                line.push_glyph(glyph);
            }
        }
        let prefix_width = event.prefix.width() + line.name().width() + 1;
        line.check_width(prefix_width, width);
        line.compose(&event.prefix);
        line.touch(event.time, event.outcome, event.empty);

        if self.policy == LineOrder::MostRecentLast && event.kind != EventKind::Output {
            let lines = &self.lines;
            self.order.sort_by_key(|&slot| lines[slot].last_update());
        }
    }

    /// Number of entities seen.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no entity has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up an entity's line.
    pub fn get(&self, package: &str) -> Option<&RenderLine> {
        self.index.get(package).map(|&slot| &self.lines[slot])
    }

    /// Lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderLine> + '_ {
        self.order.iter().map(|&slot| &self.lines[slot])
    }
}

fn relative_name(prefix: Option<&str>, package: &str) -> String {
    let Some(prefix) = prefix else {
        return package.to_string();
    };
    if package == prefix {
        return ".".to_string();
    }
    package
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(package)
        .to_string()
}
