//! Worker/trace aggregator.
//!
//! Build traces report, per worker thread, when an action begins and ends.
//! Trace delivery order is not guaranteed, so every worker remembers the
//! newest timestamp it has accepted and silently drops anything older.

use super::event::{trace_time, ActionDescriptor, ActionKind, Phase, TraceEvent};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Per-kind action tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounts {
    /// `vet` actions.
    pub vet: usize,
    /// `build` actions.
    pub build: usize,
    /// `link` actions.
    pub link: usize,
    /// `test run` actions.
    pub test_run: usize,
}

impl ActionCounts {
    /// Count one action of `kind`. Unknown kinds are not tallied.
    pub fn bump(&mut self, kind: &ActionKind) {
        match kind {
            ActionKind::Vet => self.vet += 1,
            ActionKind::Build => self.build += 1,
            ActionKind::Link => self.link += 1,
            ActionKind::TestRun => self.test_run += 1,
            ActionKind::Other(_) => {}
        }
    }

    /// Sum over all kinds.
    pub const fn total(&self) -> usize {
        self.vet + self.build + self.link + self.test_run
    }

    fn entries(&self) -> [(&'static str, usize); 4] {
        [
            ("build", self.build),
            ("link", self.link),
            ("vet", self.vet),
            ("test run", self.test_run),
        ]
    }
}

/// Tally an action plan, e.g. the nodes of an action graph.
impl<'a> FromIterator<&'a ActionKind> for ActionCounts {
    fn from_iter<I: IntoIterator<Item = &'a ActionKind>>(iter: I) -> Self {
        let mut counts = Self::default();
        for kind in iter {
            counts.bump(kind);
        }
        counts
    }
}

/// What one worker is doing.
#[derive(Debug, Clone, Default)]
pub struct WorkerState {
    action: Option<ActionDescriptor>,
    started: Option<SystemTime>,
    /// Events seen, stale ones included.
    events: u64,
    /// Newest accepted timestamp (µs).
    last_seen_us: u64,
}

impl WorkerState {
    /// Current action, `None` when idle.
    pub const fn action(&self) -> Option<&ActionDescriptor> {
        self.action.as_ref()
    }

    /// When the current action began.
    pub const fn started(&self) -> Option<SystemTime> {
        self.started
    }

    /// Number of trace events received for this worker.
    pub const fn events(&self) -> u64 {
        self.events
    }

    /// Whether the worker has no action in flight.
    pub const fn is_idle(&self) -> bool {
        self.action.is_none()
    }
}

/// All workers seen in the trace, plus action tallies.
#[derive(Debug, Default)]
pub struct WorkerTable {
    workers: BTreeMap<u64, WorkerState>,
    done: ActionCounts,
    expected: Option<ActionCounts>,
}

impl WorkerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a trace event. Returns `false` when it was discarded as stale.
    pub fn record(&mut self, event: &TraceEvent) -> bool {
        let worker = self.workers.entry(event.worker).or_default();
        worker.events += 1;
        if event.time_us < worker.last_seen_us {
            trace!(
                worker = event.worker,
                time_us = event.time_us,
                last_seen_us = worker.last_seen_us,
                "discarding stale trace event"
            );
            return false;
        }
        worker.last_seen_us = event.time_us;

        match event.phase {
            Phase::Begin => {
                if let Some(action) = &event.action {
                    self.done.bump(&action.kind);
                    worker.action = Some(action.clone());
                    worker.started = Some(trace_time(event.time_us));
                }
            }
            Phase::End => {
                worker.action = None;
                worker.started = None;
            }
            Phase::Other => {}
        }
        true
    }

    /// Set the number of actions the build is expected to run.
    pub fn set_expected(&mut self, expected: ActionCounts) {
        self.expected = Some(expected);
    }

    /// Actions started so far.
    pub const fn done(&self) -> ActionCounts {
        self.done
    }

    /// Look up a worker.
    pub fn get(&self, worker: u64) -> Option<&WorkerState> {
        self.workers.get(&worker)
    }

    /// Number of workers seen.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether no trace event has been seen.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Workers with an action in flight.
    pub fn busy(&self) -> usize {
        self.workers.values().filter(|w| !w.is_idle()).count()
    }

    /// One-line status: `workers: 2/4 busy | build 3/10 | link 1 | ...`.
    pub fn summary_line(&self) -> String {
        let mut line = format!("workers: {}/{} busy", self.busy(), self.len());
        let expected = self.expected.map(|e| e.entries());
        for (i, (label, done)) in self.done.entries().into_iter().enumerate() {
            match expected {
                Some(expected) => line.push_str(&format!(" | {label} {done}/{}", expected[i].1)),
                None => line.push_str(&format!(" | {label} {done}")),
            }
        }
        line
    }

    /// One line per worker in id order, each cut to `width` columns.
    pub fn worker_lines(&self, now: SystemTime, width: u16) -> Vec<String> {
        self.workers
            .iter()
            .map(|(id, worker)| {
                let line = match (&worker.action, worker.started) {
                    (Some(action), Some(started)) => {
                        let elapsed = now.duration_since(started).unwrap_or(Duration::ZERO);
                        format!(
                            "worker {id}: {} {} ({:.1}s)",
                            action.kind,
                            action.package,
                            elapsed.as_secs_f64()
                        )
                    }
                    _ => format!("worker {id}: idle"),
                };
                fit_width(&line, usize::from(width))
            })
            .collect()
    }
}

/// Cut `text` to at most `width` columns on a grapheme boundary.
pub(crate) fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > width {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out
}
