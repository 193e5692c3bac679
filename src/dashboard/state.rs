//! Shared dashboard state and the producer-side handle to it.

use super::event::{TestEvent, TraceEvent};
use super::table::{LineOrder, LineTable};
use super::workers::{ActionCounts, WorkerTable};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything the render pass reads: package lines, workers, and the
/// externally rendered summary footer.
#[derive(Debug, Default)]
pub struct DashboardState {
    lines: LineTable,
    workers: WorkerTable,
    summary: String,
}

impl DashboardState {
    /// Create empty state.
    pub fn new(order: LineOrder, module_prefix: Option<&str>) -> Self {
        let lines = match module_prefix {
            Some(prefix) => LineTable::new(order).with_module_prefix(prefix),
            None => LineTable::new(order),
        };
        Self {
            lines,
            ..Self::default()
        }
    }

    /// Apply a test event for a terminal `width` columns wide.
    pub fn record_event(&mut self, event: &TestEvent, width: u16) {
        self.lines.record(event, width);
    }

    /// Apply a trace event. Returns `false` if it was stale.
    pub fn record_trace(&mut self, event: &TraceEvent) -> bool {
        self.workers.record(event)
    }

    /// Replace the summary footer.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
    }

    /// Set the expected action tallies.
    pub fn set_expected_actions(&mut self, expected: ActionCounts) {
        self.workers.set_expected(expected);
    }

    /// Package lines.
    pub const fn lines(&self) -> &LineTable {
        &self.lines
    }

    /// Trace workers.
    pub const fn workers(&self) -> &WorkerTable {
        &self.workers
    }

    /// Summary footer as last supplied.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Cloneable producer handle. Every call takes the write lock for a few
/// string appends and never touches the terminal.
#[derive(Debug, Clone)]
pub struct Recorder {
    state: Arc<RwLock<DashboardState>>,
    width: u16,
}

impl Recorder {
    pub(crate) fn new(state: Arc<RwLock<DashboardState>>, width: u16) -> Self {
        Self { state, width }
    }

    // State is consistent after every call, so a poisoned lock is still usable.
    fn write(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a test event.
    pub fn record_event(&self, event: &TestEvent) {
        self.write().record_event(event, self.width);
    }

    /// Record a trace event. Returns `false` if it was stale.
    pub fn record_trace(&self, event: &TraceEvent) -> bool {
        self.write().record_trace(event)
    }

    /// Replace the summary footer.
    pub fn set_summary(&self, summary: impl Into<String>) {
        self.write().set_summary(summary);
    }

    /// Set the expected action tallies.
    pub fn set_expected_actions(&self, expected: ActionCounts) {
        self.write().set_expected_actions(expected);
    }

    /// Inspect the current state under the read lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::event::EventKind;
    use std::thread;
    use std::time::SystemTime;

    #[test]
    fn test_concurrent_producers() {
        let state = Arc::new(RwLock::new(DashboardState::new(LineOrder::InsertionOrder, None)));
        let recorder = Recorder::new(state, 200);

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let recorder = recorder.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        let pkg = format!("pkg/{}", i % 5);
                        let event = TestEvent::new(pkg, SystemTime::now(), EventKind::Test)
                            .with_glyph("·");
                        recorder.record_event(&event);
                    }
                    worker
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        recorder.inspect(|state| {
            assert_eq!(state.lines().len(), 5);
            let glyphs: usize = state.lines().iter().map(|line| line.glyph_count()).sum();
            assert_eq!(glyphs, 200);
        });
    }

    #[test]
    fn test_set_summary_accepts_str_and_string() {
        let mut state = DashboardState::default();
        state.set_summary("DONE 3 tests\n");
        assert_eq!(state.summary(), "DONE 3 tests\n");

        state.set_summary(format!("DONE {} tests", 4));
        assert_eq!(state.summary(), "DONE 4 tests");
    }

    #[test]
    fn test_module_prefix_applies() {
        let mut state = DashboardState::new(LineOrder::InsertionOrder, Some("m"));
        state.record_event(&TestEvent::new("m/x", SystemTime::now(), EventKind::Test), 80);
        assert_eq!(state.lines().iter().next().unwrap().name(), "x");
    }
}
