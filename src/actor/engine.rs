//! Dashboard: the entry point for applications using dotboard.
//!
//! A [`Dashboard`] owns the shared state and the render thread. Producers
//! record events through it (or through cloned [`Recorder`]s) from any
//! thread; the render thread repaints on its own schedule.

use super::scheduler::{RenderScheduler, RenderStats};
use crate::dashboard::{
    ActionCounts, DashboardState, DisplayOptions, FrameLayout, LineOrder, Recorder, TestEvent,
    TraceEvent,
};
use crate::terminal::{FrameWriter, TerminalError, TerminalSize};
use std::io::{self, Stdout, Write};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Configuration for the Dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Time between render passes.
    pub tick_interval: Duration,
    /// Rows kept free below the dashboard, on top of the footer.
    pub reserved_rows: u16,
    /// Order of package lines.
    pub order: LineOrder,
    /// What to show besides package lines.
    pub options: DisplayOptions,
    /// Module path stripped from package names.
    pub module_prefix: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            reserved_rows: 10,
            order: LineOrder::default(),
            options: DisplayOptions::default(),
            module_prefix: None,
        }
    }
}

/// A running dashboard.
///
/// Dropping it stops the render thread and waits for the final frame.
pub struct Dashboard<W: Write + Send + 'static> {
    recorder: Recorder,
    scheduler: RenderScheduler<W>,
    size: TerminalSize,
}

impl Dashboard<Stdout> {
    /// Start a dashboard on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is not a terminal or its size is unknown.
    /// Callers should fall back to plain line output in that case.
    pub fn stdout(config: DashboardConfig) -> Result<Self, TerminalError> {
        let size = TerminalSize::detect()?;
        Ok(Self::start(config, size, io::stdout()))
    }
}

impl<W: Write + Send + 'static> Dashboard<W> {
    /// Start a dashboard writing to `out`, laid out for `size`.
    pub fn start(config: DashboardConfig, size: TerminalSize, out: W) -> Self {
        let state = Arc::new(RwLock::new(DashboardState::new(
            config.order,
            config.module_prefix.as_deref(),
        )));
        let layout = FrameLayout {
            size,
            reserved_rows: config.reserved_rows,
            options: config.options,
        };

        let mut scheduler = RenderScheduler::new(
            Arc::clone(&state),
            layout,
            config.tick_interval,
            FrameWriter::new(out),
        );
        scheduler.start();
        debug!(
            width = size.width,
            height = size.height,
            tick_ms = config.tick_interval.as_millis(),
            "dashboard started"
        );

        Self {
            recorder: Recorder::new(state, size.width),
            scheduler,
            size,
        }
    }

    /// A producer handle that can be moved to other threads.
    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    /// Record a test event.
    pub fn record_event(&self, event: &TestEvent) {
        self.recorder.record_event(event);
    }

    /// Record a trace event. Returns `false` if it was stale.
    pub fn record_trace(&self, event: &TraceEvent) -> bool {
        self.recorder.record_trace(event)
    }

    /// Replace the summary footer.
    pub fn set_summary(&self, summary: impl Into<String>) {
        self.recorder.set_summary(summary);
    }

    /// Set the expected action tallies.
    pub fn set_expected_actions(&self, expected: ActionCounts) {
        self.recorder.set_expected_actions(expected);
    }

    /// Terminal size the dashboard was laid out for.
    pub const fn size(&self) -> TerminalSize {
        self.size
    }

    /// Request the final render. Never blocks.
    pub fn stop(&self) {
        self.scheduler.stop();
    }

    /// Block until the final render has been committed.
    pub fn await_flushed(&self) {
        self.scheduler.await_flushed();
    }

    /// Stop, wait for the final frame, and return render statistics.
    pub fn finish(mut self) -> RenderStats {
        self.scheduler
            .join()
            .map(|(_, stats)| stats)
            .unwrap_or_default()
    }
}

impl<W: Write + Send + 'static> Drop for Dashboard<W> {
    fn drop(&mut self) {
        let _ = self.scheduler.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{ActionDescriptor, ActionKind, EventKind, Outcome, Phase};
    use crate::testing::{emulate, visible_rows, SharedBuffer};
    use std::thread;
    use std::time::SystemTime;

    fn quiet_config() -> DashboardConfig {
        DashboardConfig {
            tick_interval: Duration::from_secs(3600),
            reserved_rows: 0,
            options: DisplayOptions::empty(),
            ..DashboardConfig::default()
        }
    }

    fn size() -> TerminalSize {
        TerminalSize::new(40, 12).unwrap()
    }

    fn event(pkg: &str, kind: EventKind) -> TestEvent {
        TestEvent::new(pkg, SystemTime::now(), kind)
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.reserved_rows, 10);
        assert_eq!(config.order, LineOrder::InsertionOrder);
        assert_eq!(config.options, DisplayOptions::WORKER_SUMMARY);
        assert!(config.module_prefix.is_none());
    }

    #[test]
    fn test_finish_renders_final_state() {
        let buffer = SharedBuffer::default();
        let dashboard = Dashboard::start(quiet_config(), size(), buffer.clone());
        assert_eq!(dashboard.size(), size());

        dashboard.record_event(&event("a", EventKind::Test).with_glyph("·"));
        dashboard.record_event(&event("b", EventKind::Lifecycle).with_outcome(Outcome::Pass));
        dashboard.set_summary("DONE 1 test\n");

        let stats = dashboard.finish();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.write_errors, 0);
        assert_eq!(stats.bytes_written, buffer.contents().len() as u64);

        let parser = emulate(&buffer.contents(), 12, 40);
        assert_eq!(visible_rows(&parser, 40)[..4], ["", "a ·", "b", "DONE 1 test"]);
        assert!(!parser.screen().hide_cursor());
    }

    #[test]
    fn test_stop_then_await_flushed() {
        let buffer = SharedBuffer::default();
        let dashboard = Dashboard::start(quiet_config(), size(), buffer.clone());
        dashboard.record_event(&event("pkg", EventKind::Test));

        dashboard.stop();
        dashboard.await_flushed();
        assert!(buffer.text().contains("pkg "));

        // Later events are not rendered once stopped.
        dashboard.record_event(&event("late", EventKind::Test));
        drop(dashboard);
        assert!(!buffer.text().contains("late"));
    }

    #[test]
    fn test_drop_waits_for_final_frame() {
        let buffer = SharedBuffer::default();
        {
            let dashboard = Dashboard::start(quiet_config(), size(), buffer.clone());
            dashboard.record_event(&event("dropped", EventKind::Test));
        }
        assert!(buffer.text().contains("dropped"));
    }

    #[test]
    fn test_recorders_from_many_threads() {
        let buffer = SharedBuffer::default();
        let config = DashboardConfig {
            tick_interval: Duration::from_millis(2),
            module_prefix: Some("example.com/mod".to_string()),
            ..quiet_config()
        };
        let dashboard = Dashboard::start(config, size(), buffer.clone());

        let handles: Vec<_> = ["alpha", "beta", "gamma"]
            .into_iter()
            .map(|name| {
                let recorder = dashboard.recorder();
                thread::spawn(move || {
                    let pkg = format!("example.com/mod/{name}");
                    for _ in 0..5 {
                        let event = TestEvent::new(&pkg, SystemTime::now(), EventKind::Test)
                            .with_glyph("·");
                        recorder.record_event(&event);
                        thread::sleep(Duration::from_millis(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = dashboard.finish();
        assert!(stats.frames >= 1);

        let parser = emulate(&buffer.contents(), 12, 40);
        let rows = visible_rows(&parser, 40);
        for name in ["alpha", "beta", "gamma"] {
            assert!(rows.contains(&format!("{name} ·····")), "{rows:?}");
        }
    }

    #[test]
    fn test_worker_summary_row() {
        let buffer = SharedBuffer::default();
        let config = DashboardConfig {
            options: DisplayOptions::WORKER_SUMMARY,
            ..quiet_config()
        };
        let size = TerminalSize::new(80, 12).unwrap();
        let dashboard = Dashboard::start(config, size, buffer.clone());

        dashboard.set_expected_actions([ActionKind::Build, ActionKind::Link].iter().collect());
        assert!(dashboard.record_trace(&TraceEvent {
            worker: 0,
            time_us: 5,
            phase: Phase::Begin,
            action: Some(ActionDescriptor::new(ActionKind::Build, "fmt")),
        }));
        dashboard.finish();

        assert!(buffer
            .text()
            .contains("workers: 1/1 busy | build 1/1 | link 0/1 | vet 0/0 | test run 0/0"));
    }
}
