//! Frame composition: turn the shared state into the text of one frame.

use super::line::RenderLine;
use super::select::select_lines;
use super::state::DashboardState;
use super::workers::fit_width;
use crate::terminal::TerminalSize;
use bitflags::bitflags;
use std::time::SystemTime;

/// Blank row staged above every frame body.
pub(crate) const SEPARATOR_ROWS: u16 = 1;

bitflags! {
    /// What the dashboard shows besides package lines.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DisplayOptions: u8 {
        /// Skip packages the producer marked as empty.
        const HIDE_EMPTY = 0b0000_0001;
        /// One-line worker summary under the footer.
        const WORKER_SUMMARY = 0b0000_0010;
        /// One line per worker above the worker summary.
        const WORKER_LINES = 0b0000_0100;
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::WORKER_SUMMARY
    }
}

/// Geometry and options for composing a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameLayout {
    /// Terminal size.
    pub size: TerminalSize,
    /// Rows kept free below the dashboard on top of the footer.
    pub reserved_rows: u16,
    /// Display options.
    pub options: DisplayOptions,
}

/// Compose the frame body: selected package lines, then the summary
/// footer, then worker status. Rows are joined with `\n`.
///
/// The row budget leaves room for the blank separator row the renderer
/// puts above the body, so a full frame never scrolls the terminal.
///
/// `now` is used for worker elapsed times.
pub fn compose_frame(state: &DashboardState, layout: &FrameLayout, now: SystemTime) -> String {
    let width = layout.size.width;
    let options = layout.options;

    let summary = state.summary().trim_end_matches('\n');
    let footer: Vec<&str> = if summary.is_empty() {
        Vec::new()
    } else {
        summary.split('\n').collect()
    };

    let workers = state.workers();
    let mut status = Vec::new();
    if !workers.is_empty() {
        if options.contains(DisplayOptions::WORKER_LINES) {
            status.extend(workers.worker_lines(now, width));
        }
        if options.contains(DisplayOptions::WORKER_SUMMARY) {
            status.push(fit_width(&workers.summary_line(), usize::from(width)));
        }
    }

    let budget = i64::from(layout.size.height)
        - i64::from(layout.reserved_rows)
        - i64::from(SEPARATOR_ROWS)
        - i64::try_from(footer.len() + status.len()).unwrap_or(i64::MAX);

    let hide_empty = options.contains(DisplayOptions::HIDE_EMPTY);
    let visible: Vec<&RenderLine> = state
        .lines()
        .iter()
        .filter(|line| !(hide_empty && line.is_empty()))
        .collect();

    let mut rows = select_lines(&visible, budget);
    rows.extend(footer);
    rows.extend(status.iter().map(String::as_str));
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::event::{
        ActionDescriptor, ActionKind, EventKind, Outcome, Phase, TestEvent, TraceEvent,
    };
    use crate::dashboard::table::LineOrder;
    use crate::terminal::FrameWriter;
    use crate::testing::{emulate, visible_rows};
    use std::time::{Duration, UNIX_EPOCH};

    fn layout(height: u16, reserved_rows: u16, options: DisplayOptions) -> FrameLayout {
        FrameLayout {
            size: TerminalSize::new(40, height).unwrap(),
            reserved_rows,
            options,
        }
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn finished(pkg: &str, t: u64) -> TestEvent {
        TestEvent::new(pkg, at(t), EventKind::Lifecycle).with_outcome(Outcome::Pass)
    }

    #[test]
    fn test_empty_state_composes_nothing() {
        let state = DashboardState::default();
        assert_eq!(compose_frame(&state, &layout(24, 0, DisplayOptions::default()), at(0)), "");
    }

    #[test]
    fn test_lines_then_footer() {
        let mut state = DashboardState::default();
        state.record_event(&TestEvent::new("a", at(1), EventKind::Test).with_glyph("·"), 40);
        state.record_event(&finished("b", 2), 40);
        state.set_summary("DONE 2 tests\n");

        let frame = compose_frame(&state, &layout(24, 0, DisplayOptions::empty()), at(3));
        assert_eq!(frame, "a ·\nb \nDONE 2 tests");
    }

    #[test]
    fn test_budget_subtracts_footer_and_reserve() {
        let mut state = DashboardState::default();
        for (t, pkg) in ["p1", "p2", "p3", "p4", "p5"].into_iter().enumerate() {
            state.record_event(&finished(pkg, t as u64), 40);
        }
        state.set_summary("s1\ns2");

        // 7 rows - 2 reserved - 1 separator - 2 footer = 2 package rows.
        let frame = compose_frame(&state, &layout(7, 2, DisplayOptions::empty()), at(9));
        assert_eq!(frame, "p4 \np5 \ns1\ns2");
    }

    #[test]
    fn test_hide_empty() {
        let mut state = DashboardState::new(LineOrder::InsertionOrder, None);
        state.record_event(
            &TestEvent::new("quiet", at(1), EventKind::Lifecycle).with_empty(true),
            40,
        );
        state.record_event(&TestEvent::new("busy", at(2), EventKind::Test), 40);

        let shown = compose_frame(&state, &layout(24, 0, DisplayOptions::empty()), at(3));
        assert_eq!(shown, "quiet \nbusy ");
        let hidden = compose_frame(&state, &layout(24, 0, DisplayOptions::HIDE_EMPTY), at(3));
        assert_eq!(hidden, "busy ");
    }

    #[test]
    fn test_worker_status_rows() {
        let mut state = DashboardState::default();
        state.record_trace(&TraceEvent {
            worker: 1,
            time_us: 1_000_000,
            phase: Phase::Begin,
            action: Some(ActionDescriptor::new(ActionKind::Vet, "pkg")),
        });

        let options = DisplayOptions::WORKER_LINES | DisplayOptions::WORKER_SUMMARY;
        let frame = compose_frame(&state, &layout(24, 0, options), at(3));
        assert_eq!(
            frame,
            "worker 1: vet pkg (2.0s)\nworkers: 1/1 busy | build 0 | link 0 | v"
        );

        let frame = compose_frame(&state, &layout(24, 0, DisplayOptions::empty()), at(3));
        assert_eq!(frame, "");
    }

    #[test]
    fn test_full_frame_fits_screen() {
        let mut state = DashboardState::default();
        for (t, pkg) in ["p1", "p2", "p3", "p4", "p5"].into_iter().enumerate() {
            state.record_event(&finished(pkg, t as u64), 20);
        }
        let layout = FrameLayout {
            size: TerminalSize::new(20, 4).unwrap(),
            reserved_rows: 0,
            options: DisplayOptions::empty(),
        };

        let mut writer = FrameWriter::new(Vec::new());
        for t in 10..20 {
            let glyph = TestEvent::new("p5", at(t), EventKind::Test)
                .with_glyph("·")
                .with_outcome(Outcome::Pass);
            state.record_event(&glyph, 20);
            writer.stage(b"\n");
            writer.stage(compose_frame(&state, &layout, at(t)).as_bytes());
            writer.commit().unwrap();
            assert!(writer.previous_rows() < 4);
        }

        let parser = emulate(writer.get_ref(), 4, 20);
        assert_eq!(visible_rows(&parser, 20), ["", "p3", "p4", "p5 ··········"]);
    }
}
