//! # dotboard
//!
//! A live, in-place terminal dashboard for test and build runs.
//!
//! dotboard keeps one line per package below whatever the process has
//! already printed, growing a row of glyphs as tests report in, and
//! repaints that region on a fixed tick without scrolling or flicker.
//!
//! ## Core Concepts
//!
//! - **In-place redraw**: each frame moves the cursor back over the last one
//!   and overwrites it, clearing leftovers
//! - **Shared state**: producers record events under a lock and never touch
//!   the terminal
//! - **Render thread**: one dedicated thread composes and commits frames,
//!   skipping those that did not change
//! - **Row budget**: when packages outnumber rows, running packages win over
//!   finished ones
//!
//! ## Example
//!
//! ```rust,ignore
//! use dotboard::{Dashboard, DashboardConfig, EventKind, TestEvent};
//! use std::time::SystemTime;
//!
//! let dashboard = Dashboard::stdout(DashboardConfig::default())?;
//! dashboard.record_event(
//!     &TestEvent::new("example.com/pkg", SystemTime::now(), EventKind::Test).with_glyph("·"),
//! );
//! let stats = dashboard.finish();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod dashboard;
pub mod terminal;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use actor::{Dashboard, DashboardConfig, RenderStats};
pub use dashboard::{
    format_prefix, ActionCounts, ActionDescriptor, ActionKind, DisplayOptions, EventKind,
    LineOrder, Outcome, Phase, Recorder, TestEvent, TraceEvent,
};
pub use terminal::{FrameWriter, TerminalError, TerminalSize};
