//! Dashboard module: aggregation and frame composition.
//!
//! This module contains:
//! - [`event`]: event records handed over by the decoding layer
//! - [`LineTable`]: one [`RenderLine`] per package, in display order
//! - [`WorkerTable`]: what each build worker is doing
//! - [`select_lines`]: which lines fit in the row budget
//! - [`compose_frame`]: the text of one frame
//! - [`format_prefix`]: the stock elapsed/outcome prefix

pub mod event;
mod frame;
mod line;
mod prefix;
mod select;
mod state;
mod table;
mod workers;

pub use event::{
    trace_time, ActionDescriptor, ActionKind, EventKind, Outcome, ParseActionError, Phase,
    TestEvent, TraceEvent,
};
pub use frame::{compose_frame, DisplayOptions, FrameLayout};
pub(crate) use frame::SEPARATOR_ROWS;
pub use line::RenderLine;
pub use prefix::format_prefix;
pub use select::select_lines;
pub use state::{DashboardState, Recorder};
pub use table::{LineOrder, LineTable};
pub use workers::{ActionCounts, WorkerState, WorkerTable};
