//! Actor Model: the render thread and the handle that owns it.
//!
//! - **Producers**: any number of threads holding a [`Recorder`](crate::dashboard::Recorder)
//! - **Render Thread**: wakes on a tick, composes, and commits only changed frames
//! - **Dashboard**: owns both ends and the shutdown rendezvous
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  record_event   ┌────────────────┐
//! │  Producers   │ ──────────────▶ │ DashboardState │
//! └──────────────┘  (write lock)   └────────────────┘
//!                                          │ read lock
//!                                          ▼
//! ┌──────────────┐      tick       ┌────────────────┐   bytes   ┌──────────┐
//! │   Ticker     │ ──────────────▶ │ Render Thread  │ ────────▶ │ Terminal │
//! └──────────────┘                 └────────────────┘           └──────────┘
//! ```

mod engine;
mod scheduler;

pub use engine::{Dashboard, DashboardConfig};
pub use scheduler::{RenderScheduler, RenderStats, SchedulerState};
