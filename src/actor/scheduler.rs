//! Render scheduler: dedicated thread that repaints the dashboard.
//!
//! The thread wakes on a fixed tick, composes a frame under the read lock,
//! and hands it to the [`FrameWriter`] only if it differs from the last one.
//! Producers never wait on the terminal; the only thing they share with
//! this thread is the state lock.
//!
//! Shutdown is a rendezvous: [`stop`](RenderScheduler::stop) wakes the
//! loop, which renders once more so the final state is on screen, then
//! releases everyone blocked in [`await_flushed`](RenderScheduler::await_flushed).

use crate::dashboard::{compose_frame, DashboardState, FrameLayout, SEPARATOR_ROWS};
use crate::terminal::FrameWriter;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// Lifecycle of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created, thread not started.
    Idle,
    /// Render thread is ticking.
    Running,
    /// Final render done (or never started).
    Stopped,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Frames committed to the terminal.
    pub frames: u64,
    /// Passes skipped because nothing changed.
    pub skipped: u64,
    /// Commits that failed.
    pub write_errors: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
}

type Finished<W> = (FrameWriter<W>, RenderStats);

/// Owns the render thread.
pub struct RenderScheduler<W: Write + Send + 'static> {
    shared: Arc<RwLock<DashboardState>>,
    layout: FrameLayout,
    interval: Duration,
    /// Held until the thread starts.
    writer: Option<FrameWriter<W>>,
    handle: Option<JoinHandle<Finished<W>>>,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
    /// Dropped by the thread after its final render.
    flushed_tx: Option<Sender<()>>,
    flushed_rx: Receiver<()>,
    state: Arc<AtomicU8>,
}

impl<W: Write + Send + 'static> RenderScheduler<W> {
    /// Create an idle scheduler.
    pub fn new(
        shared: Arc<RwLock<DashboardState>>,
        layout: FrameLayout,
        interval: Duration,
        writer: FrameWriter<W>,
    ) -> Self {
        let (stop_tx, stop_rx) = bounded(1);
        let (flushed_tx, flushed_rx) = bounded(0);
        Self {
            shared,
            layout,
            interval,
            writer: Some(writer),
            handle: None,
            stop_tx,
            stop_rx,
            flushed_tx: Some(flushed_tx),
            flushed_rx,
            state: Arc::new(AtomicU8::new(IDLE)),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        match self.state.load(Ordering::Acquire) {
            IDLE => SchedulerState::Idle,
            RUNNING => SchedulerState::Running,
            _ => SchedulerState::Stopped,
        }
    }

    /// Spawn the render thread. Does nothing unless idle.
    ///
    /// If the OS refuses the thread, the dashboard simply stays blank.
    pub fn start(&mut self) {
        if self.state() != SchedulerState::Idle {
            return;
        }
        let (Some(writer), Some(flushed_tx)) = (self.writer.take(), self.flushed_tx.take())
        else {
            return;
        };

        let shared = Arc::clone(&self.shared);
        let layout = self.layout;
        let interval = self.interval;
        let stop_rx = self.stop_rx.clone();
        let state = Arc::clone(&self.state);

        self.state.store(RUNNING, Ordering::Release);
        let spawned = thread::Builder::new()
            .name("dotboard-render".to_string())
            .spawn(move || {
                Self::run_loop(&shared, &layout, interval, writer, &stop_rx, flushed_tx, &state)
            });
        match spawned {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => {
                warn!(error = %err, "failed to spawn render thread");
                self.state.store(STOPPED, Ordering::Release);
            }
        }
    }

    /// Ask the render thread to do its final render and exit. Never blocks.
    pub fn stop(&self) {
        if self.state.load(Ordering::Acquire) == IDLE {
            self.state.store(STOPPED, Ordering::Release);
            return;
        }
        let _ = self.stop_tx.try_send(());
    }

    /// Block until the final render has been committed.
    ///
    /// Returns immediately if the thread never started.
    pub fn await_flushed(&self) {
        if self.handle.is_none() {
            return;
        }
        // Nothing is ever sent; the thread drops its sender when done.
        let _ = self.flushed_rx.recv();
    }

    /// Stop, wait for the thread, and take back the writer and stats.
    ///
    /// Returns `None` if the thread panicked or was already joined.
    pub fn join(&mut self) -> Option<Finished<W>> {
        self.stop();
        if let Some(handle) = self.handle.take() {
            return handle.join().ok();
        }
        self.writer.take().map(|writer| (writer, RenderStats::default()))
    }

    /// Main render loop.
    fn run_loop(
        shared: &RwLock<DashboardState>,
        layout: &FrameLayout,
        interval: Duration,
        mut writer: FrameWriter<W>,
        stop_rx: &Receiver<()>,
        flushed_tx: Sender<()>,
        state: &AtomicU8,
    ) -> Finished<W> {
        let ticker = tick(interval);
        let mut pass = RenderPass::default();

        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => pass.render(shared, layout, &mut writer),
            }
        }

        // Whatever arrived since the last tick must reach the screen.
        pass.render(shared, layout, &mut writer);
        state.store(STOPPED, Ordering::Release);
        drop(flushed_tx);

        debug!(
            frames = pass.stats.frames,
            skipped = pass.stats.skipped,
            write_errors = pass.stats.write_errors,
            "render loop stopped"
        );
        (writer, pass.stats)
    }
}

impl<W: Write + Send + 'static> Drop for RenderScheduler<W> {
    fn drop(&mut self) {
        let _ = self.join();
    }
}

/// One render pass worth of memory: the last body and running stats.
#[derive(Default)]
struct RenderPass {
    last: String,
    stats: RenderStats,
}

impl RenderPass {
    fn render<W: Write>(
        &mut self,
        shared: &RwLock<DashboardState>,
        layout: &FrameLayout,
        writer: &mut FrameWriter<W>,
    ) {
        let body = {
            let state = shared.read().unwrap_or_else(PoisonError::into_inner);
            compose_frame(&state, layout, SystemTime::now())
        };
        if body == self.last {
            self.stats.skipped += 1;
            return;
        }

        // Leading blank rows separate the dashboard from earlier output.
        for _ in 0..SEPARATOR_ROWS {
            writer.stage(b"\n");
        }
        writer.stage(body.as_bytes());
        match writer.commit() {
            Ok(commit) => {
                self.stats.frames += 1;
                self.stats.bytes_written += commit.bytes as u64;
            }
            Err(err) => {
                self.stats.write_errors += 1;
                warn!(error = %err, "failed to write dashboard frame");
            }
        }
        self.last = body;
    }
}
