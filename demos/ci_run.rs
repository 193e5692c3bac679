//! CI run demo: a simulated `go test ./...` with four build workers.
//!
//! Each worker picks packages off a shared queue, reports build trace
//! events, then streams one glyph per test. When stdout is not a terminal
//! the demo prints one plain line per finished package instead.
//!
//! Set `RUST_LOG=dotboard=debug` to see render statistics on stderr.

use dotboard::{
    format_prefix, ActionDescriptor, ActionKind, Dashboard, DashboardConfig, DisplayOptions,
    EventKind, Outcome, Phase, Recorder, TestEvent, TraceEvent,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const MODULE: &str = "example.com/shop";

const PACKAGES: &[(&str, usize)] = &[
    ("example.com/shop", 3),
    ("example.com/shop/cart", 24),
    ("example.com/shop/catalog", 41),
    ("example.com/shop/checkout", 17),
    ("example.com/shop/internal/money", 60),
    ("example.com/shop/internal/auth", 12),
    ("example.com/shop/search", 35),
    ("example.com/shop/api", 28),
    ("example.com/shop/cmd/shopd", 0),
    ("example.com/shop/storage/postgres", 9),
];

const WORKERS: u64 = 4;

fn now_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}

fn trace(recorder: &Recorder, worker: u64, phase: Phase, kind: ActionKind, pkg: &str) {
    recorder.record_trace(&TraceEvent {
        worker,
        time_us: now_us(),
        phase,
        action: Some(ActionDescriptor::new(kind, pkg)),
    });
}

/// Run one package: build, link the test binary, run the tests.
fn run_package(recorder: &Recorder, worker: u64, pkg: &str, tests: usize) -> Outcome {
    let started = Instant::now();

    for kind in [ActionKind::Build, ActionKind::Link] {
        trace(recorder, worker, Phase::Begin, kind.clone(), pkg);
        thread::sleep(Duration::from_millis(60 + worker * 15));
        trace(recorder, worker, Phase::End, kind, pkg);
    }

    trace(recorder, worker, Phase::Begin, ActionKind::TestRun, pkg);
    let start = TestEvent::new(pkg, SystemTime::now(), EventKind::Lifecycle)
        .with_prefix(format_prefix(Duration::ZERO, false, Outcome::Running))
        .with_empty(tests == 0);
    recorder.record_event(&start);

    let mut outcome = if tests == 0 { Outcome::Skip } else { Outcome::Pass };
    for i in 0..tests {
        let failed = pkg.ends_with("checkout") && i == 11;
        if failed {
            outcome = Outcome::Fail;
        }
        let glyph = if failed { "✖" } else { "·" };
        recorder.record_event(
            &TestEvent::new(pkg, SystemTime::now(), EventKind::Test)
                .with_glyph(glyph)
                .with_prefix(format_prefix(started.elapsed(), false, Outcome::Running)),
        );
        thread::sleep(Duration::from_millis(25));
    }
    trace(recorder, worker, Phase::End, ActionKind::TestRun, pkg);

    recorder.record_event(
        &TestEvent::new(pkg, SystemTime::now(), EventKind::Lifecycle)
            .with_outcome(outcome)
            .with_prefix(format_prefix(started.elapsed(), false, outcome))
            .with_empty(tests == 0),
    );
    outcome
}

fn plain_run() {
    for (pkg, tests) in PACKAGES {
        let verdict = if *tests == 0 { "?" } else { "ok" };
        println!("{verdict}\t{pkg}\t{tests} tests");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DashboardConfig {
        module_prefix: Some(MODULE.to_string()),
        options: DisplayOptions::WORKER_SUMMARY | DisplayOptions::WORKER_LINES,
        reserved_rows: 2,
        ..DashboardConfig::default()
    };

    let dashboard = match Dashboard::stdout(config) {
        Ok(dashboard) => dashboard,
        Err(err) => {
            eprintln!("dashboard unavailable ({err}), using plain output");
            plain_run();
            return;
        }
    };

    println!("go test ./...  ({} packages, {WORKERS} workers)", PACKAGES.len());

    let plan: Vec<ActionKind> = PACKAGES
        .iter()
        .flat_map(|_| [ActionKind::Build, ActionKind::Link, ActionKind::TestRun])
        .collect();
    dashboard.set_expected_actions(plan.iter().collect());

    let next = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let recorder = dashboard.recorder();
            let next = Arc::clone(&next);
            let failed = Arc::clone(&failed);
            thread::spawn(move || {
                while let Some((pkg, tests)) = PACKAGES.get(next.fetch_add(1, Ordering::SeqCst)) {
                    if run_package(&recorder, worker, pkg, *tests) == Outcome::Fail {
                        failed.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    let total: usize = PACKAGES.iter().map(|(_, tests)| tests).sum();
    dashboard.set_summary(format!(
        "\nDONE {total} tests, {} failed package(s)\n",
        failed.load(Ordering::SeqCst)
    ));

    let stats = dashboard.finish();
    tracing::debug!(
        frames = stats.frames,
        skipped = stats.skipped,
        bytes = stats.bytes_written,
        "render stats"
    );
}
