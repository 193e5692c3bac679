//! Render pass benchmark: line selection and frame composition.
//!
//! Target: < 100µs to compose a 200-package frame, so a 100ms tick
//! spends well under 1% of its budget rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dotboard::dashboard::{
    compose_frame, select_lines, DashboardState, DisplayOptions, EventKind, FrameLayout,
    LineOrder, Outcome, RenderLine, TestEvent,
};
use dotboard::TerminalSize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// State with `packages` lines, every third one still running.
fn create_test_state(packages: usize, width: u16) -> DashboardState {
    let mut state = DashboardState::new(LineOrder::InsertionOrder, Some("example.com/mod"));
    for i in 0..packages {
        let pkg = format!("example.com/mod/pkg{i:04}");
        let time = UNIX_EPOCH + Duration::from_secs(i as u64);
        for _ in 0..(i % 40) {
            state.record_event(
                &TestEvent::new(&pkg, time, EventKind::Test).with_glyph("·"),
                width,
            );
        }
        if i % 3 != 0 {
            state.record_event(
                &TestEvent::new(&pkg, time, EventKind::Lifecycle).with_outcome(Outcome::Pass),
                width,
            );
        }
    }
    state.set_summary("DONE 4000 tests in 12.5s\n");
    state
}

fn select_crowded(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_lines");
    for packages in [50, 200, 1000] {
        let state = create_test_state(packages, 120);
        let lines: Vec<&RenderLine> = state.lines().iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(packages), &lines, |b, lines| {
            b.iter(|| select_lines(black_box(lines), black_box(40)));
        });
    }
    group.finish();
}

fn compose_200_packages(c: &mut Criterion) {
    let state = create_test_state(200, 120);
    let layout = FrameLayout {
        size: TerminalSize::new(120, 50).unwrap(),
        reserved_rows: 10,
        options: DisplayOptions::default(),
    };
    let now = SystemTime::now();

    c.bench_function("compose_frame_200_packages", |b| {
        b.iter(|| compose_frame(black_box(&state), black_box(&layout), now));
    });
}

fn record_glyph(c: &mut Criterion) {
    let mut state = create_test_state(200, 120);
    let event = TestEvent::new("example.com/mod/pkg0099", UNIX_EPOCH, EventKind::Test)
        .with_glyph("·");

    c.bench_function("record_event_glyph", |b| {
        b.iter(|| state.record_event(black_box(&event), 120));
    });
}

criterion_group!(benches, select_crowded, compose_200_packages, record_glyph);
criterion_main!(benches);
