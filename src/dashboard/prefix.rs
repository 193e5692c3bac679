//! Status prefix for a package line: elapsed time and an outcome icon.
//!
//! Producers are free to render their own prefix; this is the stock one.
//! The outcome shows as an icon only. Prefixes are plain text because line
//! widths are measured on them.

use super::event::Outcome;
use std::time::Duration;

/// Widest elapsed value shown before precision is dropped.
const MAX_VALUE_WIDTH: usize = 7;

/// Truncation steps tried, finest first.
const STEPS: [Duration; 7] = [
    Duration::from_millis(1),
    Duration::from_millis(10),
    Duration::from_millis(100),
    Duration::from_secs(1),
    Duration::from_secs(10),
    Duration::from_secs(60),
    Duration::from_secs(600),
];

/// Render ` {elapsed:>5} {icon} ` for a package.
///
/// Cached packages show a disk, packages past an hour an hourglass.
/// Otherwise the elapsed time is shown at the finest precision that fits
/// in seven columns.
pub fn format_prefix(elapsed: Duration, cached: bool, outcome: Outcome) -> String {
    let icon = match outcome {
        Outcome::Running => "⏱",
        Outcome::Pass => "✔",
        Outcome::Fail => "✖",
        Outcome::Skip => "↷",
    };
    let value = if cached {
        "🖴 ".to_string()
    } else if elapsed.is_zero() {
        String::new()
    } else if elapsed >= Duration::from_secs(3600) {
        "⏳ ".to_string()
    } else {
        STEPS
            .iter()
            .map(|&step| format_duration(truncate(elapsed, step)))
            .find(|value| value.chars().count() <= MAX_VALUE_WIDTH)
            .unwrap_or_default()
    };
    format!(" {value:>5} {icon} ")
}

fn truncate(d: Duration, step: Duration) -> Duration {
    let nanos = d.as_nanos() / step.as_nanos() * step.as_nanos();
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Compact duration: `250ms`, `1.25s`, `2m5.5s`.
fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }
    if d < Duration::from_secs(1) {
        return format!("{}ms", d.as_millis());
    }
    let secs = d.as_secs();
    let seconds = format_seconds(secs % 60, d.subsec_millis());
    if secs < 60 {
        seconds
    } else {
        format!("{}m{seconds}", secs / 60)
    }
}

fn format_seconds(secs: u64, millis: u32) -> String {
    if millis == 0 {
        return format!("{secs}s");
    }
    let frac = format!("{millis:03}");
    format!("{secs}.{}s", frac.trim_end_matches('0'))
}
