//! Event records handed to the dashboard by the decoding layer.
//!
//! These are plain data. Deciding what an outcome or an "empty" package
//! means is the producer's job; the dashboard only aggregates and draws.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Result classification of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    /// Still in progress.
    #[default]
    Running,
    /// Finished successfully.
    Pass,
    /// Finished with a failure.
    Fail,
    /// Skipped.
    Skip,
}

impl Outcome {
    /// Whether the entity's work has concluded.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// What a test event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Package-level start or end. Never contributes a glyph.
    Lifecycle,
    /// A single test changed state.
    Test,
    /// Captured output. Does not count as activity for ordering.
    Output,
}

/// One decoded test event.
#[derive(Debug, Clone)]
pub struct TestEvent {
    /// Entity identity, e.g. the import path.
    pub package: String,
    /// When the event happened.
    pub time: SystemTime,
    /// Event category.
    pub kind: EventKind,
    /// Status glyph to append to the package's line.
    pub glyph: Option<String>,
    /// Package outcome after this event.
    pub outcome: Outcome,
    /// Pre-rendered status prefix (elapsed time, icon).
    pub prefix: String,
    /// Package has produced no observable work yet.
    pub empty: bool,
}

impl TestEvent {
    /// A running, non-empty event with no glyph and no prefix.
    pub fn new(package: impl Into<String>, time: SystemTime, kind: EventKind) -> Self {
        Self {
            package: package.into(),
            time,
            kind,
            glyph: None,
            outcome: Outcome::Running,
            prefix: String::new(),
            empty: false,
        }
    }

    /// Attach a glyph.
    #[must_use]
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    /// Set the package outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Set the status prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Mark the package as empty (or not).
    #[must_use]
    pub fn with_empty(mut self, empty: bool) -> Self {
        self.empty = empty;
        self
    }
}

/// Phase of a trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Action started on the worker.
    Begin,
    /// Action finished; the worker is idle again.
    End,
    /// Anything else (instant events, flow events).
    Other,
}

impl Phase {
    /// Map a Chrome trace `ph` code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "B" => Self::Begin,
            "E" => Self::End,
            _ => Self::Other,
        }
    }
}

/// Kind of build action a worker performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// `vet`
    Vet,
    /// `build`
    Build,
    /// `link`
    Link,
    /// `test run`
    TestRun,
    /// Any other action label.
    Other(String),
}

impl ActionKind {
    /// Classify an action label such as `"build"` or `"test run"`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "vet" => Self::Vet,
            "build" => Self::Build,
            "link" => Self::Link,
            "test run" => Self::TestRun,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Vet => "vet",
            Self::Build => "build",
            Self::Link => "link",
            Self::TestRun => "test run",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An action name that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an action name: {0:?}")]
pub struct ParseActionError(String);

/// What a worker is doing: an action kind and its target package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Action kind.
    pub kind: ActionKind,
    /// Target package.
    pub package: String,
}

impl ActionDescriptor {
    /// Build a descriptor directly.
    pub fn new(kind: ActionKind, package: impl Into<String>) -> Self {
        Self {
            kind,
            package: package.into(),
        }
    }
}

/// Parses trace names such as
/// `Executing action (test run example.com/pkg) -> link`.
/// Everything after ` -> ` is ignored; the last word inside the
/// parentheses is the package and the words before it are the kind.
impl FromStr for ActionDescriptor {
    type Err = ParseActionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let head = name.split_once(" -> ").map_or(name, |(head, _)| head);
        let inner = head
            .strip_prefix("Executing action (")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseActionError(name.to_string()))?;
        match inner.rsplit_once(' ') {
            Some((kind, package)) if !kind.is_empty() && !package.is_empty() => {
                Ok(Self::new(ActionKind::from_label(kind), package))
            }
            _ => Err(ParseActionError(name.to_string())),
        }
    }
}

/// One decoded build-trace event.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    /// Worker (thread) identity.
    pub worker: u64,
    /// Microseconds since the Unix epoch.
    pub time_us: u64,
    /// Begin, end, or other.
    pub phase: Phase,
    /// Parsed action, if the name described one.
    pub action: Option<ActionDescriptor>,
}

impl TraceEvent {
    /// Wall-clock time of the event.
    pub fn time(&self) -> SystemTime {
        trace_time(self.time_us)
    }
}

/// Convert a trace timestamp (µs since the Unix epoch) to wall-clock time.
pub fn trace_time(micros: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_micros(micros)
}
