//! Phase timer: named instants on a monotonic clock.
//!
//! The timer knows nothing about suites or tests; callers namespace their
//! own labels (`"<suite>.<test>-start"`, `-sync-end`, `-async-end`). Labels
//! are write-once by convention — re-marking a label is a caller bug the
//! timer does not validate.

use std::collections::HashMap;
use std::time::Instant;

/// Records named instants and derives millisecond durations between them.
///
/// Backed by [`Instant`], so every reading is monotonic and sub-millisecond;
/// wall-clock-of-day time is never consulted.
#[derive(Debug, Default)]
pub struct PhaseTimer {
    marks: HashMap<String, Instant>,
}

impl PhaseTimer {
    /// Creates an empty timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current instant under `label`.
    pub fn mark(&mut self, label: impl Into<String>) {
        self.mark_at(label, Instant::now());
    }

    /// Records an explicit instant under `label`.
    ///
    /// The runner always goes through [`mark`](Self::mark); this entry point
    /// exists so tests can pin marks to synthetic offsets.
    pub fn mark_at(&mut self, label: impl Into<String>, at: Instant) {
        self.marks.insert(label.into(), at);
    }

    /// Returns `end - start` in milliseconds, or `None` if either label was
    /// never marked.
    ///
    /// The difference saturates at zero, so derived durations are never
    /// negative.
    pub fn duration_ms(&self, start: &str, end: &str) -> Option<f64> {
        let start = self.marks.get(start)?;
        let end = self.marks.get(end)?;
        Some(end.saturating_duration_since(*start).as_secs_f64() * 1000.0)
    }

    /// Returns true if `label` has been marked.
    pub fn contains(&self, label: &str) -> bool {
        self.marks.contains_key(label)
    }

    /// Number of marks recorded so far.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns true if no marks have been recorded.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
