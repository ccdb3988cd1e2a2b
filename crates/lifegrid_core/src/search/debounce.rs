//! Keystroke debouncing for search input.
//!
//! Each new input cancels the pending query and restarts the quiet period;
//! the caller polls from its event loop and runs a scan when a query is
//! released.

use std::time::{Duration, Instant};

/// Quiet period before a typed query is released.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Single-slot debouncer; the latest input wins.
#[derive(Debug, Default)]
pub struct SearchDebouncer {
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending query and restarts the quiet period.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now));
    }

    /// Releases the pending query once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, typed_at)| now.saturating_duration_since(*typed_at) >= SEARCH_DEBOUNCE);
        if ready {
            return self.pending.take().map(|(query, _)| query);
        }
        None
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
