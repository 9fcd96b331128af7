//! Stale-answer rejection for hint requests.

use common::{search_query::is_search_key_valid, text_highlight::Snippet};
use std::time::Duration;

use tokio::time::Instant;

/// Dispatch time of a hint request, in microseconds since the controller was
/// created. Strictly increasing across the dispatches of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTimestamp(u64);

impl RequestTimestamp {
    pub fn as_micros(self) -> u64 {
        self.0
    }
}

/// A hint request as it leaves the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub key: String,
    pub timestamp: RequestTimestamp,
}

/// What to do with a changed search box value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChange {
    /// A search is committed; hints stay hidden.
    Ignored,
    /// Nothing worth asking for (empty key).
    Invalid,
    /// Debounce it and dispatch.
    Schedule,
}

/// Owns the watermark: the highest dispatch timestamp whose answer was
/// displayed. Answers at or below it are stale and get dropped.
#[derive(Debug)]
pub struct SuggestionRaceController {
    origin: Instant,
    last_issued: Option<RequestTimestamp>,
    latest_accepted: Option<RequestTimestamp>,
    current_hints: Vec<Snippet>,
    is_query_committed: bool,
}

impl SuggestionRaceController {
    pub fn new(origin: Instant) -> Self {
        Self {
            origin,
            last_issued: None,
            latest_accepted: None,
            current_hints: Vec::new(),
            is_query_committed: false,
        }
    }

    pub fn current_hints(&self) -> &[Snippet] {
        &self.current_hints
    }

    pub fn latest_accepted(&self) -> Option<RequestTimestamp> {
        self.latest_accepted
    }

    pub fn is_query_committed(&self) -> bool {
        self.is_query_committed
    }

    pub fn on_key_change(&self, key: &str) -> KeyChange {
        if self.is_query_committed {
            KeyChange::Ignored
        } else if !is_search_key_valid(key) {
            KeyChange::Invalid
        } else {
            KeyChange::Schedule
        }
    }

    /// Stamps a request with its dispatch time.
    pub fn dispatch(&mut self, key: String, now: Instant) -> HintRequest {
        let micros = elapsed_micros(now.saturating_duration_since(self.origin));
        let timestamp = match self.last_issued {
            Some(RequestTimestamp(last)) if micros <= last => RequestTimestamp(last.saturating_add(1)),
            _ => RequestTimestamp(micros),
        };
        self.last_issued = Some(timestamp);
        tracing::debug!(key = %key, timestamp = timestamp.as_micros(), "dispatching key hints request");
        HintRequest { key, timestamp }
    }

    /// Displays `hints` if they answer a request newer than every answer shown
    /// so far and no search is committed. Returns whether they were applied.
    pub fn apply_response(&mut self, timestamp: RequestTimestamp, hints: Vec<Snippet>) -> bool {
        if self.is_query_committed {
            tracing::debug!(timestamp = timestamp.as_micros(), "query committed, dropping key hints");
            return false;
        }
        if self.latest_accepted.is_some_and(|latest| timestamp <= latest) {
            tracing::debug!(timestamp = timestamp.as_micros(), "stale key hints dropped");
            return false;
        }
        self.latest_accepted = Some(timestamp);
        self.current_hints = hints;
        true
    }

    /// A full search started: hide hints until the query is edited again.
    pub fn commit(&mut self) {
        self.is_query_committed = true;
        self.current_hints.clear();
    }

    pub fn release(&mut self) {
        self.is_query_committed = false;
    }
}

/// Saturates instead of wrapping, so timestamps never go backward.
fn elapsed_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
