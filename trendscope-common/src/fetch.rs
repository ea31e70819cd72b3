//! Bookkeeping for debounced, race-free dataset fetches.
//!
//! A selection edit bumps the [`Debouncer`] generation and schedules a timer;
//! when the timer fires only the latest generation proceeds. Each fetch that
//! does go out is tagged by the [`RequestTracker`], and a response is applied
//! only if its id is still the newest one issued.

use std::time::Duration;

/// Identifier of one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues monotonically increasing request ids.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id, superseding every earlier one.
    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    /// Most recently issued id, or the invalidation marker after it.
    pub fn latest(&self) -> RequestId {
        RequestId(self.latest)
    }

    /// Whether `id` is the most recently issued request.
    pub fn is_latest(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }

    /// Supersede all outstanding requests without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// Generation-counting debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    generation: u64,
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            generation: 0,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Register a new trigger and return its generation.
    pub fn trigger(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Generation of the most recent trigger.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the timer for `generation` is the last one scheduled.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

/// Lifecycle of a dashboard's data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_increase() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(second > first);
        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));
        assert_eq!(tracker.latest(), second);
    }

    #[test]
    fn test_stale_response_is_rejected() {
        // Fast edit then slow edit: the first response arrives last.
        let mut tracker = RequestTracker::new();
        let slow = tracker.issue();
        let fast = tracker.issue();

        assert!(tracker.is_latest(fast));
        assert!(!tracker.is_latest(slow));
    }

    #[test]
    fn test_invalidate() {
        let mut tracker = RequestTracker::new();
        let id = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.is_latest(id));
    }

    #[test]
    fn test_debounce_only_last_trigger_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let a = debouncer.trigger();
        let b = debouncer.trigger();
        let c = debouncer.trigger();

        assert!(!debouncer.is_current(a));
        assert!(!debouncer.is_current(b));
        assert!(debouncer.is_current(c));
        assert_eq!(debouncer.window(), Duration::from_millis(300));
    }

    #[test]
    fn test_load_state() {
        assert_eq!(LoadState::default(), LoadState::Idle);
        assert!(LoadState::Loading.is_loading());
        assert_eq!(LoadState::Failed("x".into()).error(), Some("x"));
        assert_eq!(LoadState::Loaded.error(), None);
    }
}
