//! Wait mechanisms.
//!
//! Load states for navigation and the bounded polling deadline every
//! auto-waiting primitive is built on.

use std::time::{Duration, Instant};

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Network idle threshold (500ms without requests)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
    /// Wait for network to be idle (no requests for 500ms)
    NetworkIdle,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// A running wait budget.
///
/// Callers query, check [`Deadline::expired`], then [`Deadline::tick`]. The
/// query always runs at least once, even with a zero timeout.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    timeout: Duration,
    poll: Duration,
}

impl Deadline {
    /// Create a deadline `timeout` from now, polling every `poll`
    #[must_use]
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
            poll: poll.max(Duration::from_millis(1)),
        }
    }

    /// Whether the budget is spent
    #[must_use]
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.timeout
    }

    /// Time left before expiry
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.started.elapsed())
    }

    /// Configured timeout in milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Sleep one polling interval, never past the deadline
    pub async fn tick(&self) {
        let nap = self.poll.min(self.remaining());
        if !nap.is_zero() {
            tokio::time::sleep(nap).await;
        }
    }
}
