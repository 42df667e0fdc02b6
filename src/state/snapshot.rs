//! Read models published to observers

use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::countdown::{format_clock, CountdownController, CountdownStatus, Remaining};

/// Point-in-time view of the countdown for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub status: CountdownStatus,
    /// Nothing left to count; the countdown must be reset before starting
    pub done: bool,
    /// Display remaining as `m:ss`
    pub display: String,
    /// Display remaining, whole seconds rounded up
    pub remaining_seconds: u64,
    /// Exact remaining
    pub remaining_millis: u64,
    /// Configured duration as `m:ss`
    pub configured: String,
    /// Configured duration split the way the settings form takes it
    pub configured_minutes: u64,
    pub configured_seconds: u64,
}

impl CountdownSnapshot {
    /// Capture the countdown as of `now`
    pub fn capture(controller: &CountdownController, now: Instant) -> Self {
        Self::observed(controller, controller.remaining(now))
    }

    /// Snapshot carrying an already computed remaining time
    pub fn observed(controller: &CountdownController, remaining: Remaining) -> Self {
        let configured = controller.configured().as_secs();

        Self {
            status: controller.status(),
            done: remaining.display.is_zero(),
            display: format_clock(remaining.display),
            remaining_seconds: remaining.display.as_secs(),
            remaining_millis: remaining.exact.as_millis() as u64,
            configured: format_clock(controller.configured()),
            configured_minutes: configured / 60,
            configured_seconds: configured % 60,
        }
    }
}

/// Raised once each time a running countdown reaches zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryEvent {
    /// Configured duration of the countdown that finished
    pub configured: Duration,
    pub expired_at: DateTime<Utc>,
}
