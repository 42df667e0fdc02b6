//! Countdown lifecycle state machine

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use super::{
    error::CountdownError,
    tracker::{compute_remaining, Remaining},
};

/// Lifecycle state, carrying only the data that state needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// Not counting; holds either the full duration or zero after expiry
    Idle { remaining: Duration },
    /// Counting down from `remaining` since `started_at`
    Running {
        remaining: Duration,
        started_at: Instant,
    },
    /// Stopped part way; `remaining` is the exact value at pause time
    Paused { remaining: Duration },
}

/// Externally visible lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        })
    }
}

/// Operations a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Pause,
    Reset,
    Reconfigure,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Reset => "reset",
            Self::Reconfigure => "reconfigure",
        })
    }
}

/// Remaining time observed when a running countdown is polled or paused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: Remaining,
    /// Set on the single observation that consumed the countdown
    pub expired: bool,
}

/// Countdown state machine.
///
/// Every method takes the current instant explicitly; the controller never
/// reads a clock itself.
#[derive(Debug, Clone)]
pub struct CountdownController {
    configured: Duration,
    phase: CountdownPhase,
}

impl CountdownController {
    /// Create an idle countdown holding the full configured duration
    pub fn new(configured: Duration) -> Self {
        Self {
            configured,
            phase: CountdownPhase::Idle {
                remaining: configured,
            },
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn configured(&self) -> Duration {
        self.configured
    }

    pub fn status(&self) -> CountdownStatus {
        match self.phase {
            CountdownPhase::Idle { .. } => CountdownStatus::Idle,
            CountdownPhase::Running { .. } => CountdownStatus::Running,
            CountdownPhase::Paused { .. } => CountdownStatus::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, CountdownPhase::Running { .. })
    }

    /// Remaining time as of `now`; live while running, frozen otherwise
    pub fn remaining(&self, now: Instant) -> Remaining {
        match self.phase {
            CountdownPhase::Running {
                remaining,
                started_at,
            } => compute_remaining(remaining, Some(started_at), now)
                .unwrap_or_else(|| Remaining::frozen(remaining)),
            CountdownPhase::Idle { remaining } | CountdownPhase::Paused { remaining } => {
                Remaining::frozen(remaining)
            }
        }
    }

    /// Begin counting from `now`
    pub fn start(&mut self, now: Instant) -> Result<(), CountdownError> {
        let remaining = match self.phase {
            CountdownPhase::Running { .. } => return Err(self.forbidden(Operation::Start)),
            CountdownPhase::Idle { remaining } | CountdownPhase::Paused { remaining } => remaining,
        };
        if remaining.is_zero() {
            return Err(CountdownError::Exhausted);
        }

        debug!("Countdown started with {:?} remaining", remaining);
        self.phase = CountdownPhase::Running {
            remaining,
            started_at: now,
        };
        Ok(())
    }

    /// Stop counting and freeze the exact remaining time.
    ///
    /// A pause that lands after the deadline but before the next tick
    /// consumes the countdown instead, exactly as that tick would have.
    pub fn pause(&mut self, now: Instant) -> Result<Tick, CountdownError> {
        if !self.is_running() {
            return Err(self.forbidden(Operation::Pause));
        }

        let remaining = self.remaining(now);
        let expired = remaining.is_zero();
        if expired {
            debug!("Countdown consumed at pause");
            self.phase = CountdownPhase::Idle {
                remaining: Duration::ZERO,
            };
        } else {
            debug!("Countdown paused with {:?} remaining", remaining.exact);
            self.phase = CountdownPhase::Paused {
                remaining: remaining.exact,
            };
        }
        Ok(Tick { remaining, expired })
    }

    /// Restore the configured duration
    pub fn reset(&mut self) -> Result<(), CountdownError> {
        if self.is_running() {
            return Err(self.forbidden(Operation::Reset));
        }

        self.phase = CountdownPhase::Idle {
            remaining: self.configured,
        };
        Ok(())
    }

    /// Replace the configured duration and discard any paused progress
    pub fn reconfigure(&mut self, duration: Duration) -> Result<(), CountdownError> {
        if self.is_running() {
            return Err(self.forbidden(Operation::Reconfigure));
        }

        debug!("Countdown reconfigured to {:?}", duration);
        self.configured = duration;
        self.phase = CountdownPhase::Idle {
            remaining: duration,
        };
        Ok(())
    }

    /// Poll a running countdown.
    ///
    /// Returns `None` if the countdown is not running. When the exact value
    /// reaches zero the countdown drops to idle with nothing left, so the
    /// expired tick can only ever be produced once.
    pub fn tick(&mut self, now: Instant) -> Option<Tick> {
        let CountdownPhase::Running {
            remaining,
            started_at,
        } = self.phase
        else {
            return None;
        };

        let remaining = compute_remaining(remaining, Some(started_at), now)?;
        let expired = remaining.is_zero();
        if expired {
            debug!("Countdown consumed");
            self.phase = CountdownPhase::Idle {
                remaining: Duration::ZERO,
            };
        }

        Some(Tick { remaining, expired })
    }

    fn forbidden(&self, operation: Operation) -> CountdownError {
        CountdownError::InvalidTransition {
            operation,
            status: self.status(),
        }
    }
}

impl Default for CountdownController {
    fn default() -> Self {
        Self::new(Duration::from_secs(25 * 60))
    }
}
