//! Countdown error types

use thiserror::Error;

use super::controller::{CountdownStatus, Operation};

/// Errors raised by the countdown model.
///
/// None of these are transient: they all indicate a caller asking for
/// something the current state does not allow, or input that never should
/// have reached the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    /// Minutes/seconds input outside `0..=59` or not an integer
    #[error("invalid {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// Operation not allowed from the current lifecycle state
    #[error("cannot {operation} while countdown is {status}")]
    InvalidTransition {
        operation: Operation,
        status: CountdownStatus,
    },

    /// Start requested on a countdown with nothing left to count
    #[error("cannot start: no time remaining, reset or reconfigure first")]
    Exhausted,
}

impl CountdownError {
    pub fn invalid_configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors caused by calling an operation in the wrong state
    pub fn is_transition_error(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. } | Self::Exhausted)
    }
}
