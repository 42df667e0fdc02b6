//! State management module
//! 
//! Shared application state: the countdown controller, its poll task handle
//! and the channels observers listen on.

pub mod app_state;
pub mod snapshot;

// Re-export main types
pub use app_state::{AppState, PollOutcome};
pub use snapshot::{CountdownSnapshot, ExpiryEvent};
