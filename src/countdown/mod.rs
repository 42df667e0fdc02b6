//! Countdown time-tracking model
//!
//! The pure calculation (`tracker`), the lifecycle state machine
//! (`controller`) and validation of user supplied durations (`settings`).
//! Nothing in here spawns tasks or touches the outside world.

pub mod controller;
pub mod error;
pub mod settings;
pub mod tracker;

// Re-export main types
pub use controller::{CountdownController, CountdownPhase, CountdownStatus, Operation, Tick};
pub use error::CountdownError;
pub use settings::CountdownSettings;
pub use tracker::{compute_remaining, format_clock, round_up_to_second, Remaining};
