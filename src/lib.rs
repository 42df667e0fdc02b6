//! Countdown Server - A state-managed HTTP server driving a countdown timer
//! 
//! The countdown model lives in [`countdown`]; everything else wires it to a
//! poll task, an HTTP API and desktop notifications.

pub mod api;
pub mod config;
pub mod countdown;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use countdown::{CountdownController, CountdownError, CountdownSettings};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
