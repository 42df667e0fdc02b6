//! External service integration module
//! 
//! Talks to the desktop notification daemon on behalf of the countdown.

pub mod notification;

// Re-export main functions
pub use notification::*;
