//! Background tasks module
//! 
//! The countdown poll and the expiry notifier run as tokio tasks next to the
//! HTTP server.

pub mod countdown_poll;
pub mod expiry_notifier;

// Re-export main functions
pub use countdown_poll::countdown_poll_task;
pub use expiry_notifier::expiry_notifier_task;
