//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::countdown::{CountdownError, CountdownSettings};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-server")]
#[command(about = "A state-managed HTTP server driving a single countdown timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial countdown minutes (0-59)
    #[arg(short, long, default_value_t = 25, value_parser = clap::value_parser!(u8).range(0..=59))]
    pub minutes: u8,

    /// Initial countdown seconds (0-59)
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=59))]
    pub seconds: u8,

    /// Poll interval of a running countdown in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: u64,

    /// Disable desktop notifications on expiry
    #[arg(long)]
    pub no_notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial countdown duration
    pub fn countdown_settings(&self) -> Result<CountdownSettings, CountdownError> {
        CountdownSettings::new(self.minutes, self.seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
