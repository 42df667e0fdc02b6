//! Desktop notifications through `notify-send`

use std::io;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Program used to talk to the notification daemon
pub const NOTIFY_SEND: &str = "notify-send";

/// Failures talking to the notification daemon
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{program} is not available, desktop notifications are disabled")]
    Unavailable { program: String },

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed: {stderr}")]
    Failed { program: String, stderr: String },
}

/// Desktop notification settings
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    pub program: String,
    pub app_name: String,
}

impl DesktopNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            app_name: "countdown".to_string(),
        }
    }

    /// Arguments for a notification that stays on screen until dismissed
    pub fn args(&self, summary: &str) -> Vec<String> {
        vec![
            "--urgency=critical".to_string(),
            format!("--app-name={}", self.app_name),
            summary.to_string(),
        ]
    }

    /// Show a notification with the given summary line
    pub async fn notify(&self, summary: &str) -> Result<(), NotifyError> {
        debug!("Sending desktop notification: {}", summary);

        let output = Command::new(&self.program)
            .args(self.args(summary))
            .output()
            .await
            .map_err(|source| NotifyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(NotifyError::Failed {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Desktop notification sent");
        Ok(())
    }

    /// Check that the notification program can be executed
    pub async fn check_available(&self) -> Result<(), NotifyError> {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|_| NotifyError::Unavailable {
                program: self.program.clone(),
            })?;

        info!("{} is available", self.program);
        Ok(())
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(NOTIFY_SEND)
    }
}
