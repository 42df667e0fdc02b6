//! Expiry notifier background task

use std::sync::Arc;
use chrono::{DateTime, Local, Utc};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{services::DesktopNotifier, state::AppState};

/// Summary line shown when a countdown finishes, in local wall-clock time
pub fn expiry_summary(expired_at: DateTime<Utc>) -> String {
    format!(
        "Countdown Done: {}",
        expired_at.with_timezone(&Local).format("%H:%M:%S")
    )
}

/// Background task that raises a desktop notification for every expiry
pub async fn expiry_notifier_task(state: Arc<AppState>, notifier: DesktopNotifier) {
    info!("Starting expiry notifier task");

    let mut expiry_rx = state.subscribe_expiry();

    loop {
        match expiry_rx.recv().await {
            Ok(event) => {
                let summary = expiry_summary(event.expired_at);
                if let Err(e) = notifier.notify(&summary).await {
                    error!("Failed to notify countdown expiry: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Expiry notifier fell behind, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Expiry channel closed, stopping notifier");
                break;
            }
        }
    }
}
