//! Countdown poll background task

use std::sync::Arc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::state::{AppState, PollOutcome};

/// Poll the running countdown every `tick_interval` until it is paused,
/// reset, superseded by a newer poll, or expires
pub async fn countdown_poll_task(state: Arc<AppState>, generation: u64) {
    let period = state.tick_interval;
    debug!("Starting countdown poll {} every {:?}", generation, period);

    // First tick one period after start, not immediately
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if state.poll_tick(generation) == PollOutcome::Finished {
            break;
        }
    }

    debug!("Countdown poll {} finished", generation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::countdown::{CountdownSettings, CountdownStatus};

    #[tokio::test(start_paused = true)]
    async fn stops_once_countdown_is_not_running() {
        let settings = CountdownSettings::new(0, 1).unwrap();
        let state = Arc::new(AppState::new(0, "localhost".to_string(), settings, Duration::from_millis(500)));

        // Idle countdown: the first tick finds nothing to do
        let handle = tokio::spawn(countdown_poll_task(Arc::clone(&state), 0));
        sleep(Duration::from_millis(600)).await;
        assert!(handle.is_finished());
        assert_eq!(state.snapshot().status, CountdownStatus::Idle);
        assert_eq!(state.snapshot().remaining_millis, 1_000);
    }
}
