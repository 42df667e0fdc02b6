//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant as StdInstant},
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info};

use super::{CountdownSnapshot, ExpiryEvent};
use crate::{
    countdown::{format_clock, CountdownController, CountdownError, CountdownSettings, Remaining},
    tasks::countdown_poll_task,
};

/// What the poll task should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Continue,
    Finished,
}

/// Controller plus the poll driving it, guarded together so that starting
/// or stopping the countdown and starting or stopping its poll are one step
#[derive(Debug)]
struct CountdownSlot {
    controller: CountdownController,
    poll: Option<JoinHandle<()>>,
    /// Bumped on every start; ticks from an older poll are discarded
    generation: u64,
}

impl CountdownSlot {
    fn cancel_poll(&mut self) {
        if let Some(handle) = self.poll.take() {
            handle.abort();
            debug!("Countdown poll {} cancelled", self.generation);
        }
    }
}

/// Main application state that owns the countdown and its observers
#[derive(Debug)]
pub struct AppState {
    countdown: Mutex<CountdownSlot>,
    /// Poll period while the countdown is running
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: StdInstant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Latest countdown snapshot, updated on every tick and transition
    pub countdown_tx: watch::Sender<CountdownSnapshot>,
    /// One message per completed countdown
    pub expiry_tx: broadcast::Sender<ExpiryEvent>,
}

impl AppState {
    /// Create a new AppState with an idle countdown
    pub fn new(port: u16, host: String, settings: CountdownSettings, tick_interval: Duration) -> Self {
        let controller = CountdownController::new(settings.duration());
        let (countdown_tx, _) = watch::channel(CountdownSnapshot::capture(&controller, Instant::now()));
        let (expiry_tx, _) = broadcast::channel(16);

        Self {
            countdown: Mutex::new(CountdownSlot {
                controller,
                poll: None,
                generation: 0,
            }),
            tick_interval,
            start_time: StdInstant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            countdown_tx,
            expiry_tx,
        }
    }

    // Transitions are single assignments, a poisoned slot is still consistent
    fn slot(&self) -> MutexGuard<'_, CountdownSlot> {
        self.countdown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start (or resume) the countdown and its poll
    pub fn start(self: &Arc<Self>) -> Result<CountdownSnapshot, CountdownError> {
        let mut slot = self.slot();
        let snapshot = self.begin(&mut slot)?;
        drop(slot);

        self.record_action("start");
        Ok(snapshot)
    }

    /// Pause the running countdown, freezing what is left
    pub fn pause(&self) -> Result<CountdownSnapshot, CountdownError> {
        let mut slot = self.slot();
        let snapshot = self.halt(&mut slot)?;
        drop(slot);

        self.record_action("pause");
        Ok(snapshot)
    }

    /// Pause when running, start otherwise
    pub fn toggle(self: &Arc<Self>) -> Result<CountdownSnapshot, CountdownError> {
        let mut slot = self.slot();
        let (action, snapshot) = if slot.controller.is_running() {
            ("pause", self.halt(&mut slot)?)
        } else {
            ("start", self.begin(&mut slot)?)
        };
        drop(slot);

        self.record_action(action);
        Ok(snapshot)
    }

    /// Restore the configured duration
    pub fn reset(&self) -> Result<CountdownSnapshot, CountdownError> {
        let mut slot = self.slot();
        slot.controller.reset()?;
        slot.cancel_poll();
        let snapshot = self.publish(&slot.controller);
        drop(slot);

        info!("Countdown reset to {}", snapshot.configured);
        self.record_action("reset");
        Ok(snapshot)
    }

    /// Replace the configured duration
    pub fn reconfigure(&self, settings: CountdownSettings) -> Result<CountdownSnapshot, CountdownError> {
        let mut slot = self.slot();
        slot.controller.reconfigure(settings.duration())?;
        slot.cancel_poll();
        let snapshot = self.publish(&slot.controller);
        drop(slot);

        info!("Countdown configured to {}", snapshot.configured);
        self.record_action("settings");
        Ok(snapshot)
    }

    /// Current countdown snapshot
    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot::capture(&self.slot().controller, Instant::now())
    }

    /// Whether a poll task is currently attached to the countdown
    pub fn is_polling(&self) -> bool {
        self.slot().poll.is_some()
    }

    /// Handle one tick from the poll task started for `generation`
    pub fn poll_tick(&self, generation: u64) -> PollOutcome {
        let mut slot = self.slot();
        if slot.generation != generation {
            debug!("Discarding tick from stale poll {}", generation);
            return PollOutcome::Finished;
        }

        let Some(tick) = slot.controller.tick(Instant::now()) else {
            return PollOutcome::Finished;
        };
        self.publish_observed(&slot.controller, tick.remaining);

        if !tick.expired {
            return PollOutcome::Continue;
        }

        // The poll is finishing on its own; drop the handle without aborting
        slot.poll = None;
        self.raise_expiry(&slot.controller);
        PollOutcome::Finished
    }

    /// Subscribe to snapshot updates
    pub fn subscribe_updates(&self) -> watch::Receiver<CountdownSnapshot> {
        self.countdown_tx.subscribe()
    }

    /// Subscribe to expiry events
    pub fn subscribe_expiry(&self) -> broadcast::Receiver<ExpiryEvent> {
        self.expiry_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn begin(self: &Arc<Self>, slot: &mut CountdownSlot) -> Result<CountdownSnapshot, CountdownError> {
        slot.controller.start(Instant::now())?;
        slot.generation += 1;
        slot.poll = Some(tokio::spawn(countdown_poll_task(Arc::clone(self), slot.generation)));

        let snapshot = self.publish(&slot.controller);
        info!("Countdown running with {} left", snapshot.display);
        Ok(snapshot)
    }

    fn halt(&self, slot: &mut CountdownSlot) -> Result<CountdownSnapshot, CountdownError> {
        let paused = slot.controller.pause(Instant::now())?;
        slot.cancel_poll();

        let snapshot = self.publish_observed(&slot.controller, paused.remaining);
        if paused.expired {
            self.raise_expiry(&slot.controller);
        } else {
            info!("Countdown paused with {} left", snapshot.display);
        }
        Ok(snapshot)
    }

    fn publish(&self, controller: &CountdownController) -> CountdownSnapshot {
        self.publish_observed(controller, controller.remaining(Instant::now()))
    }

    fn publish_observed(&self, controller: &CountdownController, remaining: Remaining) -> CountdownSnapshot {
        let snapshot = CountdownSnapshot::observed(controller, remaining);
        self.countdown_tx.send_replace(snapshot.clone());
        snapshot
    }

    // Callers hold the slot, so the consuming transition and its event are one step
    fn raise_expiry(&self, controller: &CountdownController) {
        let event = ExpiryEvent {
            configured: controller.configured(),
            expired_at: Utc::now(),
        };

        info!("Countdown of {} expired", format_clock(event.configured));
        if self.expiry_tx.send(event).is_err() {
            debug!("No expiry listeners");
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}
