//! Server-sent event stream of countdown updates

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::{broadcast::{self, error::RecvError}, watch};
use tracing::{debug, warn};

use crate::state::{AppState, CountdownSnapshot, ExpiryEvent};

/// Event name for countdown snapshots
pub const TICK_EVENT: &str = "tick";
/// Event name for a finished countdown
pub const EXPIRED_EVENT: &str = "expired";

fn json_event<T: Serialize>(name: &'static str, payload: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(payload)
        .unwrap_or_else(|e| {
            warn!("Failed to encode {} event: {}", name, e);
            Event::default().event(name)
        })
}

struct Subscription {
    updates: watch::Receiver<CountdownSnapshot>,
    expiries: broadcast::Receiver<ExpiryEvent>,
    sent_initial: bool,
}

impl Subscription {
    async fn next_event(&mut self) -> Option<Event> {
        if !self.sent_initial {
            self.sent_initial = true;
            let snapshot = self.updates.borrow_and_update().clone();
            return Some(json_event(TICK_EVENT, &snapshot));
        }

        loop {
            tokio::select! {
                changed = self.updates.changed() => {
                    changed.ok()?;
                    let snapshot = self.updates.borrow_and_update().clone();
                    return Some(json_event(TICK_EVENT, &snapshot));
                }
                received = self.expiries.recv() => match received {
                    Ok(event) => return Some(json_event(EXPIRED_EVENT, &event)),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Event stream skipped {} expiry events", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }
}

/// Handle GET /events - Stream the current snapshot, every update after it,
/// and expiry notices
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream subscriber connected");

    let subscription = Subscription {
        updates: state.subscribe_updates(),
        expiries: state.subscribe_expiry(),
        sent_initial: false,
    };

    let events = stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.next_event().await?;
        Some((Ok(event), subscription))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
