//! Server-sent stream of domain events.
//!
//! Clients treat each event as an invalidate signal for the named phase
//! and re-fetch.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::state::AppState;

/// GET /api/events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.manager.subscribe();
    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = Event::default()
                        .event(event.name())
                        .json_data(&event)
                        .unwrap_or_else(|_| Event::default().comment("unserializable event"));
                    return Some((Ok(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
