//! WebSocket endpoints.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use kula_core::EventKind;
use kula_pool::EventFilter;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::state::AppState;

/// Query parameters for the event stream.
#[derive(Debug, Default, Deserialize)]
pub struct EventStreamParams {
    /// Restrict the stream to one event kind, e.g. `solve_completed`.
    /// Unknown values fall back to all kinds.
    pub kind: Option<String>,
}

fn filter_from_params(params: &EventStreamParams) -> EventFilter {
    match params.kind.as_deref().and_then(EventKind::parse) {
        Some(kind) => EventFilter::kind(kind),
        None => EventFilter::default(),
    }
}

/// Exchange event stream.
pub async fn events_stream(
    ws: WebSocketUpgrade,
    Query(params): Query<EventStreamParams>,
    State(state): State<AppState>,
) -> Response {
    let filter = filter_from_params(&params);
    ws.on_upgrade(move |socket| handle_events_stream(socket, state, filter))
}

async fn handle_events_stream(mut socket: WebSocket, state: AppState, filter: EventFilter) {
    let mut events = state.exchange.subscribe();

    // Send initial message
    let greeting = serde_json::json!({
        "type": "connected",
        "message": "Connected to exchange event stream"
    });
    if socket
        .send(Message::Text(greeting.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if !filter.matches(&event) {
                            continue;
                        }
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(_) => continue,
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("event stream fell behind, {} events dropped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = socket.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_params() {
        let all = filter_from_params(&EventStreamParams { kind: None });
        assert!(all.kinds.is_none());

        let one = filter_from_params(&EventStreamParams {
            kind: Some("solve_completed".to_string()),
        });
        assert_eq!(one.kinds, Some(vec![EventKind::SolveCompleted]));

        let unknown = filter_from_params(&EventStreamParams {
            kind: Some("zzz".to_string()),
        });
        assert!(unknown.kinds.is_none());
    }
}
