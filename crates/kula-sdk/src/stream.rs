//! Live event stream from a Kula node.

use futures::StreamExt;
use kula_core::{ExchangeError, ExchangeEvent, Result};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

/// A stream of [`ExchangeEvent`]s pushed by the node over WebSocket.
///
/// Dropping the stream closes the connection.
pub struct EventStream {
    receiver: mpsc::Receiver<ExchangeEvent>,
    _handle: tokio::task::JoinHandle<()>,
}

/// Decode one WebSocket text frame into an event.
///
/// The node also sends a greeting frame on connect; that and anything else
/// that is not an event decodes to `None`.
fn parse_event(text: &str) -> Option<ExchangeEvent> {
    serde_json::from_str(text).ok()
}

impl EventStream {
    /// Connect to a node's WebSocket event endpoint.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let (ws_stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        let (tx, rx) = mpsc::channel(100);

        let handle = tokio::spawn(async move {
            let (_, mut read) = ws_stream.split();

            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => match parse_event(&text) {
                        Some(event) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            debug!("skipping non-event frame from node");
                        }
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
        });

        Ok(Self {
            receiver: rx,
            _handle: handle,
        })
    }

    /// Next event, or `None` once the node closes the stream.
    pub async fn next(&mut self) -> Option<ExchangeEvent> {
        self.receiver.recv().await
    }
}
