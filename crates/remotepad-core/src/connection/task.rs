//! Background task keeping the pointer-stream WebSocket alive.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::protocol::ClientEvent;

use super::types::{ConnectionState, ControlCommand, StatusUpdate};

/// How long to wait after a session ends before dialing again.
pub(crate) const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Abort a connection attempt that has not completed within this window.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection with auto-reconnect.
///
/// The task is the sole writer of `ConnectionState` and the sole dialer,
/// so sessions are serialized: a manual reconnect and the retry timer can
/// never race each other into duplicate connections.
pub(crate) async fn connection_loop(
    url: String,
    state_tx: watch::Sender<ConnectionState>,
    status_tx: std::sync::mpsc::Sender<StatusUpdate>,
    mut event_rx: mpsc::Receiver<ClientEvent>,
    mut control_rx: mpsc::Receiver<ControlCommand>,
) {
    loop {
        publish(&state_tx, &status_tx, ConnectionState::Connecting);
        info!(url = %url, "Connecting to server");

        match tokio::time::timeout(CONNECT_TIMEOUT, connect_async(&url)).await {
            Ok(Ok((ws, _))) => {
                discard_stale_events(&mut event_rx);
                publish(&state_tx, &status_tx, ConnectionState::Connected);
                info!("Connected");

                match session(ws, &mut event_rx, &mut control_rx).await {
                    SessionResult::Shutdown => {
                        publish(&state_tx, &status_tx, ConnectionState::Disconnected);
                        info!("Connection task shutting down");
                        return;
                    }
                    SessionResult::Reconnect => {
                        info!("Reconnect requested, dialing again");
                        publish(&state_tx, &status_tx, ConnectionState::Disconnected);
                        continue;
                    }
                    SessionResult::Closed(reason) => {
                        info!(reason = %reason, "Connection closed");
                        publish(&state_tx, &status_tx, ConnectionState::Disconnected);
                    }
                    SessionResult::Failed(reason) => {
                        warn!(reason = %reason, "Connection lost");
                        publish(&state_tx, &status_tx, ConnectionState::Error);
                        publish(&state_tx, &status_tx, ConnectionState::Disconnected);
                    }
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect");
                publish(&state_tx, &status_tx, ConnectionState::Error);
                publish(&state_tx, &status_tx, ConnectionState::Disconnected);
            }
            Err(_elapsed) => {
                error!("WebSocket connection timed out after 15s");
                publish(&state_tx, &status_tx, ConnectionState::Error);
                publish(&state_tx, &status_tx, ConnectionState::Disconnected);
            }
        }

        match wait_for_retry(&state_tx, &mut control_rx).await {
            RetryDecision::Retry => {}
            RetryDecision::Shutdown => {
                info!("Connection task shutting down");
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

enum SessionResult {
    Shutdown,
    Reconnect,
    Closed(String),
    Failed(String),
}

/// Handle a single open session: forward queued events, answer pings,
/// and watch for closure.
///
/// Send faults are logged and swallowed; loss of the link is detected on
/// the read side, so a failed send never tears the session down itself.
async fn session(
    ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    event_rx: &mut mpsc::Receiver<ClientEvent>,
    control_rx: &mut mpsc::Receiver<ControlCommand>,
) -> SessionResult {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        match serde_json::to_string(&event) {
                            Ok(json) => {
                                if let Err(e) = sink.send(Message::Text(json.into())).await {
                                    warn!(error = %e, "Send failed, event dropped");
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Failed to encode event, dropped");
                            }
                        }
                    }
                    None => return SessionResult::Shutdown,
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        debug!(text = %text, "Ignoring message from server");
                    }
                    Some(Ok(Message::Binary(data))) => {
                        debug!(len = data.len(), "Ignoring binary frame from server");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return SessionResult::Closed("server closed connection".into());
                    }
                    Some(Err(e)) => {
                        return SessionResult::Failed(format!("ws error: {e}"));
                    }
                    _ => {}
                }
            }

            cmd = control_rx.recv() => {
                match cmd {
                    Some(ControlCommand::Reconnect) => {
                        let _ = sink.close().await;
                        return SessionResult::Reconnect;
                    }
                    Some(ControlCommand::Shutdown) | None => {
                        let _ = sink.close().await;
                        return SessionResult::Shutdown;
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

enum RetryDecision {
    Retry,
    Shutdown,
}

/// Wait out the retry delay. A manual reconnect cuts the wait short;
/// shutdown ends the task.
async fn wait_for_retry(
    state_tx: &watch::Sender<ConnectionState>,
    control_rx: &mut mpsc::Receiver<ControlCommand>,
) -> RetryDecision {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(RECONNECT_DELAY) => {
                // Stale-timer guard: dial only if nothing re-established
                // a session while the delay ran.
                if *state_tx.borrow() != ConnectionState::Connected {
                    return RetryDecision::Retry;
                }
            }

            cmd = control_rx.recv() => {
                match cmd {
                    Some(ControlCommand::Reconnect) => {
                        debug!("Manual reconnect requested during retry delay");
                        return RetryDecision::Retry;
                    }
                    Some(ControlCommand::Shutdown) | None => return RetryDecision::Shutdown,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// State Publication
// ---------------------------------------------------------------------------

/// Record a state transition and push the matching status update.
fn publish(
    state_tx: &watch::Sender<ConnectionState>,
    status_tx: &std::sync::mpsc::Sender<StatusUpdate>,
    state: ConnectionState,
) {
    let _ = state_tx.send(state);
    let _ = status_tx.send(StatusUpdate::for_state(state));
}

/// Events queued while the link was down are stale relative motion;
/// every session starts with an empty queue.
fn discard_stale_events(event_rx: &mut mpsc::Receiver<ClientEvent>) {
    let mut discarded = 0usize;
    while event_rx.try_recv().is_ok() {
        discarded += 1;
    }
    if discarded > 0 {
        debug!(discarded, "Dropped events queued while disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_updates_state_before_status() {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (status_tx, status_rx) = std::sync::mpsc::channel();

        publish(&state_tx, &status_tx, ConnectionState::Connected);

        // By the time a status update is observable, the watch cell
        // already holds the new state.
        let update = status_rx.try_recv().unwrap();
        assert_eq!(update.text, "Connected");
        assert_eq!(*state_rx.borrow(), ConnectionState::Connected);
    }

    #[test]
    fn stale_events_are_discarded_before_a_session() {
        let (event_tx, mut event_rx) = mpsc::channel(8);
        for _ in 0..3 {
            event_tx
                .try_send(ClientEvent::PointerMove {
                    dx: 1,
                    dy: 1,
                    timestamp: 0,
                })
                .unwrap();
        }

        discard_stale_events(&mut event_rx);

        assert!(event_rx.try_recv().is_err());
    }
}
