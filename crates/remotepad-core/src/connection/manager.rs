//! Public handle for interacting with the pointer-stream connection.

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::protocol::ClientEvent;

use super::task::connection_loop;
use super::types::{ConnectionState, ControlCommand, StatusUpdate};

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Handle for interacting with the pointer-stream connection.
///
/// All methods are non-blocking and safe to call from the winit thread;
/// the work happens on the background connection task. The handle is
/// cheap to clone, and every clone talks to the same connection.
#[derive(Clone)]
pub struct ConnectionManager {
    event_tx: mpsc::Sender<ClientEvent>,
    control_tx: mpsc::Sender<ControlCommand>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl ConnectionManager {
    /// Create a manager and start the background connection task.
    /// Returns `(manager, status_receiver)`.
    ///
    /// The task dials immediately; the initial state is `Connecting`.
    /// Must be called from within a tokio runtime.
    pub fn connect(server: &ServerConfig) -> (Self, std::sync::mpsc::Receiver<StatusUpdate>) {
        let (event_tx, event_rx) = mpsc::channel(64);
        let (control_tx, control_rx) = mpsc::channel(4);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (status_tx, status_rx) = std::sync::mpsc::channel();

        tokio::spawn(connection_loop(
            server.websocket_url(),
            state_tx,
            status_tx,
            event_rx,
            control_rx,
        ));

        (
            Self {
                event_tx,
                control_tx,
                state_rx,
            },
            status_rx,
        )
    }

    /// Queue a client event for transmission.
    ///
    /// A no-op while the connection is not established: the event is
    /// dropped, never buffered for later delivery. A full queue is
    /// logged and the event is likewise dropped.
    pub fn send(&self, event: ClientEvent) {
        if !self.is_connected() {
            debug!("Not connected, dropping event");
            return;
        }
        if let Err(e) = self.event_tx.try_send(event) {
            warn!(error = %e, "Failed to queue event");
        }
    }

    /// Drop the current session (if any) and dial again immediately,
    /// superseding any pending retry timer.
    pub fn reconnect(&self) {
        let _ = self.control_tx.try_send(ControlCommand::Reconnect);
    }

    /// Stop the background connection task.
    pub fn shutdown(&self) {
        let _ = self.control_tx.try_send(ControlCommand::Shutdown);
    }

    /// Current transport state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Whether events sent now will be transmitted.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Build a manager wired to loose channel ends, for exercising
    /// send gating and gesture logic without a live socket.
    #[cfg(test)]
    pub(crate) fn test_pair(
        initial: ConnectionState,
    ) -> (
        Self,
        mpsc::Receiver<ClientEvent>,
        watch::Sender<ConnectionState>,
    ) {
        let (event_tx, event_rx) = mpsc::channel(64);
        let (control_tx, _control_rx) = mpsc::channel(4);
        let (state_tx, state_rx) = watch::channel(initial);
        (
            Self {
                event_tx,
                control_tx,
                state_rx,
            },
            event_rx,
            state_tx,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    use super::super::task::RECONNECT_DELAY;
    use super::*;

    async fn next_status(rx: &std::sync::mpsc::Receiver<StatusUpdate>) -> StatusUpdate {
        for _ in 0..500 {
            if let Ok(update) = rx.try_recv() {
                return update;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for status update");
    }

    #[test]
    fn send_while_disconnected_drops_event() {
        let (manager, mut event_rx, _state_tx) =
            ConnectionManager::test_pair(ConnectionState::Disconnected);

        manager.send(ClientEvent::PointerMove {
            dx: 5,
            dy: 0,
            timestamp: 0,
        });

        assert!(event_rx.try_recv().is_err());
    }

    #[test]
    fn send_while_connected_queues_event() {
        let (manager, mut event_rx, _state_tx) =
            ConnectionManager::test_pair(ConnectionState::Connected);

        manager.send(ClientEvent::PointerMove {
            dx: 3,
            dy: 1,
            timestamp: 0,
        });

        let event = event_rx.try_recv().unwrap();
        assert!(matches!(event, ClientEvent::PointerMove { dx: 3, dy: 1, .. }));
    }

    #[test]
    fn state_tracks_watch_updates() {
        let (manager, _event_rx, state_tx) =
            ConnectionManager::test_pair(ConnectionState::Connecting);
        assert_eq!(manager.state(), ConnectionState::Connecting);
        assert!(!manager.is_connected());

        state_tx.send(ConnectionState::Connected).unwrap();
        assert!(manager.is_connected());

        state_tx.send(ConnectionState::Disconnected).unwrap();
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn session_lifecycle_against_local_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let frame = ws.next().await.unwrap().unwrap();
            let text = frame.into_text().unwrap();
            ws.close(None).await.unwrap();
            text
        });

        let config = ServerConfig {
            origin: format!("http://{addr}"),
        };
        let (manager, status_rx) = ConnectionManager::connect(&config);

        assert_eq!(next_status(&status_rx).await.text, "Connecting...");
        assert_eq!(next_status(&status_rx).await.text, "Connected");
        assert!(manager.is_connected());

        manager.send(ClientEvent::PointerMove {
            dx: 3,
            dy: 1,
            timestamp: 7,
        });

        let received = server.await.unwrap();
        assert_eq!(
            received.as_str(),
            r#"{"type":"pointer_move","dx":3,"dy":1,"timestamp":7}"#
        );

        assert_eq!(next_status(&status_rx).await.text, "Disconnected");
        assert!(!manager.is_connected());

        // The retry timer fires on its own after the fixed delay.
        let waited = Instant::now();
        assert_eq!(next_status(&status_rx).await.text, "Connecting...");
        assert!(waited.elapsed() >= RECONNECT_DELAY - Duration::from_millis(500));

        manager.shutdown();
    }

    #[tokio::test]
    async fn server_pings_are_answered_with_pongs() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.send(Message::Ping(vec![1, 2, 3].into())).await.unwrap();
            loop {
                match ws.next().await {
                    Some(Ok(Message::Pong(payload))) => return payload,
                    Some(Ok(_)) => {}
                    other => panic!("expected a pong, got {other:?}"),
                }
            }
        });

        let config = ServerConfig {
            origin: format!("http://{addr}"),
        };
        let (manager, status_rx) = ConnectionManager::connect(&config);

        assert_eq!(next_status(&status_rx).await.text, "Connecting...");
        assert_eq!(next_status(&status_rx).await.text, "Connected");

        // The pong must echo the ping payload.
        let payload = server.await.unwrap();
        assert_eq!(payload.to_vec(), vec![1, 2, 3]);

        manager.shutdown();
        assert_eq!(next_status(&status_rx).await.text, "Disconnected");
    }

    #[tokio::test]
    async fn manual_reconnect_skips_retry_delay() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.close(None).await.unwrap();
        });

        let config = ServerConfig {
            origin: format!("http://{addr}"),
        };
        let (manager, status_rx) = ConnectionManager::connect(&config);

        assert_eq!(next_status(&status_rx).await.text, "Connecting...");
        assert_eq!(next_status(&status_rx).await.text, "Connected");
        assert_eq!(next_status(&status_rx).await.text, "Disconnected");
        server.await.unwrap();

        // Nobody is listening anymore; a manual reconnect must dial
        // before the retry timer would have.
        let started = Instant::now();
        manager.reconnect();
        assert_eq!(next_status(&status_rx).await.text, "Connecting...");
        assert!(started.elapsed() < RECONNECT_DELAY);

        assert_eq!(next_status(&status_rx).await.text, "Connection Error");
        assert_eq!(next_status(&status_rx).await.text, "Disconnected");

        manager.shutdown();
        let mut closed = false;
        for _ in 0..500 {
            match status_rx.try_recv() {
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
        assert!(closed, "status channel should close on shutdown");
    }
}
