//! `ApplicationHandler` implementation driving the touch surface window.
//!
//! The whole window is the touchpad: drags anywhere on it move the
//! remote pointer, and the title doubles as the status display.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use remotepad_core::{
    ConnectionManager, GestureOutcome, GestureTracker, StatusUpdate, SurfaceEvent,
};

use crate::fingers::FingerRegistry;

/// How often to poll for status updates from the connection task.
const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Top-level application state.
pub struct PadApp {
    manager: ConnectionManager,
    tracker: GestureTracker,
    fingers: FingerRegistry,
    status_rx: Receiver<StatusUpdate>,

    window: Option<Window>,
    status_text: &'static str,

    // Cursor position tracking (winit sends clicks without coordinates)
    cursor_pos: (f64, f64),
    last_poll: Instant,
}

impl PadApp {
    pub fn new(manager: ConnectionManager, status_rx: Receiver<StatusUpdate>) -> Self {
        let tracker = GestureTracker::new(manager.clone());
        Self {
            manager,
            tracker,
            fingers: FingerRegistry::default(),
            status_rx,
            window: None,
            status_text: "Connecting...",
            cursor_pos: (0.0, 0.0),
            last_poll: Instant::now(),
        }
    }
}

impl ApplicationHandler for PadApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(format!("remotepad — {}", self.status_text));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.window = Some(window);
                tracing::info!("Window created");
            }
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.manager.shutdown();
                event_loop.exit();
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = (position.x, position.y);
                self.forward(SurfaceEvent::MouseMove {
                    x: position.x,
                    y: position.y,
                });
            }

            // Any button works as a drag trigger, like a physical touchpad.
            WindowEvent::MouseInput { state, .. } => {
                let (x, y) = self.cursor_pos;
                let event = match state {
                    ElementState::Pressed => SurfaceEvent::MouseDown { x, y },
                    ElementState::Released => SurfaceEvent::MouseUp,
                };
                self.forward(event);
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_status();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}

impl PadApp {
    /// Fold one winit touch event into the registry and forward the
    /// resulting surface event. Any finger lifting ends the drag.
    fn handle_touch(&mut self, touch: Touch) {
        let (x, y) = (touch.location.x, touch.location.y);
        let event = match touch.phase {
            TouchPhase::Started => {
                self.fingers.touch_started(touch.id, x, y);
                SurfaceEvent::TouchStart {
                    touches: self.fingers.touches(),
                }
            }
            TouchPhase::Moved => {
                self.fingers.touch_moved(touch.id, x, y);
                SurfaceEvent::TouchMove {
                    touches: self.fingers.touches(),
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.fingers.touch_ended(touch.id);
                SurfaceEvent::TouchEnd
            }
        };
        self.forward(event);
    }

    /// Hand a surface event to the tracker and mirror drag boundaries
    /// in the cursor icon.
    fn forward(&mut self, event: SurfaceEvent) {
        match self.tracker.handle(event) {
            GestureOutcome::DragStarted => self.set_drag_cursor(true),
            GestureOutcome::DragEnded => self.set_drag_cursor(false),
            GestureOutcome::Emitted(_) | GestureOutcome::Ignored => {}
        }
    }

    fn set_drag_cursor(&self, active: bool) {
        let Some(ref window) = self.window else {
            return;
        };
        let icon = if active {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Default
        };
        window.set_cursor(icon);
    }

    /// Drain status updates from the connection task (non-blocking).
    fn poll_status(&mut self) {
        while let Ok(update) = self.status_rx.try_recv() {
            tracing::debug!(
                category = update.category.as_str(),
                text = update.text,
                "Status update"
            );
            self.status_text = update.text;
            self.update_window_title();
        }
    }

    /// Update the window title to reflect the connection status.
    ///
    /// Format: "remotepad — {status}"
    fn update_window_title(&self) {
        let Some(ref window) = self.window else {
            return;
        };
        window.set_title(&format!("remotepad — {}", self.status_text));
    }
}

#[cfg(test)]
mod tests {
    use super::PadApp;
    use remotepad_core::{ConnectionManager, ServerConfig};

    #[tokio::test]
    async fn update_title_without_window_does_not_panic() {
        // Discard port; the task just retries in the background.
        let server = ServerConfig {
            origin: "http://127.0.0.1:9".into(),
        };
        let (manager, status_rx) = ConnectionManager::connect(&server);
        let mut app = PadApp::new(manager, status_rx);

        // window is None on a fresh app — should silently return
        app.update_window_title();
        app.poll_status();
    }
}
