//! Drag tracking and delta extraction for the touch surface.
//!
//! One tracker instance lives on the winit thread. Touch and mouse
//! input share a single drag session and pointer sample, so either
//! modality can drive the remote cursor, one at a time.

use tracing::trace;

use crate::connection::ConnectionManager;
use crate::protocol::ClientEvent;

use super::types::{GestureOutcome, PointerDelta, PointerSample, SurfaceEvent};

/// Minimum pointer travel, in pixels on either axis, before a move is
/// treated as motion rather than jitter. Exclusive: a delta of exactly
/// 1.0 px on both axes does not emit.
pub const DELTA_DEADZONE: f64 = 1.0;

// =============================================================================
// TRACKER
// =============================================================================

/// Converts surface input into relative pointer deltas and forwards
/// them to the connection.
pub struct GestureTracker {
    connection: ConnectionManager,
    dragging: bool,
    last_sample: PointerSample,
}

impl GestureTracker {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection,
            dragging: false,
            last_sample: PointerSample { x: 0.0, y: 0.0 },
        }
    }

    /// Whether a drag session is active.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed one surface event through the tracker.
    ///
    /// Every event is consumed; the host suppresses its platform's
    /// default handling regardless of the outcome.
    pub fn handle(&mut self, event: SurfaceEvent) -> GestureOutcome {
        match event {
            SurfaceEvent::TouchStart { touches } => {
                self.dragging = true;
                if let Some(first) = touches.first() {
                    self.last_sample = PointerSample {
                        x: first.x,
                        y: first.y,
                    };
                }
                GestureOutcome::DragStarted
            }

            SurfaceEvent::TouchMove { touches } => match touches.first() {
                Some(first) => self.track_move(first.x, first.y),
                None => GestureOutcome::Ignored,
            },

            SurfaceEvent::TouchEnd => {
                self.dragging = false;
                GestureOutcome::DragEnded
            }

            SurfaceEvent::MouseDown { x, y } => {
                self.dragging = true;
                self.last_sample = PointerSample { x, y };
                GestureOutcome::DragStarted
            }

            SurfaceEvent::MouseMove { x, y } => self.track_move(x, y),

            SurfaceEvent::MouseUp => {
                self.dragging = false;
                GestureOutcome::DragEnded
            }

            // Consumed so the surface never shows a native menu.
            SurfaceEvent::ContextMenu => GestureOutcome::Ignored,
        }
    }

    /// Compute the delta from the last sample and emit it if it clears
    /// the deadzone.
    ///
    /// The sample only advances on emission, so sub-threshold motion
    /// accumulates against the last emitted position until it registers.
    /// Deltas computed while the connection is down are dropped, never
    /// queued.
    fn track_move(&mut self, x: f64, y: f64) -> GestureOutcome {
        if !self.dragging || !self.connection.is_connected() {
            return GestureOutcome::Ignored;
        }

        let dx = x - self.last_sample.x;
        let dy = y - self.last_sample.y;
        if dx.abs() <= DELTA_DEADZONE && dy.abs() <= DELTA_DEADZONE {
            return GestureOutcome::Ignored;
        }

        let delta = PointerDelta {
            dx: dx.round() as i32,
            dy: dy.round() as i32,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.last_sample = PointerSample { x, y };
        self.connection.send(ClientEvent::from(delta));
        trace!(dx = delta.dx, dy = delta.dy, "Pointer delta emitted");
        GestureOutcome::Emitted(delta)
    }
}

// =============================================================================
// TESTS
// =============================================================================
