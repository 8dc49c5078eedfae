//! Pointer, touch, and delta types for the gesture tracker.

// =============================================================================
// SAMPLES & DELTAS
// =============================================================================

/// The most recent known pointer position, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

/// One active touch point on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// A rounded frame-to-frame pointer movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDelta {
    pub dx: i32,
    pub dy: i32,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

// =============================================================================
// SURFACE EVENTS
// =============================================================================

/// Normalized input events fed to the tracker by the host surface.
///
/// Touch events carry the full list of active touches in start order;
/// mouse events carry the cursor position tracked by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    TouchStart { touches: Vec<TouchPoint> },
    TouchMove { touches: Vec<TouchPoint> },
    TouchEnd,
    MouseDown { x: f64, y: f64 },
    MouseMove { x: f64, y: f64 },
    MouseUp,
    ContextMenu,
}

/// What the tracker did with a surface event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// A drag session began; the host may show an active marker.
    DragStarted,
    /// A delta cleared the deadzone and was handed to the connection.
    Emitted(PointerDelta),
    /// The event was consumed without producing movement.
    Ignored,
    /// The drag session ended.
    DragEnded,
}
