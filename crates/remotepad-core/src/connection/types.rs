//! State, status, and command types for the connection task.

// ---------------------------------------------------------------------------
// Connection State
// ---------------------------------------------------------------------------

/// Lifecycle state of the WebSocket transport.
///
/// Exactly one value holds at any instant; transitions happen only
/// inside the background connection task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A connection attempt is in flight.
    Connecting,
    /// The session is open; events may be transmitted.
    Connected,
    /// No session; a retry is pending.
    Disconnected,
    /// The last attempt or session failed.
    Error,
}

// ---------------------------------------------------------------------------
// Status Updates
// ---------------------------------------------------------------------------

/// Presentation category for a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Connected,
    Disconnected,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Connected => "connected",
            StatusCategory::Disconnected => "disconnected",
        }
    }
}

/// Human-readable connection status pushed to the presentation layer.
///
/// One update is published per state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub text: &'static str,
    pub category: StatusCategory,
}

impl StatusUpdate {
    pub(crate) fn for_state(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Connecting => Self {
                text: "Connecting...",
                category: StatusCategory::Disconnected,
            },
            ConnectionState::Connected => Self {
                text: "Connected",
                category: StatusCategory::Connected,
            },
            ConnectionState::Disconnected => Self {
                text: "Disconnected",
                category: StatusCategory::Disconnected,
            },
            ConnectionState::Error => Self {
                text: "Connection Error",
                category: StatusCategory::Disconnected,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Control commands sent to the connection task from the application layer.
///
/// Pointer events travel on their own channel so a queued backlog can be
/// discarded wholesale when a session is (re)established.
#[derive(Debug)]
pub(crate) enum ControlCommand {
    /// Drop the current session (if any) and dial again immediately.
    Reconnect,
    /// Stop the connection task for good.
    Shutdown,
}
