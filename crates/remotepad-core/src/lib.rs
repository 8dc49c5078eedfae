//! Core client logic for remotepad: a reconnecting WebSocket transport
//! and a gesture tracker that turns drags into relative pointer deltas.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use remotepad_core::{ConnectionManager, GestureTracker, ServerConfig};
//!
//! // Inside a tokio runtime:
//! let server = ServerConfig::default();
//! let (manager, status_rx) = ConnectionManager::connect(&server);
//! let tracker = GestureTracker::new(manager.clone());
//! # let _ = (tracker, status_rx);
//! ```

pub mod config;
pub mod connection;
pub mod errors;
pub mod gesture;
pub mod protocol;

pub use config::{PadConfig, ServerConfig};
pub use connection::{ConnectionManager, ConnectionState, StatusCategory, StatusUpdate};
pub use errors::ConfigError;
pub use gesture::{
    GestureOutcome, GestureTracker, PointerDelta, PointerSample, SurfaceEvent, TouchPoint,
    DELTA_DEADZONE,
};
pub use protocol::ClientEvent;
