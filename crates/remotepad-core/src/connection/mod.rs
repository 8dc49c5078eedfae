//! Reconnecting WebSocket transport for the pointer event stream.
//!
//! A cheap cloneable handle (`ConnectionManager`) fronts a background
//! tokio task that dials the server, detects loss, and re-dials on a
//! fixed delay. State transitions publish status updates for the
//! presentation layer.

mod manager;
mod task;
mod types;

pub use manager::ConnectionManager;
pub use types::{ConnectionState, StatusCategory, StatusUpdate};
