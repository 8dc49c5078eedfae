//! Wire protocol for the client → server pointer stream.
//!
//! Events travel as JSON text frames tagged by a `type` field. The
//! stream is one-way: the server never sends typed messages back, and
//! inbound frames are dropped by the connection task.

use serde::Serialize;

use crate::gesture::PointerDelta;

/// Messages sent from the client to the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "pointer_move")]
    PointerMove { dx: i32, dy: i32, timestamp: i64 },
}

impl From<PointerDelta> for ClientEvent {
    fn from(delta: PointerDelta) -> Self {
        ClientEvent::PointerMove {
            dx: delta.dx,
            dy: delta.dy,
            timestamp: delta.timestamp,
        }
    }
}
