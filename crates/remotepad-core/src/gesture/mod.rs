//! Gesture interpretation for the touch surface.
//!
//! Translates normalized touch/mouse events into relative pointer
//! deltas: drag bookkeeping, deadzone filtering, and rounding.

mod tracker;
mod types;

pub use tracker::{GestureTracker, DELTA_DEADZONE};
pub use types::{GestureOutcome, PointerDelta, PointerSample, SurfaceEvent, TouchPoint};
