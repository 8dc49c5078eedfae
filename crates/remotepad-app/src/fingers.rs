//! Active-finger bookkeeping for the touch surface.
//!
//! winit reports one finger per `Touch` event; the gesture tracker
//! wants the full list of active touches in start order. The registry
//! folds the per-finger stream back into that list.

use remotepad_core::TouchPoint;

#[derive(Default)]
pub struct FingerRegistry {
    fingers: Vec<Finger>,
}

struct Finger {
    id: u64,
    x: f64,
    y: f64,
}

impl FingerRegistry {
    /// Record a finger landing. A repeated id updates in place.
    pub fn touch_started(&mut self, id: u64, x: f64, y: f64) {
        match self.fingers.iter_mut().find(|f| f.id == id) {
            Some(finger) => {
                finger.x = x;
                finger.y = y;
            }
            None => self.fingers.push(Finger { id, x, y }),
        }
    }

    /// Record a finger moving. Unknown ids are ignored.
    pub fn touch_moved(&mut self, id: u64, x: f64, y: f64) {
        if let Some(finger) = self.fingers.iter_mut().find(|f| f.id == id) {
            finger.x = x;
            finger.y = y;
        }
    }

    /// Record a finger lifting (or its touch being cancelled).
    pub fn touch_ended(&mut self, id: u64) {
        self.fingers.retain(|f| f.id != id);
    }

    /// Active touches, in the order the fingers landed.
    pub fn touches(&self) -> Vec<TouchPoint> {
        self.fingers
            .iter()
            .map(|f| TouchPoint { x: f.x, y: f.y })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_keep_start_order() {
        let mut registry = FingerRegistry::default();
        registry.touch_started(7, 10.0, 10.0);
        registry.touch_started(3, 20.0, 20.0);

        let touches = registry.touches();
        assert_eq!(touches.len(), 2);
        assert_eq!(touches[0], TouchPoint { x: 10.0, y: 10.0 });
        assert_eq!(touches[1], TouchPoint { x: 20.0, y: 20.0 });
    }

    #[test]
    fn move_updates_in_place() {
        let mut registry = FingerRegistry::default();
        registry.touch_started(1, 10.0, 10.0);
        registry.touch_started(2, 20.0, 20.0);
        registry.touch_moved(1, 15.0, 12.0);

        let touches = registry.touches();
        assert_eq!(touches[0], TouchPoint { x: 15.0, y: 12.0 });
        assert_eq!(touches[1], TouchPoint { x: 20.0, y: 20.0 });
    }

    #[test]
    fn move_with_unknown_id_is_ignored() {
        let mut registry = FingerRegistry::default();
        registry.touch_moved(9, 1.0, 1.0);
        assert!(registry.touches().is_empty());
    }

    #[test]
    fn end_removes_only_that_finger() {
        let mut registry = FingerRegistry::default();
        registry.touch_started(1, 10.0, 10.0);
        registry.touch_started(2, 20.0, 20.0);
        registry.touch_ended(1);

        let touches = registry.touches();
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0], TouchPoint { x: 20.0, y: 20.0 });
    }

    #[test]
    fn repeated_start_updates_position() {
        let mut registry = FingerRegistry::default();
        registry.touch_started(1, 10.0, 10.0);
        registry.touch_started(1, 30.0, 30.0);

        let touches = registry.touches();
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0], TouchPoint { x: 30.0, y: 30.0 });
    }
}
