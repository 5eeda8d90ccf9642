//! Drag gesture state machine.
//!
//! During a drag only pixel offsets are tracked; the Cartesian viewport is
//! changed once, when the gesture finishes.

use sigmet_core::PixelPoint;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Active {
        origin: PixelPoint,
        last: PixelPoint,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active { .. })
    }

    /// Begin a drag at `point`. Returns true if an unfinished drag was
    /// discarded.
    pub fn start(&mut self, point: PixelPoint) -> bool {
        let discarded = self.is_active();
        self.state = DragState::Active {
            origin: point,
            last: point,
        };
        discarded
    }

    /// Offset since the previous event, or `None` when idle
    pub fn move_to(&mut self, point: PixelPoint) -> Option<(f64, f64)> {
        match &mut self.state {
            DragState::Active { last, .. } => {
                let delta = point.delta_from(*last);
                *last = point;
                Some(delta)
            }
            DragState::Idle => None,
        }
    }

    /// Offset from the drag origin to `point`; returns to idle
    pub fn finish(&mut self, point: PixelPoint) -> Option<(f64, f64)> {
        match std::mem::take(&mut self.state) {
            DragState::Active { origin, .. } => Some(point.delta_from(origin)),
            DragState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_sequence() {
        let mut drag = DragTracker::new();
        assert!(!drag.start(PixelPoint::new(10.0, 10.0)));
        assert_eq!(drag.move_to(PixelPoint::new(15.0, 12.0)), Some((5.0, 2.0)));
        assert_eq!(drag.move_to(PixelPoint::new(20.0, 8.0)), Some((5.0, -4.0)));
        assert_eq!(drag.finish(PixelPoint::new(22.0, 8.0)), Some((12.0, -2.0)));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_idle_events_ignored() {
        let mut drag = DragTracker::new();
        assert_eq!(drag.move_to(PixelPoint::new(1.0, 1.0)), None);
        assert_eq!(drag.finish(PixelPoint::new(1.0, 1.0)), None);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_restart_overwrites() {
        let mut drag = DragTracker::new();
        drag.start(PixelPoint::new(0.0, 0.0));
        drag.move_to(PixelPoint::new(50.0, 50.0));
        assert!(drag.start(PixelPoint::new(100.0, 100.0)));
        assert_eq!(drag.finish(PixelPoint::new(110.0, 90.0)), Some((10.0, -10.0)));
    }

    #[test]
    fn test_cancel() {
        let mut drag = DragTracker::new();
        drag.start(PixelPoint::new(3.0, 4.0));
        drag.cancel();
        assert_eq!(drag.finish(PixelPoint::new(5.0, 5.0)), None);
    }
}
