//! Frame clock
//!
//! Turns the host's monotonic frame timestamps (milliseconds) into bounded
//! simulation steps (seconds).

use serde::{Deserialize, Serialize};

use crate::consts::MAX_DELTA;

/// Step length between two timestamps, capped at `max_delta`
///
/// A clock that runs backwards yields a zero step.
#[inline]
pub fn delta_seconds(previous_ms: f64, now_ms: f64, max_delta: f32) -> f32 {
    let elapsed = ((now_ms - previous_ms) / 1000.0).max(0.0);
    elapsed.min(max_delta as f64) as f32
}

/// Remembers the previous frame timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stepper {
    previous_ms: Option<f64>,
}

impl Stepper {
    pub fn new() -> Self {
        Self { previous_ms: None }
    }

    /// Step for the frame at `now_ms`
    ///
    /// The first frame after a reset only anchors the clock and returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.previous_ms {
            Some(previous) => delta_seconds(previous, now_ms, MAX_DELTA),
            None => 0.0,
        };
        self.previous_ms = Some(now_ms);
        dt
    }

    /// Re-anchor at `now_ms` so time before it is never simulated
    pub fn anchor(&mut self, now_ms: f64) {
        self.previous_ms = Some(now_ms);
    }

    /// Forget the anchor; the next frame re-anchors
    pub fn clear(&mut self) {
        self.previous_ms = None;
    }

    pub fn previous_ms(&self) -> Option<f64> {
        self.previous_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_delta_is_seconds() {
        let dt = delta_seconds(1000.0, 1016.0, MAX_DELTA);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_capped_exactly() {
        assert_eq!(delta_seconds(0.0, 10_000.0, MAX_DELTA), MAX_DELTA);
    }

    #[test]
    fn test_backwards_clock_is_zero() {
        assert_eq!(delta_seconds(500.0, 400.0, MAX_DELTA), 0.0);
    }

    #[test]
    fn test_first_frame_anchors() {
        let mut stepper = Stepper::new();
        assert_eq!(stepper.advance(5_000.0), 0.0);
        assert_eq!(stepper.previous_ms(), Some(5_000.0));
        let dt = stepper.advance(5_050.0);
        assert!((dt - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_anchor_drops_stale_time() {
        let mut stepper = Stepper::new();
        stepper.advance(0.0);
        // Backgrounded for a minute, re-anchored on resume
        stepper.anchor(60_000.0);
        let dt = stepper.advance(60_016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_delta_never_exceeds_cap(prev in 0.0f64..1e7, gap in 0.0f64..1e6) {
            let dt = delta_seconds(prev, prev + gap, MAX_DELTA);
            prop_assert!((0.0..=MAX_DELTA).contains(&dt));
        }
    }
}
