//! L4 Atomic Layer: Time calculation utilities for drivers and the frame loop
//!
//! Provides pure functions for progress and interpolation, plus the frame
//! clock that turns wall time into per-frame deltas.

use std::time::{Duration, Instant};

/// Longest frame delta handed to drivers; anything longer is a hitch
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Calculate timing progress (0.0 to 1.0) from elapsed time and duration
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if a timed motion is complete
#[inline]
pub fn is_complete(elapsed: Duration, duration: Duration) -> bool {
    elapsed >= duration
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor, not clamped (values outside [0, 1] extrapolate)
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Tick interval for an animation frame rate
#[inline]
pub fn tick_duration(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16) // ~60fps fallback
    } else {
        Duration::from_millis(1000 / fps as u64)
    }
}

/// Measures wall time between frames
///
/// The first call to [`FrameClock::tick`] after creation or [`FrameClock::reset`]
/// reports a zero delta so idle periods never reach the drivers as one huge step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a frame boundary and return the clamped delta since the previous one
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Same as [`FrameClock::tick`] with an explicit timestamp
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).min(MAX_FRAME_DELTA),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous frame (e.g. after the loop went idle)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.5) - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(Duration::ZERO, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamps() {
        let d = Duration::from_millis(200);
        assert!((progress(Duration::from_millis(50), d) - 0.25).abs() < 1e-9);
        assert_eq!(progress(Duration::from_millis(500), d), 1.0);
        assert!(is_complete(Duration::from_millis(200), d));
        assert!(!is_complete(Duration::from_millis(199), d));
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(0), Duration::from_millis(16));
        assert_eq!(tick_duration(60), Duration::from_millis(16));
        assert_eq!(tick_duration(120), Duration::from_millis(8));
    }

    #[test]
    fn test_frame_clock_clamps_hitches() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        assert_eq!(clock.tick_at(start), Duration::ZERO);
        assert_eq!(
            clock.tick_at(start + Duration::from_millis(16)),
            Duration::from_millis(16)
        );
        assert_eq!(
            clock.tick_at(start + Duration::from_secs(5)),
            MAX_FRAME_DELTA
        );
        clock.reset();
        assert_eq!(clock.tick_at(start + Duration::from_secs(6)), Duration::ZERO);
    }
}
