//! L3 Molecular Layer: A single animated numeric cell
//!
//! An [`AnimatedValue`] holds its current value, velocity and target, plus at
//! most one running driver. `current` only ever changes inside [`AnimatedValue::step`].

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::driver::{Completion, CompletionCallback, Driver, DriverConfig, Kinematics};
use crate::{Error, Result};

/// Identifier of an animated value within its owning orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub(crate) u32);

impl ValueId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Lifecycle of the most recent motion
///
/// A retarget in flight ends the old motion as interrupted and starts a new
/// one, so the phase stays `Animating`; the interruption is reported through
/// [`Retarget::Interrupted`] and [`Completion::Interrupted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Animating,
    Completed,
    /// Halted short of the target by [`AnimatedValue::stop`] or disposal
    Stopped,
}

/// Outcome of a retarget request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retarget {
    /// A driver started from rest
    Started,
    /// A running driver was replaced mid-flight
    Interrupted,
    /// Already resting on the requested target; no driver needed
    AtRest,
    /// The owner was disposed; nothing happened
    Ignored,
}

/// Result of stepping a value by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No driver attached
    Idle,
    Running,
    /// The driver settled during this step
    Settled,
}

pub struct AnimatedValue {
    id: ValueId,
    state: Kinematics,
    target: f64,
    driver: Option<Driver>,
    phase: MotionPhase,
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("id", &self.id)
            .field("current", &self.state.current)
            .field("velocity", &self.state.velocity)
            .field("target", &self.target)
            .field("driver", &self.driver)
            .field("phase", &self.phase)
            .finish()
    }
}

impl AnimatedValue {
    /// Create a value resting at `initial`
    pub fn new(id: ValueId, initial: f64) -> Self {
        Self {
            id,
            state: Kinematics {
                current: initial,
                velocity: 0.0,
            },
            target: initial,
            driver: None,
            phase: MotionPhase::Idle,
        }
    }

    #[inline]
    pub fn id(&self) -> ValueId {
        self.id
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.state.current
    }

    /// Velocity in units per second (always zero under a timing driver)
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.driver.is_some()
    }

    /// No driver is running
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.driver.is_none()
    }

    /// Begin or retarget motion toward `target`
    ///
    /// A non-finite target or an invalid driver configuration is rejected and
    /// leaves the value untouched. When a driver is already running it is
    /// replaced in place: its callbacks receive [`Completion::Interrupted`]
    /// and the new driver starts from the present position (springs also keep
    /// the present velocity).
    pub fn set_target(&mut self, target: f64, config: DriverConfig) -> Result<Retarget> {
        if !target.is_finite() {
            warn!(value = %self.id, to = target, "Rejected non-finite target");
            return Err(Error::InvalidTarget {
                value: self.id,
                target,
            });
        }
        if let Err(e) = config.validate() {
            warn!(value = %self.id, error = %e, "Rejected driver configuration");
            return Err(e);
        }

        let previous = self.driver.take();
        let interrupted = previous.is_some();

        if !interrupted && self.state.current == target && self.state.velocity == 0.0 {
            self.target = target;
            return Ok(Retarget::AtRest);
        }

        self.target = target;
        self.driver = Some(Driver::start(config, &mut self.state));
        self.phase = MotionPhase::Animating;

        if let Some(mut old) = previous {
            debug!(
                value = %self.id,
                from = self.state.current,
                to = target,
                "Retargeted in flight"
            );
            for callback in old.take_callbacks() {
                callback(Completion::Interrupted);
            }
            Ok(Retarget::Interrupted)
        } else {
            debug!(value = %self.id, from = self.state.current, to = target, "Driver started");
            Ok(Retarget::Started)
        }
    }

    /// Register a callback for the running driver's end
    ///
    /// With no driver running the value is already at rest, so the callback
    /// fires immediately with [`Completion::Finished`].
    pub fn on_complete(&mut self, callback: CompletionCallback) {
        match self.driver.as_mut() {
            Some(driver) => driver.push_callback(callback),
            None => callback(Completion::Finished),
        }
    }

    /// Advance by one frame
    pub fn step(&mut self, dt: Duration) -> StepOutcome {
        let Some(driver) = self.driver.as_mut() else {
            return StepOutcome::Idle;
        };

        if !driver.step(&mut self.state, self.target, dt) {
            return StepOutcome::Running;
        }

        let callbacks = driver.take_callbacks();
        self.driver = None;
        self.phase = MotionPhase::Completed;
        trace!(value = %self.id, at = self.state.current, "Driver settled");
        for callback in callbacks {
            callback(Completion::Finished);
        }
        StepOutcome::Settled
    }

    /// Stop the running driver where it is, dropping its callbacks unfired
    pub fn stop(&mut self) {
        if self.driver.take().is_some() {
            self.state.velocity = 0.0;
            self.phase = MotionPhase::Stopped;
        }
    }

    /// Whether the running driver is a spring
    pub fn is_spring_driven(&self) -> bool {
        self.driver.as_ref().is_some_and(Driver::is_spring)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::motion::driver::{SpringConfig, TimingConfig};
    use crate::motion::easing::EasingCurve;
    use crate::motion::timing::MAX_FRAME_DELTA;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn value(initial: f64) -> AnimatedValue {
        AnimatedValue::new(ValueId(0), initial)
    }

    /// Step from `from` to `to` until settled, checking every frame
    fn settle(spring: SpringConfig, from: f64, to: f64, dt: Duration) -> usize {
        let mut v = value(from);
        v.set_target(to, spring.into()).unwrap();
        let tolerance = spring.precision;
        let max_frames = (60.0 / dt.as_secs_f64()) as usize;
        let mut frames = 0;
        while v.step(dt) != StepOutcome::Settled {
            let current = v.current();
            assert!(current.is_finite(), "{:?} diverged at frame {}", spring, frames);
            let past = if to > from { current - to } else { to - current };
            assert!(past <= tolerance, "{:?} overshot by {}", spring, past);
            frames += 1;
            assert!(frames < max_frames, "{:?} did not settle at {:?}", spring, dt);
        }
        assert_eq!(v.current(), to);
        assert_eq!(v.velocity(), 0.0);
        assert_eq!(v.phase(), MotionPhase::Completed);
        frames
    }

    #[test]
    fn test_non_oscillating_springs_settle_without_overshoot() {
        for dt in [FRAME, MAX_FRAME_DELTA] {
            for stiffness in [50.0, 400.0, 5000.0] {
                for mass in [0.25, 1.0, 4.0] {
                    for ratio in [1.0, 2.0, 4.0] {
                        let damping = ratio * 2.0 * f64::sqrt(stiffness * mass);
                        let spring = SpringConfig::new(stiffness, damping).with_mass(mass);
                        assert!(spring.is_non_oscillating());
                        settle(spring, 0.0, 100.0, dt);
                        settle(spring, 1.0, 0.5, dt);
                    }
                }
            }
        }
    }

    #[test]
    fn test_stiff_and_heavily_damped_springs_stay_finite() {
        for spring in [
            SpringConfig::new(100.0, 200.0),
            SpringConfig::new(300.0, 40.0).with_mass(0.25),
        ] {
            settle(spring, 0.0, 100.0, FRAME);
        }
        settle(SpringConfig::critically_damped(5000.0), 1.0, 0.95, FRAME);
    }

    #[test]
    fn test_spring_retarget_is_continuous() {
        let mut v = value(0.0);
        let spring = SpringConfig::new(170.0, 12.0);
        v.set_target(100.0, spring.into()).unwrap();
        for _ in 0..6 {
            v.step(FRAME);
        }
        let before = v.current();
        let velocity = v.velocity();
        assert!(velocity > 0.0);

        assert_eq!(v.set_target(-50.0, spring.into()).unwrap(), Retarget::Interrupted);
        assert_eq!(v.current(), before);
        assert_eq!(v.velocity(), velocity);

        // The first step after retarget still moves forward on inherited velocity
        v.step(Duration::from_millis(1));
        assert!((v.current() - before).abs() < velocity.abs() * 0.002 + 1e-6);
    }

    #[test]
    fn test_timing_retarget_drops_velocity() {
        let mut v = value(0.0);
        v.set_target(100.0, SpringConfig::new(170.0, 12.0).into())
            .unwrap();
        for _ in 0..6 {
            v.step(FRAME);
        }
        let before = v.current();
        assert!(v.velocity() > 0.0);

        let timing = TimingConfig::new(200, EasingCurve::Linear);
        v.set_target(0.0, timing.into()).unwrap();
        assert_eq!(v.current(), before);
        assert_eq!(v.velocity(), 0.0);
        assert!(!v.is_spring_driven());

        v.step(Duration::from_millis(100));
        assert!((v.current() - before / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_write_wins() {
        let mut v = value(0.0);
        let spring = SpringConfig::critically_damped(200.0);
        v.set_target(10.0, spring.into()).unwrap();
        v.set_target(20.0, spring.into()).unwrap();
        assert_eq!(v.target(), 20.0);
        while !v.is_settled() {
            v.step(FRAME);
        }
        assert_eq!(v.current(), 20.0);
    }

    #[test]
    fn test_nan_target_rejected_without_corruption() {
        let mut v = value(3.0);
        let spring = SpringConfig::default();
        v.set_target(5.0, spring.into()).unwrap();
        v.step(FRAME);
        let (current, velocity) = (v.current(), v.velocity());

        let err = v.set_target(f64::NAN, spring.into()).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { .. }));
        assert!(v.set_target(f64::INFINITY, spring.into()).is_err());

        assert_eq!(v.current(), current);
        assert_eq!(v.velocity(), velocity);
        assert_eq!(v.target(), 5.0);
        assert!(v.is_animating());
    }

    #[test]
    fn test_invalid_driver_rejected() {
        let mut v = value(0.0);
        let err = v
            .set_target(1.0, SpringConfig::new(-1.0, 1.0).into())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDriver(_)));
        assert!(v.is_settled());
        assert_eq!(v.phase(), MotionPhase::Idle);
    }

    #[test]
    fn test_at_rest_retarget_is_noop() {
        let mut v = value(1.0);
        assert_eq!(
            v.set_target(1.0, SpringConfig::default().into()).unwrap(),
            Retarget::AtRest
        );
        assert!(v.is_settled());
    }

    #[test]
    fn test_completion_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut v = value(0.0);
        v.set_target(1.0, TimingConfig::new(50, EasingCurve::Linear).into())
            .unwrap();
        let c = Arc::clone(&count);
        v.on_complete(Box::new(move |completion: Completion| {
            assert_eq!(completion, Completion::Finished);
            c.fetch_add(1, Ordering::SeqCst);
        }));
        for _ in 0..10 {
            v.step(FRAME);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interrupted_callbacks_are_told() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut v = value(0.0);
        let spring = SpringConfig::default();
        v.set_target(1.0, spring.into()).unwrap();
        let s = Arc::clone(&seen);
        v.on_complete(Box::new(move |c: Completion| s.lock().unwrap().push(c)));
        v.set_target(2.0, spring.into()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Completion::Interrupted]);
        assert_eq!(v.phase(), MotionPhase::Animating);
    }

    #[test]
    fn test_stop_drops_callbacks() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut v = value(0.0);
        v.set_target(1.0, SpringConfig::default().into()).unwrap();
        let c = Arc::clone(&count);
        v.on_complete(Box::new(move |_: Completion| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        v.stop();
        assert_eq!(v.phase(), MotionPhase::Stopped);
        for _ in 0..100 {
            v.step(FRAME);
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
