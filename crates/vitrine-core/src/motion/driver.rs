//! L4 Atomic Layer: Drivers that advance an animated value toward its target
//!
//! Two strategies exist. A spring integrates a damped oscillator with
//! semi-implicit Euler and carries velocity across retargets. A timing driver
//! eases from the value it started at over a fixed duration and has no
//! velocity of its own.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::easing::EasingCurve;
use super::timing::{is_complete, lerp, progress};
use crate::{Error, Result};

/// Default settle tolerance for both displacement and velocity
pub const DEFAULT_PRECISION: f64 = 0.01;

/// Longest single integration step; longer frames are subdivided, and stiff
/// or heavily damped springs use a shorter step (see [`SpringConfig::max_substep`])
pub const MAX_SPRING_SUBSTEP: Duration = Duration::from_millis(20);

/// Floor on the substep so absurdly stiff springs still finish a frame
const MIN_SPRING_SUBSTEP: Duration = Duration::from_micros(1);

/// Physical spring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Settle tolerance, applied to |current - target| and |velocity|
    #[serde(default = "default_precision")]
    pub precision: f64,
}

fn default_mass() -> f64 {
    1.0
}

fn default_precision() -> f64 {
    DEFAULT_PRECISION
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(170.0, 26.0)
    }
}

impl SpringConfig {
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            precision: DEFAULT_PRECISION,
        }
    }

    pub const fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub const fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Critically damped spring for a given stiffness and mass 1
    pub fn critically_damped(stiffness: f64) -> Self {
        Self::new(stiffness, 2.0 * stiffness.sqrt())
    }

    /// damping² ≥ 4·stiffness·mass: the spring never oscillates
    pub fn is_non_oscillating(&self) -> bool {
        self.damping * self.damping >= 4.0 * self.stiffness * self.mass
    }

    /// Longest step at which semi-implicit Euler stays stable and adds no
    /// oscillation of its own: h·(c/m + √(k/m)) ≤ 1
    pub fn max_substep(&self) -> Duration {
        let rate = self.damping / self.mass + (self.stiffness / self.mass).sqrt();
        let stable = Duration::try_from_secs_f64(1.0 / rate).unwrap_or(MAX_SPRING_SUBSTEP);
        stable.clamp(MIN_SPRING_SUBSTEP, MAX_SPRING_SUBSTEP)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.stiffness) {
            return Err(Error::InvalidDriver(format!(
                "spring stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(Error::InvalidDriver(format!(
                "spring damping must be non-negative, got {}",
                self.damping
            )));
        }
        if !positive(self.mass) {
            return Err(Error::InvalidDriver(format!(
                "spring mass must be positive, got {}",
                self.mass
            )));
        }
        if !positive(self.precision) {
            return Err(Error::InvalidDriver(format!(
                "spring precision must be positive, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Eased interpolation over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: EasingCurve,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new(250, EasingCurve::Cubic)
    }
}

impl TimingConfig {
    pub const fn new(duration_ms: u64, easing: EasingCurve) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.easing.is_valid() {
            return Err(Error::InvalidDriver(format!(
                "invalid easing curve {:?}",
                self.easing
            )));
        }
        Ok(())
    }
}

/// Strategy requested for a motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverConfig {
    Spring(SpringConfig),
    Timing(TimingConfig),
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            DriverConfig::Spring(spring) => spring.validate(),
            DriverConfig::Timing(timing) => timing.validate(),
        }
    }
}

impl From<SpringConfig> for DriverConfig {
    fn from(config: SpringConfig) -> Self {
        DriverConfig::Spring(config)
    }
}

impl From<TimingConfig> for DriverConfig {
    fn from(config: TimingConfig) -> Self {
        DriverConfig::Timing(config)
    }
}

/// How a driver ended, passed to its completion callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The driver settled on its target
    Finished,
    /// A newer target replaced this driver mid-flight
    Interrupted,
}

/// Invoked once when a driver ends
pub type CompletionCallback = Box<dyn FnOnce(Completion) + Send + 'static>;

/// Position and velocity of one animated value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Kinematics {
    pub current: f64,
    /// Units per second
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Spring(SpringConfig),
    Timing {
        config: TimingConfig,
        start: f64,
        elapsed: Duration,
    },
}

/// A running driver attached to one animated value
pub(crate) struct Driver {
    motion: Motion,
    callbacks: Vec<CompletionCallback>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("motion", &self.motion)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Driver {
    /// Start a driver from the value's present state
    ///
    /// Springs keep the incoming velocity. Timing drivers record the current
    /// position as their start and zero the velocity.
    pub fn start(config: DriverConfig, state: &mut Kinematics) -> Self {
        let motion = match config {
            DriverConfig::Spring(spring) => Motion::Spring(spring),
            DriverConfig::Timing(timing) => {
                state.velocity = 0.0;
                Motion::Timing {
                    config: timing,
                    start: state.current,
                    elapsed: Duration::ZERO,
                }
            }
        };
        Self {
            motion,
            callbacks: Vec::new(),
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self.motion, Motion::Spring(_))
    }

    pub fn push_callback(&mut self, callback: CompletionCallback) {
        self.callbacks.push(callback);
    }

    pub fn take_callbacks(&mut self) -> Vec<CompletionCallback> {
        std::mem::take(&mut self.callbacks)
    }

    /// Advance one frame; returns true once the motion has settled
    ///
    /// On settle the state is snapped exactly onto `target` with zero velocity.
    pub fn step(&mut self, state: &mut Kinematics, target: f64, dt: Duration) -> bool {
        match &mut self.motion {
            Motion::Spring(spring) => {
                let mut remaining = dt.as_secs_f64();
                let max = spring.max_substep().as_secs_f64();
                while remaining > 0.0 {
                    let h = remaining.min(max);
                    spring_substep(spring, state, target, h);
                    remaining -= h;
                }
                let settled = state.velocity.abs() < spring.precision
                    && (state.current - target).abs() < spring.precision;
                if settled {
                    state.current = target;
                    state.velocity = 0.0;
                }
                settled
            }
            Motion::Timing {
                config,
                start,
                elapsed,
            } => {
                *elapsed += dt;
                let duration = config.duration();
                if is_complete(*elapsed, duration) {
                    state.current = target;
                    state.velocity = 0.0;
                    return true;
                }
                let t = progress(*elapsed, duration);
                state.current = lerp(*start, target, config.easing.apply(t));
                false
            }
        }
    }
}

/// accel = (-k·(x - target) - c·v) / m; v += accel·dt; x += v·dt
#[inline]
fn spring_substep(spring: &SpringConfig, state: &mut Kinematics, target: f64, dt: f64) {
    let displacement = state.current - target;
    let accel = (-spring.stiffness * displacement - spring.damping * state.velocity) / spring.mass;
    state.velocity += accel * dt;
    state.current += state.velocity * dt;
}
