//! L3 Molecular Layer: Press feedback
//!
//! The [`GestureBridge`] turns press transitions from the input layer into
//! retargets of one dedicated "squeeze" value: a fast stiff spring down to the
//! pressed value, then a gentler spring back to whatever resting target the
//! owner computes at release time.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::driver::SpringConfig;
use super::orchestrator::Orchestrator;
use super::value::{Retarget, ValueId};
use crate::config::{
    default_press_spring, default_pressed_scale, default_release_spring, default_tap_hold,
};
use crate::{Error, Result};

/// Press transition reported by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressEvent {
    Down,
    Up,
    /// The pointer left or the press was aborted; releases like `Up`
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressPhase {
    Idle,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressConfig {
    /// Value the squeeze cell is driven to while pressed
    #[serde(default = "default_pressed_scale")]
    pub pressed_value: f64,
    #[serde(default = "default_press_spring")]
    pub press_spring: SpringConfig,
    #[serde(default = "default_release_spring")]
    pub release_spring: SpringConfig,
    /// How long a keyboard "tap" holds the press before releasing
    #[serde(default = "default_tap_hold")]
    pub tap_hold_ms: u64,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            pressed_value: default_pressed_scale(),
            press_spring: default_press_spring(),
            release_spring: default_release_spring(),
            tap_hold_ms: default_tap_hold(),
        }
    }
}

impl PressConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.pressed_value.is_finite() {
            return Err(Error::Config(format!(
                "pressed value must be finite, got {}",
                self.pressed_value
            )));
        }
        self.press_spring.validate()?;
        self.release_spring.validate()
    }
}

#[derive(Debug, Clone)]
pub struct GestureBridge {
    squeeze: ValueId,
    config: PressConfig,
    phase: PressPhase,
    /// Remaining hold of a tap before its automatic release
    pending_release: Option<Duration>,
    disposed: bool,
}

impl GestureBridge {
    pub fn new(squeeze: ValueId, config: PressConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            squeeze,
            config,
            phase: PressPhase::Idle,
            pending_release: None,
            disposed: false,
        })
    }

    pub fn squeeze(&self) -> ValueId {
        self.squeeze
    }

    pub fn config(&self) -> &PressConfig {
        &self.config
    }

    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.phase == PressPhase::Pressed
    }

    /// Waiting on a tap's automatic release
    pub fn has_pending_release(&self) -> bool {
        self.pending_release.is_some()
    }

    /// Squeeze immediately with the fast spring
    pub fn press_down<S>(&mut self, orch: &mut Orchestrator<S>) -> Result<Retarget> {
        if self.disposed {
            return Ok(Retarget::Ignored);
        }
        self.phase = PressPhase::Pressed;
        self.pending_release = None;
        debug!(value = %self.squeeze, "Press down");
        orch.retarget(self.squeeze, self.config.pressed_value, self.config.press_spring)
    }

    /// Release toward `resting`, which the owner computes from live state at
    /// the moment of release
    pub fn press_up<S>(&mut self, orch: &mut Orchestrator<S>, resting: f64) -> Result<Retarget> {
        if self.disposed || self.phase != PressPhase::Pressed {
            return Ok(Retarget::Ignored);
        }
        self.phase = PressPhase::Idle;
        self.pending_release = None;
        debug!(value = %self.squeeze, resting, "Press up");
        orch.retarget(self.squeeze, resting, self.config.release_spring)
    }

    /// Route a press transition; `resting` is only evaluated on release
    pub fn handle<S>(
        &mut self,
        event: PressEvent,
        orch: &mut Orchestrator<S>,
        resting: impl FnOnce() -> f64,
    ) -> Result<Retarget> {
        match event {
            PressEvent::Down => self.press_down(orch),
            PressEvent::Up | PressEvent::Cancel => self.press_up(orch, resting()),
        }
    }

    /// Press now and release after the configured hold
    ///
    /// Terminals report key presses without releases, so keyboard activation
    /// goes through here.
    pub fn tap<S>(&mut self, orch: &mut Orchestrator<S>) -> Result<Retarget> {
        let outcome = self.press_down(orch)?;
        if outcome != Retarget::Ignored {
            self.pending_release = Some(Duration::from_millis(self.config.tap_hold_ms));
        }
        Ok(outcome)
    }

    /// Count down a pending tap release; releases toward `resting()` when due
    pub fn advance<S>(
        &mut self,
        dt: Duration,
        orch: &mut Orchestrator<S>,
        resting: impl FnOnce() -> f64,
    ) -> Result<Option<Retarget>> {
        let Some(remaining) = self.pending_release else {
            return Ok(None);
        };
        if self.disposed {
            self.pending_release = None;
            return Ok(None);
        }
        if remaining > dt {
            self.pending_release = Some(remaining - dt);
            return Ok(None);
        }
        self.press_up(orch, resting()).map(Some)
    }

    /// Forget any in-flight press; later events are ignored
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.pending_release = None;
        self.phase = PressPhase::Idle;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
