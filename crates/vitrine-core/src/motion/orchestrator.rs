//! L3 Molecular Layer: Per-component owner of animated values
//!
//! An [`Orchestrator`] owns the animated values of one UI element instance and
//! a pure derive function that combines them into one style snapshot. The
//! snapshot is recomputed on frames where at least one driver ran and is
//! left frozen otherwise.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use super::driver::{CompletionCallback, DriverConfig};
use super::value::{AnimatedValue, Retarget, StepOutcome, ValueId};
use crate::{Error, Result};

/// Anything the host frame loop steps
pub trait Animated {
    /// Advance one frame; returns true if the rendered style changed
    fn frame(&mut self, dt: Duration) -> bool;

    /// At least one driver is still running
    fn is_animating(&self) -> bool;

    /// Stop all drivers and cancel pending work; idempotent
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// A single retarget request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetargetOp {
    pub value: ValueId,
    pub target: f64,
    pub driver: DriverConfig,
}

impl RetargetOp {
    pub fn new(value: ValueId, target: f64, driver: impl Into<DriverConfig>) -> Self {
        Self {
            value,
            target,
            driver: driver.into(),
        }
    }
}

/// Read-only view of the current values handed to derive functions
#[derive(Clone, Copy)]
pub struct Values<'a> {
    values: &'a [AnimatedValue],
}

impl<'a> Values<'a> {
    /// Current value of `id`; ids always come from the same orchestrator
    #[inline]
    pub fn get(&self, id: ValueId) -> f64 {
        self.values
            .get(id.index())
            .map(AnimatedValue::current)
            .unwrap_or_default()
    }
}

pub type DeriveFn<S> = Box<dyn Fn(&Values<'_>) -> S + Send>;

/// Collects initial values before the derive function is known
#[derive(Debug)]
pub struct OrchestratorBuilder {
    label: String,
    values: Vec<AnimatedValue>,
}

impl OrchestratorBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: Vec::new(),
        }
    }

    /// Register a value resting at `initial`
    pub fn value(&mut self, initial: f64) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(AnimatedValue::new(id, initial));
        id
    }

    /// Finish with the derive function; the first snapshot is computed here
    pub fn build<S, F>(self, derive: F) -> Orchestrator<S>
    where
        F: Fn(&Values<'_>) -> S + Send + 'static,
    {
        let snapshot = derive(&Values {
            values: &self.values,
        });
        Orchestrator {
            label: self.label,
            values: self.values,
            derive: Box::new(derive),
            snapshot,
            dirty: false,
            disposed: false,
            derivations: 1,
        }
    }
}

pub struct Orchestrator<S> {
    label: String,
    values: Vec<AnimatedValue>,
    derive: DeriveFn<S>,
    snapshot: S,
    /// Force one derivation on the next frame even if nothing is running
    dirty: bool,
    disposed: bool,
    derivations: u64,
}

impl<S: fmt::Debug> fmt::Debug for Orchestrator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("label", &self.label)
            .field("values", &self.values)
            .field("snapshot", &self.snapshot)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl<S> Orchestrator<S> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Latest style snapshot
    #[inline]
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    /// Number of times the derive function has run (including construction)
    pub fn derivations(&self) -> u64 {
        self.derivations
    }

    pub fn value(&self, id: ValueId) -> Option<&AnimatedValue> {
        self.values.get(id.index())
    }

    /// Current value of `id`
    pub fn current(&self, id: ValueId) -> f64 {
        self.values().get(id)
    }

    pub fn values(&self) -> Values<'_> {
        Values {
            values: &self.values,
        }
    }

    fn check(&self, op: &RetargetOp) -> Result<()> {
        let value = self
            .values
            .get(op.value.index())
            .ok_or(Error::UnknownValue(op.value))?;
        if !op.target.is_finite() {
            return Err(Error::InvalidTarget {
                value: value.id(),
                target: op.target,
            });
        }
        op.driver.validate()
    }

    /// Host entry point: retarget one value
    ///
    /// After disposal this is a silent no-op returning [`Retarget::Ignored`].
    pub fn retarget(
        &mut self,
        id: ValueId,
        target: f64,
        driver: impl Into<DriverConfig>,
    ) -> Result<Retarget> {
        if self.disposed {
            return Ok(Retarget::Ignored);
        }
        let value = self
            .values
            .get_mut(id.index())
            .ok_or(Error::UnknownValue(id))?;
        value.set_target(target, driver.into())
    }

    /// Retarget several values for one state change
    ///
    /// Every op is validated before any is applied, so a bad op leaves all
    /// values untouched.
    pub fn retarget_many(&mut self, ops: &[RetargetOp]) -> Result<Vec<Retarget>> {
        if self.disposed {
            return Ok(vec![Retarget::Ignored; ops.len()]);
        }
        for op in ops {
            self.check(op)?;
        }
        let mut outcomes = Vec::with_capacity(ops.len());
        for op in ops {
            outcomes.push(self.values[op.value.index()].set_target(op.target, op.driver)?);
        }
        Ok(outcomes)
    }

    /// Run `callback` once when the value's current driver ends
    ///
    /// Dropped without firing if the orchestrator is disposed first.
    pub fn on_complete(&mut self, id: ValueId, callback: CompletionCallback) {
        if self.disposed {
            return;
        }
        if let Some(value) = self.values.get_mut(id.index()) {
            value.on_complete(callback);
        }
    }

    /// Stop one value where it is, dropping its callbacks
    pub fn stop(&mut self, id: ValueId) {
        if let Some(value) = self.values.get_mut(id.index()) {
            value.stop();
            self.dirty = !self.disposed;
        }
    }

    /// Request one derivation on the next frame (e.g. derive inputs changed)
    pub fn invalidate(&mut self) {
        if !self.disposed {
            self.dirty = true;
        }
    }
}

impl<S> Animated for Orchestrator<S> {
    fn frame(&mut self, dt: Duration) -> bool {
        if self.disposed {
            return false;
        }

        let mut stepped = false;
        for value in &mut self.values {
            if value.step(dt) != StepOutcome::Idle {
                stepped = true;
            }
        }

        if !stepped && !self.dirty {
            return false;
        }

        self.snapshot = (self.derive)(&Values {
            values: &self.values,
        });
        self.dirty = false;
        self.derivations += 1;
        true
    }

    fn is_animating(&self) -> bool {
        !self.disposed && (self.dirty || self.values.iter().any(AnimatedValue::is_animating))
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for value in &mut self.values {
            value.stop();
        }
        self.disposed = true;
        self.dirty = false;
        debug!(orchestrator = %self.label, "Disposed");
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
