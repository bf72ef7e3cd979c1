//! Selectable filter chip
//!
//! One state change ("becomes selected") retargets four values with their own
//! drivers: scale and icon rotation on springs, background progress and
//! border width on timing fades. Scale doubles as the press squeeze, so its
//! bounce-back target is read from the live selection at release.

use std::time::Duration;

use serde::Serialize;

use crate::config::MotionConfig;
use crate::motion::{
    Animated, Color, EasingCurve, GestureBridge, Interpolator, Orchestrator, OrchestratorBuilder,
    PressEvent, Retarget, RetargetOp, TimingConfig, ValueId,
};
use crate::Result;

const SELECTED_ROTATION: f64 = 180.0;
const FADE: TimingConfig = TimingConfig::new(180, EasingCurve::EaseInOut);

/// Theme endpoints for the chip's background and label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipPalette {
    pub idle_bg: Color,
    pub selected_bg: Color,
    pub idle_fg: Color,
    pub selected_fg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChipStyle {
    pub scale: f64,
    /// Check icon rotation in degrees; 0 unselected, 180 selected
    pub icon_rotation: f64,
    pub background: Color,
    pub foreground: Color,
    pub border_width: f64,
}

impl ChipStyle {
    /// The icon has turned far enough to show the check mark
    pub fn shows_check(&self) -> bool {
        self.icon_rotation >= SELECTED_ROTATION / 2.0
    }
}

#[derive(Debug)]
pub struct FilterChip {
    label: String,
    selected: bool,
    orch: Orchestrator<ChipStyle>,
    scale: ValueId,
    rotation: ValueId,
    progress: ValueId,
    border: ValueId,
    bridge: GestureBridge,
    motion: MotionConfig,
}

impl FilterChip {
    pub fn new(label: impl Into<String>, palette: ChipPalette, motion: &MotionConfig) -> Result<Self> {
        let label = label.into();
        let background: Interpolator<Color> =
            Interpolator::new([0.0, 1.0], [palette.idle_bg, palette.selected_bg])?;
        let foreground: Interpolator<Color> =
            Interpolator::new([0.0, 1.0], [palette.idle_fg, palette.selected_fg])?;

        let mut b = OrchestratorBuilder::new(format!("chip:{}", label));
        let scale = b.value(motion.resting_scale);
        let rotation = b.value(0.0);
        let progress = b.value(0.0);
        let border = b.value(1.0);
        let orch = b.build(move |v| ChipStyle {
            scale: v.get(scale),
            icon_rotation: v.get(rotation),
            background: background.evaluate(v.get(progress)),
            foreground: foreground.evaluate(v.get(progress)),
            border_width: v.get(border),
        });

        Ok(Self {
            label,
            selected: false,
            orch,
            scale,
            rotation,
            progress,
            border,
            bridge: GestureBridge::new(scale, motion.press_config())?,
            motion: motion.clone(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_pressed(&self) -> bool {
        self.bridge.is_pressed()
    }

    #[inline]
    pub fn style(&self) -> ChipStyle {
        *self.orch.snapshot()
    }

    pub fn orchestrator(&self) -> &Orchestrator<ChipStyle> {
        &self.orch
    }

    /// Scale the chip rests at for its current selection
    pub fn resting(&self) -> f64 {
        self.motion.resting_for(self.selected)
    }

    /// Retargets for moving into `selected`
    ///
    /// Scale is left alone while pressed; the release picks up the new
    /// resting value instead.
    pub fn on_selection_change(&self, selected: bool) -> Vec<RetargetOp> {
        let on = if selected { 1.0 } else { 0.0 };
        let spring = self.motion.selection;
        let mut ops = vec![
            RetargetOp::new(self.rotation, on * SELECTED_ROTATION, spring),
            RetargetOp::new(self.progress, on, FADE),
            RetargetOp::new(self.border, if selected { 0.0 } else { 1.0 }, FADE),
        ];
        if !self.bridge.is_pressed() {
            ops.push(RetargetOp::new(
                self.scale,
                self.motion.resting_for(selected),
                spring,
            ));
        }
        ops
    }

    pub fn set_selected(&mut self, selected: bool) -> Result<Vec<Retarget>> {
        if selected == self.selected || self.orch.is_disposed() {
            return Ok(Vec::new());
        }
        let ops = self.on_selection_change(selected);
        let outcomes = self.orch.retarget_many(&ops)?;
        self.selected = selected;
        Ok(outcomes)
    }

    pub fn press(&mut self, event: PressEvent) -> Result<Retarget> {
        let resting = self.resting();
        self.bridge.handle(event, &mut self.orch, || resting)
    }

    /// Keyboard activation: press with an automatic release
    pub fn tap(&mut self) -> Result<Retarget> {
        self.bridge.tap(&mut self.orch)
    }
}

impl Animated for FilterChip {
    fn frame(&mut self, dt: Duration) -> bool {
        let resting = self.resting();
        // A failed release leaves the chip squeezed; the next press recovers it
        let _ = self.bridge.advance(dt, &mut self.orch, || resting);
        self.orch.frame(dt)
    }

    fn is_animating(&self) -> bool {
        self.orch.is_animating() || self.bridge.has_pending_release()
    }

    fn dispose(&mut self) {
        self.bridge.dispose();
        self.orch.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.orch.is_disposed()
    }
}
