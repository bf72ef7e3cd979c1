//! Generic press-feedback button (avatar, add-to-cart, favorite)

use std::time::Duration;

use serde::Serialize;

use crate::config::MotionConfig;
use crate::motion::{
    Animated, Color, EasingCurve, GestureBridge, Interpolator, Orchestrator, OrchestratorBuilder,
    PressEvent, Retarget, RetargetOp, TimingConfig, ValueId,
};
use crate::Result;

const TINT_FADE: TimingConfig = TimingConfig::new(220, EasingCurve::Cubic);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PressableStyle {
    pub scale: f64,
    pub tint: Color,
    /// 0 untoggled, 1 toggled
    pub toggled: f64,
}

#[derive(Debug)]
pub struct Pressable {
    label: String,
    toggled: bool,
    orch: Orchestrator<PressableStyle>,
    scale: ValueId,
    tint: ValueId,
    bridge: GestureBridge,
    motion: MotionConfig,
}

impl Pressable {
    pub fn new(
        label: impl Into<String>,
        idle: Color,
        toggled: Color,
        motion: &MotionConfig,
    ) -> Result<Self> {
        let label = label.into();
        let colors: Interpolator<Color> = Interpolator::new([0.0, 1.0], [idle, toggled])?;

        let mut b = OrchestratorBuilder::new(format!("pressable:{}", label));
        let scale = b.value(motion.resting_scale);
        let tint = b.value(0.0);
        let orch = b.build(move |v| PressableStyle {
            scale: v.get(scale),
            tint: colors.evaluate(v.get(tint)),
            toggled: v.get(tint),
        });

        Ok(Self {
            label,
            toggled: false,
            orch,
            scale,
            tint,
            bridge: GestureBridge::new(scale, motion.press_config())?,
            motion: motion.clone(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn is_pressed(&self) -> bool {
        self.bridge.is_pressed()
    }

    #[inline]
    pub fn style(&self) -> PressableStyle {
        *self.orch.snapshot()
    }

    /// Toggled buttons rest at the selected scale
    pub fn resting(&self) -> f64 {
        self.motion.resting_for(self.toggled)
    }

    pub fn set_toggled(&mut self, toggled: bool) -> Result<Vec<Retarget>> {
        if toggled == self.toggled || self.orch.is_disposed() {
            return Ok(Vec::new());
        }
        let mut ops = vec![RetargetOp::new(
            self.tint,
            if toggled { 1.0 } else { 0.0 },
            TINT_FADE,
        )];
        if !self.bridge.is_pressed() {
            ops.push(RetargetOp::new(
                self.scale,
                self.motion.resting_for(toggled),
                self.motion.selection,
            ));
        }
        let outcomes = self.orch.retarget_many(&ops)?;
        self.toggled = toggled;
        Ok(outcomes)
    }

    pub fn toggle(&mut self) -> Result<Vec<Retarget>> {
        self.set_toggled(!self.toggled)
    }

    pub fn press(&mut self, event: PressEvent) -> Result<Retarget> {
        let resting = self.resting();
        self.bridge.handle(event, &mut self.orch, || resting)
    }

    pub fn tap(&mut self) -> Result<Retarget> {
        self.bridge.tap(&mut self.orch)
    }
}

impl Animated for Pressable {
    fn frame(&mut self, dt: Duration) -> bool {
        let resting = self.resting();
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
