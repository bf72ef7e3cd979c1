//! Product card with staggered entry, parallax and press feedback
//!
//! The entry values (opacity, scale, lift) freeze once settled; parallax is
//! applied on top at read time from the live scroll offset.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::MotionConfig;
use crate::motion::{
    Animated, GestureBridge, Orchestrator, OrchestratorBuilder, ParallaxStyle, PressEvent,
    Retarget, RetargetOp, ScrollLinkedTransform, SpringConfig, TimingConfig, ValueId,
};
use crate::Result;

/// Scale a card enters from
pub const ENTRY_SCALE: f64 = 0.92;
/// Distance a card rises while entering, in scroll units
pub const ENTRY_LIFT: f64 = 24.0;

/// Entry-only snapshot, recomputed while entry or press motion runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryStyle {
    pub opacity: f64,
    pub scale: f64,
    pub translate_y: f64,
    pub press_scale: f64,
}

/// Entry composed with parallax, ready to render
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardStyle {
    pub opacity: f64,
    pub scale: f64,
    pub translate_y: f64,
}

impl CardStyle {
    pub fn compose(entry: EntryStyle, parallax: ParallaxStyle) -> Self {
        Self {
            opacity: entry.opacity * parallax.opacity,
            scale: entry.scale * entry.press_scale * parallax.scale,
            translate_y: entry.translate_y + parallax.translate_y,
        }
    }
}

#[derive(Debug)]
pub struct EntryCard {
    index: usize,
    active: bool,
    orch: Orchestrator<EntryStyle>,
    opacity: ValueId,
    scale: ValueId,
    lift: ValueId,
    bridge: GestureBridge,
    fade: TimingConfig,
    spring: SpringConfig,
    resting_scale: f64,
}

impl EntryCard {
    pub fn new(index: usize, motion: &MotionConfig) -> Result<Self> {
        let mut b = OrchestratorBuilder::new(format!("card:{}", index));
        let opacity = b.value(0.0);
        let scale = b.value(ENTRY_SCALE);
        let lift = b.value(ENTRY_LIFT);
        let press = b.value(motion.resting_scale);
        let orch = b.build(move |v| EntryStyle {
            opacity: v.get(opacity),
            scale: v.get(scale),
            translate_y: v.get(lift),
            press_scale: v.get(press),
        });

        Ok(Self {
            index,
            active: false,
            orch,
            opacity,
            scale,
            lift,
            bridge: GestureBridge::new(press, motion.press_config())?,
            fade: motion.entry_timing(),
            spring: motion.selection,
            resting_scale: motion.resting_scale,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Entry motion has been started
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn entry_style(&self) -> EntryStyle {
        *self.orch.snapshot()
    }

    /// Final style for the given scroll position
    pub fn style(&self, transform: &ScrollLinkedTransform, scroll_offset: f64) -> CardStyle {
        CardStyle::compose(
            self.entry_style(),
            transform.evaluate(scroll_offset, self.index),
        )
    }

    /// Start the entry motion; later calls do nothing
    pub fn activate(&mut self) -> Result<Vec<Retarget>> {
        if self.active || self.orch.is_disposed() {
            return Ok(Vec::new());
        }
        let ops = [
            RetargetOp::new(self.opacity, 1.0, self.fade),
            RetargetOp::new(self.scale, 1.0, self.spring),
            RetargetOp::new(self.lift, 0.0, self.spring),
        ];
        let outcomes = self.orch.retarget_many(&ops)?;
        self.active = true;
        debug!(index = self.index, "Card entry started");
        Ok(outcomes)
    }

    pub fn press(&mut self, event: PressEvent) -> Result<Retarget> {
        let resting = self.resting_scale;
        self.bridge.handle(event, &mut self.orch, || resting)
    }

    pub fn tap(&mut self) -> Result<Retarget> {
        self.bridge.tap(&mut self.orch)
    }
}

impl Animated for EntryCard {
    fn frame(&mut self, dt: Duration) -> bool {
        let resting = self.resting_scale;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ParallaxConfig;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn run(card: &mut EntryCard, frames: usize) {
        for _ in 0..frames {
            card.frame(FRAME);
        }
    }

    #[test]
    fn test_inactive_card_is_hidden_and_frozen() {
        let mut card = EntryCard::new(0, &MotionConfig::default()).unwrap();
        run(&mut card, 30);
        let entry = card.entry_style();
        assert_eq!(entry.opacity, 0.0);
        assert_eq!(entry.scale, ENTRY_SCALE);
        assert_eq!(card.orchestrator_derivations(), 1);
    }

    #[test]
    fn test_entry_settles_to_identity() {
        let mut card = EntryCard::new(3, &MotionConfig::default()).unwrap();
        assert_eq!(card.activate().unwrap().len(), 3);
        assert!(card.activate().unwrap().is_empty());
        run(&mut card, 300);
        assert_eq!(
            card.entry_style(),
            EntryStyle {
                opacity: 1.0,
                scale: 1.0,
                translate_y: 0.0,
                press_scale: 1.0
            }
        );
        assert!(!card.is_animating());
    }

    #[test]
    fn test_parallax_composes_with_entry() {
        let mut card = EntryCard::new(1, &MotionConfig::default()).unwrap();
        card.activate().unwrap();
        run(&mut card, 300);
        let transform = ScrollLinkedTransform::new(&ParallaxConfig::default()).unwrap();

        let resting = card.style(&transform, 0.0);
        assert_eq!(resting.scale, 1.0);
        assert_eq!(resting.opacity, 1.0);

        let past = card.style(&transform, 240.0);
        assert!((past.scale - 0.9).abs() < 1e-9);
        assert!((past.opacity - 0.4).abs() < 1e-9);
        assert!((past.translate_y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_press_scale_multiplies() {
        let mut card = EntryCard::new(0, &MotionConfig::default()).unwrap();
        card.activate().unwrap();
        run(&mut card, 300);
        card.press(PressEvent::Down).unwrap();
        run(&mut card, 60);
        let transform = ScrollLinkedTransform::new(&ParallaxConfig::default()).unwrap();
        assert!((card.style(&transform, 0.0).scale - 0.95).abs() < 1e-9);
    }

    impl EntryCard {
        fn orchestrator_derivations(&self) -> u64 {
            self.orch.derivations()
        }
    }
}
