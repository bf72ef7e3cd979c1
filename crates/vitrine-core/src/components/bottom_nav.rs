//! Bottom navigation bar with a sliding pill under the active tab

use std::time::Duration;

use serde::Serialize;

use crate::config::MotionConfig;
use crate::motion::{
    Animated, EasingCurve, IndicatorConfig, IndicatorStyle, Orchestrator, OrchestratorBuilder,
    RetargetOp, SelectionIndicatorTracker, SpringConfig, TimingConfig, ValueId,
};
use crate::{Error, Result};

const ACTIVE_ICON_SCALE: f64 = 1.15;
const ACTIVE_LIFT: f64 = 1.0;
const INACTIVE_LABEL_OPACITY: f64 = 0.55;
const LABEL_FADE: TimingConfig = TimingConfig::new(160, EasingCurve::EaseOut);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TabStyle {
    pub icon_scale: f64,
    pub icon_lift: f64,
    pub label_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavStyle {
    pub indicator: IndicatorStyle,
    pub tabs: Vec<TabStyle>,
}

#[derive(Debug)]
struct Tab {
    label: String,
    orch: Orchestrator<TabStyle>,
    scale: ValueId,
    lift: ValueId,
    opacity: ValueId,
}

impl Tab {
    fn new(label: &str) -> Self {
        let mut b = OrchestratorBuilder::new(format!("tab:{}", label));
        let scale = b.value(1.0);
        let lift = b.value(0.0);
        let opacity = b.value(INACTIVE_LABEL_OPACITY);
        let orch = b.build(move |v| TabStyle {
            icon_scale: v.get(scale),
            icon_lift: v.get(lift),
            label_opacity: v.get(opacity),
        });
        Self {
            label: label.to_string(),
            orch,
            scale,
            lift,
            opacity,
        }
    }

    fn ops(&self, active: bool, spring: SpringConfig) -> [RetargetOp; 3] {
        let (scale, lift, opacity) = if active {
            (ACTIVE_ICON_SCALE, ACTIVE_LIFT, 1.0)
        } else {
            (1.0, 0.0, INACTIVE_LABEL_OPACITY)
        };
        [
            RetargetOp::new(self.scale, scale, spring),
            RetargetOp::new(self.lift, lift, spring),
            RetargetOp::new(self.opacity, opacity, LABEL_FADE),
        ]
    }
}

#[derive(Debug)]
pub struct BottomNav {
    tabs: Vec<Tab>,
    tracker: SelectionIndicatorTracker<usize>,
    spring: SpringConfig,
}

impl BottomNav {
    /// Tabs start with none active; call [`BottomNav::select`] after mounting
    pub fn new(labels: &[&str], indicator: IndicatorConfig, motion: &MotionConfig) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::InvalidLayout("bottom navigation needs a tab".to_string()));
        }
        let tracker = SelectionIndicatorTracker::new(
            "nav-indicator",
            (0..labels.len()).collect(),
            indicator,
            motion.selection,
        )?;
        Ok(Self {
            tabs: labels.iter().map(|l| Tab::new(l)).collect(),
            tracker,
            spring: motion.selection,
        })
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.tabs.get(index).map(|t| t.label.as_str())
    }

    pub fn selected(&self) -> Option<usize> {
        self.tracker.selected().copied()
    }

    pub fn tracker(&self) -> &SelectionIndicatorTracker<usize> {
        &self.tracker
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.tabs.len() {
            return Err(Error::InvalidLayout(format!(
                "tab {} out of range ({} tabs)",
                index,
                self.tabs.len()
            )));
        }
        let previous = self.selected();
        if previous == Some(index) || self.tracker.is_disposed() {
            return Ok(());
        }
        if let Some(prev) = previous {
            let tab = &mut self.tabs[prev];
            let ops = tab.ops(false, self.spring);
            tab.orch.retarget_many(&ops)?;
        }
        let tab = &mut self.tabs[index];
        let ops = tab.ops(true, self.spring);
        tab.orch.retarget_many(&ops)?;
        self.tracker.select(Some(index))?;
        Ok(())
    }

    pub fn select_next(&mut self) -> Result<()> {
        let next = self.selected().map_or(0, |i| (i + 1) % self.tabs.len());
        self.select(next)
    }

    pub fn select_prev(&mut self) -> Result<()> {
        let len = self.tabs.len();
        let prev = self.selected().map_or(0, |i| (i + len - 1) % len);
        self.select(prev)
    }

    /// Forward a measurement of tab `index` from the host layout pass
    pub fn update_layout(&mut self, index: usize, offset: f64, extent: f64) -> Result<()> {
        self.tracker.update_layout(index, offset, extent)
    }

    pub fn style(&self) -> NavStyle {
        NavStyle {
            indicator: self.tracker.style(),
            tabs: self.tabs.iter().map(|t| *t.orch.snapshot()).collect(),
        }
    }
}

impl Animated for BottomNav {
    fn frame(&mut self, dt: Duration) -> bool {
        let mut changed = self.tracker.frame(dt);
        for tab in &mut self.tabs {
            changed |= tab.orch.frame(dt);
        }
        changed
    }

    fn is_animating(&self) -> bool {
        self.tracker.is_animating() || self.tabs.iter().any(|t| t.orch.is_animating())
    }

    fn dispose(&mut self) {
        self.tracker.dispose();
        for tab in &mut self.tabs {
            tab.orch.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.tracker.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn nav() -> BottomNav {
        let indicator = IndicatorConfig {
            gap: 2.0,
            estimated_extent: 10.0,
        };
        BottomNav::new(&["Home", "Search", "Cart", "Profile"], indicator, &MotionConfig::default())
            .unwrap()
    }

    fn settle(nav: &mut BottomNav) {
        for _ in 0..400 {
            nav.frame(FRAME);
        }
    }

    #[test]
    fn test_select_moves_pill_and_emphasises_tab() {
        let mut n = nav();
        n.select(2).unwrap();
        settle(&mut n);
        let style = n.style();
        assert_eq!(style.indicator, IndicatorStyle { position: 24.0, width: 10.0 });
        assert_eq!(style.tabs[2].icon_scale, ACTIVE_ICON_SCALE);
        assert_eq!(style.tabs[2].label_opacity, 1.0);
        assert_eq!(style.tabs[0].label_opacity, INACTIVE_LABEL_OPACITY);
        assert!(!n.is_animating());
    }

    #[test]
    fn test_previous_tab_relaxes() {
        let mut n = nav();
        n.select(0).unwrap();
        settle(&mut n);
        n.select_next().unwrap();
        settle(&mut n);
        let style = n.style();
        assert_eq!(n.selected(), Some(1));
        assert_eq!(style.tabs[0].icon_scale, 1.0);
        assert_eq!(style.tabs[0].icon_lift, 0.0);
        assert_eq!(style.tabs[1].icon_lift, ACTIVE_LIFT);
    }

    #[test]
    fn test_wraps_around() {
        let mut n = nav();
        n.select_prev().unwrap();
        assert_eq!(n.selected(), Some(0));
        n.select_prev().unwrap();
        assert_eq!(n.selected(), Some(3));
        n.select_next().unwrap();
        assert_eq!(n.selected(), Some(0));
    }

    #[test]
    fn test_measured_tabs_override_estimate() {
        let mut n = nav();
        for (i, (offset, extent)) in [(0.0, 8.0), (9.0, 10.0), (20.0, 6.0), (27.0, 11.0)]
            .into_iter()
            .enumerate()
        {
            n.update_layout(i, offset, extent).unwrap();
        }
        n.select(3).unwrap();
        settle(&mut n);
        assert_eq!(n.style().indicator, IndicatorStyle { position: 27.0, width: 11.0 });
    }

    #[test]
    fn test_out_of_range_and_empty() {
        let mut n = nav();
        assert!(n.select(9).is_err());
        assert!(BottomNav::new(&[], IndicatorConfig::default(), &MotionConfig::default()).is_err());
    }
}
