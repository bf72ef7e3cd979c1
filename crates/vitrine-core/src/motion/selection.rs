//! L3 Molecular Layer: Sliding selection indicator
//!
//! [`SelectionIndicatorTracker`] is an orchestrator over two values,
//! `position` and `width`, whose targets come from the selected item's
//! layout. Measured layout wins; unmeasured items fall back to a constant
//! estimated extent, which drifts for items of uneven size until the host
//! reports real measurements through [`SelectionIndicatorTracker::update_layout`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::driver::SpringConfig;
use super::orchestrator::{Animated, Orchestrator, OrchestratorBuilder, RetargetOp};
use super::value::{Retarget, ValueId};
use crate::{Error, Result};

/// Which item is selected, and whether the indicator is still moving there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<K> {
    pub selected_id: Option<K>,
    pub previous_id: Option<K>,
    pub transition_active: bool,
}

impl<K> Default for SelectionState<K> {
    fn default() -> Self {
        Self {
            selected_id: None,
            previous_id: None,
            transition_active: false,
        }
    }
}

/// Layout of one item as known to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListItemLayout {
    pub index: usize,
    pub measured_offset: Option<f64>,
    pub measured_extent: Option<f64>,
    pub estimated_extent: f64,
}

impl ListItemLayout {
    pub fn estimated(index: usize, estimated_extent: f64) -> Self {
        Self {
            index,
            measured_offset: None,
            measured_extent: None,
            estimated_extent,
        }
    }

    /// Measured extent if known, else the estimate
    #[inline]
    pub fn extent(&self) -> f64 {
        self.measured_extent.unwrap_or(self.estimated_extent)
    }

    pub fn is_measured(&self) -> bool {
        self.measured_offset.is_some() && self.measured_extent.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Space between consecutive items
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Extent assumed for items not yet measured
    #[serde(default = "default_estimated_extent")]
    pub estimated_extent: f64,
}

fn default_gap() -> f64 {
    12.0
}

fn default_estimated_extent() -> f64 {
    100.0
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            estimated_extent: default_estimated_extent(),
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(Error::Config(format!(
                "indicator gap must be non-negative, got {}",
                self.gap
            )));
        }
        if !(self.estimated_extent.is_finite() && self.estimated_extent > 0.0) {
            return Err(Error::Config(format!(
                "indicator estimated extent must be positive, got {}",
                self.estimated_extent
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IndicatorStyle {
    pub position: f64,
    pub width: f64,
}

pub struct SelectionIndicatorTracker<K> {
    keys: Vec<K>,
    layouts: Vec<ListItemLayout>,
    config: IndicatorConfig,
    spring: SpringConfig,
    state: SelectionState<K>,
    orch: Orchestrator<IndicatorStyle>,
    position: ValueId,
    width: ValueId,
}

impl<K: fmt::Debug> fmt::Debug for SelectionIndicatorTracker<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionIndicatorTracker")
            .field("keys", &self.keys)
            .field("state", &self.state)
            .field("style", self.orch.snapshot())
            .finish()
    }
}

impl<K: Clone + PartialEq + fmt::Debug> SelectionIndicatorTracker<K> {
    pub fn new(
        label: impl Into<String>,
        keys: Vec<K>,
        config: IndicatorConfig,
        spring: SpringConfig,
    ) -> Result<Self> {
        config.validate()?;
        spring.validate()?;

        let mut b = OrchestratorBuilder::new(label);
        let position = b.value(0.0);
        let width = b.value(0.0);
        let orch = b.build(move |v| IndicatorStyle {
            position: v.get(position),
            width: v.get(width),
        });

        let layouts = estimated_layouts(keys.len(), config.estimated_extent);
        Ok(Self {
            keys,
            layouts,
            config,
            spring,
            state: SelectionState::default(),
            orch,
            position,
            width,
        })
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn state(&self) -> &SelectionState<K> {
        &self.state
    }

    pub fn selected(&self) -> Option<&K> {
        self.state.selected_id.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected().and_then(|k| self.index_of(k))
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn layout(&self, index: usize) -> Option<&ListItemLayout> {
        self.layouts.get(index)
    }

    /// Current indicator geometry
    #[inline]
    pub fn style(&self) -> IndicatorStyle {
        *self.orch.snapshot()
    }

    pub fn orchestrator(&self) -> &Orchestrator<IndicatorStyle> {
        &self.orch
    }

    /// Where the indicator should rest when item `index` is selected
    pub fn target_for(&self, index: usize) -> Option<IndicatorStyle> {
        let layout = self.layouts.get(index)?;
        let position = layout.measured_offset.unwrap_or_else(|| {
            self.layouts[..index]
                .iter()
                .map(|l| l.extent() + self.config.gap)
                .sum()
        });
        Some(IndicatorStyle {
            position,
            width: layout.extent(),
        })
    }

    /// Retargets needed to go from `prev` to `next`
    ///
    /// Clearing the selection collapses the width in place. A `next` key not
    /// in the item list yields no ops.
    pub fn on_selection_change(&self, prev: Option<&K>, next: Option<&K>) -> Vec<RetargetOp> {
        let Some(next) = next else {
            if prev.is_none() {
                return Vec::new();
            }
            return vec![RetargetOp::new(self.width, 0.0, self.spring)];
        };
        let Some(target) = self.index_of(next).and_then(|i| self.target_for(i)) else {
            return Vec::new();
        };
        vec![
            RetargetOp::new(self.position, target.position, self.spring),
            RetargetOp::new(self.width, target.width, self.spring),
        ]
    }

    /// Move the selection to `next` and start the indicator transition
    pub fn select(&mut self, next: Option<K>) -> Result<Vec<Retarget>> {
        if self.orch.is_disposed() || next == self.state.selected_id {
            return Ok(Vec::new());
        }
        if let Some(key) = next.as_ref() {
            if self.index_of(key).is_none() {
                return Err(Error::InvalidLayout(format!("no item with key {:?}", key)));
            }
        }

        let ops = self.on_selection_change(self.state.selected_id.as_ref(), next.as_ref());
        let outcomes = self.orch.retarget_many(&ops)?;
        debug!(
            tracker = %self.orch.label(),
            from = ?self.state.selected_id,
            to = ?next,
            "Selection changed"
        );

        self.state.previous_id = self.state.selected_id.take();
        self.state.selected_id = next;
        self.state.transition_active = outcomes
            .iter()
            .any(|o| matches!(o, Retarget::Started | Retarget::Interrupted));
        Ok(outcomes)
    }

    /// Record a measurement from the host layout pass
    ///
    /// If it moves the selected item's target, the indicator is retargeted.
    pub fn update_layout(&mut self, index: usize, offset: f64, extent: f64) -> Result<()> {
        if !(offset.is_finite() && extent.is_finite() && extent >= 0.0) {
            warn!(index, offset, extent, "Rejected item measurement");
            return Err(Error::InvalidLayout(format!(
                "item {} measured at offset {} extent {}",
                index, offset, extent
            )));
        }
        let layout = self.layouts.get_mut(index).ok_or_else(|| {
            Error::InvalidLayout(format!("item {} out of range ({} items)", index, self.keys.len()))
        })?;
        if layout.measured_offset == Some(offset) && layout.measured_extent == Some(extent) {
            return Ok(());
        }
        layout.measured_offset = Some(offset);
        layout.measured_extent = Some(extent);

        match self.selected_index() {
            Some(selected) if selected >= index => self.retarget_selected(),
            _ => Ok(()),
        }
    }

    /// Replace the item list; measurements are discarded
    ///
    /// A selection whose key disappears is cleared.
    pub fn set_items(&mut self, keys: Vec<K>) -> Result<()> {
        self.layouts = estimated_layouts(keys.len(), self.config.estimated_extent);
        self.keys = keys;
        match self.state.selected_id.clone() {
            Some(key) if self.index_of(&key).is_none() => {
                let ops = self.on_selection_change(Some(&key), None);
                self.orch.retarget_many(&ops)?;
                self.state.previous_id = Some(key);
                self.state.selected_id = None;
                self.state.transition_active = self.orch.is_animating();
                Ok(())
            }
            Some(_) => self.retarget_selected(),
            None => Ok(()),
        }
    }

    fn retarget_selected(&mut self) -> Result<()> {
        let selected = self.state.selected_id.clone();
        let ops = self.on_selection_change(selected.as_ref(), selected.as_ref());
        let outcomes = self.orch.retarget_many(&ops)?;
        if outcomes
            .iter()
            .any(|o| matches!(o, Retarget::Started | Retarget::Interrupted))
        {
            self.state.transition_active = true;
        }
        Ok(())
    }
}

fn estimated_layouts(len: usize, estimated_extent: f64) -> Vec<ListItemLayout> {
    (0..len)
        .map(|i| ListItemLayout::estimated(i, estimated_extent))
        .collect()
}

impl<K> Animated for SelectionIndicatorTracker<K> {
    fn frame(&mut self, dt: Duration) -> bool {
        let changed = self.orch.frame(dt);
        if self.state.transition_active && !self.orch.is_animating() {
            self.state.transition_active = false;
        }
        changed
    }

    fn is_animating(&self) -> bool {
        self.orch.is_animating()
    }

    fn dispose(&mut self) {
        self.orch.dispose();
        self.state.transition_active = false;
    }

    fn is_disposed(&self) -> bool {
        self.orch.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn tracker(n: usize) -> SelectionIndicatorTracker<&'static str> {
        let keys = ["all", "shoes", "bags", "hats", "sale"][..n].to_vec();
        SelectionIndicatorTracker::new(
            "chips",
            keys,
            IndicatorConfig::default(),
            SpringConfig::default(),
        )
        .unwrap()
    }

    fn targets<K: Clone + PartialEq + fmt::Debug>(t: &SelectionIndicatorTracker<K>) -> (f64, f64) {
        let orch = t.orchestrator();
        (
            orch.value(t.position).unwrap().target(),
            orch.value(t.width).unwrap().target(),
        )
    }

    fn settle<K>(t: &mut SelectionIndicatorTracker<K>) {
        for _ in 0..600 {
            t.frame(FRAME);
        }
    }

    #[test]
    fn test_estimated_target_for_third_item() {
        let mut t = tracker(3);
        assert_eq!(
            t.target_for(2),
            Some(IndicatorStyle {
                position: 224.0,
                width: 100.0
            })
        );
        t.select(Some("bags")).unwrap();
        assert_eq!(targets(&t), (224.0, 100.0));
        assert!(t.state().transition_active);
    }

    #[test]
    fn test_measured_layout_preferred() {
        let mut t = tracker(3);
        t.update_layout(2, 300.0, 80.0).unwrap();
        assert_eq!(
            t.target_for(2),
            Some(IndicatorStyle {
                position: 300.0,
                width: 80.0
            })
        );
    }

    #[test]
    fn test_partial_measurement_feeds_estimate() {
        let mut t = tracker(3);
        t.update_layout(0, 0.0, 60.0).unwrap();
        // (60 + 12) + (100 + 12)
        assert_eq!(t.target_for(2).unwrap().position, 184.0);
    }

    #[test]
    fn test_measurement_retargets_selected() {
        let mut t = tracker(3);
        t.select(Some("bags")).unwrap();
        settle(&mut t);
        assert!(!t.state().transition_active);
        assert_eq!(t.style(), IndicatorStyle { position: 224.0, width: 100.0 });

        t.update_layout(2, 230.0, 64.0).unwrap();
        assert!(t.state().transition_active);
        settle(&mut t);
        assert_eq!(t.style(), IndicatorStyle { position: 230.0, width: 64.0 });
    }

    #[test]
    fn test_clear_selection_collapses_width() {
        let mut t = tracker(3);
        t.select(Some("shoes")).unwrap();
        settle(&mut t);
        t.select(None).unwrap();
        assert_eq!(targets(&t), (112.0, 0.0));
        assert_eq!(t.state().previous_id, Some("shoes"));
        settle(&mut t);
        assert_eq!(t.style().width, 0.0);
    }

    #[test]
    fn test_last_selection_wins() {
        let mut t = tracker(3);
        t.select(Some("bags")).unwrap();
        let outcomes = t.select(Some("all")).unwrap();
        assert_eq!(outcomes, vec![Retarget::Interrupted, Retarget::Interrupted]);
        assert_eq!(targets(&t), (0.0, 100.0));
        settle(&mut t);
        assert_eq!(t.style(), IndicatorStyle { position: 0.0, width: 100.0 });
    }

    #[test]
    fn test_reselecting_is_noop() {
        let mut t = tracker(3);
        t.select(Some("bags")).unwrap();
        assert!(t.select(Some("bags")).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_key_and_bad_layout_rejected() {
        let mut t = tracker(3);
        assert!(matches!(
            t.select(Some("boots")),
            Err(Error::InvalidLayout(_))
        ));
        assert_eq!(t.selected(), None);
        assert!(t.update_layout(7, 0.0, 10.0).is_err());
        assert!(t.update_layout(1, f64::NAN, 10.0).is_err());
        assert!(t.update_layout(1, 0.0, -1.0).is_err());
        assert_eq!(t.layout(1).unwrap().measured_offset, None);
    }

    #[test]
    fn test_set_items_drops_missing_selection() {
        let mut t = tracker(3);
        t.select(Some("bags")).unwrap();
        t.set_items(vec!["all", "shoes"]).unwrap();
        assert_eq!(t.selected(), None);
        assert_eq!(targets(&t).1, 0.0);
    }

    #[test]
    fn test_dispose_ignores_selection() {
        let mut t = tracker(3);
        t.select(Some("shoes")).unwrap();
        t.frame(FRAME);
        t.dispose();
        t.dispose();
        let frozen = t.style();
        assert!(t.select(Some("bags")).unwrap().is_empty());
        settle(&mut t);
        assert_eq!(t.style(), frozen);
        assert!(!t.state().transition_active);
    }
}
