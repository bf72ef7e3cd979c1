//! L3 Molecular Layer: Scroll snapshots and scroll-linked transforms
//!
//! The host scroll surface publishes one [`ScrollState`] per frame through a
//! [`ScrollPublisher`]; any number of [`ScrollReader`]s read the latest value.
//! [`ScrollLinkedTransform`] is a pure function of that offset and an item
//! index, so parallax needs no driver and stops when scrolling stops.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::interpolate::{Extrapolation, Interpolator};
use crate::{Error, Result};

/// Read-only scroll snapshot published by the host once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    pub offset: f64,
    pub content_extent: f64,
    pub viewport_extent: f64,
}

impl ScrollState {
    pub fn new(offset: f64, content_extent: f64, viewport_extent: f64) -> Self {
        Self {
            offset,
            content_extent,
            viewport_extent,
        }
    }

    /// Largest offset that still shows content
    pub fn max_offset(&self) -> f64 {
        (self.content_extent - self.viewport_extent).max(0.0)
    }

    /// Scroll progress in [0, 1]
    pub fn progress(&self) -> f64 {
        let max = self.max_offset();
        if max <= 0.0 {
            0.0
        } else {
            (self.offset / max).clamp(0.0, 1.0)
        }
    }
}

/// Create the single-writer scroll channel for one scroll surface
pub fn scroll_channel(initial: ScrollState) -> (ScrollPublisher, ScrollReader) {
    let (tx, rx) = watch::channel(initial);
    (ScrollPublisher { tx, published: 0 }, ScrollReader { rx })
}

/// Writer half, owned by the host scroll surface
#[derive(Debug)]
pub struct ScrollPublisher {
    tx: watch::Sender<ScrollState>,
    published: u64,
}

impl ScrollPublisher {
    /// Publish this frame's snapshot; readers only wake if it changed
    pub fn publish(&mut self, state: ScrollState) {
        self.published += 1;
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    /// Latest published snapshot
    pub fn current(&self) -> ScrollState {
        *self.tx.borrow()
    }

    /// Number of publish calls so far
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn reader(&self) -> ScrollReader {
        ScrollReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Reader half; cheap to clone, never writes
#[derive(Debug, Clone)]
pub struct ScrollReader {
    rx: watch::Receiver<ScrollState>,
}

impl ScrollReader {
    /// Latest snapshot, without marking it seen
    #[inline]
    pub fn latest(&self) -> ScrollState {
        *self.rx.borrow()
    }

    /// Whether a new snapshot arrived since the last [`ScrollReader::take`]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Latest snapshot, marking it seen
    pub fn take(&mut self) -> ScrollState {
        *self.rx.borrow_and_update()
    }

    /// Wait for the next published change; false once the publisher is gone
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Parallax outputs at the three breakpoints around an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallaxConfig {
    /// Scroll distance between consecutive items
    #[serde(default = "default_unit")]
    pub unit: f64,
    #[serde(default = "default_translate_y")]
    pub translate_y: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    #[serde(default = "default_opacity")]
    pub opacity: [f64; 3],
}

fn default_unit() -> f64 {
    120.0
}

fn default_translate_y() -> [f64; 3] {
    [0.0, 0.0, 30.0]
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 0.9]
}

fn default_opacity() -> [f64; 3] {
    [1.0, 1.0, 0.4]
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            translate_y: default_translate_y(),
            scale: default_scale(),
            opacity: default_opacity(),
        }
    }
}

impl ParallaxConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.unit.is_finite() && self.unit > 0.0) {
            return Err(Error::Config(format!(
                "parallax unit must be positive, got {}",
                self.unit
            )));
        }
        let outputs = self
            .translate_y
            .iter()
            .chain(&self.scale)
            .chain(&self.opacity);
        for v in outputs {
            if !v.is_finite() {
                return Err(Error::Config(format!("parallax output {} is not finite", v)));
            }
        }
        Ok(())
    }
}

/// Per-frame parallax outputs for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParallaxStyle {
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl ParallaxStyle {
    pub const IDENTITY: ParallaxStyle = ParallaxStyle {
        translate_y: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };
}

impl Default for ParallaxStyle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Stateless map from (scroll offset, item index) to [`ParallaxStyle`]
///
/// For item `i` the breakpoints are `[(i-1)·unit, i·unit, (i+1)·unit]` with
/// clamp extrapolation. The interpolators are built once over the normalized
/// position `offset / unit - i`, whose breakpoints are `[-1, 0, 1]`.
#[derive(Debug, Clone)]
pub struct ScrollLinkedTransform {
    unit: f64,
    translate_y: Interpolator<f64>,
    scale: Interpolator<f64>,
    opacity: Interpolator<f64>,
}

impl ScrollLinkedTransform {
    pub fn new(config: &ParallaxConfig) -> Result<Self> {
        config.validate()?;
        let breakpoints = [-1.0, 0.0, 1.0];
        let build = |outputs: [f64; 3]| {
            Interpolator::<f64>::with_extrapolation(breakpoints, outputs, Extrapolation::Clamp)
        };
        Ok(Self {
            unit: config.unit,
            translate_y: build(config.translate_y)?,
            scale: build(config.scale)?,
            opacity: build(config.opacity)?,
        })
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }

    /// Scroll offsets at which item `index` hits each breakpoint
    pub fn breakpoints(&self, index: usize) -> [f64; 3] {
        let i = index as f64;
        [(i - 1.0) * self.unit, i * self.unit, (i + 1.0) * self.unit]
    }

    /// Evaluate for a raw scroll offset
    pub fn evaluate(&self, scroll_offset: f64, index: usize) -> ParallaxStyle {
        let position = scroll_offset / self.unit - index as f64;
        ParallaxStyle {
            translate_y: self.translate_y.evaluate(position),
            scale: self.scale.evaluate(position),
            opacity: self.opacity.evaluate(position),
        }
    }

    /// Evaluate against the latest published snapshot
    pub fn sample(&self, reader: &ScrollReader, index: usize) -> ParallaxStyle {
        self.evaluate(reader.latest().offset, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_scroll_state_progress() {
        let s = ScrollState::new(50.0, 300.0, 200.0);
        assert_eq!(s.max_offset(), 100.0);
        assert!(close(s.progress(), 0.5));
        assert_eq!(ScrollState::new(10.0, 100.0, 200.0).progress(), 0.0);
    }

    #[test]
    fn test_breakpoints_match_index() {
        let t = ScrollLinkedTransform::new(&ParallaxConfig::default()).unwrap();
        assert_eq!(t.breakpoints(3), [240.0, 360.0, 480.0]);
        assert_eq!(t.breakpoints(0), [-120.0, 0.0, 120.0]);
    }

    #[test]
    fn test_identity_until_threshold_then_shrinks() {
        let config = ParallaxConfig::default();
        let t = ScrollLinkedTransform::new(&config).unwrap();
        let index = 2;
        let [before, at, after] = t.breakpoints(index);

        assert_eq!(t.evaluate(before, index), ParallaxStyle::IDENTITY);
        assert_eq!(t.evaluate(at, index), ParallaxStyle::IDENTITY);

        let half = t.evaluate((at + after) / 2.0, index);
        assert!(close(half.scale, 0.95));
        assert!(close(half.opacity, 0.7));
        assert!(close(half.translate_y, 15.0));

        let past = t.evaluate(after, index);
        assert!(close(past.scale, 0.9));
        assert!(close(past.opacity, 0.4));
    }

    #[test]
    fn test_clamped_outside_breakpoints() {
        let config = ParallaxConfig {
            translate_y: [-10.0, 0.0, 10.0],
            ..Default::default()
        };
        let t = ScrollLinkedTransform::new(&config).unwrap();
        for offset in [-1e6, -500.0, 0.0] {
            assert!(close(t.evaluate(offset, 5).translate_y, -10.0));
        }
        for offset in [720.0, 5000.0, 1e9] {
            assert!(close(t.evaluate(offset, 5).translate_y, 10.0));
        }
    }

    #[test]
    fn test_invalid_unit_rejected() {
        let config = ParallaxConfig {
            unit: 0.0,
            ..Default::default()
        };
        assert!(ScrollLinkedTransform::new(&config).is_err());
        let config = ParallaxConfig {
            scale: [1.0, f64::NAN, 1.0],
            ..Default::default()
        };
        assert!(ScrollLinkedTransform::new(&config).is_err());
    }

    #[test]
    fn test_readers_see_latest_publish() {
        let (mut publisher, reader) = scroll_channel(ScrollState::default());
        let other = publisher.reader();
        publisher.publish(ScrollState::new(10.0, 1000.0, 200.0));
        publisher.publish(ScrollState::new(40.0, 1000.0, 200.0));
        assert_eq!(reader.latest().offset, 40.0);
        assert_eq!(other.latest().offset, 40.0);
        assert_eq!(publisher.published(), 2);
    }

    #[test]
    fn test_unchanged_publish_does_not_notify() {
        let (mut publisher, mut reader) = scroll_channel(ScrollState::default());
        publisher.publish(ScrollState::new(5.0, 100.0, 50.0));
        assert!(reader.has_changed());
        assert_eq!(reader.take().offset, 5.0);
        publisher.publish(ScrollState::new(5.0, 100.0, 50.0));
        assert!(!reader.has_changed());
    }

    #[test]
    fn test_sample_tracks_live_offset() {
        let (mut publisher, reader) = scroll_channel(ScrollState::default());
        let t = ScrollLinkedTransform::new(&ParallaxConfig::default()).unwrap();
        assert_eq!(t.sample(&reader, 0), ParallaxStyle::IDENTITY);
        publisher.publish(ScrollState::new(120.0, 2000.0, 400.0));
        assert!(close(t.sample(&reader, 0).scale, 0.9));
    }

    #[tokio::test]
    async fn test_reader_wakes_on_publish() {
        let (mut publisher, mut reader) = scroll_channel(ScrollState::default());
        let handle = tokio::spawn(async move {
            let woke = reader.changed().await;
            (woke, reader.latest().offset)
        });
        tokio::task::yield_now().await;
        publisher.publish(ScrollState::new(64.0, 500.0, 100.0));
        let (woke, offset) = handle.await.unwrap();
        assert!(woke);
        assert_eq!(offset, 64.0);
    }
}
