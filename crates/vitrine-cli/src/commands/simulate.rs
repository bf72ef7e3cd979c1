//! Headless motion scenarios
//!
//! Each scenario scripts a few host events against one component and prints
//! one JSON object per frame, so curves can be plotted or diffed without a
//! terminal.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;

use vitrine_core::components::{CardList, FilterChip};
use vitrine_core::motion::{
    scroll_channel, PressEvent, ScrollLinkedTransform, ScrollState, SelectionIndicatorTracker,
};
use vitrine_core::{Animated, AppConfig};
use vitrine_tui::load_theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Sliding pill across estimated, then measured, items
    Indicator,
    /// Press, deselect mid-press, release
    PressRace,
    /// Six cards entering with staggered delays
    Stagger,
    /// Scroll sweep over three cards
    Parallax,
    /// A filter chip becoming selected
    Chip,
}

#[derive(Serialize)]
struct FrameRecord<S> {
    frame: usize,
    t_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<&'static str>,
    animating: bool,
    snapshot: S,
}

pub fn run(config: &AppConfig, scenario: Scenario, frames: usize, fps: u32) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    simulate(config, scenario, frames, fps, &mut out)
}

pub fn simulate(
    config: &AppConfig,
    scenario: Scenario,
    frames: usize,
    fps: u32,
    out: &mut impl Write,
) -> Result<()> {
    if fps == 0 {
        bail!("fps must be at least 1");
    }
    let dt = Duration::from_secs_f64(1.0 / fps as f64);
    let motion = &config.motion;

    match scenario {
        Scenario::Indicator => {
            let mut tracker = SelectionIndicatorTracker::new(
                "indicator",
                vec!["new", "sale", "trending"],
                motion.indicator,
                motion.selection,
            )?;
            drive(frames, dt, out, |frame, dt| {
                let event = if frame == 0 {
                    tracker.select(Some("new"))?;
                    Some("select new")
                } else if frame == frames / 3 {
                    tracker.select(Some("trending"))?;
                    Some("select trending")
                } else if frame == 2 * frames / 3 {
                    tracker.update_layout(2, 230.0, 90.0)?;
                    Some("measure trending")
                } else {
                    None
                };
                tracker.frame(dt);
                Ok((event, tracker.is_animating(), tracker.style()))
            })
        }
        Scenario::PressRace => {
            let palette = load_theme(&config.ui.theme).chip_palette();
            let mut chip = FilterChip::new("Shoes", palette, motion)?;
            drive(frames, dt, out, |frame, dt| {
                let event = match frame {
                    0 => {
                        chip.set_selected(true)?;
                        chip.press(PressEvent::Down)?;
                        Some("select + press")
                    }
                    5 => {
                        chip.set_selected(false)?;
                        Some("deselect")
                    }
                    10 => {
                        chip.press(PressEvent::Up)?;
                        Some("release")
                    }
                    _ => None,
                };
                chip.frame(dt);
                Ok((event, chip.is_animating(), chip.style()))
            })
        }
        Scenario::Stagger => {
            let (_publisher, reader) = scroll_channel(ScrollState::new(0.0, 0.0, 0.0));
            let mut list = CardList::new(motion, reader)?;
            drive(frames, dt, out, |frame, dt| {
                let event = if frame == 0 {
                    list.mount(6)?;
                    Some("mount 6")
                } else {
                    None
                };
                list.frame(dt);
                Ok((event, list.is_animating(), list.styles()))
            })
        }
        Scenario::Parallax => {
            let transform = ScrollLinkedTransform::new(&motion.parallax)?;
            let unit = transform.unit();
            let content = unit * 3.0;
            let (mut publisher, reader) = scroll_channel(ScrollState::new(0.0, content, unit));
            let span = frames.saturating_sub(1).max(1) as f64;
            drive(frames, dt, out, |frame, _| {
                let offset = content * frame as f64 / span;
                publisher.publish(ScrollState::new(offset, content, unit));
                let styles: Vec<_> = (0..3).map(|i| transform.sample(&reader, i)).collect();
                Ok((None, frame + 1 < frames, styles))
            })
        }
        Scenario::Chip => {
            let palette = load_theme(&config.ui.theme).chip_palette();
            let mut chip = FilterChip::new("Bags", palette, motion)?;
            drive(frames, dt, out, |frame, dt| {
                let event = if frame == 0 {
                    chip.set_selected(true)?;
                    Some("select")
                } else {
                    None
                };
                chip.frame(dt);
                Ok((event, chip.is_animating(), chip.style()))
            })
        }
    }
}

/// Step `frames` frames, writing one JSON line per frame
fn drive<S, F>(frames: usize, dt: Duration, out: &mut impl Write, mut step: F) -> Result<()>
where
    S: Serialize,
    F: FnMut(usize, Duration) -> Result<(Option<&'static str>, bool, S)>,
{
    for frame in 0..frames {
        let (event, animating, snapshot) = step(frame, dt)?;
        let record = FrameRecord {
            frame,
            t_ms: (dt * (frame as u32 + 1)).as_secs_f64() * 1000.0,
            event,
            animating,
            snapshot,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
