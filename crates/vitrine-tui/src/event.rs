use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::catalog::Product;

/// Something the storefront loop has to react to
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// The poll timed out with nothing to read
    Tick,
}

/// Completion message from a background catalog load
#[derive(Debug)]
pub enum CatalogResult {
    Loaded {
        /// Matches the reload that requested it
        generation: u64,
        products: Vec<Product>,
    },
}

/// Terminal poller with two cadences: a slow idle tick and the animation
/// frame interval used while anything is moving
pub struct EventHandler {
    idle: Duration,
    frame: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64, frame: Duration) -> Self {
        Self {
            idle: Duration::from_millis(tick_rate_ms),
            frame,
        }
    }

    /// Wait for the next event, at most one frame while `animating` and one
    /// idle tick otherwise
    pub fn next(&self, animating: bool) -> Result<Option<AppEvent>> {
        let timeout = if animating { self.frame } else { self.idle };
        if !event::poll(timeout)? {
            return Ok(Some(AppEvent::Tick));
        }
        Ok(translate(event::read()?))
    }
}

/// Keep key presses and resizes, drop everything else.
///
/// Key releases are dropped too; some terminals report both edges.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    #[test]
    fn test_only_presses_and_resizes_pass() {
        let press = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(matches!(translate(Event::Key(press)), Some(AppEvent::Key(_))));
        assert!(translate(Event::Key(release)).is_none());
        assert!(matches!(translate(Event::Resize(80, 24)), Some(AppEvent::Resize(80, 24))));
        assert!(translate(Event::FocusGained).is_none());
    }
}
