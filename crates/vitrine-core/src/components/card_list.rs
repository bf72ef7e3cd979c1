//! Scrolling card list: staggered entry plus parallax
//!
//! The list owns the stagger scheduler and keeps each card's handle next to
//! the card, so unmounting a card or disposing the list cancels the pending
//! activation before the card is released.

use std::time::Duration;

use tracing::debug;

use super::entry_card::{CardStyle, EntryCard};
use crate::config::MotionConfig;
use crate::motion::{
    Animated, EntryHandle, PressEvent, Retarget, ScrollLinkedTransform, ScrollReader,
    StaggeredEntryScheduler,
};
use crate::Result;

#[derive(Debug)]
struct Mounted {
    card: EntryCard,
    handle: Option<EntryHandle>,
}

#[derive(Debug)]
pub struct CardList {
    cards: Vec<Option<Mounted>>,
    scheduler: StaggeredEntryScheduler,
    transform: ScrollLinkedTransform,
    scroll: ScrollReader,
    motion: MotionConfig,
}

impl CardList {
    pub fn new(motion: &MotionConfig, scroll: ScrollReader) -> Result<Self> {
        motion.validate()?;
        Ok(Self {
            cards: Vec::new(),
            scheduler: StaggeredEntryScheduler::new(motion.stagger_delay()),
            transform: ScrollLinkedTransform::new(&motion.parallax)?,
            scroll,
            motion: motion.clone(),
        })
    }

    /// Like [`CardList::new`] with a parallax transform other than the configured one
    pub fn with_transform(
        motion: &MotionConfig,
        scroll: ScrollReader,
        transform: ScrollLinkedTransform,
    ) -> Result<Self> {
        let mut list = Self::new(motion, scroll)?;
        list.transform = transform;
        Ok(list)
    }

    /// Replace all cards with `count` fresh ones, entering in index order
    pub fn mount(&mut self, count: usize) -> Result<()> {
        if self.scheduler.is_disposed() {
            return Ok(());
        }
        self.unmount_all();
        for index in 0..count {
            let card = EntryCard::new(index, &self.motion)?;
            let handle = self.scheduler.schedule(index);
            self.cards.push(Some(Mounted { card, handle }));
        }
        debug!(count, "Cards mounted");
        Ok(())
    }

    /// Release one card, cancelling its pending entry first
    pub fn unmount(&mut self, index: usize) {
        if let Some(mut mounted) = self.cards.get_mut(index).and_then(Option::take) {
            if let Some(handle) = mounted.handle.take() {
                self.scheduler.cancel(handle);
            }
            mounted.card.dispose();
        }
    }

    fn unmount_all(&mut self) {
        for index in 0..self.cards.len() {
            self.unmount(index);
        }
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, index: usize) -> Option<&EntryCard> {
        self.cards.get(index)?.as_ref().map(|m| &m.card)
    }

    pub fn transform(&self) -> &ScrollLinkedTransform {
        &self.transform
    }

    /// Activations still waiting on the stagger delay
    pub fn pending_entries(&self) -> usize {
        self.scheduler.pending()
    }

    /// Style of one card at the latest published scroll offset
    pub fn style(&self, index: usize) -> Option<CardStyle> {
        let offset = self.scroll.latest().offset;
        self.card(index).map(|c| c.style(&self.transform, offset))
    }

    pub fn styles(&self) -> Vec<Option<CardStyle>> {
        let offset = self.scroll.latest().offset;
        self.cards
            .iter()
            .map(|m| m.as_ref().map(|m| m.card.style(&self.transform, offset)))
            .collect()
    }

    pub fn press(&mut self, index: usize, event: PressEvent) -> Result<Retarget> {
        match self.cards.get_mut(index).and_then(Option::as_mut) {
            Some(m) => m.card.press(event),
            None => Ok(Retarget::Ignored),
        }
    }

    pub fn tap(&mut self, index: usize) -> Result<Retarget> {
        match self.cards.get_mut(index).and_then(Option::as_mut) {
            Some(m) => m.card.tap(),
            None => Ok(Retarget::Ignored),
        }
    }
}

impl Animated for CardList {
    fn frame(&mut self, dt: Duration) -> bool {
        if self.scheduler.is_disposed() {
            return false;
        }
        for (handle, index) in self.scheduler.advance(dt) {
            let Some(Some(mounted)) = self.cards.get_mut(index) else {
                continue;
            };
            if mounted.handle != Some(handle) {
                continue;
            }
            mounted.handle = None;
            // Bad entry tuning was rejected in `new`; nothing can fail here
            let _ = mounted.card.activate();
        }

        let mut changed = self.scroll.has_changed();
        if changed {
            self.scroll.take();
        }
        for mounted in self.cards.iter_mut().flatten() {
            changed |= mounted.card.frame(dt);
        }
        changed
    }

    fn is_animating(&self) -> bool {
        self.scheduler.pending() > 0
            || self
                .cards
                .iter()
                .flatten()
                .any(|m| m.card.is_animating())
    }

    fn dispose(&mut self) {
        if self.scheduler.is_disposed() {
            return;
        }
        self.scheduler.dispose();
        for mounted in self.cards.iter_mut().flatten() {
            mounted.handle = None;
            mounted.card.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.scheduler.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{scroll_channel, ScrollPublisher, ScrollState};

    const FRAME: Duration = Duration::from_millis(10);

    fn list() -> (CardList, ScrollPublisher) {
        let (publisher, reader) = scroll_channel(ScrollState::new(0.0, 2400.0, 600.0));
        let list = CardList::new(&MotionConfig::default(), reader).unwrap();
        (list, publisher)
    }

    fn run(list: &mut CardList, ms: u64) {
        for _ in 0..ms / 10 {
            list.frame(FRAME);
        }
    }

    #[test]
    fn test_cards_enter_with_stagger() {
        let (mut l, _p) = list();
        l.mount(4).unwrap();
        assert_eq!(l.pending_entries(), 4);

        run(&mut l, 10);
        assert!(l.card(0).unwrap().is_active());
        assert!(!l.card(1).unwrap().is_active());

        run(&mut l, 100);
        assert!(l.card(1).unwrap().is_active());
        assert!(!l.card(2).unwrap().is_active());

        run(&mut l, 3000);
        assert_eq!(l.pending_entries(), 0);
        assert!(!l.is_animating());
        for style in l.styles().into_iter().flatten() {
            assert_eq!(style.opacity, 1.0);
        }
    }

    #[test]
    fn test_dispose_before_entry_never_activates() {
        let (mut l, _p) = list();
        l.mount(6).unwrap();
        run(&mut l, 50);
        l.dispose();
        l.dispose();
        run(&mut l, 2000);
        assert!(!l.card(5).unwrap().is_active());
        assert_eq!(l.style(5).unwrap().opacity, 0.0);
        assert!(!l.is_animating());
    }

    #[test]
    fn test_unmount_cancels_pending_entry() {
        let (mut l, _p) = list();
        l.mount(3).unwrap();
        l.unmount(2);
        assert_eq!(l.pending_entries(), 2);
        assert!(l.card(2).is_none());
        run(&mut l, 1000);
        assert!(l.style(2).is_none());
    }

    #[test]
    fn test_remount_restarts_entry() {
        let (mut l, _p) = list();
        l.mount(2).unwrap();
        run(&mut l, 500);
        l.mount(2).unwrap();
        assert!(!l.card(0).unwrap().is_active());
        assert_eq!(l.pending_entries(), 2);
    }

    #[test]
    fn test_scroll_publish_marks_frame_changed() {
        let (mut l, mut p) = list();
        l.mount(2).unwrap();
        run(&mut l, 3000);
        assert!(!l.frame(FRAME));

        p.publish(ScrollState::new(120.0, 2400.0, 600.0));
        assert!(l.frame(FRAME));
        assert!(!l.frame(FRAME));
        let first = l.style(0).unwrap();
        assert!((first.scale - 0.9).abs() < 1e-9);
    }
}
