//! L3 Molecular Layer: Staggered list entry
//!
//! Entries are scheduled on a virtual clock advanced by the frame loop, so a
//! pending activation is plain data in an arena slot. Cancelling a handle or
//! disposing the scheduler clears the slot synchronously; there is no timer
//! left behind that could fire later.

use std::time::Duration;

use tracing::{debug, trace};

/// Handle to one scheduled activation
///
/// Slots are reused; the generation makes a stale handle harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    index: usize,
    due: Duration,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    pending: Option<Pending>,
}

#[derive(Debug)]
pub struct StaggeredEntryScheduler {
    delay: Duration,
    now: Duration,
    slots: Vec<Slot>,
    free: Vec<u32>,
    disposed: bool,
}

impl StaggeredEntryScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            now: Duration::ZERO,
            slots: Vec::new(),
            free: Vec::new(),
            disposed: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Time advanced so far
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    /// Delay before the item at `index` activates
    pub fn delay_for(&self, index: usize) -> Duration {
        self.delay
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Schedule item `index` to activate `index * delay` from now
    ///
    /// Returns `None` once disposed.
    pub fn schedule(&mut self, index: usize) -> Option<EntryHandle> {
        if self.disposed {
            return None;
        }
        let due = self.now + self.delay_for(index);
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let entry = &mut self.slots[slot as usize];
        entry.pending = Some(Pending { index, due });
        trace!(index, due_ms = due.as_millis() as u64, "Entry scheduled");
        Some(EntryHandle {
            slot,
            generation: entry.generation,
        })
    }

    fn release(&mut self, slot: u32) {
        if let Some(entry) = self.slots.get_mut(slot as usize) {
            entry.pending = None;
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(slot);
        }
    }

    fn slot(&self, handle: EntryHandle) -> Option<&Pending> {
        self.slots
            .get(handle.slot as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.pending.as_ref())
    }

    pub fn is_pending(&self, handle: EntryHandle) -> bool {
        self.slot(handle).is_some()
    }

    /// Number of activations still waiting
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| s.pending.is_some()).count()
    }

    /// Cancel one activation; false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: EntryHandle) -> bool {
        let Some(pending) = self.slot(handle).copied() else {
            return false;
        };
        self.release(handle.slot);
        debug!(index = pending.index, "Entry cancelled");
        true
    }

    /// Advance the clock; returns the handles and indices now due, earliest first
    pub fn advance(&mut self, dt: Duration) -> Vec<(EntryHandle, usize)> {
        if self.disposed {
            return Vec::new();
        }
        self.now += dt;

        let mut due: Vec<(Duration, EntryHandle, usize)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let p = s.pending.filter(|p| p.due <= self.now)?;
                let handle = EntryHandle {
                    slot: i as u32,
                    generation: s.generation,
                };
                Some((p.due, handle, p.index))
            })
            .collect();
        due.sort_by_key(|&(at, _, index)| (at, index));

        for &(_, handle, index) in &due {
            self.release(handle.slot);
            debug!(index, "Entry activated");
        }
        due.into_iter().map(|(_, h, i)| (h, i)).collect()
    }

    /// Cancel everything; idempotent
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let cancelled = self.pending();
        for slot in 0..self.slots.len() as u32 {
            if self.slots[slot as usize].pending.is_some() {
                self.release(slot);
            }
        }
        self.disposed = true;
        debug!(cancelled, "Stagger scheduler disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_delay_scales_with_index() {
        let s = StaggeredEntryScheduler::new(Duration::from_millis(100));
        assert_eq!(s.delay_for(0), Duration::ZERO);
        assert_eq!(s.delay_for(5), Duration::from_millis(500));
    }

    #[test]
    fn test_entries_activate_in_order() {
        let mut s = StaggeredEntryScheduler::new(Duration::from_millis(100));
        for i in (0..4).rev() {
            s.schedule(i);
        }
        let mut order = Vec::new();
        for _ in 0..30 {
            order.extend(s.advance(FRAME).into_iter().map(|(_, i)| i));
        }
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_activation_not_before_delay() {
        let mut s = StaggeredEntryScheduler::new(Duration::from_millis(100));
        let h = s.schedule(2).unwrap();
        assert!(s.advance(Duration::from_millis(199)).is_empty());
        assert!(s.is_pending(h));
        assert_eq!(s.advance(Duration::from_millis(1)), vec![(h, 2)]);
        assert!(!s.is_pending(h));
    }

    #[test]
    fn test_dispose_before_due_never_activates() {
        let mut s = StaggeredEntryScheduler::new(Duration::from_millis(100));
        let h = s.schedule(5).unwrap();
        assert!(s.advance(Duration::from_millis(50)).is_empty());
        s.dispose();
        s.dispose();
        assert!(!s.is_pending(h));
        for _ in 0..100 {
            assert!(s.advance(FRAME).is_empty());
        }
        assert!(s.schedule(0).is_none());
    }

    #[test]
    fn test_cancel_and_stale_handle() {
        let mut s = StaggeredEntryScheduler::new(Duration::from_millis(100));
        let a = s.schedule(1).unwrap();
        assert!(s.cancel(a));
        assert!(!s.cancel(a));

        // reuses the slot with a new generation
        let b = s.schedule(1).unwrap();
        assert_ne!(a, b);
        assert!(!s.cancel(a));
        assert!(s.is_pending(b));
        assert_eq!(s.advance(Duration::from_millis(100)), vec![(b, 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driven_by_frame_interval() {
        let mut s = StaggeredEntryScheduler::new(Duration::from_millis(100));
        s.schedule(3);
        let start = tokio::time::Instant::now();
        let mut last = start;
        let mut interval = tokio::time::interval(FRAME);
        let activated_at = loop {
            let now = interval.tick().await;
            let due = s.advance(now - last);
            last = now;
            if !due.is_empty() {
                break now - start;
            }
        };
        assert!(activated_at >= Duration::from_millis(300));
        assert!(activated_at < Duration::from_millis(300) + FRAME);
    }
}
