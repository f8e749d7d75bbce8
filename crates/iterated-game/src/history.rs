//! Fixed-capacity rolling history
//!
//! A window always holds exactly `K` slots, newest first. Slots that have
//! not been written since the last reset are `Slot::Unknown`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One history slot: a real observation or the "nothing seen yet" marker
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Slot<T> {
    Known(T),
    Unknown,
}

impl<T> Slot<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Slot::Unknown)
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Slot::Known(v) => Some(v),
            Slot::Unknown => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Slot<U> {
        match self {
            Slot::Known(v) => Slot::Known(f(v)),
            Slot::Unknown => Slot::Unknown,
        }
    }
}

/// Rolling window of the last `capacity` observations
#[derive(Clone, Debug)]
pub struct HistoryWindow<T> {
    slots: VecDeque<Slot<T>>,
    capacity: usize,
}

impl<T: Clone> HistoryWindow<T> {
    /// Create a window padded with `capacity` unknown slots
    pub fn new(capacity: usize) -> Self {
        let mut window = Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        };
        window.reset();
        window
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert at the front, evicting the oldest slot. No-op when capacity is 0.
    pub fn push(&mut self, value: T) {
        self.push_slot(Slot::Known(value));
    }

    /// Advance the window by one slot, which may be `Unknown`
    pub fn push_slot(&mut self, slot: Slot<T>) {
        if self.capacity == 0 {
            return;
        }
        self.slots.pop_back();
        self.slots.push_front(slot);
    }

    /// Current contents, newest first, always `capacity` long
    pub fn snapshot(&self) -> Vec<Slot<T>> {
        self.slots.iter().cloned().collect()
    }

    /// Most recent observation, if any
    pub fn latest(&self) -> Slot<T> {
        self.slots.front().cloned().unwrap_or(Slot::Unknown)
    }

    /// Refill every slot with `Unknown`
    pub fn reset(&mut self) {
        self.slots.clear();
        self.slots.extend(std::iter::repeat_with(|| Slot::Unknown).take(self.capacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_is_all_unknown() {
        let w: HistoryWindow<u8> = HistoryWindow::new(3);
        assert_eq!(w.snapshot(), vec![Slot::Unknown; 3]);
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut w = HistoryWindow::new(3);
        w.push(1);
        w.push(2);
        assert_eq!(w.snapshot(), vec![Slot::Known(2), Slot::Known(1), Slot::Unknown]);
        assert_eq!(w.latest(), Slot::Known(2));
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut w = HistoryWindow::new(2);
        for v in 1..=5 {
            w.push(v);
        }
        assert_eq!(w.snapshot(), vec![Slot::Known(5), Slot::Known(4)]);
    }

    #[test]
    fn test_zero_capacity_ignores_writes() {
        let mut w = HistoryWindow::new(0);
        w.push(7);
        assert!(w.snapshot().is_empty());
        assert_eq!(w.latest(), Slot::Unknown);
    }

    #[test]
    fn test_reset_restores_unknowns() {
        let mut w = HistoryWindow::new(2);
        w.push('a');
        w.push('b');
        w.reset();
        assert_eq!(w.snapshot(), vec![Slot::Unknown, Slot::Unknown]);
    }

    #[test]
    fn test_push_unknown_still_evicts() {
        let mut w = HistoryWindow::new(2);
        w.push(1);
        w.push(2);
        w.push_slot(Slot::Unknown);
        assert_eq!(w.snapshot(), vec![Slot::Unknown, Slot::Known(2)]);
    }

    #[test]
    fn test_slot_map() {
        assert_eq!(Slot::Known(2).map(|v| v * 10), Slot::Known(20));
        assert_eq!(Slot::<i32>::Unknown.map(|v| v * 10), Slot::Unknown);
    }
}
