use crate::common::Index;
use crate::defaults::SLOT_COUNT;

/// Per-monitor history of selected slots, consulted only when the window
/// in the current slot disappears.
///
/// The stack keeps a single level of fallback: its top is always the
/// current slot, and at most one entry lies beneath it. The bottom entry
/// is the floor and is never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusStack {
    entries: Vec<Index>,
}

impl FocusStack {
    pub fn new(initial: Index) -> Self {
        let mut entries = Vec::with_capacity(2);
        entries.push(initial.min(SLOT_COUNT - 1));

        Self {
            entries,
        }
    }

    #[inline]
    pub fn top(&self) -> Option<Index> {
        self.entries.last().copied()
    }

    #[inline]
    pub fn entries(&self) -> &[Index] {
        &self.entries
    }

    /// Forgets all history; `index` becomes the floor.
    pub fn reset(
        &mut self,
        index: Index,
    ) {
        if index >= SLOT_COUNT {
            return;
        }

        self.entries.clear();
        self.entries.push(index);
    }

    /// Truncates to the current top, then records `index` above it.
    pub fn push(
        &mut self,
        index: Index,
    ) {
        if index >= SLOT_COUNT {
            return;
        }

        if let Some(top) = self.top() {
            self.entries.clear();

            if top != index {
                self.entries.push(top);
            }
        }

        self.entries.push(index);
    }

    /// Drops the top entry and yields the one beneath it, which becomes
    /// the new top. At the floor nothing changes and `None` is returned.
    pub fn pop(&mut self) -> Option<Index> {
        if self.entries.len() <= 1 {
            return None;
        }

        self.entries.pop();
        self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_floor() {
        let mut stack = FocusStack::new(0);

        assert_eq!(stack.entries(), &[0]);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.entries(), &[0]);
    }

    #[test]
    fn push_keeps_one_level_of_fallback() {
        let mut stack = FocusStack::new(0);

        stack.push(1);
        assert_eq!(stack.entries(), &[0, 1]);

        stack.push(2);
        assert_eq!(stack.entries(), &[1, 2]);
    }

    #[test]
    fn pushing_the_top_does_not_duplicate_it() {
        let mut stack = FocusStack::new(3);

        stack.push(3);
        assert_eq!(stack.entries(), &[3]);
    }

    #[test]
    fn reset_truncates_history() {
        let mut stack = FocusStack::new(0);

        stack.reset(2);
        stack.reset(5);

        assert_eq!(stack.entries(), &[5]);
    }

    #[test]
    fn pop_yields_fallback_then_stops_at_floor() {
        let mut stack = FocusStack::new(0);
        stack.push(4);

        assert_eq!(stack.pop(), Some(0));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top(), Some(0));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut stack = FocusStack::new(1);

        stack.push(SLOT_COUNT);
        stack.reset(SLOT_COUNT + 3);

        assert_eq!(stack.entries(), &[1]);
        assert!(stack.entries().iter().all(|&index| index < SLOT_COUNT));
    }
}
