use crate::common::Index;
use crate::defaults::SLOT_COUNT;

use winsys::window::Window;

/// Fixed-capacity table of arrangement positions, each holding at most
/// one window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotTable {
    slots: [Option<Window>; SLOT_COUNT],
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotTable {
    pub fn new() -> Self {
        Self {
            slots: [None; SLOT_COUNT],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn get(
        &self,
        index: Index,
    ) -> Option<Window> {
        self.slots.get(index).copied().flatten()
    }

    #[inline]
    pub fn position(
        &self,
        window: Window,
    ) -> Option<Index> {
        self.slots.iter().position(|&slot| slot == Some(window))
    }

    #[inline]
    pub fn vacancy(&self) -> Option<Index> {
        self.slots.iter().position(Option::is_none)
    }

    /// Places `window` in the lowest vacant slot.
    pub fn assign(
        &mut self,
        window: Window,
    ) -> Option<Index> {
        let index = self.vacancy()?;
        self.slots[index] = Some(window);
        Some(index)
    }

    pub fn clear(
        &mut self,
        window: Window,
    ) -> Option<Index> {
        let index = self.position(window)?;
        self.slots[index] = None;
        Some(index)
    }

    /// Exchanges occupants, vacant slots included; out-of-range indices
    /// leave the table untouched.
    pub fn swap(
        &mut self,
        a: Index,
        b: Index,
    ) {
        if a < self.capacity() && b < self.capacity() {
            self.slots.swap(a, b);
        }
    }

    pub fn replace(
        &mut self,
        index: Index,
        window: Option<Window>,
    ) -> Option<Window> {
        match self.slots.get_mut(index) {
            Some(slot) => std::mem::replace(slot, window),
            None => None,
        }
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Index, Window)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|window| (index, window)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_first_fit() {
        let mut slots = SlotTable::new();

        assert_eq!(slots.assign(1), Some(0));
        assert_eq!(slots.assign(2), Some(1));
        assert_eq!(slots.assign(3), Some(2));

        slots.clear(2);
        assert_eq!(slots.assign(4), Some(1));
        assert_eq!(slots.get(1), Some(4));
    }

    #[test]
    fn full_table_rejects_assignment() {
        let mut slots = SlotTable::new();

        for window in 0..SLOT_COUNT as Window {
            assert_eq!(slots.assign(window + 1), Some(window as Index));
        }

        assert_eq!(slots.vacancy(), None);
        assert_eq!(slots.assign(1000), None);
        assert_eq!(slots.position(1000), None);
    }

    #[test]
    fn clearing_unknown_window_is_a_no_op() {
        let mut slots = SlotTable::new();
        slots.assign(7);

        assert_eq!(slots.clear(8), None);
        assert_eq!(slots.get(0), Some(7));
    }

    #[test]
    fn swap_moves_occupant_into_vacant_slot() {
        let mut slots = SlotTable::new();
        slots.assign(7);

        slots.swap(0, 5);

        assert_eq!(slots.get(0), None);
        assert_eq!(slots.get(5), Some(7));
    }

    #[test]
    fn swapping_twice_restores_assignment() {
        let mut slots = SlotTable::new();
        slots.assign(7);
        slots.assign(8);
        let before = slots;

        slots.swap(0, 1);
        assert_ne!(slots, before);

        slots.swap(0, 1);
        assert_eq!(slots, before);
    }

    #[test]
    fn out_of_range_swap_is_ignored() {
        let mut slots = SlotTable::new();
        slots.assign(7);
        let before = slots;

        slots.swap(0, SLOT_COUNT);

        assert_eq!(slots, before);
        assert_eq!(slots.get(SLOT_COUNT), None);
    }

    #[test]
    fn occupied_lists_only_filled_slots() {
        let mut slots = SlotTable::new();
        slots.assign(7);
        slots.assign(8);
        slots.swap(1, 4);

        assert_eq!(slots.occupied().collect::<Vec<_>>(), vec![(0, 7), (4, 8)]);
    }
}
