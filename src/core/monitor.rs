use crate::common::Index;
use crate::error::StateChangeError;
use crate::focus::FocusStack;
use crate::slot::SlotTable;

use winsys::geometry::Region;
use winsys::window::Window;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    region: Region,
    slots: SlotTable,
    current: Index,
    focus: FocusStack,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

impl Monitor {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            slots: SlotTable::new(),
            current: 0,
            focus: FocusStack::new(0),
        }
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn set_region(
        &mut self,
        region: Region,
    ) {
        self.region = region;
    }

    /// A monitor without area has not been reported by the display
    /// server yet.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.region.is_empty()
    }

    #[inline]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    #[inline]
    pub fn current(&self) -> Index {
        self.current
    }

    #[inline]
    pub fn focus_stack(&self) -> &FocusStack {
        &self.focus
    }

    #[inline]
    pub fn visible(&self) -> Option<Window> {
        self.slots.get(self.current)
    }

    pub fn view(
        &mut self,
        index: Index,
    ) -> Result<(), StateChangeError> {
        if index >= self.slots.capacity() {
            return Err(StateChangeError::InvalidTarget);
        }

        if index == self.current {
            return Err(StateChangeError::StateUnchanged);
        }

        self.current = index;
        self.focus.reset(index);

        Ok(())
    }

    pub fn swap_with_current(
        &mut self,
        index: Index,
    ) -> Result<(), StateChangeError> {
        if index >= self.slots.capacity() {
            return Err(StateChangeError::InvalidTarget);
        }

        if index == self.current {
            return Err(StateChangeError::StateUnchanged);
        }

        self.slots.swap(self.current, index);
        self.focus.reset(self.current);

        Ok(())
    }

    pub fn assign(
        &mut self,
        window: Window,
    ) -> Result<Index, StateChangeError> {
        let index = self
            .slots
            .assign(window)
            .ok_or(StateChangeError::LimitReached)?;

        self.current = index;
        self.focus.push(index);

        Ok(index)
    }

    /// Vacates the slot holding `window`. If it was the current slot, the
    /// focus stack decides the successor; at its floor the now empty slot
    /// stays selected.
    pub fn remove(
        &mut self,
        window: Window,
    ) -> Option<Index> {
        let index = self.slots.clear(window)?;

        if index == self.current {
            if let Some(fallback) = self.focus.pop() {
                self.current = fallback;
            }
        }

        Some(index)
    }

    #[inline]
    pub fn replace_visible(
        &mut self,
        window: Option<Window>,
    ) -> Option<Window> {
        self.slots.replace(self.current, window)
    }
}
