use crate::common::Index;
use crate::defaults::MONITOR_COUNT;
use crate::error::StateChangeError;
use crate::monitor::Monitor;

use winsys::geometry::Region;
use winsys::window::Window;

/// The known physical monitors, in the order the display server reports
/// them, padded with inactive entries up to a fixed maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    monitors: Vec<Monitor>,
    current: Index,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl Topology {
    pub fn new() -> Self {
        Self {
            monitors: (0..MONITOR_COUNT).map(|_| Monitor::default()).collect(),
            current: 0,
        }
    }

    #[inline]
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    #[inline]
    pub fn current_index(&self) -> Index {
        self.current
    }

    #[inline]
    pub fn current_monitor(&self) -> &Monitor {
        &self.monitors[self.current]
    }

    #[inline]
    pub fn current_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.current]
    }

    #[inline]
    pub fn is_active(
        &self,
        index: Index,
    ) -> bool {
        self.monitors
            .get(index)
            .map_or(false, |monitor| monitor.is_active())
    }

    pub fn active_monitors(&self) -> impl Iterator<Item = (Index, &Monitor)> {
        self.monitors
            .iter()
            .enumerate()
            .filter(|(_, monitor)| monitor.is_active())
    }

    /// Overwrites the rectangles of the first `regions.len()` monitors;
    /// monitors beyond the reported count keep their last rectangle.
    /// Returns how many entries were updated.
    pub fn refresh(
        &mut self,
        regions: &[Region],
    ) -> usize {
        let count = regions.len().min(self.monitors.len());

        if regions.len() > count {
            warn!(
                "{} monitors reported, tracking only the first {}",
                regions.len(),
                count
            );
        }

        self.monitors
            .iter_mut()
            .zip(regions.iter())
            .for_each(|(monitor, &region)| monitor.set_region(region));

        if !self.is_active(self.current) {
            let fallback = self.active_monitors().next().map(|(index, _)| index);

            if let Some(index) = fallback {
                self.current = index;
            }
        }

        count
    }

    pub fn switch_to(
        &mut self,
        index: Index,
    ) -> Result<(), StateChangeError> {
        if !self.is_active(index) {
            return Err(StateChangeError::InvalidTarget);
        }

        if index == self.current {
            return Err(StateChangeError::StateUnchanged);
        }

        self.current = index;
        Ok(())
    }

    /// Finds the monitor and slot holding `window`.
    pub fn locate(
        &self,
        window: Window,
    ) -> Option<(Index, Index)> {
        self.monitors
            .iter()
            .enumerate()
            .find_map(|(index, monitor)| {
                monitor
                    .slots()
                    .position(window)
                    .map(|slot| (index, slot))
            })
    }

    #[inline]
    pub fn contains(
        &self,
        window: Window,
    ) -> bool {
        self.locate(window).is_some()
    }

    /// Places `window` on the current monitor; a window is never tracked
    /// twice.
    pub fn assign(
        &mut self,
        window: Window,
    ) -> Result<Index, StateChangeError> {
        if self.contains(window) {
            return Err(StateChangeError::AlreadyManaged);
        }

        self.current_monitor_mut().assign(window)
    }

    pub fn remove(
        &mut self,
        window: Window,
    ) -> Option<(Index, Index)> {
        self.monitors
            .iter_mut()
            .enumerate()
            .find_map(|(index, monitor)| monitor.remove(window).map(|slot| (index, slot)))
    }

    /// Exchanges the visible windows of the current monitor and monitor
    /// `index`, leaving both current slot indices and focus stacks as they
    /// are.
    pub fn swap_current_with(
        &mut self,
        index: Index,
    ) -> Result<(), StateChangeError> {
        if !self.is_active(index) {
            return Err(StateChangeError::InvalidTarget);
        }

        if index == self.current {
            return Err(StateChangeError::StateUnchanged);
        }

        let ours = self.monitors[self.current].replace_visible(None);
        let theirs = self.monitors[index].replace_visible(ours);
        self.monitors[self.current].replace_visible(theirs);

        Ok(())
    }
}
