use crate::common::Color;
use crate::common::ColorScheme;
use crate::common::Index;
use crate::defaults::MONITOR_COUNT;
use crate::defaults::PAGER_CELL_GAP;
use crate::defaults::PAGER_COLUMNS;
use crate::defaults::PAGER_HEADER_HEIGHT;
use crate::defaults::PAGER_ROWS;
use crate::defaults::PAGER_TEXT_BASELINE;
use crate::defaults::PAGER_TEXT_PADDING;
use crate::defaults::SLOT_COUNT;
use crate::defaults::TIME_FORMAT;
use crate::monitor::Monitor;
use crate::topology::Topology;

use winsys::connection::Connection;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::Key;
use winsys::window::Window;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellState {
    Vacant,
    Occupied,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub region: Region,
    pub state: CellState,
    pub label: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Overlay {
    window: Window,
    region: Region,
}

/// Occupancy overlay, one override-redirect window per active monitor.
/// Reads the topology, never changes it.
pub struct Pager {
    overlays: [Option<Overlay>; MONITOR_COUNT],
    slot_keys: [Key; SLOT_COUNT],
    monitor_keys: [Key; MONITOR_COUNT],
    colors: ColorScheme,
    shown: bool,
}

impl Pager {
    pub fn new(
        slot_keys: [Key; SLOT_COUNT],
        monitor_keys: [Key; MONITOR_COUNT],
        colors: ColorScheme,
    ) -> Self {
        Self {
            overlays: [None; MONITOR_COUNT],
            slot_keys,
            monitor_keys,
            colors,
            shown: false,
        }
    }

    #[inline]
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn windows(&self) -> impl Iterator<Item = Window> + '_ {
        self.overlays
            .iter()
            .filter_map(|overlay| overlay.map(|overlay| overlay.window))
    }

    /// Lays out the slot grid of `monitor` in overlay-local coordinates:
    /// a header strip on top, the cells below it in keyboard order.
    pub fn cells(
        &self,
        monitor: &Monitor,
    ) -> Vec<Cell> {
        let area = Region::new(0, 0, monitor.region().dim.w, monitor.region().dim.h);
        let (_, body) = area.split_top(PAGER_HEADER_HEIGHT);

        body.split_grid(PAGER_COLUMNS, PAGER_ROWS)
            .into_iter()
            .zip(self.slot_keys.iter())
            .enumerate()
            .map(|(index, (region, key))| Cell {
                region: region.shrink(PAGER_CELL_GAP),
                state: Self::cell_state(monitor, index),
                label: key.name(),
            })
            .collect()
    }

    fn cell_state(
        monitor: &Monitor,
        index: Index,
    ) -> CellState {
        if index == monitor.current() {
            CellState::Selected
        } else if monitor.slots().get(index).is_some() {
            CellState::Occupied
        } else {
            CellState::Vacant
        }
    }

    fn cell_color(
        &self,
        state: CellState,
    ) -> Color {
        match state {
            CellState::Vacant => self.colors.vacant,
            CellState::Occupied => self.colors.occupied,
            CellState::Selected => self.colors.selected,
        }
    }

    pub fn header(
        &self,
        index: Index,
        topology: &Topology,
        clock: &str,
    ) -> String {
        let label = self
            .monitor_keys
            .get(index)
            .map_or("", |key| key.name());

        if index == topology.current_index() {
            format!("{}  [{}]", clock, label)
        } else {
            format!("{}   {}", clock, label)
        }
    }

    pub fn show(
        &mut self,
        conn: &dyn Connection,
        topology: &Topology,
    ) {
        for (index, monitor) in topology.active_monitors() {
            let region = monitor.region();

            let window = match self.overlays[index] {
                Some(overlay) if overlay.region == region => overlay.window,
                Some(overlay) => {
                    conn.place_window(overlay.window, &region);
                    overlay.window
                },
                None => match conn.create_overlay(&region) {
                    Ok(window) => window,
                    Err(err) => {
                        warn!("unable to create pager overlay: {}", err);
                        continue;
                    },
                },
            };

            self.overlays[index] = Some(Overlay {
                window,
                region,
            });

            conn.map_window(window);
            conn.stack_window_above(window);
        }

        for (index, overlay) in self.overlays.iter().enumerate() {
            if let Some(overlay) = overlay {
                if !topology.is_active(index) {
                    conn.unmap_window(overlay.window);
                }
            }
        }

        self.shown = true;
    }

    pub fn render(
        &self,
        conn: &dyn Connection,
        topology: &Topology,
    ) {
        if !self.shown {
            return;
        }

        let clock = chrono::Local::now().format(TIME_FORMAT).to_string();

        for (index, monitor) in topology.active_monitors() {
            let overlay = match self.overlays[index] {
                Some(overlay) => overlay,
                None => continue,
            };

            let area = Region::new(0, 0, overlay.region.dim.w, overlay.region.dim.h);
            let (header, _) = area.split_top(PAGER_HEADER_HEIGHT);

            conn.fill_region(overlay.window, &area, self.colors.background);
            conn.fill_region(overlay.window, &header, self.colors.header);
            conn.draw_text(
                overlay.window,
                Pos {
                    x: PAGER_TEXT_PADDING,
                    y: PAGER_TEXT_BASELINE,
                },
                &self.header(index, topology, &clock),
                self.colors.text,
                self.colors.header,
            );

            for cell in self.cells(monitor) {
                let color = self.cell_color(cell.state);

                conn.fill_region(overlay.window, &cell.region, color);
                conn.draw_text(
                    overlay.window,
                    cell.region.pos
                        + Pos {
                            x: PAGER_TEXT_PADDING,
                            y: PAGER_TEXT_BASELINE,
                        },
                    cell.label,
                    self.colors.text,
                    color,
                );
            }
        }
    }

    pub fn raise(
        &self,
        conn: &dyn Connection,
    ) {
        if self.shown {
            self.windows()
                .for_each(|window| conn.stack_window_above(window));
        }
    }

    pub fn hide(
        &mut self,
        conn: &dyn Connection,
    ) {
        if !self.shown {
            return;
        }

        self.windows().for_each(|window| conn.unmap_window(window));
        self.shown = false;
    }
}
