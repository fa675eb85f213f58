use crate::binding::ChordState;
use crate::binding::Command;
use crate::binding::KeyBindings;
use crate::common::ColorScheme;
use crate::common::Index;
use crate::error::StateChangeError;
use crate::pager::Pager;
use crate::topology::Topology;
use crate::util::Util;

use winsys::connection::Connection;
use winsys::event::Event;
use winsys::input::KeyEvent;
use winsys::input::KeyEventKind;
use winsys::window::Window;

pub struct Model<'a> {
    conn: &'a dyn Connection,
    topology: Topology,
    bindings: KeyBindings,
    chord: ChordState,
    pager: Pager,
    running: bool,
}

impl<'a> Model<'a> {
    pub fn new(
        conn: &'a dyn Connection,
        bindings: KeyBindings,
    ) -> Self {
        let pager = Pager::new(
            bindings.slot_keys,
            bindings.monitor_keys,
            ColorScheme::default(),
        );

        Self::init(Self {
            conn,
            topology: Topology::new(),
            bindings,
            chord: ChordState::Normal,
            pager,
            running: true,
        })
    }

    fn init(mut model: Self) -> Self {
        info!("initializing window manager");

        model.conn.init_wm_properties(WM_NAME!());
        model.conn.grab_keys(&model.bindings.grabs());
        model.acquire_monitors();

        model
            .conn
            .top_level_windows()
            .into_iter()
            .for_each(|window| {
                if !model.manage(window) {
                    model.conn.unmap_window(window);
                }
            });

        model.apply_layout();
        model
    }

    pub fn run(&mut self) {
        while self.running {
            match self.conn.step() {
                Some(event) => {
                    trace!("received event: {:?}", event);

                    match event {
                        Event::Key {
                            event,
                        } => self.handle_key(event),
                        Event::MapRequest {
                            window,
                            ignore,
                        } => self.handle_map_request(window, ignore),
                        Event::Destroy {
                            window,
                        } => self.handle_destroy(window),
                        Event::ScreenChange => self.handle_screen_change(),
                    }
                },
                None => {
                    info!("event stream closed, exiting");
                    self.running = false;
                },
            }

            self.conn.flush();
        }
    }

    fn acquire_monitors(&mut self) -> usize {
        let regions = self.conn.monitor_regions();
        let count = self.topology.refresh(&regions);

        info!("acquired {} monitor(s)", count);
        self.topology
            .monitors()
            .iter()
            .take(count)
            .enumerate()
            .for_each(|(index, monitor)| debug!("monitor {}: {:?}", index, monitor.region()));

        count
    }

    fn manage(
        &mut self,
        window: Window,
    ) -> bool {
        match self.topology.assign(window) {
            Ok(slot) => {
                info!(
                    "managing window {:#0x} in slot {} of monitor {}",
                    window,
                    slot,
                    self.topology.current_index()
                );
                true
            },
            Err(StateChangeError::LimitReached) => {
                warn!(
                    "no vacant slot on monitor {}, refusing window {:#0x}",
                    self.topology.current_index(),
                    window
                );
                false
            },
            Err(err) => {
                debug!("not managing window {:#0x}: {:?}", window, err);
                false
            },
        }
    }

    /// The single place where visibility is decided: on every active
    /// monitor, only the occupant of the current slot is mapped, and input
    /// focus goes to the current monitor's visible window, else to root.
    fn apply_layout(&self) {
        let current = self.topology.current_index();

        for (index, monitor) in self.topology.active_monitors() {
            let visible = monitor.visible();

            monitor
                .slots()
                .occupied()
                .filter(|&(_, window)| Some(window) != visible)
                .for_each(|(_, window)| self.conn.unmap_window(window));

            match visible {
                Some(window) => {
                    self.conn.place_window(window, &monitor.region());
                    self.conn.stack_window_above(window);
                    self.conn.map_window(window);

                    if index == current {
                        self.conn.focus_window(window);
                    }
                },
                None if index == current => self.conn.focus_root(),
                None => {},
            }
        }

        self.pager.raise(self.conn);
    }

    fn execute(
        &mut self,
        command: Command,
    ) {
        debug!("executing command: {:?}", command);

        match command {
            Command::Spawn(argv) => Util::spawn(argv),
            Command::KillCurrent => self.kill_current(),
            Command::RefreshTopology => self.refresh_topology(),
            Command::View(index) => self.view_slot(index),
            Command::SwapSlot(index) => self.swap_slot(index),
            Command::FocusMonitor(index) => self.focus_monitor(index),
            Command::SwapMonitor(index) => self.swap_monitor(index),
        }
    }

    fn kill_current(&self) {
        if let Some(window) = self.topology.current_monitor().visible() {
            info!("killing window {:#0x}", window);
            self.conn.kill_window(window);
        }
    }

    fn refresh_topology(&mut self) {
        self.acquire_monitors();

        if self.pager.is_shown() {
            self.pager.show(self.conn, &self.topology);
        }

        self.apply_layout();
    }

    fn view_slot(
        &mut self,
        index: Index,
    ) {
        match self.topology.current_monitor_mut().view(index) {
            Ok(()) => self.apply_layout(),
            Err(err) => debug!("unable to view slot {}: {:?}", index, err),
        }
    }

    fn swap_slot(
        &mut self,
        index: Index,
    ) {
        match self.topology.current_monitor_mut().swap_with_current(index) {
            Ok(()) => self.apply_layout(),
            Err(err) => debug!("unable to swap with slot {}: {:?}", index, err),
        }
    }

    fn focus_monitor(
        &mut self,
        index: Index,
    ) {
        match self.topology.switch_to(index) {
            Ok(()) => self.apply_layout(),
            Err(err) => debug!("unable to focus monitor {}: {:?}", index, err),
        }
    }

    fn swap_monitor(
        &mut self,
        index: Index,
    ) {
        match self.topology.swap_current_with(index) {
            Ok(()) => self.apply_layout(),
            Err(err) => debug!("unable to swap with monitor {}: {:?}", index, err),
        }
    }

    /// The overlay holds an active keyboard grab, so the modifier releases
    /// that end it are delivered even when it was entered through a
    /// passive grab on some other key.
    fn enter_overlay(&mut self) {
        if !self.conn.grab_keyboard() {
            warn!("unable to grab keyboard, pager not shown");
            return;
        }

        self.chord = ChordState::Overlay;
        self.pager.show(self.conn, &self.topology);
    }

    fn leave_overlay(&mut self) {
        self.chord = ChordState::Normal;
        self.pager.hide(self.conn);
        self.conn.ungrab_keyboard();
    }

    fn handle_key(
        &mut self,
        event: KeyEvent,
    ) {
        match (self.chord, self.bindings.transition(self.chord, &event)) {
            (ChordState::Normal, ChordState::Overlay) => self.enter_overlay(),
            (ChordState::Overlay, ChordState::Normal) => self.leave_overlay(),
            _ => {},
        }

        if event.kind == KeyEventKind::Release {
            return;
        }

        if self.chord == ChordState::Overlay {
            self.pager.render(self.conn, &self.topology);
        }

        if let Some(command) = self.bindings.resolve(&event.input, &self.topology) {
            self.execute(command);
        }
    }

    fn handle_map_request(
        &mut self,
        window: Window,
        ignore: bool,
    ) {
        debug!("MAP_REQUEST for window {:#0x}", window);

        if ignore {
            self.conn.map_window(window);
            return;
        }

        if !self.conn.window_is_mappable(window) {
            return;
        }

        if self.topology.contains(window) || self.manage(window) {
            self.apply_layout();
        }
    }

    fn handle_destroy(
        &mut self,
        window: Window,
    ) {
        debug!("DESTROY for window {:#0x}", window);

        if let Some((monitor, slot)) = self.topology.remove(window) {
            info!(
                "window {:#0x} left slot {} of monitor {}",
                window, slot, monitor
            );

            debug!(
                "focus history of monitor {}: {:?}",
                monitor,
                self.topology.monitors()[monitor].focus_stack().entries()
            );

            self.apply_layout();
        }
    }

    fn handle_screen_change(&mut self) {
        debug!("SCREEN_CHANGE");
        self.refresh_topology();
    }
}
