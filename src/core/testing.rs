use winsys::connection::Connection;
use winsys::event::Event;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::KeyInput;
use winsys::window::Window;
use winsys::Result;

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashSet;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Map(Window),
    Unmap(Window),
    Kill(Window),
    Place(Window, Region),
    Raise(Window),
    Focus(Window),
    FocusRoot,
    GrabKeys(usize),
    GrabKeyboard,
    UngrabKeyboard,
    CreateOverlay(Region),
    FillRegion(Window, Region, u32),
    DrawText(Window, Pos, String),
}

/// In-memory display server: records every command issued and replays a
/// queue of scripted events.
pub struct MockConnection {
    regions: RefCell<Vec<Region>>,
    events: RefCell<VecDeque<Event>>,
    calls: RefCell<Vec<Call>>,
    mapped: RefCell<HashSet<Window>>,
    existing: RefCell<Vec<Window>>,
    vanished: RefCell<HashSet<Window>>,
    focus: Cell<Option<Window>>,
    keyboard_grabbed: Cell<bool>,
    keyboard_available: Cell<bool>,
    next_overlay: Cell<Window>,
}

pub const ROOT: Window = 1;

impl MockConnection {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions: RefCell::new(regions),
            events: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
            mapped: RefCell::new(HashSet::new()),
            existing: RefCell::new(Vec::new()),
            vanished: RefCell::new(HashSet::new()),
            focus: Cell::new(None),
            keyboard_grabbed: Cell::new(false),
            keyboard_available: Cell::new(true),
            next_overlay: Cell::new(0x1000),
        }
    }

    pub fn set_regions(
        &self,
        regions: Vec<Region>,
    ) {
        *self.regions.borrow_mut() = regions;
    }

    pub fn push_event(
        &self,
        event: Event,
    ) {
        self.events.borrow_mut().push_back(event);
    }

    /// Windows already mapped before the window manager starts.
    pub fn add_existing(
        &self,
        window: Window,
    ) {
        self.existing.borrow_mut().push(window);
        self.mapped.borrow_mut().insert(window);
    }

    /// Makes attribute queries on `window` fail, as for a window destroyed
    /// before its map request was handled.
    pub fn vanish(
        &self,
        window: Window,
    ) {
        self.vanished.borrow_mut().insert(window);
    }

    /// Makes active keyboard grabs fail, as when another client holds one.
    pub fn deny_keyboard(&self) {
        self.keyboard_available.set(false);
    }

    pub fn keyboard_grabbed(&self) -> bool {
        self.keyboard_grabbed.get()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn is_mapped(
        &self,
        window: Window,
    ) -> bool {
        self.mapped.borrow().contains(&window)
    }

    pub fn focused(&self) -> Option<Window> {
        self.focus.get()
    }

    fn record(
        &self,
        call: Call,
    ) {
        self.calls.borrow_mut().push(call);
    }
}

impl Connection for MockConnection {
    fn flush(&self) -> bool {
        true
    }

    fn step(&self) -> Option<Event> {
        self.events.borrow_mut().pop_front()
    }

    fn monitor_regions(&self) -> Vec<Region> {
        self.regions.borrow().clone()
    }

    fn top_level_windows(&self) -> Vec<Window> {
        self.existing.borrow().clone()
    }

    fn init_wm_properties(
        &self,
        _wm_name: &str,
    ) {
    }

    fn cleanup(&self) {}

    fn map_window(
        &self,
        window: Window,
    ) {
        self.mapped.borrow_mut().insert(window);
        self.record(Call::Map(window));
    }

    fn unmap_window(
        &self,
        window: Window,
    ) {
        self.mapped.borrow_mut().remove(&window);
        self.record(Call::Unmap(window));
    }

    fn kill_window(
        &self,
        window: Window,
    ) -> bool {
        self.record(Call::Kill(window));
        true
    }

    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) {
        self.record(Call::Place(window, *region));
    }

    fn stack_window_above(
        &self,
        window: Window,
    ) {
        self.record(Call::Raise(window));
    }

    fn focus_window(
        &self,
        window: Window,
    ) {
        self.focus.set(Some(window));
        self.record(Call::Focus(window));
    }

    fn focus_root(&self) {
        self.focus.set(Some(ROOT));
        self.record(Call::FocusRoot);
    }

    fn grab_keys(
        &self,
        key_inputs: &[KeyInput],
    ) {
        self.record(Call::GrabKeys(key_inputs.len()));
    }

    fn grab_keyboard(&self) -> bool {
        self.record(Call::GrabKeyboard);

        let available = self.keyboard_available.get();
        self.keyboard_grabbed.set(available);
        available
    }

    fn ungrab_keyboard(&self) {
        self.keyboard_grabbed.set(false);
        self.record(Call::UngrabKeyboard);
    }

    fn window_is_mappable(
        &self,
        window: Window,
    ) -> bool {
        !self.vanished.borrow().contains(&window)
    }

    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool {
        !self.vanished.borrow().contains(&window)
    }

    fn create_overlay(
        &self,
        region: &Region,
    ) -> Result<Window> {
        let window = self.next_overlay.get();
        self.next_overlay.set(window + 1);
        self.record(Call::CreateOverlay(*region));

        Ok(window)
    }

    fn fill_region(
        &self,
        window: Window,
        region: &Region,
        color: u32,
    ) {
        self.record(Call::FillRegion(window, *region, color));
    }

    fn draw_text(
        &self,
        window: Window,
        pos: Pos,
        text: &str,
        _fg: u32,
        _bg: u32,
    ) {
        self.record(Call::DrawText(window, pos, text.to_owned()));
    }
}
