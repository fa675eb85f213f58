use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::input::KeyInput;
use crate::window::Window;
use crate::Result;

pub trait Connection {
    fn flush(&self) -> bool;
    fn step(&self) -> Option<Event>;
    fn monitor_regions(&self) -> Vec<Region>;
    fn top_level_windows(&self) -> Vec<Window>;
    fn init_wm_properties(
        &self,
        wm_name: &str,
    );
    fn cleanup(&self);

    // Window manipulation
    fn map_window(
        &self,
        window: Window,
    );
    fn unmap_window(
        &self,
        window: Window,
    );
    fn kill_window(
        &self,
        window: Window,
    ) -> bool;
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    );
    fn stack_window_above(
        &self,
        window: Window,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn focus_root(&self);
    fn grab_keys(
        &self,
        key_inputs: &[KeyInput],
    );
    fn grab_keyboard(&self) -> bool;
    fn ungrab_keyboard(&self);
    fn window_is_mappable(
        &self,
        window: Window,
    ) -> bool;
    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool;

    // Overlay drawing
    fn create_overlay(
        &self,
        region: &Region,
    ) -> Result<Window>;
    fn fill_region(
        &self,
        window: Window,
        region: &Region,
        color: u32,
    );
    fn draw_text(
        &self,
        window: Window,
        pos: Pos,
        text: &str,
        fg: u32,
        bg: u32,
    );
}
