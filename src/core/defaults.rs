use crate::common::ColorScheme;

use winsys::input::Key;
use winsys::input::Modifier;

#[macro_export]
macro_rules! WM_NAME (
    () => { "hest" };
);

/// One slot per bindable key on the three letter rows of the keyboard.
pub const SLOT_COUNT: usize = 30;
pub const MONITOR_COUNT: usize = 12;

pub const PRIMARY_MODIFIER: Modifier = Modifier::Super;
pub const OVERLAY_MODIFIER: Modifier = Modifier::Ctrl;

pub const LAUNCH_KEY: Key = Key::Return;
pub const KILL_KEY: Key = Key::Delete;
pub const REFRESH_KEY: Key = Key::Escape;

#[rustfmt::skip]
pub const SLOT_KEYS: [Key; SLOT_COUNT] = [
    Key::One, Key::Two, Key::Three, Key::Four, Key::Five,
    Key::Six, Key::Seven, Key::Eight, Key::Nine, Key::Zero,
    Key::Q, Key::W, Key::E, Key::R, Key::T,
    Key::Y, Key::U, Key::I, Key::O, Key::P,
    Key::A, Key::S, Key::D, Key::F, Key::G,
    Key::H, Key::J, Key::K, Key::L, Key::SemiColon,
];

#[rustfmt::skip]
pub const MONITOR_KEYS: [Key; MONITOR_COUNT] = [
    Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
    Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
];

pub const TERMINAL_COMMAND: &[&str] = &["urxvt"];
pub const MENU_COMMAND: &[&str] = &["dmenu_run"];

pub const FONT: &str = "fixed";
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const PAGER_COLUMNS: usize = 10;
pub const PAGER_ROWS: usize = 3;
pub const PAGER_HEADER_HEIGHT: i32 = 24;
pub const PAGER_CELL_GAP: i32 = 4;
pub const PAGER_TEXT_PADDING: i32 = 8;
pub const PAGER_TEXT_BASELINE: i32 = 16;

impl ColorScheme {
    pub const DEFAULT: Self = Self {
        background: 0x1c1c1c,
        header: 0x333333,
        vacant: 0x444444,
        occupied: 0x5f8787,
        selected: 0xe78a53,
        text: 0xeeeeee,
    };
}
