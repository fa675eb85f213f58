use crate::input::KeyEvent;
use crate::window::Window;

#[derive(Debug, Clone)]
pub enum Event {
    Key {
        event: KeyEvent,
    },
    MapRequest {
        window: Window,
        ignore: bool,
    },
    Destroy {
        window: Window,
    },
    ScreenChange,
}
