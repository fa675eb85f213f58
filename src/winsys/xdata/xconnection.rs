use crate::connection::Connection;
use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::input::Key;
use crate::input::KeyEvent;
use crate::input::KeyEventKind;
use crate::input::KeyInput;
use crate::input::Modifier;
use crate::window::Window;
use crate::Result;

use std::collections::HashMap;

use x11rb::connection;
use x11rb::cursor::Handle as CursorHandle;
use x11rb::errors::ReplyError;
use x11rb::protocol::randr;
use x11rb::protocol::xinerama;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::xproto::ModMask;
use x11rb::protocol::xproto::CLIENT_MESSAGE_EVENT;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;
use x11rb::resource_manager::Database;
use x11rb::wrapper::ConnectionExt as _;

use anyhow::anyhow;
use strum::IntoEnumIterator;

type Atom = u32;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        WINDOW,
        CARDINAL,
        UTF8_STRING,

        // ICCCM
        WM_CLASS,
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,

        // EWMH
        _NET_SUPPORTED,
        _NET_ACTIVE_WINDOW,
        _NET_SUPPORTING_WM_CHECK,
        _NET_WM_NAME,
        _NET_WM_PID,
    }
}

/// Monitor rectangles from Xinerama screen info; a server reporting no
/// screens is treated as a single monitor covering the root window.
fn regions_from_screens(
    screens: &[xinerama::ScreenInfo],
    root: Region,
) -> Vec<Region> {
    if screens.is_empty() {
        return vec![root];
    }

    screens
        .iter()
        .map(|info| {
            Region::new(
                info.x_org as i32,
                info.y_org as i32,
                info.width as i32,
                info.height as i32,
            )
        })
        .collect()
}

/// Fills `region` exactly: clients keep no border of their own.
fn placement_aux(region: &Region) -> xproto::ConfigureWindowAux {
    xproto::ConfigureWindowAux::default()
        .x(region.pos.x as i32)
        .y(region.pos.y as i32)
        .width(region.dim.w.max(0) as u32)
        .height(region.dim.h.max(0) as u32)
        .border_width(0)
}

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    atoms: Atoms,
    screen: xproto::Screen,
    check_window: Window,
    gc: xproto::Gcontext,
    font: xproto::Font,
    keys: HashMap<u8, Key>,
    keycodes: HashMap<Key, u8>,
    root_event_mask: EventMask,
    overlay_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    pub fn new(
        conn: &'conn Conn,
        screen_num: usize,
        font_name: &str,
    ) -> Result<Self> {
        let screen = conn.setup().roots[screen_num].clone();
        let root = screen.root;

        let aux = xproto::ChangeWindowAttributesAux::default()
            .event_mask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY);

        let res = conn.change_window_attributes(screen.root, &aux)?.check();
        if let Err(ReplyError::X11Error(err)) = res {
            if err.error_kind == ErrorKind::Access {
                return Err(anyhow!("another window manager is already running"));
            } else {
                return Err(anyhow!("unable to set up window manager"));
            }
        }

        let atoms = Atoms::new(conn)?.reply()?;
        let check_window = conn.generate_id()?;

        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check_window,
            root,
            -1,
            -1,
            1,
            1,
            0,
            xproto::WindowClass::INPUT_ONLY,
            x11rb::COPY_FROM_PARENT,
            &xproto::CreateWindowAux::default().override_redirect(1),
        )?;

        conn.map_window(check_window)?;
        conn.configure_window(
            check_window,
            &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::BELOW),
        )?;

        if let Err(err) = randr::select_input(
            conn,
            check_window,
            randr::NotifyMask::OUTPUT_CHANGE
                | randr::NotifyMask::CRTC_CHANGE
                | randr::NotifyMask::SCREEN_CHANGE,
        ) {
            warn!("screen change notifications unavailable: {}", err);
        }

        let font = conn.generate_id()?;
        conn.open_font(font, font_name.as_bytes())?;

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            screen.root,
            &xproto::CreateGCAux::default()
                .font(font)
                .graphics_exposures(0),
        )?;

        let database = Database::new_from_default(conn).ok();
        if let Some(ref database) = database {
            drop(
                CursorHandle::new(conn, screen_num, &database).map(|cookie| {
                    cookie.reply().map(|reply| {
                        let aux = xproto::ChangeWindowAttributesAux::default()
                            .cursor(reply.load_cursor(conn, "left_ptr").ok());

                        drop(conn.change_window_attributes(screen.root, &aux));
                    })
                }),
            );
        }

        let keys: HashMap<u8, Key> = map!(
            9 => Key::Escape,
            10 => Key::One,
            11 => Key::Two,
            12 => Key::Three,
            13 => Key::Four,
            14 => Key::Five,
            15 => Key::Six,
            16 => Key::Seven,
            17 => Key::Eight,
            18 => Key::Nine,
            19 => Key::Zero,
            20 => Key::Minus,
            21 => Key::Equal,
            22 => Key::Backspace,
            23 => Key::Tab,
            24 => Key::Q,
            25 => Key::W,
            26 => Key::E,
            27 => Key::R,
            28 => Key::T,
            29 => Key::Y,
            30 => Key::U,
            31 => Key::I,
            32 => Key::O,
            33 => Key::P,
            36 => Key::Return,
            37 => Key::Control,
            38 => Key::A,
            39 => Key::S,
            40 => Key::D,
            41 => Key::F,
            42 => Key::G,
            43 => Key::H,
            44 => Key::J,
            45 => Key::K,
            46 => Key::L,
            47 => Key::SemiColon,
            50 => Key::Shift,
            52 => Key::Z,
            53 => Key::X,
            54 => Key::C,
            55 => Key::V,
            56 => Key::B,
            57 => Key::N,
            58 => Key::M,
            59 => Key::Comma,
            60 => Key::Period,
            61 => Key::Slash,
            62 => Key::RightShift,
            64 => Key::Alt,
            65 => Key::Space,
            67 => Key::F1,
            68 => Key::F2,
            69 => Key::F3,
            70 => Key::F4,
            71 => Key::F5,
            72 => Key::F6,
            73 => Key::F7,
            74 => Key::F8,
            75 => Key::F9,
            76 => Key::F10,
            95 => Key::F11,
            96 => Key::F12,
            105 => Key::RightControl,
            108 => Key::RightAlt,
            119 => Key::Delete,
            133 => Key::Super,
            134 => Key::RightSuper,
        );

        let keycodes = keys.iter().map(|(&code, &key)| (key, code)).collect();

        let root_event_mask: EventMask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::STRUCTURE_NOTIFY;

        let overlay_event_mask: EventMask = EventMask::NO_EVENT;

        Ok(Self {
            conn,
            atoms,
            screen,
            check_window,
            gc,
            font,
            keys,
            keycodes,
            root_event_mask,
            overlay_event_mask,
        })
    }

    pub fn window_has_any_of_protocols(
        &self,
        window: Window,
        protocols: &[Atom],
    ) -> bool {
        self.conn
            .get_property(
                false,
                window,
                self.atoms.WM_PROTOCOLS,
                xproto::AtomEnum::ATOM,
                0,
                std::u32::MAX,
            )
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    reply.value32().map_or(false, |mut window_protocols| {
                        window_protocols.any(|protocol| protocols.contains(&protocol))
                    })
                })
            })
    }

    #[inline]
    fn send_protocol_client_message(
        &self,
        window: Window,
        atom: Atom,
    ) -> Result<()> {
        let data = [atom, x11rb::CURRENT_TIME, 0, 0, 0];

        let event = xproto::ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window,
            type_: self.atoms.WM_PROTOCOLS,
            data: data.into(),
        };

        self.conn
            .send_event(false, window, EventMask::NO_EVENT, &event)?;

        Ok(())
    }

    #[inline]
    fn get_key(
        &self,
        keycode: u8,
    ) -> Key {
        self.keys.get(&keycode).copied().unwrap_or(Key::Any)
    }

    #[inline]
    fn get_keycode(
        &self,
        key: Key,
    ) -> Option<u8> {
        self.keycodes.get(&key).copied()
    }

    #[inline]
    fn modifier_mask(modifier: Modifier) -> ModMask {
        match modifier {
            Modifier::Ctrl => ModMask::CONTROL,
            Modifier::Shift => ModMask::SHIFT,
            Modifier::Alt => ModMask::M1,
            Modifier::Super => ModMask::M4,
            Modifier::NumLock => ModMask::M2,
            Modifier::CapsLock => ModMask::LOCK,
        }
    }

    fn modifiers_from_state(state: u16) -> Vec<Modifier> {
        Modifier::iter()
            .filter(|&modifier| state & u16::from(Self::modifier_mask(modifier)) > 0)
            .collect()
    }

    #[inline]
    fn on_key(
        &self,
        kind: KeyEventKind,
        detail: u8,
        state: u16,
    ) -> Option<Event> {
        let key = self.get_key(detail);
        let modifiers = Self::modifiers_from_state(state);

        Some(Event::Key {
            event: match kind {
                KeyEventKind::Press => KeyEvent::press(key, &modifiers),
                KeyEventKind::Release => KeyEvent::release(key, &modifiers),
            },
        })
    }

    #[inline]
    fn on_map_request(
        &self,
        event: &xproto::MapRequestEvent,
    ) -> Option<Event> {
        Some(Event::MapRequest {
            window: event.window,
            ignore: !self.must_manage_window(event.window),
        })
    }

    #[inline]
    fn on_destroy_notify(
        &self,
        event: &xproto::DestroyNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Destroy {
            window: event.window,
        })
    }

    #[inline]
    fn on_configure_notify(
        &self,
        event: &xproto::ConfigureNotifyEvent,
    ) -> Option<Event> {
        if event.window == self.screen.root {
            Some(Event::ScreenChange)
        } else {
            None
        }
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    fn step(&self) -> Option<Event> {
        loop {
            let event = match self.conn.wait_for_event() {
                Ok(event) => event,
                Err(err) => {
                    error!("lost connection to the X server: {}", err);
                    return None;
                },
            };

            trace!("received X event: {:?}", event);

            let event = match event {
                XEvent::KeyPress(e) => self.on_key(KeyEventKind::Press, e.detail, e.state),
                XEvent::KeyRelease(e) => self.on_key(KeyEventKind::Release, e.detail, e.state),
                XEvent::MapRequest(e) => self.on_map_request(&e),
                XEvent::DestroyNotify(e) => self.on_destroy_notify(&e),
                XEvent::ConfigureNotify(e) => self.on_configure_notify(&e),
                XEvent::RandrScreenChangeNotify(_) => Some(Event::ScreenChange),
                XEvent::RandrNotify(_) => Some(Event::ScreenChange),
                XEvent::Error(err) => {
                    warn!(
                        "X error {:?} (request {}, resource {:#0x})",
                        err.error_kind, err.major_opcode, err.bad_value
                    );
                    None
                },
                _ => None,
            };

            if event.is_some() {
                return event;
            }
        }
    }

    fn monitor_regions(&self) -> Vec<Region> {
        let active = xinerama::is_active(self.conn)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or(false, |reply| reply.state != 0);

        let root = Region::new(
            0,
            0,
            self.screen.width_in_pixels as i32,
            self.screen.height_in_pixels as i32,
        );

        if !active {
            return vec![root];
        }

        xinerama::query_screens(self.conn)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or_else(
                || vec![root],
                |reply| regions_from_screens(&reply.screen_info, root),
            )
    }

    fn top_level_windows(&self) -> Vec<Window> {
        self.conn
            .query_tree(self.screen.root)
            .map_or(Vec::with_capacity(0), |cookie| {
                cookie.reply().map_or(Vec::with_capacity(0), |reply| {
                    reply
                        .children
                        .into_iter()
                        .filter(|&window| window != self.check_window)
                        .filter(|&window| {
                            self.conn
                                .get_window_attributes(window)
                                .map_or(false, |cookie| {
                                    cookie.reply().map_or(false, |reply| {
                                        reply.map_state == xproto::MapState::VIEWABLE
                                    })
                                })
                        })
                        .filter(|&window| self.must_manage_window(window))
                        .collect()
                })
            })
    }

    fn init_wm_properties(
        &self,
        wm_name: &str,
    ) {
        let wm_instance_class_names = &[wm_name, wm_name];
        let wm_class = wm_instance_class_names.join("\0");

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            wm_name.as_bytes(),
        ));

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms.WM_CLASS,
            self.atoms.UTF8_STRING,
            wm_class.as_bytes(),
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_WM_PID,
            self.atoms.CARDINAL,
            &[std::process::id() as u32],
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms.WINDOW,
            &[self.check_window],
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms.WINDOW,
            &[self.check_window],
        ));

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            wm_name.as_bytes(),
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_SUPPORTED,
            xproto::AtomEnum::ATOM,
            &[
                self.atoms._NET_SUPPORTED,
                self.atoms._NET_ACTIVE_WINDOW,
                self.atoms._NET_SUPPORTING_WM_CHECK,
                self.atoms._NET_WM_NAME,
            ],
        ));
    }

    fn cleanup(&self) {
        drop(
            self.conn
                .ungrab_key(xproto::Grab::ANY, self.screen.root, xproto::ModMask::ANY),
        );

        drop(self.conn.destroy_window(self.check_window));
        drop(self.conn.free_gc(self.gc));
        drop(self.conn.close_font(self.font));

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_ACTIVE_WINDOW),
        );

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_SUPPORTING_WM_CHECK),
        );

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_WM_NAME),
        );

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_SUPPORTED),
        );

        self.focus_root();
        self.flush();
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.map_window(window));
    }

    #[inline]
    fn unmap_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.unmap_window(window));
    }

    #[inline]
    fn kill_window(
        &self,
        window: Window,
    ) -> bool {
        let protocols = &[self.atoms.WM_DELETE_WINDOW];

        if self.window_has_any_of_protocols(window, protocols) {
            self.send_protocol_client_message(window, self.atoms.WM_DELETE_WINDOW)
                .map_or(false, |_| self.flush())
        } else {
            self.conn
                .kill_client(window)
                .map_or(false, |_| self.flush())
        }
    }

    #[inline]
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) {
        drop(
            self.conn
                .configure_window(window, &placement_aux(region)),
        );
    }

    #[inline]
    fn stack_window_above(
        &self,
        window: Window,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::ABOVE),
            ),
        );
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) {
        drop(
            self.conn
                .set_input_focus(xproto::InputFocus::PARENT, window, x11rb::CURRENT_TIME),
        );

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_ACTIVE_WINDOW,
            xproto::AtomEnum::WINDOW,
            &[window],
        ));
    }

    #[inline]
    fn focus_root(&self) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            self.screen.root,
            x11rb::CURRENT_TIME,
        ));

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_ACTIVE_WINDOW),
        );
    }

    fn grab_keys(
        &self,
        key_inputs: &[KeyInput],
    ) {
        drop(
            self.conn
                .ungrab_key(xproto::Grab::ANY, self.screen.root, xproto::ModMask::ANY),
        );

        let lock_masks = [
            0,
            u16::from(ModMask::M2),
            u16::from(ModMask::LOCK),
            u16::from(ModMask::M2) | u16::from(ModMask::LOCK),
        ];

        for &m in &lock_masks {
            for key_input in key_inputs {
                let keycode = match self.get_keycode(key_input.key) {
                    Some(keycode) => keycode,
                    None => {
                        warn!("no keycode for {:?}, binding not grabbed", key_input.key);
                        continue;
                    },
                };

                drop(
                    self.conn.grab_key(
                        false,
                        self.screen.root,
                        key_input
                            .modifiers
                            .iter()
                            .fold(0u16, |acc, &m| acc | u16::from(Self::modifier_mask(m)))
                            | m,
                        keycode,
                        xproto::GrabMode::ASYNC,
                        xproto::GrabMode::ASYNC,
                    ),
                );
            }
        }

        drop(self.conn.change_window_attributes(
            self.screen.root,
            &xproto::ChangeWindowAttributesAux::default().event_mask(self.root_event_mask),
        ));

        self.flush();
    }

    fn grab_keyboard(&self) -> bool {
        self.conn
            .grab_keyboard(
                false,
                self.screen.root,
                x11rb::CURRENT_TIME,
                xproto::GrabMode::ASYNC,
                xproto::GrabMode::ASYNC,
            )
            .map_or(false, |cookie| {
                cookie
                    .reply()
                    .map_or(false, |reply| reply.status == xproto::GrabStatus::SUCCESS)
            })
    }

    #[inline]
    fn ungrab_keyboard(&self) {
        drop(self.conn.ungrab_keyboard(x11rb::CURRENT_TIME));
    }

    fn window_is_mappable(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .get_window_attributes(window)
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    reply.class != xproto::WindowClass::INPUT_ONLY
                })
            })
    }

    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .get_window_attributes(window)
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    !reply.override_redirect && reply.class != xproto::WindowClass::INPUT_ONLY
                })
            })
    }

    fn create_overlay(
        &self,
        region: &Region,
    ) -> Result<Window> {
        let window = self.conn.generate_id()?;

        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            self.screen.root,
            region.pos.x as i16,
            region.pos.y as i16,
            region.dim.w.max(1) as u16,
            region.dim.h.max(1) as u16,
            0,
            xproto::WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &xproto::CreateWindowAux::default()
                .override_redirect(1)
                .background_pixel(self.screen.black_pixel)
                .event_mask(self.overlay_event_mask),
        )?;

        Ok(window)
    }

    fn fill_region(
        &self,
        window: Window,
        region: &Region,
        color: u32,
    ) {
        drop(self.conn.change_gc(
            self.gc,
            &xproto::ChangeGCAux::new().foreground(color),
        ));

        drop(
            self.conn
                .poly_fill_rectangle(window, self.gc, &[xproto::Rectangle {
                    x: region.pos.x as i16,
                    y: region.pos.y as i16,
                    width: region.dim.w.max(0) as u16,
                    height: region.dim.h.max(0) as u16,
                }]),
        );
    }

    fn draw_text(
        &self,
        window: Window,
        pos: Pos,
        text: &str,
        fg: u32,
        bg: u32,
    ) {
        drop(self.conn.change_gc(
            self.gc,
            &xproto::ChangeGCAux::new().foreground(fg).background(bg),
        ));

        // ImageText8 carries at most 255 bytes
        let bytes = text.as_bytes();
        let bytes = &bytes[..bytes.len().min(255)];

        drop(
            self.conn
                .image_text8(window, self.gc, pos.x as i16, pos.y as i16, bytes),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_xinerama_screens_falls_back_to_root() {
        let root = Region::new(0, 0, 1920, 1080);
        assert_eq!(regions_from_screens(&[], root), vec![root]);
    }

    #[test]
    fn xinerama_screens_become_regions() {
        let root = Region::new(0, 0, 4480, 1440);
        let screens = [
            xinerama::ScreenInfo {
                x_org: 0,
                y_org: 0,
                width: 1920,
                height: 1080,
            },
            xinerama::ScreenInfo {
                x_org: 1920,
                y_org: 0,
                width: 2560,
                height: 1440,
            },
        ];

        assert_eq!(regions_from_screens(&screens, root), vec![
            Region::new(0, 0, 1920, 1080),
            Region::new(1920, 0, 2560, 1440),
        ]);
    }

    #[test]
    fn placement_clears_border() {
        let aux = placement_aux(&Region::new(1920, 0, 2560, 1440));

        assert_eq!(aux.x, Some(1920));
        assert_eq!(aux.y, Some(0));
        assert_eq!(aux.width, Some(2560));
        assert_eq!(aux.height, Some(1440));
        assert_eq!(aux.border_width, Some(0));
    }
}
