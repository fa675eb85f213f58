use crate::common::Index;
use crate::defaults;
use crate::defaults::MONITOR_COUNT;
use crate::defaults::SLOT_COUNT;
use crate::topology::Topology;

use winsys::input::Key;
use winsys::input::KeyEvent;
use winsys::input::KeyEventKind;
use winsys::input::KeyInput;
use winsys::input::Modifier;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChordState {
    Normal,
    Overlay,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Spawn(&'static [&'static str]),
    KillCurrent,
    RefreshTopology,
    View(Index),
    SwapSlot(Index),
    FocusMonitor(Index),
    SwapMonitor(Index),
}

pub struct KeyBindings {
    pub primary: Modifier,
    pub overlay: Modifier,
    pub launch: Key,
    pub kill: Key,
    pub refresh: Key,
    pub slot_keys: [Key; SLOT_COUNT],
    pub monitor_keys: [Key; MONITOR_COUNT],
    pub terminal: &'static [&'static str],
    pub menu: &'static [&'static str],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            primary: defaults::PRIMARY_MODIFIER,
            overlay: defaults::OVERLAY_MODIFIER,
            launch: defaults::LAUNCH_KEY,
            kill: defaults::KILL_KEY,
            refresh: defaults::REFRESH_KEY,
            slot_keys: defaults::SLOT_KEYS,
            monitor_keys: defaults::MONITOR_KEYS,
            terminal: defaults::TERMINAL_COMMAND,
            menu: defaults::MENU_COMMAND,
        }
    }
}

fn is_modifier_key(
    modifier: Modifier,
    key: Key,
) -> bool {
    match modifier {
        Modifier::Super => key.is_super(),
        Modifier::Ctrl => key.is_control(),
        Modifier::Shift => key == Key::Shift || key == Key::RightShift,
        Modifier::Alt => key == Key::Alt || key == Key::RightAlt,
        _ => false,
    }
}

fn modifier_keys(modifier: Modifier) -> &'static [Key] {
    match modifier {
        Modifier::Super => &[Key::Super, Key::RightSuper],
        Modifier::Ctrl => &[Key::Control, Key::RightControl],
        Modifier::Shift => &[Key::Shift, Key::RightShift],
        Modifier::Alt => &[Key::Alt, Key::RightAlt],
        _ => &[],
    }
}

impl KeyBindings {
    /// Every key/modifier combination that must be grabbed on the root
    /// window for the dispatcher to see it.
    pub fn grabs(&self) -> Vec<KeyInput> {
        let combinations = [
            vec![self.primary],
            vec![self.primary, Modifier::Shift],
            vec![self.primary, self.overlay],
            vec![self.primary, self.overlay, Modifier::Shift],
        ];

        let command_keys = [self.launch, self.kill, self.refresh];

        let mut grabs: Vec<KeyInput> = command_keys
            .iter()
            .chain(self.slot_keys.iter())
            .chain(self.monitor_keys.iter())
            .flat_map(|&key| {
                combinations
                    .iter()
                    .map(move |modifiers| KeyInput::new(key, modifiers))
            })
            .collect();

        grabs.extend(
            modifier_keys(self.primary)
                .iter()
                .map(|&key| KeyInput::new(key, &[self.overlay])),
        );

        grabs.extend(
            modifier_keys(self.overlay)
                .iter()
                .map(|&key| KeyInput::new(key, &[self.primary])),
        );

        grabs
    }

    /// Chord state after `event`: pressing the primary and overlay
    /// modifiers together raises the overlay, releasing either drops it.
    pub fn transition(
        &self,
        state: ChordState,
        event: &KeyEvent,
    ) -> ChordState {
        let input = &event.input;

        match event.kind {
            KeyEventKind::Press => {
                let primary = input.has(self.primary) || is_modifier_key(self.primary, input.key);
                let overlay = input.has(self.overlay) || is_modifier_key(self.overlay, input.key);

                if primary && overlay {
                    ChordState::Overlay
                } else {
                    state
                }
            },
            KeyEventKind::Release => {
                if is_modifier_key(self.primary, input.key)
                    || is_modifier_key(self.overlay, input.key)
                {
                    ChordState::Normal
                } else {
                    state
                }
            },
        }
    }

    /// Maps a key press to a command. Slot keys are matched before
    /// monitor keys, and selecting or swapping with what is already current
    /// yields nothing.
    pub fn resolve(
        &self,
        input: &KeyInput,
        topology: &Topology,
    ) -> Option<Command> {
        let input = input.without_locks();

        if !input.has(self.primary) {
            return None;
        }

        let shift = input.has(Modifier::Shift);

        if input.key == self.launch {
            return Some(Command::Spawn(if shift {
                self.terminal
            } else {
                self.menu
            }));
        }

        if input.key == self.kill {
            return Some(Command::KillCurrent);
        }

        if input.key == self.refresh {
            return Some(Command::RefreshTopology);
        }

        if let Some(slot) = self.slot_keys.iter().position(|&key| key == input.key) {
            if slot == topology.current_monitor().current() {
                return None;
            }

            return Some(if shift {
                Command::SwapSlot(slot)
            } else {
                Command::View(slot)
            });
        }

        if let Some(monitor) = self.monitor_keys.iter().position(|&key| key == input.key) {
            if !topology.is_active(monitor) {
                return None;
            }

            return if shift {
                Some(Command::SwapMonitor(monitor))
            } else if monitor != topology.current_index() {
                Some(Command::FocusMonitor(monitor))
            } else {
                None
            };
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winsys::geometry::Region;

    fn topology(count: usize) -> Topology {
        let mut topology = Topology::new();
        let regions: Vec<Region> = (0..count as i32)
            .map(|i| Region::new(i * 1920, 0, 1920, 1080))
            .collect();

        topology.refresh(&regions);
        topology
    }

    fn press(
        key: Key,
        modifiers: &[Modifier],
    ) -> KeyInput {
        KeyInput::new(key, modifiers)
    }

    #[test]
    fn commands_require_primary_modifier() {
        let bindings = KeyBindings::default();
        let topology = topology(1);

        assert_eq!(bindings.resolve(&press(Key::Two, &[]), &topology), None);
        assert_eq!(
            bindings.resolve(&press(Key::Two, &[Modifier::Ctrl]), &topology),
            None
        );
        assert_eq!(
            bindings.resolve(&press(Key::Two, &[Modifier::Super]), &topology),
            Some(Command::View(1))
        );
    }

    #[test]
    fn return_launches_menu_or_terminal() {
        let bindings = KeyBindings::default();
        let topology = topology(1);

        assert_eq!(
            bindings.resolve(&press(Key::Return, &[Modifier::Super]), &topology),
            Some(Command::Spawn(defaults::MENU_COMMAND))
        );
        assert_eq!(
            bindings.resolve(
                &press(Key::Return, &[Modifier::Super, Modifier::Shift]),
                &topology
            ),
            Some(Command::Spawn(defaults::TERMINAL_COMMAND))
        );
    }

    #[test]
    fn kill_and_refresh_keys() {
        let bindings = KeyBindings::default();
        let topology = topology(1);

        assert_eq!(
            bindings.resolve(&press(Key::Delete, &[Modifier::Super]), &topology),
            Some(Command::KillCurrent)
        );
        assert_eq!(
            bindings.resolve(&press(Key::Escape, &[Modifier::Super]), &topology),
            Some(Command::RefreshTopology)
        );
    }

    #[test]
    fn selecting_current_slot_resolves_to_nothing() {
        let bindings = KeyBindings::default();
        let topology = topology(1);

        assert_eq!(
            bindings.resolve(&press(Key::One, &[Modifier::Super]), &topology),
            None
        );
        assert_eq!(
            bindings.resolve(&press(Key::One, &[Modifier::Super, Modifier::Shift]), &topology),
            None
        );
        assert_eq!(
            bindings.resolve(&press(Key::Two, &[Modifier::Super, Modifier::Shift]), &topology),
            Some(Command::SwapSlot(1))
        );
    }

    #[test]
    fn lock_modifiers_do_not_interfere() {
        let bindings = KeyBindings::default();
        let topology = topology(1);

        assert_eq!(
            bindings.resolve(
                &press(Key::SemiColon, &[
                    Modifier::Super,
                    Modifier::NumLock,
                    Modifier::CapsLock
                ]),
                &topology
            ),
            Some(Command::View(29))
        );
    }

    #[test]
    fn monitor_keys_are_guarded_by_activity() {
        let bindings = KeyBindings::default();
        let topology = topology(2);

        assert_eq!(
            bindings.resolve(&press(Key::F2, &[Modifier::Super]), &topology),
            Some(Command::FocusMonitor(1))
        );
        assert_eq!(
            bindings.resolve(&press(Key::F2, &[Modifier::Super, Modifier::Shift]), &topology),
            Some(Command::SwapMonitor(1))
        );
        assert_eq!(
            bindings.resolve(&press(Key::F1, &[Modifier::Super]), &topology),
            None
        );
    }

    #[test]
    fn inactive_monitor_swap_resolves_to_nothing() {
        let bindings = KeyBindings::default();
        let topology = topology(1);

        assert_eq!(
            bindings.resolve(&press(Key::F6, &[Modifier::Super, Modifier::Shift]), &topology),
            None
        );
    }

    #[test]
    fn slot_keys_take_priority_over_monitor_keys() {
        let mut bindings = KeyBindings::default();
        bindings.monitor_keys[1] = Key::Three;
        let topology = topology(2);

        assert_eq!(
            bindings.resolve(&press(Key::Three, &[Modifier::Super]), &topology),
            Some(Command::View(2))
        );
    }

    #[test]
    fn overlay_follows_chord() {
        let bindings = KeyBindings::default();
        let mut state = ChordState::Normal;

        state = bindings.transition(state, &KeyEvent::press(Key::Super, &[]));
        assert_eq!(state, ChordState::Normal);

        state = bindings.transition(state, &KeyEvent::press(Key::Control, &[Modifier::Super]));
        assert_eq!(state, ChordState::Overlay);

        state = bindings.transition(state, &KeyEvent::press(Key::Four, &[
            Modifier::Super,
            Modifier::Ctrl,
        ]));
        assert_eq!(state, ChordState::Overlay);

        state = bindings.transition(state, &KeyEvent::release(Key::Four, &[
            Modifier::Super,
            Modifier::Ctrl,
        ]));
        assert_eq!(state, ChordState::Overlay);

        state = bindings.transition(state, &KeyEvent::release(Key::Super, &[
            Modifier::Super,
            Modifier::Ctrl,
        ]));
        assert_eq!(state, ChordState::Normal);
    }

    #[test]
    fn overlay_entered_from_either_modifier() {
        let bindings = KeyBindings::default();

        assert_eq!(
            bindings.transition(
                ChordState::Normal,
                &KeyEvent::press(Key::RightSuper, &[Modifier::Ctrl])
            ),
            ChordState::Overlay
        );
        assert_eq!(
            bindings.transition(
                ChordState::Normal,
                &KeyEvent::press(Key::A, &[Modifier::Super, Modifier::Ctrl])
            ),
            ChordState::Overlay
        );
        assert_eq!(
            bindings.transition(
                ChordState::Overlay,
                &KeyEvent::release(Key::RightControl, &[Modifier::Super, Modifier::Ctrl])
            ),
            ChordState::Normal
        );
    }

    #[test]
    fn grabs_cover_bound_keys_and_modifier_keys() {
        let bindings = KeyBindings::default();
        let grabs = bindings.grabs();

        assert!(grabs.contains(&KeyInput::new(Key::Q, &[Modifier::Super])));
        assert!(grabs.contains(&KeyInput::new(Key::F12, &[
            Modifier::Super,
            Modifier::Shift
        ])));
        assert!(grabs.contains(&KeyInput::new(Key::Control, &[Modifier::Super])));
        assert!(grabs.contains(&KeyInput::new(Key::Super, &[Modifier::Ctrl])));
        assert_eq!(grabs.len(), (3 + SLOT_COUNT + MONITOR_COUNT) * 4 + 4);
    }
}
