use std::collections::HashSet;
use std::hash::Hash;
use std::hash::Hasher;

use strum::EnumIter;
use strum_macros::IntoStaticStr;

#[repr(u8)]
#[derive(Debug, PartialEq, EnumIter, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl = 1 << 0,
    Shift = 1 << 1,
    Alt = 1 << 2,
    Super = 1 << 3,
    NumLock = 1 << 4,
    CapsLock = 1 << 5,
}

impl Modifier {
    /// Lock modifiers are latched state, not part of a chord.
    #[inline]
    pub fn is_lock(&self) -> bool {
        matches!(self, Modifier::NumLock | Modifier::CapsLock)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, IntoStaticStr)]
pub enum Key {
    Any,
    Backspace,
    Tab,
    Return,
    Escape,
    Space,
    Delete,
    Shift,
    RightShift,
    Control,
    RightControl,
    Alt,
    RightAlt,
    Super,
    RightSuper,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "=")]
    Equal,
    #[strum(serialize = ";")]
    SemiColon,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ".")]
    Period,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "0")]
    Zero,
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "6")]
    Six,
    #[strum(serialize = "7")]
    Seven,
    #[strum(serialize = "8")]
    Eight,
    #[strum(serialize = "9")]
    Nine,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl Key {
    /// Short label, as printed on the keycap.
    #[inline]
    pub fn name(&self) -> &'static str {
        (*self).into()
    }

    #[inline]
    pub fn is_super(&self) -> bool {
        matches!(self, Key::Super | Key::RightSuper)
    }

    #[inline]
    pub fn is_control(&self) -> bool {
        matches!(self, Key::Control | Key::RightControl)
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: HashSet<Modifier>,
}

impl KeyInput {
    pub fn new(
        key: Key,
        modifiers: &[Modifier],
    ) -> Self {
        Self {
            key,
            modifiers: modifiers.iter().copied().collect(),
        }
    }

    #[inline]
    pub fn has(
        &self,
        modifier: Modifier,
    ) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// The same input with lock modifiers stripped.
    pub fn without_locks(&self) -> Self {
        Self {
            key: self.key,
            modifiers: self
                .modifiers
                .iter()
                .filter(|modifier| !modifier.is_lock())
                .copied()
                .collect(),
        }
    }
}

impl Hash for KeyInput {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.key.hash(state);
        self.modifiers
            .iter()
            .fold(0u8, |acc, &m| acc | m as u8)
            .hash(state);
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub input: KeyInput,
}

impl KeyEvent {
    pub fn press(
        key: Key,
        modifiers: &[Modifier],
    ) -> Self {
        Self {
            kind: KeyEventKind::Press,
            input: KeyInput::new(key, modifiers),
        }
    }

    pub fn release(
        key: Key,
        modifiers: &[Modifier],
    ) -> Self {
        Self {
            kind: KeyEventKind::Release,
            input: KeyInput::new(key, modifiers),
        }
    }
}
