//! GBA key input snapshot.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// GBA keys, discriminants are the `KEYINPUT` bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum GbaKey {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Right = 4,
    Left = 5,
    Up = 6,
    Down = 7,
    R = 8,
    L = 9,
}

/// The ten hardware keys; higher register bits are unused.
pub const KEY_MASK: u16 = 0x03FF;

/// Keys a [`crate::KeyMap`] routes, in slot order.
pub const MAPPABLE_KEYS: [GbaKey; 6] = [
    GbaKey::A,
    GbaKey::B,
    GbaKey::Start,
    GbaKey::Select,
    GbaKey::L,
    GbaKey::R,
];

/// Order used when echoing pressed keys.
pub const ECHO_ORDER: [GbaKey; 10] = [
    GbaKey::A,
    GbaKey::B,
    GbaKey::Start,
    GbaKey::Select,
    GbaKey::L,
    GbaKey::R,
    GbaKey::Up,
    GbaKey::Down,
    GbaKey::Left,
    GbaKey::Right,
];

/// A+B+Start+Select and nothing else.
pub const RESET_CHORD: u16 =
    GbaKey::A.bit() | GbaKey::B.bit() | GbaKey::Start.bit() | GbaKey::Select.bit();

impl GbaKey {
    pub const fn bit(self) -> u16 {
        1 << self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::Select => "SELECT",
            Self::Start => "START",
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::R => "R",
            Self::L => "L",
        }
    }

    /// Short label used by the key echo.
    pub fn echo_label(self) -> &'static str {
        match self {
            Self::Select => "SEL",
            Self::Start => "STA",
            other => other.name(),
        }
    }
}

impl fmt::Display for GbaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown GBA key: {0}")]
pub struct ParseKeyError(pub String);

impl FromStr for GbaKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ECHO_ORDER
            .iter()
            .copied()
            .find(|key| key.name() == upper || key.echo_label() == upper)
            .ok_or_else(|| ParseKeyError(s.to_string()))
    }
}

/// Pressed keys for one dispatch cycle (bit set = pressed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyInput(u16);

impl KeyInput {
    pub const NONE: Self = Self(0);

    /// From the raw `KEYINPUT` register, which is active-low.
    pub const fn from_register(raw: u16) -> Self {
        Self(!raw & KEY_MASK)
    }

    pub const fn from_pressed(mask: u16) -> Self {
        Self(mask & KEY_MASK)
    }

    pub fn from_keys(keys: &[GbaKey]) -> Self {
        Self(keys.iter().fold(0, |mask, key| mask | key.bit()))
    }

    pub const fn pressed_mask(self) -> u16 {
        self.0
    }

    pub const fn is_pressed(self, key: GbaKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub const fn with(self, key: GbaKey) -> Self {
        Self(self.0 | key.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Exactly the soft-reset chord; any extra key disarms it.
    pub const fn is_reset_chord(self) -> bool {
        self.0 == RESET_CHORD
    }

    pub const fn pressed_count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn pressed(self) -> impl Iterator<Item = GbaKey> {
        ECHO_ORDER.into_iter().filter(move |key| self.is_pressed(*key))
    }
}

/// Key echo text, e.g. `A STA L UP`.
impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.pressed().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(key.echo_label())?;
        }
        Ok(())
    }
}
