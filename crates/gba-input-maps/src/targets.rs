//! Controller button sets a key map can target.
//!
//! Button indices are the configuration indices stored in a [`crate::KeyMap`];
//! they are not wire bit positions. Each responder owns its own wire layout.

use std::fmt;
use std::marker::PhantomData;

use crate::presets::{self, Preset};

/// A controller's digital buttons, addressable by configuration index.
pub trait TargetButton: Copy + Eq + fmt::Debug + 'static {
    /// Every button, in index order.
    const ALL: &'static [Self];

    /// Number of valid indices; anything at or above is unmapped.
    const COUNT: u8;

    /// Digital d-pad buttons pressed by vertical d-pad mirroring.
    const DPAD_UP: Self;
    const DPAD_DOWN: Self;

    /// Built-in profiles, default first.
    const PRESETS: &'static [Preset];

    /// Short personality name used in logs and config files.
    const PERSONALITY: &'static str;

    fn index(self) -> u8;

    fn name(self) -> &'static str;

    fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum N64Button {
    A = 0,
    B = 1,
    Start = 2,
    Z = 3,
    L = 4,
    R = 5,
    Up = 6,
    Down = 7,
    Left = 8,
    Right = 9,
    CUp = 10,
    CDown = 11,
    CLeft = 12,
    CRight = 13,
}

impl TargetButton for N64Button {
    const ALL: &'static [Self] = &[
        Self::A,
        Self::B,
        Self::Start,
        Self::Z,
        Self::L,
        Self::R,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::CUp,
        Self::CDown,
        Self::CLeft,
        Self::CRight,
    ];
    const COUNT: u8 = 14;
    const DPAD_UP: Self = Self::Up;
    const DPAD_DOWN: Self = Self::Down;
    const PRESETS: &'static [Preset] = presets::N64_PRESETS;
    const PERSONALITY: &'static str = "n64";

    fn index(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::Start => "START",
            Self::Z => "Z",
            Self::L => "L",
            Self::R => "R",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::CUp => "C-UP",
            Self::CDown => "C-DOWN",
            Self::CLeft => "C-LEFT",
            Self::CRight => "C-RIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GcButton {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    Start = 4,
    Z = 5,
    L = 6,
    R = 7,
    Up = 8,
    Down = 9,
    Left = 10,
    Right = 11,
}

impl TargetButton for GcButton {
    const ALL: &'static [Self] = &[
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::Start,
        Self::Z,
        Self::L,
        Self::R,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
    ];
    const COUNT: u8 = 12;
    const DPAD_UP: Self = Self::Up;
    const DPAD_DOWN: Self = Self::Down;
    const PRESETS: &'static [Preset] = presets::GC_PRESETS;
    const PERSONALITY: &'static str = "gamecube";

    fn index(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::X => "X",
            Self::Y => "Y",
            Self::Start => "START",
            Self::Z => "Z",
            Self::L => "L",
            Self::R => "R",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// Set of pressed target buttons, one bit per configuration index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonSet<T> {
    bits: u16,
    _target: PhantomData<T>,
}

impl<T: TargetButton> ButtonSet<T> {
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _target: PhantomData,
        }
    }

    pub fn insert(&mut self, button: T) {
        self.bits |= 1u16 << button.index();
    }

    pub fn remove(&mut self, button: T) {
        self.bits &= !(1u16 << button.index());
    }

    pub fn set(&mut self, button: T, pressed: bool) {
        if pressed {
            self.insert(button);
        } else {
            self.remove(button);
        }
    }

    pub fn contains(&self, button: T) -> bool {
        self.bits & (1u16 << button.index()) != 0
    }

    pub const fn bits(&self) -> u16 {
        self.bits
    }

    pub const fn len(&self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        T::ALL.iter().copied().filter(|b| self.contains(*b))
    }
}

impl<T: TargetButton> Default for ButtonSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: TargetButton> FromIterator<T> for ButtonSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::empty();
        for button in iter {
            set.insert(button);
        }
        set
    }
}

impl<T: TargetButton> fmt::Debug for ButtonSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(TargetButton::name)).finish()
    }
}
