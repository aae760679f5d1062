//! Built-in game profiles.
//!
//! The start-up menu picks a profile with a single key press. Select is
//! reserved for the custom profile builder on both personalities.

use crate::keys::GbaKey;
use crate::mapping::{KeyMap, UNMAPPED};
use crate::targets::TargetButton;

/// A named key map reachable from the profile menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Config-file spelling.
    pub id: &'static str,
    pub name: &'static str,
    pub menu_key: GbaKey,
    pub keymap: KeyMap,
}

// N64 indices: A0 B1 Start2 Z3 L4 R5.
pub const N64_PRESETS: &[Preset] = &[Preset {
    id: "default",
    name: "Default",
    menu_key: GbaKey::A,
    keymap: KeyMap::new([0, 1, 2, 4, 3, 5]),
}];

// GameCube indices: A0 B1 X2 Y3 Start4 Z5 L6 R7.
pub const GC_PRESETS: &[Preset] = &[
    Preset {
        id: "default",
        name: "Default",
        menu_key: GbaKey::A,
        keymap: KeyMap::new([0, 1, 4, 5, 6, 7]),
    },
    Preset {
        id: "super-smash-ultimate",
        name: "Super Smash Ultimate",
        menu_key: GbaKey::B,
        keymap: KeyMap::new([0, 1, 4, 2, 6, 5]),
    },
    Preset {
        id: "mario-kart-double-dash",
        name: "Mario Kart Double Dash",
        menu_key: GbaKey::L,
        keymap: KeyMap::new([0, 5, 4, 1, 2, 7]),
    },
    Preset {
        id: "mario-kart-8-deluxe",
        name: "Mario Kart 8 Deluxe",
        menu_key: GbaKey::R,
        keymap: KeyMap::new([0, 1, 4, 2, 6, 7]),
    },
    Preset {
        id: "new-super-mario-bros",
        name: "New Super Mario Bros",
        menu_key: GbaKey::Up,
        keymap: KeyMap::new([0, 3, 4, 1, 6, 7]),
    },
    Preset {
        id: "mario-kart-wii",
        name: "Mario Kart Wii",
        menu_key: GbaKey::Right,
        keymap: KeyMap::new([0, 2, 4, UNMAPPED, 6, 1]).with_vertical_dpad_mirror(),
    },
];

/// What a profile-menu key press selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Preset(&'static Preset),
    CustomBuilder,
}

pub fn preset_for_menu_key<T: TargetButton>(key: GbaKey) -> Option<&'static Preset> {
    T::PRESETS.iter().find(|p| p.menu_key == key)
}

/// Resolve a menu key press; keys with no entry are ignored by the menu.
pub fn menu_choice<T: TargetButton>(key: GbaKey) -> Option<MenuChoice> {
    if key == GbaKey::Select {
        return Some(MenuChoice::CustomBuilder);
    }
    preset_for_menu_key::<T>(key).map(MenuChoice::Preset)
}

/// Look a preset up by id or display name, ignoring case.
pub fn find_preset<T: TargetButton>(name: &str) -> Option<&'static Preset> {
    T::PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(name) || p.name.eq_ignore_ascii_case(name))
}
