//! GBA input snapshots and the key mapping engine.
//!
//! A [`KeyInput`] is the pressed-key mask read once per bus command. A
//! [`KeyMap`] routes the six face/shoulder keys (A, B, Start, Select, L, R)
//! onto a target controller's buttons; the d-pad always drives the analog
//! stick and is not remappable.
//!
//! Targets are described by the [`TargetButton`] trait so the same engine
//! serves the N64 and GameCube personalities.

#![deny(static_mut_refs)]

pub mod builder;
pub mod keys;
pub mod mapping;
pub mod presets;
pub mod targets;
pub mod validation;

pub use builder::{BuilderEvent, ProfileBuilder};
pub use keys::{ECHO_ORDER, GbaKey, KEY_MASK, KeyInput, MAPPABLE_KEYS, ParseKeyError, RESET_CHORD};
pub use mapping::{Deflection, DpadAxes, KEYMAP_SLOTS, KeyMap, UNMAPPED, apply};
pub use presets::{MenuChoice, Preset, find_preset, menu_choice, preset_for_menu_key};
pub use targets::{ButtonSet, GcButton, N64Button, TargetButton};
pub use validation::{KeyMapError, validate_keymap};
