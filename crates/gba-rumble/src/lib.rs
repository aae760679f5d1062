//! Rumble hardware for a GBA acting as a controller.
//!
//! Four incompatible rumble mechanisms exist in the cartridge slot. Which
//! one is present is decided once per session from three cartridge
//! halfwords ([`classify`]); the motor is then driven through a
//! [`RumbleHal`] so the decision logic runs without hardware.

#![deny(static_mut_refs)]

pub mod actuator;
pub mod classify;
pub mod mock;

pub use actuator::{RUMBLE_GPIO_BIT, RumbleController, RumbleHal, SLIDE_MOTOR_BIT};
pub use classify::{
    CartridgeBus, DS_REFRESH_SENTINEL, DS_SENTINEL_HALFWORD, DS_SLIDE_SENTINEL, GAME_CODE_HALFWORD,
    HeaderSnapshot, ParseRumbleKindError, RumbleKind, VERSION_HALFWORD, classify,
};
