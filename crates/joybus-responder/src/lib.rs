//! N64 and GameCube controller personalities for a GBA on the Joybus.
//!
//! The host console polls; the responder answers each command within the
//! bus turnaround using the keys held at that moment. Each personality is a
//! [`Responder`] owning all of its session state, so a soft reset is simply
//! dropping the [`Session`] and building a new one.
//!
//! Hardware stays behind traits: [`Bus`] for the serial line, [`InputSource`]
//! for the keypad, [`gba_rumble::CartridgeBus`] and [`gba_rumble::RumbleHal`]
//! for the cartridge slot. Malformed frames and checksum mismatches are never
//! answered; the host retries.

#![deny(static_mut_refs)]

pub mod config;
pub mod error;
pub mod gamecube;
pub mod gc_status;
pub mod n64;
pub mod origin;
pub mod poll;
pub mod session;

pub use config::{BusTiming, CUSTOM_PROFILE, SessionConfig, Target};
pub use error::{ConfigError, DispatchError, DispatchResult};
pub use gamecube::{GC_TYPE_NO_RUMBLE, GC_TYPE_RUMBLE, GcResponder, MotorCommand};
pub use gc_status::{
    AnalogField, FULL_PRESS, GC_STICK_OFFSET, STATUS_LEN, StatusFields, StatusMode, pack_status,
    unpack_status,
};
pub use n64::{N64_IDENTITY, N64_STICK_MAGNITUDE, N64Responder, pack_n64_status};
pub use origin::{AnalogState, ORIGIN_RESPONSE_LEN, OriginRecord, button_word};
pub use poll::{Bus, InputSource, PollLoop, RECEIVE_BUFFER_LEN, SessionEnd};
pub use session::{Outcome, Responder, Session};
