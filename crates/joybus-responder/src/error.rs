//! Dispatch and configuration errors.
//!
//! Dispatch errors never reach the host; the responders log them and stay
//! silent so the host retries.

use controller_pak::PakError;
use gba_input_maps::KeyMapError;
use joybus_protocol::JoybusError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Protocol(#[from] JoybusError),

    #[error(transparent)]
    Pak(#[from] PakError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown {target} profile: {profile}")]
    UnknownProfile {
        profile: String,
        target: &'static str,
    },

    #[error("Custom profile requires a keymap")]
    MissingKeymap,

    #[error("Profile {0} is a preset; remove the keymap or use the custom profile")]
    KeymapWithPreset(String),

    #[error("Invalid keymap: {0}")]
    InvalidKeymap(#[from] KeyMapError),

    #[error("Bus timing {0} out of range: must be between 50 and 100 ticks")]
    TimingOutOfRange(u8),

    #[error("Configuration targets {configured}, responder is {requested}")]
    TargetMismatch {
        configured: &'static str,
        requested: &'static str,
    },
}
