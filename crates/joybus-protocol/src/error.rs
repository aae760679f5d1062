//! Joybus protocol error types.
//!
//! None of these ever reach the host: a responder turns every error into
//! protocol silence and lets the host's retry logic recover.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoybusError {
    #[error("Frame too short: {bits} bits")]
    ShortFrame { bits: usize },

    #[error("Unknown command: 0x{0:02X}")]
    UnknownCommand(u8),

    #[error("Invalid frame length for {command}: expected {expected} bits, got {actual}")]
    FrameLength {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Frame truncated: {bits} bits announced, {bytes} bytes received")]
    TruncatedFrame { bits: usize, bytes: usize },

    #[error("Response too large: {len} bytes, capacity {capacity}")]
    ResponseOverflow { len: usize, capacity: usize },

    #[error("Field {field} does not fit in a {len}-byte buffer")]
    FieldOutOfRange { field: &'static str, len: usize },

    #[error("Field {field} overlaps an earlier field")]
    FieldOverlap { field: &'static str },
}

pub type JoybusResult<T> = Result<T, JoybusError>;
