//! Joybus wire format shared by the controller personalities.
//!
//! This crate is intentionally I/O-free and allocation-free on hot paths.
//! It provides pure functions and types that can be tested without the
//! serial bus or any console hardware.
//!
//! # Key Features
//! - CRC5 address validation and CRC8 block checksums, table driven
//! - Command catalogues for the N64 and GameCube personalities, with the
//!   exact frame length each opcode is accepted at
//! - Fixed-capacity response buffers
//! - Big-endian bit-layout descriptors for packed reports

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod layout;

pub use command::{
    Command, CommandFrame, GcCommand, MIN_FRAME_BITS, N64Command, STOP_BIT, frame_bits,
};
pub use crc::{BLOCK_LEN, CRC5_TABLE, CRC8_TABLE, Crc8, crc5, crc8, encode_address, split_address};
pub use error::{JoybusError, JoybusResult};
pub use frame::{MAX_RESPONSE_BYTES, Response};
pub use layout::{BitWriter, FieldSpec, read_field, validate_layout};
