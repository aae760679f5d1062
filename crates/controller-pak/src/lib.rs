//! Controller pak emulation.
//!
//! The host addresses the pak in 32-byte blocks. Every address field carries
//! a CRC5 of the block address in its low five bits, and every transfer is
//! acknowledged with a CRC8 of the block data. Addresses with bit 15 set fall
//! in the control region, which doubles as the rumble motor switch when a
//! rumble cartridge is present.
//!
//! Storage is volatile: a store starts zero-filled and nothing persists past
//! a session.

#![deny(static_mut_refs)]

mod error;
mod store;

pub use error::{PakError, PakResult};
pub use store::{
    CONTROL_REGION, DEFAULT_CAPACITY, OPEN_BUS_MASK, PakBlock, PakStore, PakWrite,
    RUMBLE_READ_MASK, is_control_region,
};
