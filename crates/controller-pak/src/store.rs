//! Block storage behind the pak read and write commands.

use joybus_protocol::{BLOCK_LEN, Crc8, crc5, split_address};
use tracing::{debug, trace};

use crate::error::{PakError, PakResult};

/// Whole 16-bit address space, so block addresses never alias.
pub const DEFAULT_CAPACITY: usize = 0x1_0000;

/// Address bit selecting the control region.
pub const CONTROL_REGION: u16 = 0x8000;

/// Read mask applied to control-region blocks while rumble is present.
pub const RUMBLE_READ_MASK: u8 = 0x81;

/// Read mask everywhere else.
pub const OPEN_BUS_MASK: u8 = 0xFF;

pub const fn is_control_region(block_address: u16) -> bool {
    block_address & CONTROL_REGION != 0
}

/// Data returned for a pak read, already masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PakBlock {
    pub data: [u8; BLOCK_LEN],
    pub crc: u8,
}

/// Result of a pak write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PakWrite {
    /// CRC8 of the data as written.
    pub crc: u8,
    /// Motor state requested by a control-region write on a rumble pak.
    pub motor: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PakStore {
    data: Vec<u8>,
}

impl Default for PakStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PakStore {
    pub fn new() -> Self {
        Self {
            data: vec![0; DEFAULT_CAPACITY],
        }
    }

    /// Check the embedded CRC5 and return the block address.
    fn check_address(address_field: u16) -> PakResult<u16> {
        let (address, actual) = split_address(address_field);
        let expected = crc5(address);
        if expected != actual {
            debug!(
                "Pak address 0x{:04X} rejected: CRC5 0x{:02X} != 0x{:02X}",
                address, actual, expected
            );
            return Err(PakError::AddressCrc {
                address,
                expected,
                actual,
            });
        }
        Ok(address)
    }

    fn block(&self, address: u16) -> &[u8] {
        let start = usize::from(address);
        self.data.get(start..start + BLOCK_LEN).unwrap_or(&[])
    }

    fn block_mut(&mut self, address: u16) -> &mut [u8] {
        let start = usize::from(address);
        self.data
            .get_mut(start..start + BLOCK_LEN)
            .unwrap_or(&mut [])
    }

    /// Raw block contents, unmasked and without address checking.
    pub fn peek(&self, block_address: u16) -> [u8; BLOCK_LEN] {
        let mut out = [0u8; BLOCK_LEN];
        for (dst, src) in out.iter_mut().zip(self.block(block_address & !0x1F)) {
            *dst = *src;
        }
        out
    }

    /// Read one block.
    ///
    /// Control-region blocks read through [`RUMBLE_READ_MASK`] when rumble
    /// is present, so the host sees the rumble pak identification pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PakError::AddressCrc`] if the embedded CRC5 is wrong.
    pub fn read(&self, address_field: u16, rumble_present: bool) -> PakResult<PakBlock> {
        let address = Self::check_address(address_field)?;
        let mask = if is_control_region(address) && rumble_present {
            RUMBLE_READ_MASK
        } else {
            OPEN_BUS_MASK
        };

        let mut data = [0u8; BLOCK_LEN];
        let mut crc = Crc8::new();
        for (dst, src) in data.iter_mut().zip(self.block(address)) {
            *dst = *src & mask;
            crc.push(*dst);
        }
        let crc = crc.finish();
        trace!("Pak read 0x{:04X} mask 0x{:02X} crc 0x{:02X}", address, mask, crc);
        Ok(PakBlock { data, crc })
    }

    /// Write one block and report any motor request.
    ///
    /// # Errors
    ///
    /// Returns [`PakError::AddressCrc`] if the embedded CRC5 is wrong; the
    /// store is left untouched.
    pub fn write(
        &mut self,
        address_field: u16,
        data: &[u8; BLOCK_LEN],
        rumble_present: bool,
    ) -> PakResult<PakWrite> {
        let address = Self::check_address(address_field)?;

        let mut crc = Crc8::new();
        for (dst, src) in self.block_mut(address).iter_mut().zip(data) {
            *dst = *src;
            crc.push(*src);
        }
        let crc = crc.finish();

        let motor = (is_control_region(address) && rumble_present)
            .then(|| data.first().is_some_and(|b| b & 0x01 != 0));
        trace!("Pak write 0x{:04X} crc 0x{:02X} motor {:?}", address, crc, motor);
        Ok(PakWrite { crc, motor })
    }
}
