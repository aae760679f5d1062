//! Big-endian bit-layout descriptors.
//!
//! Packed reports are described as tables of [`FieldSpec`]s. Offsets count
//! bits from the most significant bit of byte 0, so a table reads in the same
//! order as the wire. Values wider than their field are truncated to the low
//! `width` bits.

use crate::error::{JoybusError, JoybusResult};

/// One field of a packed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Bit offset from the MSB of byte 0.
    pub offset: u16,
    /// Width in bits, 1..=32.
    pub width: u8,
}

impl FieldSpec {
    pub const fn new(name: &'static str, offset: u16, width: u8) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// One past the last bit this field occupies.
    pub const fn end(&self) -> usize {
        self.offset as usize + self.width as usize
    }

    /// Mask selecting the bits this field can hold.
    pub const fn value_mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    fn check(&self, len: usize) -> JoybusResult<()> {
        if self.width == 0 || self.width > 32 || self.end() > len * 8 {
            return Err(JoybusError::FieldOutOfRange {
                field: self.name,
                len,
            });
        }
        Ok(())
    }
}

/// Writes fields into a borrowed buffer, MSB first.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
}

impl<'a> BitWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    /// Store the low `spec.width` bits of `value` at the field's position.
    ///
    /// # Errors
    ///
    /// Returns [`JoybusError::FieldOutOfRange`] if the field does not fit.
    pub fn put(&mut self, spec: &FieldSpec, value: u32) -> JoybusResult<()> {
        spec.check(self.buf.len())?;
        let value = value & spec.value_mask();
        let width = usize::from(spec.width);
        for i in 0..width {
            let bit = (value >> (width - 1 - i)) & 1;
            let pos = usize::from(spec.offset) + i;
            let mask = 0x80u8 >> (pos % 8);
            let byte = self
                .buf
                .get_mut(pos / 8)
                .ok_or(JoybusError::FieldOutOfRange {
                    field: spec.name,
                    len: 0,
                })?;
            if bit != 0 {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
        Ok(())
    }

    /// Store a flag in a 1-bit field.
    ///
    /// # Errors
    ///
    /// Returns [`JoybusError::FieldOutOfRange`] if the field does not fit.
    pub fn put_flag(&mut self, spec: &FieldSpec, set: bool) -> JoybusResult<()> {
        self.put(spec, u32::from(set))
    }
}

/// Read a field back out of a packed buffer.
///
/// # Errors
///
/// Returns [`JoybusError::FieldOutOfRange`] if the field does not fit.
pub fn read_field(buf: &[u8], spec: &FieldSpec) -> JoybusResult<u32> {
    spec.check(buf.len())?;
    let mut value = 0u32;
    for i in 0..usize::from(spec.width) {
        let pos = usize::from(spec.offset) + i;
        let byte = buf.get(pos / 8).copied().unwrap_or(0);
        let bit = (byte >> (7 - pos % 8)) & 1;
        value = (value << 1) | u32::from(bit);
    }
    Ok(value)
}

/// Check that every field of a layout fits in `len` bytes and that no two
/// fields share a bit.
///
/// # Errors
///
/// - [`JoybusError::FieldOutOfRange`] for a field past the end, or for a
///   buffer longer than 16 bytes
/// - [`JoybusError::FieldOverlap`] for the first field that reuses a bit
pub fn validate_layout(fields: &[FieldSpec], len: usize) -> JoybusResult<()> {
    if len > 16 {
        return Err(JoybusError::FieldOutOfRange {
            field: fields.first().map_or("", |f| f.name),
            len,
        });
    }
    let mut occupied = 0u128;
    for field in fields {
        field.check(len)?;
        let mask = (u128::MAX >> (128 - usize::from(field.width))) << (128 - field.end());
        if occupied & mask != 0 {
            return Err(JoybusError::FieldOverlap { field: field.name });
        }
        occupied |= mask;
    }
    Ok(())
}
