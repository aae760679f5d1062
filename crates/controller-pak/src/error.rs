use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PakError {
    #[error("Address CRC mismatch at 0x{address:04X}: expected 0x{expected:02X}, got 0x{actual:02X}")]
    AddressCrc {
        address: u16,
        expected: u8,
        actual: u8,
    },
}

pub type PakResult<T> = Result<T, PakError>;
