//! Joybus command catalogue and frame validation.
//!
//! Every command frame starts with an opcode byte. The bus primitive reports
//! the exact number of bits it clocked in, stop bit included, and each opcode
//! is accepted at exactly one length:
//!
//! | Personality | Opcode | Command        | Payload bytes | Frame bits |
//! |-------------|--------|----------------|---------------|------------|
//! | N64         | 0x00   | Info           | 0             | 9          |
//! | N64         | 0x01   | Status         | 0             | 9          |
//! | N64         | 0x02   | Pak read       | 2             | 25         |
//! | N64         | 0x03   | Pak write      | 34            | 281        |
//! | N64         | 0xFF   | Reset          | 0             | 9          |
//! | GameCube    | 0x00   | Info           | 0             | 9          |
//! | GameCube    | 0x40   | Status         | 2             | 25         |
//! | GameCube    | 0x41   | Origin         | 0             | 9          |
//! | GameCube    | 0x42   | Recalibrate    | 2             | 25         |
//! | GameCube    | 0x43   | Long status    | 2             | 25         |
//! | GameCube    | 0xFF   | Reset          | 0             | 9          |

use crate::error::{JoybusError, JoybusResult};

/// The bus primitive counts the stop bit as part of the frame.
pub const STOP_BIT: usize = 1;

/// Anything shorter than an opcode plus stop bit is line noise.
pub const MIN_FRAME_BITS: usize = frame_bits(0);

/// Frame length in bits for an opcode followed by `payload_bytes`.
pub const fn frame_bits(payload_bytes: usize) -> usize {
    (1 + payload_bytes) * 8 + STOP_BIT
}

/// A command personality's opcode set.
pub trait Command: Sized + Copy {
    fn from_opcode(opcode: u8) -> Option<Self>;

    fn opcode(self) -> u8;

    /// Payload length following the opcode byte.
    fn payload_len(self) -> usize;

    fn name(self) -> &'static str;

    /// The only frame length this command is accepted at.
    fn frame_bits(self) -> usize {
        frame_bits(self.payload_len())
    }
}

/// Commands answered by the N64 controller personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum N64Command {
    Info,
    Status,
    PakRead,
    PakWrite,
    Reset,
}

impl Command for N64Command {
    fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0x00 => Some(Self::Info),
            0x01 => Some(Self::Status),
            0x02 => Some(Self::PakRead),
            0x03 => Some(Self::PakWrite),
            0xFF => Some(Self::Reset),
            _ => None,
        }
    }

    fn opcode(self) -> u8 {
        match self {
            Self::Info => 0x00,
            Self::Status => 0x01,
            Self::PakRead => 0x02,
            Self::PakWrite => 0x03,
            Self::Reset => 0xFF,
        }
    }

    fn payload_len(self) -> usize {
        match self {
            Self::Info | Self::Status | Self::Reset => 0,
            Self::PakRead => 2,
            Self::PakWrite => 2 + crate::crc::BLOCK_LEN,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Status => "Status",
            Self::PakRead => "PakRead",
            Self::PakWrite => "PakWrite",
            Self::Reset => "Reset",
        }
    }
}

/// Commands answered by the GameCube controller personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcCommand {
    Info,
    Status,
    Origin,
    Recalibrate,
    StatusLong,
    Reset,
}

impl Command for GcCommand {
    fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0x00 => Some(Self::Info),
            0x40 => Some(Self::Status),
            0x41 => Some(Self::Origin),
            0x42 => Some(Self::Recalibrate),
            0x43 => Some(Self::StatusLong),
            0xFF => Some(Self::Reset),
            _ => None,
        }
    }

    fn opcode(self) -> u8 {
        match self {
            Self::Info => 0x00,
            Self::Status => 0x40,
            Self::Origin => 0x41,
            Self::Recalibrate => 0x42,
            Self::StatusLong => 0x43,
            Self::Reset => 0xFF,
        }
    }

    fn payload_len(self) -> usize {
        match self {
            Self::Info | Self::Origin | Self::Reset => 0,
            Self::Status | Self::Recalibrate | Self::StatusLong => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Status => "Status",
            Self::Origin => "Origin",
            Self::Recalibrate => "Recalibrate",
            Self::StatusLong => "StatusLong",
            Self::Reset => "Reset",
        }
    }
}

/// A received command: the bytes clocked in and the exact bit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame<'a> {
    bytes: &'a [u8],
    bits: usize,
}

impl<'a> CommandFrame<'a> {
    pub fn new(bytes: &'a [u8], bits: usize) -> Self {
        Self { bytes, bits }
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn opcode(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Shorter than any valid command; the poll loop ignores these.
    pub fn is_runt(&self) -> bool {
        self.bits < MIN_FRAME_BITS
    }

    /// Byte at `index`, or 0 past the end of the buffer.
    pub fn byte(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0)
    }

    /// Big-endian 16-bit word starting at `index`.
    pub fn word(&self, index: usize) -> u16 {
        u16::from_be_bytes([self.byte(index), self.byte(index + 1)])
    }

    /// Payload bytes after the opcode.
    pub fn payload(&self) -> &'a [u8] {
        self.bytes.get(1..).unwrap_or(&[])
    }

    /// Resolve the opcode and enforce the command's exact frame length.
    ///
    /// # Errors
    ///
    /// - [`JoybusError::ShortFrame`] below [`MIN_FRAME_BITS`]
    /// - [`JoybusError::UnknownCommand`] for an opcode outside `C`
    /// - [`JoybusError::FrameLength`] when the bit count differs from the
    ///   command's only legal length
    /// - [`JoybusError::TruncatedFrame`] when fewer bytes were stored than the
    ///   bit count announces
    pub fn decode<C: Command>(&self) -> JoybusResult<C> {
        if self.is_runt() {
            return Err(JoybusError::ShortFrame { bits: self.bits });
        }

        let opcode = self
            .opcode()
            .ok_or(JoybusError::TruncatedFrame { bits: self.bits, bytes: 0 })?;
        let command = C::from_opcode(opcode).ok_or(JoybusError::UnknownCommand(opcode))?;

        let expected = command.frame_bits();
        if self.bits != expected {
            return Err(JoybusError::FrameLength {
                command: command.name(),
                expected,
                actual: self.bits,
            });
        }

        let needed = 1 + command.payload_len();
        if self.bytes.len() < needed {
            return Err(JoybusError::TruncatedFrame {
                bits: self.bits,
                bytes: self.bytes.len(),
            });
        }

        Ok(command)
    }
}
