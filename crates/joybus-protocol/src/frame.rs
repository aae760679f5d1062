//! Fixed-capacity response buffer.

use std::fmt;

use crate::error::{JoybusError, JoybusResult};

/// Largest response either personality sends: a pak read (32 data bytes
/// plus the CRC8).
pub const MAX_RESPONSE_BYTES: usize = 33;

/// A response frame, always a whole number of bytes on the wire.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Response {
    buf: [u8; MAX_RESPONSE_BYTES],
    len: usize,
}

impl Response {
    /// # Errors
    ///
    /// Returns [`JoybusError::ResponseOverflow`] past [`MAX_RESPONSE_BYTES`].
    pub fn from_slice(bytes: &[u8]) -> JoybusResult<Self> {
        Self::concat(bytes, &[])
    }

    /// Response made of `head` immediately followed by `tail`.
    ///
    /// # Errors
    ///
    /// Returns [`JoybusError::ResponseOverflow`] past [`MAX_RESPONSE_BYTES`].
    pub fn concat(head: &[u8], tail: &[u8]) -> JoybusResult<Self> {
        let len = head.len() + tail.len();
        let mut buf = [0u8; MAX_RESPONSE_BYTES];
        let dst = buf.get_mut(..len).ok_or(JoybusError::ResponseOverflow {
            len,
            capacity: MAX_RESPONSE_BYTES,
        })?;
        let (dst_head, dst_tail) = dst.split_at_mut(head.len());
        dst_head.copy_from_slice(head);
        dst_tail.copy_from_slice(tail);
        Ok(Self { buf, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.get(..self.len).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bits handed to the bus primitive (it appends the stop bit itself).
    pub fn bits(&self) -> usize {
        self.len * 8
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response({self})")
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
