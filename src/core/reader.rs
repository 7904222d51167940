//! Typed read cursor over a decrypted packet.
//!
//! Handlers receive a `PacketReader` positioned just past the opcode and pull
//! fields off the front in wire order. All integers are little-endian.
//! Reads past the end return [`ProtocolError::Truncated`] rather than
//! panicking, so a short or corrupt payload surfaces as an ordinary handler
//! error.

use crate::error::{ProtocolError, Result};
use bytes::Bytes;

/// Forward-only cursor over one packet's bytes.
pub struct PacketReader {
    buf: Bytes,
    pos: usize,
}

impl PacketReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if self.remaining() < n {
            return Err(ProtocolError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_le_bytes(raw))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Raw byte run of exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        let start = self.pos;
        self.take(n)?;
        Ok(self.buf.slice(start..start + n))
    }

    /// Length-prefixed UTF-8 string: `[len: u16][bytes]`.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| ProtocolError::InvalidString)
    }
}
