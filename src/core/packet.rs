//! Logical packet: a 2-byte little-endian opcode followed by its payload.
//!
//! A `Packet` is the decrypted form of exactly one wire frame. Inbound
//! packets are produced by the frame stream; outbound packets are built with
//! [`PacketWriter`](crate::core::writer::PacketWriter) and handed to
//! `Session::send`.

use bytes::Bytes;
use std::fmt;

/// One complete logical packet, opcode prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    buf: Bytes,
}

impl Packet {
    /// Wrap an already-framed buffer. The first two bytes are the opcode.
    pub fn from_bytes(buf: Bytes) -> Self {
        Self { buf }
    }

    /// The packet's opcode, read from its first two bytes.
    pub fn opcode(&self) -> u16 {
        if self.buf.len() < 2 {
            return 0;
        }
        u16::from_le_bytes([self.buf[0], self.buf[1]])
    }

    /// Full packet bytes, opcode included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Payload bytes past the opcode.
    pub fn payload(&self) -> &[u8] {
        if self.buf.len() < 2 {
            return &[];
        }
        &self.buf[2..]
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume into the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.buf
    }
}

// Hex dump, for send/recv logging.
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.buf.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
