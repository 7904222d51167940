//! Typed append builder for outbound packets.
//!
//! A `PacketWriter` starts with the 2-byte little-endian opcode and grows the
//! payload field by field; `finish()` freezes it into an immutable
//! [`Packet`]. Writing is infallible, the buffer grows as needed.

use crate::core::packet::Packet;
use bytes::{BufMut, BytesMut};

pub struct PacketWriter {
    buf: BytesMut,
}

impl PacketWriter {
    /// Begin a packet with the given opcode.
    pub fn new(opcode: impl Into<u16>) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_u16_le(opcode.into());
        Self { buf }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.put_u16_le(value);
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buf.put_u32_le(value);
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.put_u64_le(value);
        self
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buf.put_i32_le(value);
        self
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.put_slice(value);
        self
    }

    /// Length-prefixed UTF-8 string: `[len: u16][bytes]`.
    pub fn write_string(&mut self, value: &str) -> &mut Self {
        self.buf.put_u16_le(value.len() as u16);
        self.buf.put_slice(value.as_bytes());
        self
    }

    pub fn finish(self) -> Packet {
        Packet::from_bytes(self.buf.freeze())
    }
}
