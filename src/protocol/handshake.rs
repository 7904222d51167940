//! Handshake message: the one pre-cipher exchange on every connection.
//!
//! Immediately after accept, before any application data can flow, the
//! server transmits its protocol version, the two per-direction IVs it just
//! generated, the block size, and a mode flag. The message travels under the
//! version-keyed handshake header transform only; its body is plaintext,
//! since the peers cannot share cipher state before the IVs arrive.
//!
//! Body layout, all little-endian:
//!
//! ```text
//! [opcode: u16 = REQUEST_VERSION] [version: u32] [iv_recv: u32]
//! [iv_send: u32] [block_size: u32] [mode: u8]
//! ```
//!
//! `iv_recv` seeds the server's receive direction, so the connecting peer
//! encrypts with it; `iv_send` the reverse.

use crate::core::packet::Packet;
use crate::core::reader::PacketReader;
use crate::core::writer::PacketWriter;
use crate::error::{ProtocolError, Result};
use crate::protocol::opcode::SendOp;
use bytes::Bytes;

/// Parsed handshake contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pub version: u16,
    pub iv_recv: u32,
    pub iv_send: u32,
    pub block_size: u32,
    pub mode: u8,
}

impl Handshake {
    /// Build the wire packet for this handshake.
    pub fn to_packet(self) -> Packet {
        let mut writer = PacketWriter::new(SendOp::RequestVersion);
        writer
            .write_u32(self.version as u32)
            .write_u32(self.iv_recv)
            .write_u32(self.iv_send)
            .write_u32(self.block_size)
            .write_u8(self.mode);
        writer.finish()
    }

    /// Parse a handshake body (opcode included).
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut reader = PacketReader::new(Bytes::copy_from_slice(body));

        let opcode = reader.read_u16()?;
        if SendOp::from_u16(opcode) != Some(SendOp::RequestVersion) {
            return Err(ProtocolError::HandshakeError(format!(
                "unexpected opcode 0x{opcode:04X}"
            )));
        }

        let version = reader.read_u32()?;
        if version > u16::MAX as u32 {
            return Err(ProtocolError::HandshakeError(format!(
                "version field out of range: {version}"
            )));
        }

        Ok(Self {
            version: version as u16,
            iv_recv: reader.read_u32()?,
            iv_send: reader.read_u32()?,
            block_size: reader.read_u32()?,
            mode: reader.read_u8()?,
        })
    }
}
