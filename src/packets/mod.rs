//! Outbound packet builders.
//!
//! Thin encode glue over [`PacketWriter`]: each function produces one
//! server-to-client packet with its opcode already prefixed. Payload schemas
//! live here, not in the session core.

use crate::core::packet::Packet;
use crate::core::writer::PacketWriter;
use crate::protocol::opcode::SendOp;

/// Login request sent once a client's version has been accepted.
pub fn request_login() -> Packet {
    PacketWriter::new(SendOp::RequestLogin).finish()
}

/// Heartbeat probe carrying an echo key the client must return.
pub fn request_heartbeat(key: u32) -> Packet {
    let mut writer = PacketWriter::new(SendOp::RequestHeartbeat);
    writer.write_u32(key);
    writer.finish()
}
