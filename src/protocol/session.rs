//! Per-connection session: handshake, decode pipeline, encoded sends.
//!
//! A `Session` exclusively owns one connection's write half, its two
//! direction ciphers, and its frame stream; it is created on accept, sends
//! the handshake before becoming visible to anything else, and is discarded
//! on the first fatal error. All of its operations run on the connection's
//! own task, in socket-event order, so cipher state never sees concurrent
//! access.
//!
//! The inbound path is a single pipeline (`on_data`): bytes feed the frame
//! stream, every complete frame is decrypted in FIFO order by the receive
//! cipher, and the opcode is routed. Keeping extraction, decryption, and
//! dispatch in one function is what guarantees the per-frame cipher advance
//! tracks the peer's send order exactly.

use crate::config::ProtocolConfig;
use crate::core::packet::Packet;
use crate::core::reader::PacketReader;
use crate::core::stream::FrameStream;
use crate::crypto::cipher::{self, RecvCipher, SendCipher};
use crate::error::Result;
use crate::protocol::handshake::Handshake;
use crate::protocol::opcode::{RecvOp, SendOp};
use crate::protocol::router::PacketRouter;
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{debug, warn};

pub struct Session {
    id: u64,
    writer: OwnedWriteHalf,
    recv_cipher: RecvCipher,
    send_cipher: SendCipher,
    stream: FrameStream,
    router: Arc<PacketRouter>,
}

impl Session {
    /// Construct a session for a freshly accepted socket and immediately
    /// transmit the handshake. Until this returns, the connection cannot
    /// carry application data in either direction.
    pub async fn accept(
        id: u64,
        writer: OwnedWriteHalf,
        router: Arc<PacketRouter>,
        protocol: &ProtocolConfig,
    ) -> Result<Self> {
        let iv_recv = cipher::generate_iv();
        let mut iv_send = cipher::generate_iv();
        while iv_send == iv_recv {
            iv_send = cipher::generate_iv();
        }

        let mut session = Self {
            id,
            writer,
            recv_cipher: RecvCipher::new(protocol.version, iv_recv, protocol.block_size),
            send_cipher: SendCipher::new(protocol.version, iv_send, protocol.block_size),
            stream: FrameStream::with_max_frame_size(protocol.max_frame_size),
            router,
        };

        let handshake = Handshake {
            version: protocol.version,
            iv_recv,
            iv_send,
            block_size: protocol.block_size,
            mode: crate::config::HANDSHAKE_MODE,
        };
        session.send_handshake(handshake).await?;
        Ok(session)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Steady-state frames encrypted so far on the outbound direction.
    pub fn send_generation(&self) -> u64 {
        self.send_cipher.generation()
    }

    async fn send_handshake(&mut self, handshake: Handshake) -> Result<()> {
        let packet = handshake.to_packet();
        let wire = cipher::handshake_frame(handshake.version, packet.as_bytes());

        debug!(session = self.id, "[HANDSHAKE]: {packet}");

        self.writer.write_all(&wire).await?;
        Ok(())
    }

    /// Feed raw socket bytes through the decode pipeline, dispatching every
    /// complete frame. Errors out of here are connection-fatal.
    pub async fn on_data(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write(data);

        while let Some(frame) = self.stream.try_next(&mut self.recv_cipher)? {
            self.dispatch(frame).await?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, frame: Bytes) -> Result<()> {
        let packet = Packet::from_bytes(frame);
        let mut reader = PacketReader::new(packet.clone().into_bytes());
        let opcode = reader.read_u16()?;

        match RecvOp::from_u16(opcode) {
            Some(op) => debug!(session = self.id, "[RECV] {}: {packet}", op.name()),
            None => debug!(session = self.id, "[RECV] 0x{opcode:04X}: {packet}"),
        }

        let router = Arc::clone(&self.router);
        match router.resolve(opcode) {
            Some(handler) => {
                // Payload-level failures stay local to the handler. A
                // transport, framing, or cipher error surfacing through a
                // handler (a failed reply write, most commonly) has already
                // broken lockstep with the peer and must kill the session.
                if let Err(e) = handler.handle(self, &mut reader).await {
                    if e.is_fatal() {
                        return Err(e);
                    }
                    warn!(session = self.id, error = %e, "handler for opcode 0x{opcode:04X} failed");
                }
            }
            None => {
                // Unknown opcodes tolerate protocol version skew.
                debug!(session = self.id, "no handler for opcode 0x{opcode:04X}, ignoring");
            }
        }
        Ok(())
    }

    /// Encrypt and transmit one packet. The send cipher advances exactly
    /// once and bytes reach the socket in encryption order.
    pub async fn send(&mut self, packet: Packet) -> Result<()> {
        let opcode = packet.opcode();
        match SendOp::from_u16(opcode) {
            Some(op) => debug!(session = self.id, "[SEND] {}: {packet}", op.name()),
            None => debug!(session = self.id, "[SEND] 0x{opcode:04X}: {packet}"),
        }

        let wire = self.send_cipher.encrypt(packet.as_bytes());
        self.writer.write_all(&wire).await?;
        Ok(())
    }
}
