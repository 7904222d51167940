//! Connecting peer for the session protocol.
//!
//! `GameClient` performs the client half of the connection setup: read the
//! version-keyed handshake header, parse the handshake body, and derive the
//! two ciphers mirrored against the server's (the server's receive IV keys
//! the client's send direction and vice versa). Integration tests and
//! interop tools drive the protocol through this type.

use crate::core::packet::Packet;
use crate::core::stream::FrameStream;
use crate::crypto::cipher::{self, RecvCipher, SendCipher, HANDSHAKE_HEADER_LEN};
use crate::error::{ProtocolError, Result};
use crate::protocol::handshake::Handshake;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct GameClient {
    socket: TcpStream,
    send_cipher: SendCipher,
    recv_cipher: RecvCipher,
    stream: FrameStream,
    handshake: Handshake,
}

impl GameClient {
    /// Connect and consume the server handshake. `version` must match the
    /// deployment's protocol version or the obfuscated header will not
    /// decode.
    pub async fn connect(addr: &str, version: u16) -> Result<Self> {
        let mut socket = TcpStream::connect(addr).await?;

        let mut header = [0u8; HANDSHAKE_HEADER_LEN];
        socket.read_exact(&mut header).await?;
        let body_len = cipher::decode_handshake_header(version, &header)?;

        let mut body = vec![0u8; body_len];
        socket.read_exact(&mut body).await?;
        let handshake = Handshake::parse(&body)?;

        if handshake.version != version {
            return Err(ProtocolError::UnsupportedVersion(handshake.version));
        }

        debug!(
            iv_recv = handshake.iv_recv,
            iv_send = handshake.iv_send,
            "handshake received"
        );

        Ok(Self {
            socket,
            // Mirror of the server: we encrypt toward its receive state.
            send_cipher: SendCipher::new(version, handshake.iv_recv, handshake.block_size),
            recv_cipher: RecvCipher::new(version, handshake.iv_send, handshake.block_size),
            stream: FrameStream::new(),
            handshake,
        })
    }

    /// The handshake this connection was established with.
    pub fn handshake(&self) -> Handshake {
        self.handshake
    }

    /// Frames decrypted so far from the server direction.
    pub fn recv_generation(&self) -> u64 {
        self.recv_cipher.generation()
    }

    /// Encrypt and transmit one packet toward the server.
    pub async fn send(&mut self, packet: Packet) -> Result<()> {
        let wire = self.send_cipher.encrypt(packet.as_bytes());
        self.socket.write_all(&wire).await?;
        Ok(())
    }

    /// Raw socket write, bypassing framing and cipher. Test hook for
    /// exercising the server's garbage tolerance.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.socket.write_all(bytes).await?;
        Ok(())
    }

    /// Receive the next complete packet, blocking until one arrives.
    pub async fn recv(&mut self) -> Result<Packet> {
        loop {
            if let Some(frame) = self.stream.try_next(&mut self.recv_cipher)? {
                return Ok(Packet::from_bytes(frame));
            }

            let mut buf = [0u8; 4096];
            let n = self.socket.read(&mut buf).await?;
            if n == 0 {
                return Err(ProtocolError::ConnectionClosed);
            }
            self.stream.write(&buf[..n]);
        }
    }
}
