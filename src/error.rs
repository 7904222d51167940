//! # Error Types
//!
//! Error handling for the session core.
//!
//! This module defines all error variants that can occur while moving bytes
//! between a socket and a dispatched packet, from low-level I/O failures to
//! cipher desynchronization.
//!
//! ## Error Categories
//! - **Transport errors**: socket failures, peer disconnects
//! - **Framing errors**: invalid or oversized length headers, truncated packets
//! - **Cipher errors**: send/receive state divergence (unrecoverable)
//! - **Handshake errors**: malformed or version-mismatched handshakes
//!
//! Transport, framing, and cipher errors are fatal to the session that raised
//! them and never propagate past its teardown. Handler errors are isolated by
//! the session and logged.

use std::io;
use thiserror::Error;

/// Primary error type for all session core operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Invalid frame header")]
    InvalidHeader,

    #[error("Frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("Cipher state desynchronized")]
    CipherDesync,

    #[error("Packet truncated: needed {needed} more bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Invalid UTF-8 in packet string")]
    InvalidString,

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u16),

    #[error("Handshake failed: {0}")]
    HandshakeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Whether this error must tear down the session that raised it.
    ///
    /// Transport, framing, and cipher failures are unrecoverable for the
    /// connection: the send cipher may already have advanced past a write
    /// that never reached the peer, and there is no resynchronization
    /// primitive. Payload-level failures (short or malformed fields) stay
    /// local to the handler that hit them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProtocolError::Io(_)
                | ProtocolError::ConnectionClosed
                | ProtocolError::InvalidHeader
                | ProtocolError::OversizedFrame(_)
                | ProtocolError::CipherDesync
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn transport_framing_and_cipher_errors_are_fatal() {
        assert!(ProtocolError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone")).is_fatal());
        assert!(ProtocolError::ConnectionClosed.is_fatal());
        assert!(ProtocolError::InvalidHeader.is_fatal());
        assert!(ProtocolError::OversizedFrame(1 << 20).is_fatal());
        assert!(ProtocolError::CipherDesync.is_fatal());
    }

    #[test]
    fn payload_level_errors_are_local() {
        assert!(!ProtocolError::Truncated {
            needed: 4,
            available: 0
        }
        .is_fatal());
        assert!(!ProtocolError::InvalidString.is_fatal());
        assert!(!ProtocolError::UnsupportedVersion(13).is_fatal());
        assert!(!ProtocolError::HandshakeError("bad".into()).is_fatal());
        assert!(!ProtocolError::ConfigError("bad".into()).is_fatal());
    }
}
