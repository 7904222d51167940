//! Frame reassembly over the raw TCP byte stream.
//!
//! TCP gives no message boundaries, so inbound bytes accumulate in a
//! `BytesMut` until at least one obfuscated header plus its full body is
//! buffered. Extraction is strictly FIFO and coupled to the receive cipher:
//! the header is only trusted after the cipher's header transform validates
//! it, and the cipher advances exactly once per extracted frame, which keeps
//! its state in lockstep with the peer no matter how the bytes were chunked
//! on the wire.

use crate::config::MAX_FRAME_SIZE;
use crate::crypto::cipher::{RecvCipher, FRAME_HEADER_LEN};
use crate::error::{ProtocolError, Result};
use bytes::{Buf, Bytes, BytesMut};

/// Accumulator yielding complete decrypted frames from arbitrary byte chunks.
pub struct FrameStream {
    buf: BytesMut,
    max_frame_size: usize,
}

impl FrameStream {
    pub fn new() -> Self {
        Self::with_max_frame_size(MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(4 * 1024),
            max_frame_size,
        }
    }

    /// Append raw socket bytes to the accumulator.
    pub fn write(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Bytes buffered but not yet extracted.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Try to extract the oldest complete frame, decrypting it with `cipher`.
    ///
    /// Returns `Ok(None)` when fewer bytes than one header + body are
    /// buffered; callers loop until then before the next socket read. A
    /// mismatched sequence word or an absurd length is fatal: the stream is
    /// unrecoverable past either.
    pub fn try_next(&mut self, cipher: &mut RecvCipher) -> Result<Option<Bytes>> {
        if self.buf.len() < FRAME_HEADER_LEN {
            return Ok(None);
        }

        let body_len = cipher.decode_header(&self.buf[..FRAME_HEADER_LEN])?;
        if body_len < 2 {
            // Every frame carries at least its opcode.
            return Err(ProtocolError::InvalidHeader);
        }
        if body_len > self.max_frame_size {
            return Err(ProtocolError::OversizedFrame(body_len));
        }

        if self.buf.len() < FRAME_HEADER_LEN + body_len {
            return Ok(None);
        }

        self.buf.advance(FRAME_HEADER_LEN);
        let mut body = self.buf.split_to(body_len).to_vec();
        cipher.decrypt(&mut body);
        Ok(Some(Bytes::from(body)))
    }
}

impl Default for FrameStream {
    fn default() -> Self {
        Self::new()
    }
}
