//! Rolling per-direction stream cipher.
//!
//! Every connection owns two independent cipher states, one per direction,
//! each seeded from the protocol version, a fresh 4-byte IV exchanged in the
//! handshake, and a deployment-fixed block size. Each encrypt or decrypt
//! advances the state, so both peers must transform frames exactly once and
//! in arrival order; there is no resynchronization primitive, and a diverged
//! pair produces garbage for every later frame.
//!
//! ## Wire transforms
//! - **Frame header** (6 bytes): a sequence word derived from the current IV
//!   and version, plus the XOR-obfuscated body length. The sequence word is
//!   also the desync detector: a receiver whose state has drifted sees a
//!   mismatched word and must drop the connection.
//! - **Frame body**: XOR against a xorshift32 keystream seeded from
//!   `(version, iv, block_size, generation)`.
//! - **Handshake header** (4 bytes): a distinct version-keyed obfuscation
//!   used for the single pre-cipher message; it neither touches the body nor
//!   advances any state.
//!
//! This is a stream cipher with no integrity tag: corruption shows up only as
//! a bad sequence word or a structurally invalid packet, and both are fatal
//! for the connection.

use crate::error::{ProtocolError, Result};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Obfuscated on-wire frame header length.
pub const FRAME_HEADER_LEN: usize = 6;

/// Handshake header length (version-keyed, pre-cipher).
pub const HANDSHAKE_HEADER_LEN: usize = 4;

const SEED_MIX: u32 = 0x9E37_79B9;
const IV_MUL: u32 = 0x0003_43FD;
const IV_INC: u32 = 0x0026_9EC3;
const HANDSHAKE_MAGIC: u16 = 0x4753;

/// Generate a fresh connection IV from OS randomness.
///
/// IVs are never reused across connections; each accept draws two.
pub fn generate_iv() -> u32 {
    rand::rng().next_u32()
}

/// Frame the single handshake message: version-keyed 4-byte header, body in
/// the clear. No cipher state is involved or advanced.
pub fn handshake_frame(version: u16, body: &[u8]) -> Vec<u8> {
    let key = version ^ HANDSHAKE_MAGIC;
    let len = (body.len() as u16) ^ key;

    let mut out = Vec::with_capacity(HANDSHAKE_HEADER_LEN + body.len());
    out.extend_from_slice(&key.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// Recover the handshake body length from its obfuscated header.
pub fn decode_handshake_header(version: u16, header: &[u8]) -> Result<usize> {
    if header.len() < HANDSHAKE_HEADER_LEN {
        return Err(ProtocolError::InvalidHeader);
    }
    let key = u16::from_le_bytes([header[0], header[1]]);
    if key != version ^ HANDSHAKE_MAGIC {
        return Err(ProtocolError::InvalidHeader);
    }
    let len = u16::from_le_bytes([header[2], header[3]]) ^ key;
    Ok(len as usize)
}

/// Mutable cryptographic state for one direction of one connection.
///
/// Generations only grow: {IV generated} → generation 0 → one increment per
/// transformed frame, until the session is torn down.
#[derive(Zeroize, ZeroizeOnDrop)]
struct CipherState {
    version: u16,
    iv: u32,
    block_size: u32,
    generation: u64,
}

impl CipherState {
    fn new(version: u16, iv: u32, block_size: u32) -> Self {
        Self {
            version,
            iv,
            block_size,
            generation: 0,
        }
    }

    /// Sequence word expected in the next frame header under this state.
    fn seq_word(&self) -> u16 {
        ((self.iv >> 16) as u16) ^ self.version
    }

    fn length_mask(&self) -> u32 {
        self.iv.wrapping_mul(SEED_MIX) ^ ((self.version as u32) << 16)
    }

    fn encode_header(&self, body_len: usize) -> [u8; FRAME_HEADER_LEN] {
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[..2].copy_from_slice(&self.seq_word().to_le_bytes());
        let obfuscated = (body_len as u32) ^ self.length_mask();
        header[2..].copy_from_slice(&obfuscated.to_le_bytes());
        header
    }

    fn decode_header(&self, header: &[u8]) -> Result<usize> {
        if header.len() < FRAME_HEADER_LEN {
            return Err(ProtocolError::InvalidHeader);
        }
        let seq = u16::from_le_bytes([header[0], header[1]]);
        if seq != self.seq_word() {
            return Err(ProtocolError::CipherDesync);
        }
        let obfuscated = u32::from_le_bytes([header[2], header[3], header[4], header[5]]);
        Ok((obfuscated ^ self.length_mask()) as usize)
    }

    /// XOR `data` with the keystream of the current generation. Symmetric:
    /// applying it twice under the same state is the identity.
    fn apply_keystream(&self, data: &mut [u8]) {
        let mut word = self.iv
            ^ (self.version as u32).wrapping_mul(SEED_MIX)
            ^ (self.generation as u32).rotate_left(16)
            ^ self.block_size.rotate_left(8);
        if word == 0 {
            word = SEED_MIX;
        }

        for chunk in data.chunks_mut(4) {
            word ^= word << 13;
            word ^= word >> 17;
            word ^= word << 5;
            for (byte, key) in chunk.iter_mut().zip(word.to_le_bytes()) {
                *byte ^= key;
            }
        }
    }

    /// Walk the IV forward one frame and bump the generation.
    fn advance(&mut self) {
        let rounds = (self.block_size & 0x0F).max(1);
        for _ in 0..rounds {
            self.iv = self.iv.wrapping_mul(IV_MUL).wrapping_add(IV_INC);
        }
        self.generation += 1;
    }
}

/// Outbound-direction cipher. Cannot be applied to inbound bytes; the
/// directions evolve independently and cross-applying one produces garbage.
pub struct SendCipher(CipherState);

impl SendCipher {
    pub fn new(version: u16, iv: u32, block_size: u32) -> Self {
        Self(CipherState::new(version, iv, block_size))
    }

    /// Encrypt one logical frame, producing header + ciphertext body, and
    /// advance the state exactly once.
    pub fn encrypt(&mut self, frame: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(FRAME_HEADER_LEN + frame.len());
        out.extend_from_slice(&self.0.encode_header(frame.len()));
        out.extend_from_slice(frame);
        self.0.apply_keystream(&mut out[FRAME_HEADER_LEN..]);
        self.0.advance();
        out
    }

    /// Frames transformed so far.
    pub fn generation(&self) -> u64 {
        self.0.generation
    }
}

/// Inbound-direction cipher.
pub struct RecvCipher(CipherState);

impl RecvCipher {
    pub fn new(version: u16, iv: u32, block_size: u32) -> Self {
        Self(CipherState::new(version, iv, block_size))
    }

    /// Validate a frame header against the current state and recover the
    /// body length. Does not advance; safe to call again on the same header
    /// while the body is still in flight.
    pub fn decode_header(&self, header: &[u8]) -> Result<usize> {
        self.0.decode_header(header)
    }

    /// Decrypt one frame body in place and advance the state exactly once.
    pub fn decrypt(&mut self, body: &mut [u8]) {
        self.0.apply_keystream(body);
        self.0.advance();
    }

    /// Frames transformed so far.
    pub fn generation(&self) -> u64 {
        self.0.generation
    }
}
