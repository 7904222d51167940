//! # Core Packet Primitives
//!
//! Low-level packet handling: framing, typed buffers, and the stream
//! reassembler.
//!
//! ## Components
//! - **Packet**: one decrypted logical packet, opcode-prefixed
//! - **PacketReader / PacketWriter**: typed cursors over raw buffers
//! - **FrameStream**: cipher-coupled FIFO frame extraction from TCP bytes
//!
//! ## Wire Format
//! ```text
//! [Header(6, obfuscated)] [Opcode(2, LE)] [Payload(N)]
//! ```
//!
//! ## Security
//! - Frame lengths are validated against `MAX_FRAME_SIZE` before allocation
//! - Header fields are only trusted after the cipher's header transform

pub mod packet;
pub mod reader;
pub mod stream;
pub mod writer;
