//! # Protocol Layer
//!
//! The session pipeline and everything it routes through: opcode tables,
//! the handshake message, the per-role router, and the session itself.

pub mod handshake;
pub mod opcode;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;
