//! # shardnet
//!
//! Encrypted TCP session core for multiplayer game servers.
//!
//! The crate accepts raw TCP connections, performs a keyed handshake,
//! wraps every later exchange in a rolling per-direction stream cipher,
//! reassembles length-framed packets from the byte stream, and dispatches
//! decoded packets to per-opcode handlers.
//!
//! ## Pipeline
//! ```text
//! accept → Session (handshake) → bytes → FrameStream → RecvCipher
//!        → opcode → PacketRouter → handler → Session::send → SendCipher
//! ```
//!
//! ## Ordering invariant
//! Cipher state advances exactly once per frame, in arrival order, in
//! lockstep with the peer. There is no resynchronization primitive: a
//! skipped or reordered frame makes every later frame garbage, which the
//! sequence word in each frame header detects and treats as fatal.
//!
//! ## Roles
//! Each deployment runs one [`transport::Server`] per role (login, channel),
//! each with its own immutable [`protocol::router::PacketRouter`]; opcodes
//! never route across roles.
//!
//! ## Example
//! ```no_run
//! use shardnet::config::ProtocolConfig;
//! use shardnet::handlers;
//! use shardnet::transport::Server;
//!
//! #[tokio::main]
//! async fn main() -> shardnet::error::Result<()> {
//!     shardnet::utils::logging::init("info");
//!
//!     let server = Server::bind(
//!         "Login",
//!         "127.0.0.1:20001",
//!         handlers::login_router(),
//!         ProtocolConfig::default(),
//!     )
//!     .await?;
//!     server.run().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod packets;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use crate::core::packet::Packet;
pub use crate::core::reader::PacketReader;
pub use crate::core::writer::PacketWriter;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::router::{PacketHandler, PacketRouter};
pub use crate::protocol::session::Session;
