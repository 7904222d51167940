//! # Transport Layer
//!
//! TCP listeners and the connecting peer. One [`server::Server`] instance
//! per role; [`client::GameClient`] mirrors the protocol from the other end.

pub mod client;
pub mod server;

pub use client::GameClient;
pub use server::Server;
