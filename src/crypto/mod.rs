//! Per-direction rolling cipher and handshake obfuscation.

pub mod cipher;

pub use cipher::{generate_iv, RecvCipher, SendCipher};
