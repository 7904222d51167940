//! # Configuration Management
//!
//! Centralized configuration for the session core.
//!
//! This module provides structured configuration for the per-role servers,
//! covering listener addresses, protocol constants, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variable overrides via `from_env()`
//!
//! The protocol constants (`version`, `block_size`) are fixed per deployment:
//! both peers derive their cipher key schedules from them, so they must match
//! the client build exactly.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Protocol version both peers must agree on. Keys the cipher schedule and
/// the handshake header obfuscation.
pub const PROTOCOL_VERSION: u16 = 12;

/// Rounds the per-frame IV walk applies after each encrypt/decrypt.
pub const BLOCK_SIZE: u32 = 12;

/// Max allowed decrypted frame size. A header claiming more than this is a
/// framing attack or cipher desync, never a legitimate packet.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Handshake mode flag sent to a freshly accepted connection.
pub const HANDSHAKE_MODE: u8 = 0;

fn default_version() -> u16 {
    PROTOCOL_VERSION
}

fn default_block_size() -> u32 {
    BLOCK_SIZE
}

fn default_max_frame_size() -> usize {
    MAX_FRAME_SIZE
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Cipher and framing parameters shared by every connection of a deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProtocolConfig {
    /// Protocol version exchanged in the handshake.
    #[serde(default = "default_version")]
    pub version: u16,

    /// IV walk depth per frame.
    #[serde(default = "default_block_size")]
    pub block_size: u32,

    /// Upper bound on any single frame's decrypted length.
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            block_size: BLOCK_SIZE,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

/// Listener settings for one server role.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` string this listener binds.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Full configuration for a deployment running both server roles.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Login server listener.
    pub login: ListenerConfig,

    /// Channel server listener.
    pub channel: ListenerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolConfig::default(),
            login: ListenerConfig {
                host: default_host(),
                port: 20001,
            },
            channel: ListenerConfig {
                host: default_host(),
                port: 20002,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl NetworkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("SHARDNET_LOGIN_HOST") {
            config.login.host = host;
        }

        if let Ok(port) = std::env::var("SHARDNET_LOGIN_PORT") {
            config.login.port = port
                .parse()
                .map_err(|_| ProtocolError::ConfigError(format!("Invalid login port: {port}")))?;
        }

        if let Ok(host) = std::env::var("SHARDNET_CHANNEL_HOST") {
            config.channel.host = host;
        }

        if let Ok(port) = std::env::var("SHARDNET_CHANNEL_PORT") {
            config.channel.port = port
                .parse()
                .map_err(|_| ProtocolError::ConfigError(format!("Invalid channel port: {port}")))?;
        }

        if let Ok(level) = std::env::var("SHARDNET_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }
}
