#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the public API: framing bounds, handshake rejection,
//! and configuration overrides.

use shardnet::config::{NetworkConfig, ProtocolConfig, BLOCK_SIZE, PROTOCOL_VERSION};
use shardnet::core::stream::FrameStream;
use shardnet::crypto::{RecvCipher, SendCipher};
use shardnet::transport::GameClient;
use shardnet::ProtocolError;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

// ============================================================================
// FRAMING BOUNDS
// ============================================================================

#[test]
fn legitimate_frame_beyond_configured_bound_is_rejected() {
    let mut send = SendCipher::new(PROTOCOL_VERSION, 0xAA55_AA55, BLOCK_SIZE);
    let mut recv = RecvCipher::new(PROTOCOL_VERSION, 0xAA55_AA55, BLOCK_SIZE);

    let mut frame = vec![0u8; 1024];
    frame[0] = 0x01;
    let wire = send.encrypt(&frame);

    let mut stream = FrameStream::with_max_frame_size(512);
    stream.write(&wire);
    assert!(matches!(
        stream.try_next(&mut recv),
        Err(ProtocolError::OversizedFrame(1024))
    ));
}

#[test]
fn frame_at_exactly_the_bound_passes() {
    let mut send = SendCipher::new(PROTOCOL_VERSION, 0xAA55_AA55, BLOCK_SIZE);
    let mut recv = RecvCipher::new(PROTOCOL_VERSION, 0xAA55_AA55, BLOCK_SIZE);

    let mut frame = vec![0u8; 512];
    frame[0] = 0x01;
    let wire = send.encrypt(&frame);

    let mut stream = FrameStream::with_max_frame_size(512);
    stream.write(&wire);
    let out = stream.try_next(&mut recv).unwrap().unwrap();
    assert_eq!(out.len(), 512);
}

// ============================================================================
// HANDSHAKE REJECTION
// ============================================================================

#[tokio::test]
async fn client_rejects_garbage_handshake_header() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        // Not a version-keyed header for any version this client speaks.
        let _ = socket.write_all(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00]).await;
    });

    let result = GameClient::connect(&addr, PROTOCOL_VERSION).await;
    assert!(matches!(result, Err(ProtocolError::InvalidHeader)));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn env_overrides_apply_on_top_of_defaults() {
    // One test owns all the env mutation to avoid races between tests.
    std::env::set_var("SHARDNET_LOGIN_PORT", "8484");
    std::env::set_var("SHARDNET_CHANNEL_HOST", "10.0.0.5");
    std::env::set_var("SHARDNET_LOG_LEVEL", "debug");

    let config = NetworkConfig::from_env().expect("env config");
    assert_eq!(config.login.addr(), "127.0.0.1:8484");
    assert_eq!(config.channel.host, "10.0.0.5");
    assert_eq!(config.logging.level, "debug");

    std::env::set_var("SHARDNET_LOGIN_PORT", "not-a-port");
    assert!(matches!(
        NetworkConfig::from_env(),
        Err(ProtocolError::ConfigError(_))
    ));

    std::env::remove_var("SHARDNET_LOGIN_PORT");
    std::env::remove_var("SHARDNET_CHANNEL_HOST");
    std::env::remove_var("SHARDNET_LOG_LEVEL");
}

#[test]
fn protocol_config_defaults_match_deployment_constants() {
    let protocol = ProtocolConfig::default();
    assert_eq!(protocol.version, PROTOCOL_VERSION);
    assert_eq!(protocol.block_size, BLOCK_SIZE);
}
