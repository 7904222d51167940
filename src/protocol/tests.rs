// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::config::{BLOCK_SIZE, PROTOCOL_VERSION};
use crate::crypto::cipher::{
    self, decode_handshake_header, RecvCipher, SendCipher, HANDSHAKE_HEADER_LEN,
};
use crate::error::ProtocolError;
use crate::protocol::handshake::Handshake;
use crate::protocol::opcode::SendOp;

fn sample_handshake() -> Handshake {
    Handshake {
        version: PROTOCOL_VERSION,
        iv_recv: 0x1111_2222,
        iv_send: 0x3333_4444,
        block_size: BLOCK_SIZE,
        mode: 0,
    }
}

#[test]
fn handshake_round_trips_through_wire_form() {
    let handshake = sample_handshake();
    let packet = handshake.to_packet();
    assert_eq!(packet.opcode(), u16::from(SendOp::RequestVersion));

    let wire = cipher::handshake_frame(handshake.version, packet.as_bytes());
    let body_len =
        decode_handshake_header(PROTOCOL_VERSION, &wire[..HANDSHAKE_HEADER_LEN]).unwrap();
    assert_eq!(body_len, wire.len() - HANDSHAKE_HEADER_LEN);

    let parsed = Handshake::parse(&wire[HANDSHAKE_HEADER_LEN..]).unwrap();
    assert_eq!(parsed, handshake);
}

#[test]
fn handshake_rejects_wrong_opcode() {
    let mut body = sample_handshake().to_packet().as_bytes().to_vec();
    body[0] = 0x7F;
    assert!(matches!(
        Handshake::parse(&body),
        Err(ProtocolError::HandshakeError(_))
    ));
}

#[test]
fn handshake_rejects_truncated_body() {
    let body = sample_handshake().to_packet();
    assert!(matches!(
        Handshake::parse(&body.as_bytes()[..8]),
        Err(ProtocolError::Truncated { .. })
    ));
}

#[test]
fn handshake_derived_ciphers_stay_in_lockstep() {
    // A connecting peer keys its send direction with the server's receive
    // IV; frames then flow client → server across many generations.
    let handshake = sample_handshake();
    let mut client_send = SendCipher::new(handshake.version, handshake.iv_recv, handshake.block_size);
    let mut server_recv = RecvCipher::new(handshake.version, handshake.iv_recv, handshake.block_size);

    for round in 0u32..64 {
        let frame = {
            let mut f = vec![0x01, 0x00];
            f.extend_from_slice(&round.to_le_bytes());
            f
        };
        let wire = client_send.encrypt(&frame);
        let len = server_recv.decode_header(&wire[..6]).unwrap();
        let mut body = wire[6..6 + len].to_vec();
        server_recv.decrypt(&mut body);
        assert_eq!(body, frame, "round {round}");
    }
    assert_eq!(client_send.generation(), 64);
    assert_eq!(server_recv.generation(), 64);
}

mod dispatch {
    use super::*;
    use crate::config::ProtocolConfig;
    use crate::core::reader::PacketReader;
    use crate::error::Result;
    use crate::handlers;
    use crate::protocol::opcode::RecvOp;
    use crate::protocol::router::{PacketHandler, PacketRouter};
    use crate::protocol::session::Session;
    use futures::future::BoxFuture;
    use std::io;
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, TcpStream};

    /// Handler whose reply write has failed at the socket: it surfaces the
    /// I/O error the session's send path would produce on a broken pipe.
    struct BrokenPipeHandler;

    impl PacketHandler for BrokenPipeHandler {
        fn handle<'a>(
            &'a self,
            _session: &'a mut Session,
            _reader: &'a mut PacketReader,
        ) -> BoxFuture<'a, Result<()>> {
            Box::pin(async {
                Err(ProtocolError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "peer went away",
                )))
            })
        }
    }

    /// Build a live session over a loopback socket pair, returning the
    /// client end and a send cipher mirrored from the session's handshake.
    async fn session_pair(router: PacketRouter) -> (Session, TcpStream, SendCipher) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut client = TcpStream::connect(addr).await.unwrap();
        let (server_sock, _) = listener.accept().await.unwrap();
        let (_server_read, server_write) = server_sock.into_split();

        let session = Session::accept(7, server_write, Arc::new(router), &ProtocolConfig::default())
            .await
            .unwrap();

        let mut header = [0u8; HANDSHAKE_HEADER_LEN];
        client.read_exact(&mut header).await.unwrap();
        let body_len = decode_handshake_header(PROTOCOL_VERSION, &header).unwrap();
        let mut body = vec![0u8; body_len];
        client.read_exact(&mut body).await.unwrap();
        let handshake = Handshake::parse(&body).unwrap();

        let send = SendCipher::new(handshake.version, handshake.iv_recv, handshake.block_size);
        (session, client, send)
    }

    #[tokio::test]
    async fn transport_error_from_a_handler_is_session_fatal() {
        let mut router = PacketRouter::new();
        router.register(RecvOp::ResponseVersion, Box::new(BrokenPipeHandler));
        let (mut session, _client, mut send) = session_pair(router).await;

        let wire = send.encrypt(&[0x01, 0x00]);
        let result = session.on_data(&wire).await;
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[tokio::test]
    async fn payload_error_from_a_handler_stays_local() {
        let (mut session, _client, mut send) = session_pair(handlers::login_router()).await;

        // Version response missing its u32 payload: the handler fails with
        // a truncation error, which must not touch the session.
        let wire = send.encrypt(&[0x01, 0x00]);
        session.on_data(&wire).await.unwrap();

        // The session is still in lockstep and dispatches the next frame.
        let mut frame = vec![0x01, 0x00];
        frame.extend_from_slice(&(PROTOCOL_VERSION as u32).to_le_bytes());
        let wire = send.encrypt(&frame);
        session.on_data(&wire).await.unwrap();
        assert_eq!(session.send_generation(), 1);
    }
}

#[test]
fn fresh_handshakes_never_share_ivs() {
    let a = cipher::generate_iv();
    let b = cipher::generate_iv();
    // Two IVs inside one handshake must be distinct draws, and separate
    // connections must not repeat them.
    assert_ne!(a, b);
}
