//! Channel-role packet handlers.

use crate::core::reader::PacketReader;
use crate::error::Result;
use crate::packets;
use crate::protocol::router::PacketHandler;
use crate::protocol::session::Session;
use futures::future::BoxFuture;
use tracing::debug;

/// Channel flavor of the version response: the client is re-verifying after
/// a world transfer, so answer with a heartbeat probe instead of a login.
pub struct ResponseVersionHandler;

impl PacketHandler for ResponseVersionHandler {
    fn handle<'a>(
        &'a self,
        session: &'a mut Session,
        reader: &'a mut PacketReader,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let client_version = reader.read_u32()?;
            debug!(
                session = session.id(),
                client_version, "channel client reported version"
            );

            session.send(packets::request_heartbeat(session.id() as u32)).await
        })
    }
}

/// Consumes the client's heartbeat echo.
pub struct ResponseHeartbeatHandler;

impl PacketHandler for ResponseHeartbeatHandler {
    fn handle<'a>(
        &'a self,
        session: &'a mut Session,
        reader: &'a mut PacketReader,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let key = reader.read_u32()?;
            debug!(session = session.id(), key, "heartbeat echo received");
            Ok(())
        })
    }
}
