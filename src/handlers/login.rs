//! Login-role packet handlers.

use crate::core::reader::PacketReader;
use crate::error::Result;
use crate::packets;
use crate::protocol::router::PacketHandler;
use crate::protocol::session::Session;
use futures::future::BoxFuture;
use tracing::debug;

/// Handles the client's version response: acknowledge it and move the
/// connection on to the login request.
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
                client_version, "login client reported version"
            );

            session.send(packets::request_login()).await
        })
    }
}
