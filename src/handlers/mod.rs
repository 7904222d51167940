//! Role routers and their handlers.
//!
//! One builder per server role, each populating only the opcodes that role
//! understands. Two roles may bind the same opcode number to different
//! behavior; isolation comes from each `Server` owning its own router.

pub mod channel;
pub mod login;

use crate::protocol::opcode::RecvOp;
use crate::protocol::router::PacketRouter;

/// Router for the login role.
pub fn login_router() -> PacketRouter {
    let mut router = PacketRouter::new();
    router.register(RecvOp::ResponseVersion, Box::new(login::ResponseVersionHandler));
    router
}

/// Router for the channel role.
pub fn channel_router() -> PacketRouter {
    let mut router = PacketRouter::new();
    router.register(
        RecvOp::ResponseVersion,
        Box::new(channel::ResponseVersionHandler),
    );
    router.register(
        RecvOp::ResponseHeartbeat,
        Box::new(channel::ResponseHeartbeatHandler),
    );
    router
}
