//! Per-role opcode routing.
//!
//! Each server role builds its own `PacketRouter` at startup, registering
//! only the opcodes that role understands; a login connection can never
//! reach channel behavior even where opcode numbers collide. The table is
//! immutable once the server starts: registration happens on `&mut self`,
//! after which the router is shared read-only behind an `Arc` and resolved
//! per inbound packet in O(1).
//!
//! Handlers are polymorphic over a single capability: consume the decoded
//! packet's cursor and the session, optionally sending replies through it.
//! New opcodes are added by registering new handlers; neither the router nor
//! the session changes.

use crate::core::reader::PacketReader;
use crate::error::Result;
use crate::protocol::session::Session;
use futures::future::BoxFuture;
use std::collections::HashMap;

/// Capability interface implemented by game-logic modules.
///
/// Implementations may call `session.send(..)` zero or more times and must
/// not retain the reader beyond the call.
pub trait PacketHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        session: &'a mut Session,
        reader: &'a mut PacketReader,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Immutable opcode-to-handler table for one server role.
pub struct PacketRouter {
    handlers: HashMap<u16, Box<dyn PacketHandler>>,
}

impl PacketRouter {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `opcode`. Initialization-time only; a later
    /// registration for the same opcode replaces the earlier one.
    pub fn register(&mut self, opcode: impl Into<u16>, handler: Box<dyn PacketHandler>) {
        self.handlers.insert(opcode.into(), handler);
    }

    /// Look up the handler for `opcode`, if this role registered one.
    pub fn resolve(&self, opcode: u16) -> Option<&dyn PacketHandler> {
        self.handlers.get(&opcode).map(|h| h.as_ref())
    }

    /// Number of registered opcodes.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for PacketRouter {
    fn default() -> Self {
        Self::new()
    }
}
