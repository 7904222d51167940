//! Closed opcode tables, one per direction.
//!
//! `RecvOp` names client-to-server packets, `SendOp` server-to-client ones.
//! Both are immutable bidirectional mappings (opcode to symbolic name and
//! back), fixed at compile time; opcode numbers may collide across server
//! roles, which is why routing tables are per role rather than global.

/// Client-to-server opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum RecvOp {
    ResponseVersion = 0x0001,
    ResponseKey = 0x0002,
    ResponseHeartbeat = 0x0003,
}

impl RecvOp {
    pub fn from_u16(opcode: u16) -> Option<Self> {
        match opcode {
            0x0001 => Some(RecvOp::ResponseVersion),
            0x0002 => Some(RecvOp::ResponseKey),
            0x0003 => Some(RecvOp::ResponseHeartbeat),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RecvOp::ResponseVersion => "RESPONSE_VERSION",
            RecvOp::ResponseKey => "RESPONSE_KEY",
            RecvOp::ResponseHeartbeat => "RESPONSE_HEARTBEAT",
        }
    }
}

impl From<RecvOp> for u16 {
    fn from(op: RecvOp) -> u16 {
        op as u16
    }
}

/// Server-to-client opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SendOp {
    RequestVersion = 0x0001,
    RequestLogin = 0x0002,
    RequestHeartbeat = 0x0003,
}

impl SendOp {
    pub fn from_u16(opcode: u16) -> Option<Self> {
        match opcode {
            0x0001 => Some(SendOp::RequestVersion),
            0x0002 => Some(SendOp::RequestLogin),
            0x0003 => Some(SendOp::RequestHeartbeat),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SendOp::RequestVersion => "REQUEST_VERSION",
            SendOp::RequestLogin => "REQUEST_LOGIN",
            SendOp::RequestHeartbeat => "REQUEST_HEARTBEAT",
        }
    }
}

impl From<SendOp> for u16 {
    fn from(op: SendOp) -> u16 {
        op as u16
    }
}
