//! Role server: listen, accept, run one session task per connection.
//!
//! Each server role (login, channel, ...) runs its own `Server` with its own
//! router; role separation lives at instance level, never inside a shared
//! dispatcher. The accept loop follows the usual shape: `tokio::select!`
//! over the listener and a shutdown channel, one spawned task per accepted
//! socket, monotonically increasing session ids.

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::protocol::router::PacketRouter;
use crate::protocol::session::Session;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

pub struct Server {
    role: String,
    listener: TcpListener,
    router: Arc<PacketRouter>,
    protocol: ProtocolConfig,
    session_counter: Arc<AtomicU64>,
}

impl Server {
    /// Bind the listening socket for one role. The router must be fully
    /// populated before this point; it is never mutated afterwards.
    pub async fn bind(
        role: impl Into<String>,
        addr: &str,
        router: PacketRouter,
        protocol: ProtocolConfig,
    ) -> Result<Self> {
        let role = role.into();
        let listener = TcpListener::bind(addr).await?;
        info!(role = %role, addr = %addr, opcodes = router.len(), "server listening");

        Ok(Self {
            role,
            listener,
            router: Arc::new(router),
            protocol,
            session_counter: Arc::new(AtomicU64::new(0)),
        })
    }

    /// The bound address; useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop until CTRL+C.
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("received CTRL+C, shutting down");
                let _ = shutdown_tx.send(()).await;
            }
        });

        self.run_with_shutdown(shutdown_rx).await
    }

    /// Run the accept loop until the shutdown channel fires.
    pub async fn run_with_shutdown(self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(role = %self.role, "server shutting down");
                    return Ok(());
                }

                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            let id = self.session_counter.fetch_add(1, Ordering::Relaxed);
                            let router = Arc::clone(&self.router);
                            let protocol = self.protocol.clone();
                            let role = self.role.clone();

                            tokio::spawn(async move {
                                handle_connection(role, id, stream, peer, router, protocol).await;
                            });
                        }
                        Err(e) => {
                            error!(role = %self.role, error = %e, "error accepting connection");
                        }
                    }
                }
            }
        }
    }
}

/// Drive one connection: handshake on accept, then feed socket bytes into
/// the session pipeline until the peer goes away or a fatal protocol error
/// tears the session down.
#[instrument(skip_all, fields(role = %role, session = id, peer = %peer))]
async fn handle_connection(
    role: String,
    id: u64,
    stream: TcpStream,
    peer: SocketAddr,
    router: Arc<PacketRouter>,
    protocol: ProtocolConfig,
) {
    let (mut read_half, write_half) = stream.into_split();

    let mut session = match Session::accept(id, write_half, router, &protocol).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "handshake transmission failed");
            return;
        }
    };
    info!("session established");

    let mut buf = [0u8; 4096];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => {
                info!("peer closed connection");
                break;
            }
            Ok(n) => {
                if let Err(e) = session.on_data(&buf[..n]).await {
                    // Desync, framing violation, or write failure: all
                    // connection-fatal, no resume.
                    error!(error = %e, "fatal session error, dropping connection");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "socket read error");
                break;
            }
        }
    }
    // Dropping both halves closes the socket.
}
