use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::{ServerConfig, StopPolicy};
use crate::http::connection::Connection;
use crate::http::peer::{Peer, PeerId, PeerLimits, RequestHandler};

struct PeerEntry {
    remote: SocketAddr,
    kill: oneshot::Sender<()>,
}

/// Live peers of one server, keyed by id.
///
/// The lock is never held across an await, so removal also works from a
/// `Drop` impl.
#[derive(Clone, Default)]
pub(crate) struct PeerRegistry {
    peers: Arc<Mutex<HashMap<PeerId, PeerEntry>>>,
}

impl PeerRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<PeerId, PeerEntry>> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, id: PeerId, entry: PeerEntry) {
        self.lock().insert(id, entry);
    }

    /// Returns false if the peer was already gone.
    fn remove(&self, id: PeerId) -> bool {
        self.lock().remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    /// Empties the registry and signals every peer task to drop its
    /// connection without flushing.
    fn teardown_all(&self) -> usize {
        let drained: Vec<(PeerId, PeerEntry)> = self.lock().drain().collect();
        let count = drained.len();
        for (id, entry) in drained {
            debug!(peer = id, remote = %entry.remote, "forcing peer teardown");
            let _ = entry.kill.send(());
        }
        count
    }
}

/// Removes a peer from the registry when its task ends, panics included.
struct Registration {
    id: PeerId,
    registry: PeerRegistry,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.remove(self.id);
        debug!(peer = self.id, "peer released");
    }
}

/// The control-API listener and the registry of its live peers.
pub struct Server {
    config: ServerConfig,
    handler: Arc<dyn RequestHandler>,
    listener: Option<TcpListener>,
    local_addr: Option<SocketAddr>,
    accept_task: Option<JoinHandle<()>>,
    registry: PeerRegistry,
}

impl Server {
    pub fn new(config: ServerConfig, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            config,
            handler,
            listener: None,
            local_addr: None,
            accept_task: None,
            registry: PeerRegistry::default(),
        }
    }

    /// Binds the listening socket and returns the address actually bound.
    pub async fn bind(&mut self, addr: &str) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let local = listener.local_addr()?;
        info!("Listening on {}", local);

        self.local_addr = Some(local);
        self.listener = Some(listener);
        Ok(local)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Starts accepting connections in a background task.
    pub fn start(&mut self) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .context("server must be bound before it is started")?;

        let registry = self.registry.clone();
        let handler = Arc::clone(&self.handler);
        let config = self.config.clone();

        self.accept_task = Some(tokio::spawn(accept_loop(listener, registry, handler, config)));
        Ok(())
    }

    /// Stops accepting connections, then handles live peers per the
    /// configured [`StopPolicy`].
    pub fn stop(&mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
            info!("Stopped accepting connections");
        }

        match self.config.stop_policy {
            StopPolicy::Drain => {
                let live = self.registry.len();
                debug!(live, "draining live peers");
            }
            StopPolicy::Immediate => {
                let count = self.registry.teardown_all();
                info!(count, "tore down live peers");
            }
        }
    }

    /// Tears down every live peer without flushing and releases the listener.
    pub fn destroy(mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
        }
        self.listener = None;
        let count = self.registry.teardown_all();
        info!(count, "server destroyed");
    }

    pub fn peer_count(&self) -> usize {
        self.registry.len()
    }
}

async fn accept_loop(
    listener: TcpListener,
    registry: PeerRegistry,
    handler: Arc<dyn RequestHandler>,
    config: ServerConfig,
) {
    let mut next_id: PeerId = 1;

    loop {
        let (socket, remote) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("accept failed: {}", e);
                continue;
            }
        };

        let id = next_id;
        next_id += 1;
        info!(peer = id, "Accepted connection from {}", remote);

        spawn_peer(id, socket, remote, &registry, &handler, &config);
    }
}

/// Registers the peer, then starts its connection task. The task removes
/// the peer from the registry before the socket is dropped.
fn spawn_peer(
    id: PeerId,
    socket: TcpStream,
    remote: SocketAddr,
    registry: &PeerRegistry,
    handler: &Arc<dyn RequestHandler>,
    config: &ServerConfig,
) {
    let (kill, killed) = oneshot::channel();
    registry.insert(id, PeerEntry { remote, kill });

    let peer = Peer::new(id, Arc::clone(handler), PeerLimits::from(config));
    let conn = Connection::new(socket, peer, config.read_timeout());
    let registration = Registration {
        id,
        registry: registry.clone(),
    };

    tokio::spawn(async move {
        // Dropped in reverse order: the registration goes before the socket.
        let mut conn = conn;
        let _registration = registration;

        tokio::select! {
            res = conn.run() => {
                if let Err(e) = res {
                    error!(peer = id, "Connection error from {}: {}", remote, e);
                }
            }
            _ = killed => {
                conn.abort();
            }
        }
    });
}
