use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::http::channel::CloseMode;
use crate::http::peer::{Peer, PeerStatus};

const READ_CHUNK: usize = 4096;

/// Moves bytes between a socket and its [`Peer`].
pub struct Connection {
    stream: TcpStream,
    peer: Peer,
    read_timeout: Option<Duration>,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: Peer, read_timeout: Option<Duration>) -> Self {
        Self {
            stream,
            peer,
            read_timeout,
        }
    }

    /// Runs until the peer is torn down.
    ///
    /// EOF, a read deadline miss and socket errors all end the connection
    /// the same way: the peer is torn down and queued output is dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut buf = BytesMut::with_capacity(READ_CHUNK);

        loop {
            buf.clear();

            let read = match self.read_timeout {
                Some(limit) => match timeout(limit, self.stream.read_buf(&mut buf)).await {
                    Ok(res) => res,
                    Err(_) => {
                        warn!(peer = self.peer.id(), ?limit, "read deadline expired");
                        self.peer.on_error();
                        return Ok(());
                    }
                },
                None => self.stream.read_buf(&mut buf).await,
            };

            let status = match read {
                Ok(0) => {
                    debug!(peer = self.peer.id(), "client closed connection");
                    self.peer.on_error();
                    return Ok(());
                }
                Ok(_) => self.peer.on_data(&buf),
                Err(e) => {
                    self.peer.on_error();
                    return Err(e.into());
                }
            };

            if let Err(e) = self.flush().await {
                self.peer.on_error();
                return Err(e);
            }

            if status == PeerStatus::Closed {
                if self.peer.close_mode() == Some(CloseMode::Flush) {
                    self.stream.shutdown().await?;
                }
                return Ok(());
            }
        }
    }

    /// Tears the peer down from outside, without flushing.
    pub fn abort(&mut self) {
        self.peer.on_error();
    }

    async fn flush(&mut self) -> anyhow::Result<()> {
        let out = self.peer.take_outbound();
        if !out.is_empty() {
            self.stream.write_all(&out).await?;
        }
        Ok(())
    }
}
