//! Buffered byte channel between a socket and a [`Peer`](crate::http::peer::Peer).
//!
//! The socket pump appends whatever it reads with [`Channel::push_inbound`];
//! the peer consumes from the front with [`Channel::read`]. Writes are only
//! queued here and leave the process when the pump drains
//! [`Channel::take_outbound`].

use bytes::{Bytes, BytesMut};

/// How the channel was asked to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Send queued output, then close.
    Flush,
    /// Close now and discard queued output.
    Discard,
}

#[derive(Debug, Default)]
pub struct Channel {
    inbound: BytesMut,
    outbound: BytesMut,
    close: Option<CloseMode>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers bytes read from the transport. Ignored once the channel is closed.
    pub fn push_inbound(&mut self, data: &[u8]) {
        if self.close.is_none() {
            self.inbound.extend_from_slice(data);
        }
    }

    /// Number of buffered inbound bytes.
    pub fn read_buf_size(&self) -> usize {
        self.inbound.len()
    }

    pub fn read_buf_empty(&self) -> bool {
        self.inbound.is_empty()
    }

    /// Buffered inbound bytes, without consuming them.
    pub fn peek(&self) -> &[u8] {
        &self.inbound
    }

    /// Removes and returns the first `n` buffered bytes.
    ///
    /// Callers check [`read_buf_size`](Self::read_buf_size) first; asking
    /// for more than is buffered returns everything available.
    pub fn read(&mut self, n: usize) -> Bytes {
        let n = n.min(self.inbound.len());
        self.inbound.split_to(n).freeze()
    }

    /// Queues bytes for transmission. Ignored once the channel is closed.
    pub fn write(&mut self, data: &[u8]) {
        if self.close.is_none() {
            self.outbound.extend_from_slice(data);
        }
    }

    /// Takes everything queued for transmission.
    pub fn take_outbound(&mut self) -> Bytes {
        self.outbound.split().freeze()
    }

    /// Requests close. Only the first call has an effect; without `flush`
    /// the write queue is dropped immediately.
    pub fn close(&mut self, flush: bool) {
        if self.close.is_some() {
            return;
        }
        self.inbound.clear();
        if flush {
            self.close = Some(CloseMode::Flush);
        } else {
            self.outbound.clear();
            self.close = Some(CloseMode::Discard);
        }
    }

    pub fn close_mode(&self) -> Option<CloseMode> {
        self.close
    }
}
