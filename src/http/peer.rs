//! Per-connection request parser and lifecycle.
//!
//! A [`Peer`] is fed raw bytes as they arrive and never blocks. It keeps
//! whatever it cannot use yet in its channel and picks up where it left off
//! on the next call, so the outcome does not depend on how the transport
//! chunks the stream.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::http::channel::{Channel, CloseMode};
use crate::http::parser::{find_header_end, parse_request_head, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::serialize_response;

pub type PeerId = u64;

/// Turns a complete request into the response to send back.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: &Request) -> Response;
}

enum ParseState {
    ReadingHeader,
    /// Header parsed, waiting for `content_length` body bytes.
    ReadingBody(Request),
}

/// Lifecycle bits of a peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerFlags(u8);

impl PeerFlags {
    pub const CLOSE_REQUESTED: PeerFlags = PeerFlags(0b01);
    pub const ERROR_OCCURRED: PeerFlags = PeerFlags(0b10);

    pub fn contains(self, other: PeerFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: PeerFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: PeerFlags) {
        self.0 |= other.0;
    }

    pub fn union(self, other: PeerFlags) -> PeerFlags {
        PeerFlags(self.0 | other.0)
    }
}

/// Size limits a peer enforces before buffering a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerLimits {
    pub max_header_size: usize,
    pub max_body_size: usize,
}

impl Default for PeerLimits {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for PeerLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_header_size: config.max_header_size,
            max_body_size: config.max_body_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStatus {
    /// Waiting for more bytes.
    Open,
    /// Torn down; the channel's close mode says whether to flush.
    Closed,
}

pub struct Peer {
    id: PeerId,
    channel: Channel,
    state: ParseState,
    /// How far the inbound buffer has been searched for the header terminator.
    header_scan: usize,
    limits: PeerLimits,
    flags: PeerFlags,
    handler: Arc<dyn RequestHandler>,
    torn_down: bool,
}

impl Peer {
    pub fn new(id: PeerId, handler: Arc<dyn RequestHandler>, limits: PeerLimits) -> Self {
        Self {
            id,
            channel: Channel::new(),
            state: ParseState::ReadingHeader,
            header_scan: 0,
            limits,
            flags: PeerFlags::default(),
            handler,
            torn_down: false,
        }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn flags(&self) -> PeerFlags {
        self.flags
    }

    pub fn is_reading_body(&self) -> bool {
        matches!(self.state, ParseState::ReadingBody(_))
    }

    /// The request whose body is still arriving, if any.
    pub fn pending_request(&self) -> Option<&Request> {
        match &self.state {
            ParseState::ReadingBody(req) => Some(req),
            ParseState::ReadingHeader => None,
        }
    }

    /// Bytes received but not yet consumed by the parser.
    pub fn buffered(&self) -> usize {
        self.channel.read_buf_size()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn take_outbound(&mut self) -> Bytes {
        self.channel.take_outbound()
    }

    pub fn close_mode(&self) -> Option<CloseMode> {
        self.channel.close_mode()
    }

    /// Readiness callback: `data` has just been read from the transport.
    pub fn on_data(&mut self, data: &[u8]) -> PeerStatus {
        if self.torn_down {
            return PeerStatus::Closed;
        }

        self.channel.push_inbound(data);
        self.process();

        if self
            .flags
            .intersects(PeerFlags::ERROR_OCCURRED.union(PeerFlags::CLOSE_REQUESTED))
        {
            self.teardown();
            return PeerStatus::Closed;
        }

        PeerStatus::Open
    }

    /// Transport failure callback. Tears the peer down without sending anything.
    pub fn on_error(&mut self) -> PeerStatus {
        self.flags.insert(PeerFlags::ERROR_OCCURRED);
        self.teardown();
        PeerStatus::Closed
    }

    fn process(&mut self) {
        while !self.channel.read_buf_empty() && !self.close_pending() {
            match std::mem::replace(&mut self.state, ParseState::ReadingHeader) {
                ParseState::ReadingHeader => {
                    let Some(end) = find_header_end(self.channel.peek(), self.header_scan) else {
                        self.header_scan = self.channel.read_buf_size();
                        if self.header_scan > self.limits.max_header_size {
                            self.reject(ParseError::HeaderTooLarge(self.limits.max_header_size));
                        }
                        break;
                    };

                    self.header_scan = 0;
                    let head = self.channel.read(end);
                    if end > self.limits.max_header_size {
                        self.reject(ParseError::HeaderTooLarge(self.limits.max_header_size));
                        break;
                    }

                    match parse_request_head(&head) {
                        Ok(req) if req.content_length > self.limits.max_body_size => {
                            self.reject(ParseError::BodyTooLarge(self.limits.max_body_size));
                        }
                        Ok(req) if req.content_length == 0 => self.dispatch(req),
                        Ok(req) => {
                            debug!(
                                peer = self.id,
                                content_length = req.content_length,
                                "waiting for request body"
                            );
                            self.state = ParseState::ReadingBody(req);
                        }
                        Err(e) => self.reject(e),
                    }
                }

                ParseState::ReadingBody(mut req) => {
                    if self.channel.read_buf_size() < req.content_length {
                        self.state = ParseState::ReadingBody(req);
                        break;
                    }

                    let body = self.channel.read(req.content_length);
                    req.body.extend_from_slice(&body);
                    self.dispatch(req);
                }
            }
        }
    }

    fn close_pending(&self) -> bool {
        self.flags
            .intersects(PeerFlags::ERROR_OCCURRED.union(PeerFlags::CLOSE_REQUESTED))
    }

    fn dispatch(&mut self, req: Request) {
        if self.flags.contains(PeerFlags::ERROR_OCCURRED) {
            return;
        }
        let response = self.handler.handle(&req);
        info!(
            peer = self.id,
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            "handled control request"
        );
        self.respond(&response);
    }

    fn reject(&mut self, err: ParseError) {
        warn!(peer = self.id, error = %err, "rejected request header");
        self.respond(&Response::bad_request());
    }

    /// Queues the one and only response of this connection.
    fn respond(&mut self, response: &Response) {
        if self.flags.contains(PeerFlags::ERROR_OCCURRED) {
            return;
        }
        self.channel.write(&serialize_response(response));
        self.flags.insert(PeerFlags::CLOSE_REQUESTED);
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let flush = !self.flags.contains(PeerFlags::ERROR_OCCURRED);
        self.channel.close(flush);
        self.state = ParseState::ReadingHeader;
        self.header_scan = 0;

        debug!(peer = self.id, flush, "peer torn down");
    }
}
