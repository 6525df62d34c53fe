#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use stream_monitor::config::StreamPorts;
use stream_monitor::control::Dispatcher;
use stream_monitor::http::peer::{Peer, PeerLimits};
use stream_monitor::shard::StreamKicker;

/// Remembers every kick instead of talking to a shard.
#[derive(Default)]
pub struct RecordingKicker {
    pub kicks: Mutex<Vec<(String, String)>>,
}

impl RecordingKicker {
    pub fn kicks(&self) -> Vec<(String, String)> {
        self.kicks.lock().unwrap().clone()
    }
}

impl StreamKicker for RecordingKicker {
    fn kick_stream(&self, tc_url: &str, stream: &str) {
        self.kicks
            .lock()
            .unwrap()
            .push((tc_url.to_string(), stream.to_string()));
    }
}

pub const KICK_BODY: &str = r#"{"control":"kick","tcUrl":"rtz://h:8000","stream":"s1"}"#;

pub const OK_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 22\r\nConnection: close\r\n\r\n{\"code\":1,\"data\":\"OK\"}";

pub fn post(body: &str) -> String {
    format!(
        "POST /x HTTP/1.1\r\nContent-Length:{}\r\n\r\n{}",
        body.len(),
        body
    )
}

pub fn dispatcher() -> (Arc<RecordingKicker>, Arc<Dispatcher>) {
    let kicker = Arc::new(RecordingKicker::default());
    let dispatcher = Arc::new(Dispatcher::new(kicker.clone(), StreamPorts::default()));
    (kicker, dispatcher)
}

pub fn peer() -> (Arc<RecordingKicker>, Peer) {
    let (kicker, dispatcher) = dispatcher();
    (kicker, Peer::new(1, dispatcher, PeerLimits::default()))
}

pub fn status_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}
