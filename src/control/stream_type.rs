use url::Url;

use crate::config::StreamPorts;

/// Which sibling server a `tcUrl` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    Unknown,
    /// Public signalling port of the rtz server.
    Rtz,
    /// Public HLS port.
    Hls,
}

impl StreamType {
    /// Classifies `tc_url` by the port written in it.
    ///
    /// A URL without a port falls back to its scheme's default, so
    /// `http://h/` counts as port 80. URLs that do not parse, or whose
    /// scheme has no default, are `Unknown` unless they name a port.
    pub fn classify(tc_url: &str, ports: &StreamPorts) -> Self {
        let Some(port) = Url::parse(tc_url).ok().and_then(|url| url.port_or_known_default()) else {
            return StreamType::Unknown;
        };

        if port == ports.signal_port {
            StreamType::Rtz
        } else if port == ports.hls_port {
            StreamType::Hls
        } else {
            StreamType::Unknown
        }
    }
}
