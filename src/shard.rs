//! Seam to the sharding subsystem that owns live streams.

/// Forces a stream off the platform.
///
/// Implementations must return promptly: they are called from inside a
/// connection's read path. There is no success signal; kicking a stream
/// that does not exist is not an error.
pub trait StreamKicker: Send + Sync {
    fn kick_stream(&self, tc_url: &str, stream: &str);
}

/// Kicker for running the monitor without a shard attached; it only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogKicker;

impl StreamKicker for LogKicker {
    fn kick_stream(&self, tc_url: &str, stream: &str) {
        tracing::warn!(tc_url, stream, "no shard attached, kick recorded only");
    }
}
