use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "monitor.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub streams: StreamPorts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Seconds a peer may wait for more bytes before it is dropped. 0 disables the deadline.
    pub read_timeout_secs: u64,
    /// Largest header section accepted before the terminator is seen.
    pub max_header_size: usize,
    /// Largest `Content-Length` accepted.
    pub max_body_size: usize,
    pub stop_policy: StopPolicy,
}

/// Ports of the sibling streaming servers, used to classify a `tcUrl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamPorts {
    pub signal_port: u16,
    pub hls_port: u16,
}

/// What `Server::stop` does with connections that are still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopPolicy {
    /// Stop accepting, let live peers finish their current request.
    #[default]
    Drain,
    /// Stop accepting and tear down every live peer without flushing.
    Immediate,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8090".to_string(),
            read_timeout_secs: 30,
            max_header_size: 8192,
            max_body_size: 65536,
            stop_policy: StopPolicy::Drain,
        }
    }
}

impl Default for StreamPorts {
    fn default() -> Self {
        Self {
            signal_port: 8000,
            hls_port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }
}

impl Config {
    /// Loads the YAML file named by `MONITOR_CONFIG` (or `monitor.yaml`),
    /// falling back to defaults when it does not exist. `LISTEN` overrides
    /// the listen address.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MONITOR_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut cfg = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
