//! Server configuration
//!
//! Resolved once at startup from CLI flags and environment, then shared
//! read-only with every request handler.

use serde::{Deserialize, Serialize};

use crate::core::features::graphing::DEFAULT_MAX_SAMPLES;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for `samples` in graph requests
    pub max_graph_samples: usize,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_max_graph_samples(mut self, max: usize) -> Self {
        self.max_graph_samples = max;
        self
    }

    /// `host:port` as accepted by `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_graph_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}
