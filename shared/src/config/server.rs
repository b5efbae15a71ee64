//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{parsed, Lookup};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Reads `SERVER_HOST`, `SERVER_PORT` and `SERVER_WORKERS`
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: parsed(lookup, "SERVER_PORT").unwrap_or(defaults.port),
            workers: parsed(lookup, "SERVER_WORKERS").unwrap_or(defaults.workers),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::vars;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_bad_port_keeps_default() {
        let config = ServerConfig::from_lookup(&vars(&[("SERVER_PORT", "http"), ("SERVER_WORKERS", "4")]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 4);
    }
}
