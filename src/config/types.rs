//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::limits::LimitsConfig;
use super::listen::ListenConfig;

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid {PORT_ENV} value: {0}")]
    InvalidPort(String),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// WebSocket listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Queue and frame limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env(std::env::var(PORT_ENV).ok().as_deref())?;
        Ok(config)
    }

    /// Apply the `PORT` override, if set.
    pub fn apply_env(&mut self, port: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = port {
            let port = raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
            self.listen.address.set_port(port);
        }
        Ok(())
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used in logs.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Prometheus metrics HTTP port (default: 9090, 0 disables).
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            metrics_port: None,
        }
    }
}

fn default_server_name() -> String {
    "presenced".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.name, "presenced");
        assert_eq!(config.listen.address.port(), 4000);
        assert!(config.listen.allow_origins.is_empty());
        assert_eq!(config.limits.outbound_queue, 256);
    }

    #[test]
    fn port_override_replaces_listen_port() {
        let mut config: Config = toml::from_str(
            r#"
[listen]
address = "127.0.0.1:7000"
"#,
        )
        .unwrap();
        config.apply_env(Some("4100")).unwrap();
        assert_eq!(config.listen.address.to_string(), "127.0.0.1:4100");
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let mut config: Config = toml::from_str("").unwrap();
        let err = config.apply_env(Some("http")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "http"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
name = "presence.test"
metrics_port = 0
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.name, "presence.test");
        assert_eq!(config.server.metrics_port, Some(0));
    }
}
