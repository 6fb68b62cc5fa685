//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::tfl::TflConfig;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default directory holding the static CSV tables.
pub const DEFAULT_DATA_DIR: &str = "data/fixtures";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening port (`PORT`)
    pub port: u16,

    /// Static CSV directory (`TB8_DATA_DIR`)
    pub data_dir: PathBuf,

    /// Upstream API settings (`TFL_APP_KEY`, `TFL_BASE_URL`, `TFL_TIMEOUT_SECS`)
    pub tfl: TflConfig,

    /// Serve live endpoints from fixtures in this directory (`TFL_MOCK_DIR`)
    pub mock_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => parse(&value, "PORT", "port number")?,
            None => DEFAULT_PORT,
        };

        let mut tfl = TflConfig::new();
        if let Some(key) = get("TFL_APP_KEY") {
            tfl = tfl.with_app_key(key);
        }
        if let Some(url) = get("TFL_BASE_URL") {
            tfl = tfl.with_base_url(url);
        }
        if let Some(value) = get("TFL_TIMEOUT_SECS") {
            tfl = tfl.with_timeout(parse(&value, "TFL_TIMEOUT_SECS", "whole number of seconds")?);
        }

        Ok(Self {
            port,
            data_dir: get("TB8_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            tfl,
            mock_dir: get("TFL_MOCK_DIR").map(PathBuf::from),
        })
    }

    /// Address to bind: all interfaces on the configured port.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse<T: std::str::FromStr>(
    value: &str,
    var: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}
