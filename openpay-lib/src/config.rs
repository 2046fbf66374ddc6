//! Configuration for the directory, resolver and orchestrator.
//!
//! Every field has a default so a missing or partial JSON file is valid.
//! Binaries layer CLI flags and environment variables on top of the file.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{OpenpayError, Result};

/// Top-level configuration shared by the server and the CLI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenpayConfig {
    /// Path of the JSON file backing the alias directory.
    #[serde(default = "default_directory_path")]
    pub directory_path: PathBuf,

    /// Socket address the HTTP facade listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Timeout for the resolver's wallet fetch, in seconds.
    #[serde(default = "default_resolver_timeout")]
    pub resolver_timeout_secs: u64,

    /// Counterpart payment service used by the orchestrator.
    #[serde(default)]
    pub counterpart: CounterpartConfig,
}

fn default_directory_path() -> PathBuf {
    PathBuf::from("data").join("wallets.json")
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_resolver_timeout() -> u64 {
    10
}

impl Default for OpenpayConfig {
    fn default() -> Self {
        Self {
            directory_path: default_directory_path(),
            listen_addr: default_listen_addr(),
            resolver_timeout_secs: default_resolver_timeout(),
            counterpart: CounterpartConfig::default(),
        }
    }
}

impl OpenpayConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is
    /// a [`OpenpayError::Config`] error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            OpenpayError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            OpenpayError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.resolver_timeout_secs == 0 {
            return Err(OpenpayError::Config(
                "resolver_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.socket_addr()?;
        self.counterpart.validate()
    }

    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            OpenpayError::Config(format!("invalid listen address '{}': {}", self.listen_addr, e))
        })
    }

    /// Resolver timeout as a [`Duration`].
    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_secs(self.resolver_timeout_secs)
    }

    /// Set the directory file path.
    pub fn with_directory_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.directory_path = path.into();
        self
    }

    /// Set the listen address.
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set the resolver timeout.
    pub fn with_resolver_timeout(mut self, secs: u64) -> Self {
        self.resolver_timeout_secs = secs;
        self
    }

    /// Set the counterpart base URL.
    pub fn with_counterpart_url(mut self, url: impl Into<String>) -> Self {
        self.counterpart.base_url = url.into();
        self
    }
}

/// Configuration for the counterpart payment service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartConfig {
    /// Base URL (e.g., "http://localhost:4000").
    #[serde(default = "default_counterpart_url")]
    pub base_url: String,

    /// Timeout for wallet self-discovery, in seconds.
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout_secs: u64,

    /// Timeout for incoming, quote, grant-start and status calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for payment execution.
    #[serde(default = "default_execute_timeout")]
    pub execute_timeout_secs: u64,

    /// How long a grant may stay pending before the session expires.
    #[serde(default = "default_grant_expiry")]
    pub grant_expiry_secs: u64,
}

fn default_counterpart_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_discovery_timeout() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    30
}

fn default_execute_timeout() -> u64 {
    60
}

fn default_grant_expiry() -> u64 {
    600
}

impl Default for CounterpartConfig {
    fn default() -> Self {
        Self::new(default_counterpart_url())
    }
}

impl CounterpartConfig {
    /// Create a configuration for the given base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            discovery_timeout_secs: default_discovery_timeout(),
            request_timeout_secs: default_request_timeout(),
            execute_timeout_secs: default_execute_timeout(),
            grant_expiry_secs: default_grant_expiry(),
        }
    }

    /// Set the grant expiry bound.
    pub fn with_grant_expiry(mut self, secs: u64) -> Self {
        self.grant_expiry_secs = secs;
        self
    }

    /// Set the request timeout used by most steps.
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Check that the URL parses and every timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            OpenpayError::Config(format!("invalid counterpart url '{}': {}", self.base_url, e))
        })?;

        let timeouts = [
            ("discovery_timeout_secs", self.discovery_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
            ("execute_timeout_secs", self.execute_timeout_secs),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(OpenpayError::Config(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Grant expiry bound as a [`Duration`].
    pub fn grant_expiry(&self) -> Duration {
        Duration::from_secs(self.grant_expiry_secs)
    }
}
