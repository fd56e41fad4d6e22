//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (with `.env` support) or defaults. The Prey section
//! is the per-session carrier threaded through every tool call; it is
//! immutable once a session is built.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::transport::TransportConfig;

/// Default upstream API root when `PREY_API_BASE` is unset.
pub const DEFAULT_PREY_URL: &str = "https://api.preyproject.com/v1";

/// Default per-request deadline when `PREY_TIMEOUT_MS` is unset or invalid.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const PREY_API_KEY_ENV: &str = "PREY_API_KEY";
pub const PREY_API_BASE_ENV: &str = "PREY_API_BASE";
pub const PREY_TIMEOUT_MS_ENV: &str = "PREY_TIMEOUT_MS";
pub const PREY_ALLOW_WRITE_ENV: &str = "PREY_ALLOW_WRITE";
pub const PREY_ALLOWED_TOOLS_ENV: &str = "PREY_ALLOWED_TOOLS";
pub const PREY_RATE_LIMIT_DISABLE_ENV: &str = "PREY_RATE_LIMIT_DISABLE";

/// Per-request override headers recognized by the HTTP transport.
pub const PREY_URL_HEADER: &str = "X-Prey-URL";
pub const PREY_API_KEY_HEADER: &str = "X-Prey-API-Key";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream Prey API configuration.
    pub prey: PreyConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Session settings for the upstream Prey API.
///
/// Produced once per session (from environment variables, optionally
/// overridden by transport headers) and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct PreyConfig {
    /// Upstream API root, no trailing slash.
    pub base_url: String,

    /// API key attached to every call; empty disables all calls.
    pub api_key: String,

    /// Gate for mutating tool calls.
    pub allow_write: bool,

    /// Restricts which named tools may execute; empty means unrestricted.
    pub allowed_tools: HashSet<String>,

    /// Per-request deadline.
    pub timeout: Duration,

    /// Bypasses the rate limiter entirely when true.
    pub disable_rate_limit: bool,
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for PreyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreyConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &if self.api_key.is_empty() { "[UNSET]" } else { "[REDACTED]" },
            )
            .field("allow_write", &self.allow_write)
            .field("allowed_tools", &self.allowed_tools)
            .field("timeout", &self.timeout)
            .field("disable_rate_limit", &self.disable_rate_limit)
            .finish()
    }
}

impl Default for PreyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PREY_URL.to_string(),
            api_key: String::new(),
            allow_write: false,
            allowed_tools: HashSet::new(),
            timeout: DEFAULT_TIMEOUT,
            disable_rate_limit: false,
        }
    }
}

impl PreyConfig {
    /// Load session settings from the environment.
    pub fn from_env() -> Self {
        let config = Self {
            base_url: base_url_from_env(),
            api_key: std::env::var(PREY_API_KEY_ENV)
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            allow_write: env_bool(PREY_ALLOW_WRITE_ENV),
            allowed_tools: allowed_tools_from_env(),
            timeout: timeout_from_env(),
            disable_rate_limit: env_bool(PREY_RATE_LIMIT_DISABLE_ENV),
        };
        if config.api_key.is_empty() {
            warn!("{PREY_API_KEY_ENV} is not set; all upstream calls will fail");
        }
        config
    }

    /// Override the base URL when a non-empty value is supplied (header wins
    /// over environment).
    pub fn override_base_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url {
            let url = url.trim_end_matches('/');
            if !url.is_empty() {
                self.base_url = url.to_string();
            }
        }
        self
    }

    /// Override the API key when a non-empty value is supplied.
    pub fn override_api_key(mut self, key: Option<&str>) -> Self {
        if let Some(key) = key {
            let key = key.trim();
            if !key.is_empty() {
                self.api_key = key.to_string();
            }
        }
        self
    }
}

fn env_bool(key: &str) -> bool {
    matches!(
        std::env::var(key)
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str(),
        "1" | "true" | "yes"
    )
}

fn base_url_from_env() -> String {
    let url = std::env::var(PREY_API_BASE_ENV).unwrap_or_default();
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        DEFAULT_PREY_URL.to_string()
    } else {
        url.to_string()
    }
}

fn allowed_tools_from_env() -> HashSet<String> {
    std::env::var(PREY_ALLOWED_TOOLS_ENV)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn timeout_from_env() -> Duration {
    match std::env::var(PREY_TIMEOUT_MS_ENV) {
        Ok(val) => match val.trim().parse::<i64>() {
            Ok(ms) if ms > 0 => Duration::from_millis(ms as u64),
            _ => DEFAULT_TIMEOUT,
        },
        Err(_) => DEFAULT_TIMEOUT,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "prey-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            prey: PreyConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.prey = PreyConfig::from_env();

        config
    }
}
