//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{AddrParseError, IpAddr, SocketAddr};

/// Root configuration for mathyd.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Request integrity settings.
    pub hmac: HmacConfig,

    /// Rendering engine settings.
    pub render: RenderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP literal to bind (e.g., "0.0.0.0" or "::").
    pub bind_address: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// Socket address to bind, for IPv4 and IPv6 literals alike.
    pub fn socket_address(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind_address.trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Shared secret used to authenticate request bodies.
///
/// `Debug` is redacted so the key never lands in logs.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("SecretKey(<unset>)")
        } else {
            f.write_str("SecretKey(<redacted>)")
        }
    }
}

/// Request integrity configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HmacConfig {
    /// HMAC-SHA256 key. Empty means every request is rejected.
    pub key: SecretKey,
}

/// Rendering engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Package identifiers handed to the engine at initialization.
    pub packages: Vec<String>,

    /// Markup flavour produced by the engine.
    pub output: MarkupFormat,

    /// Deadline for a single render in seconds.
    pub timeout_secs: u64,
}

pub const DEFAULT_PACKAGES: &str = "base, autoload, require, ams, newcommand";

/// Split a comma-delimited package list, trimming whitespace around commas.
pub fn parse_package_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|p| p.trim().to_string()).collect()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            packages: parse_package_list(DEFAULT_PACKAGES),
            output: MarkupFormat::default(),
            timeout_secs: 10,
        }
    }
}

/// Markup produced by the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkupFormat {
    #[default]
    Mathml,
    Html,
    HtmlAndMathml,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "mathyd=info,tower_http=info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
