//! Configuration schema definitions.
//!
//! This module defines the configuration of the remote-config client and of
//! the host application that embeds it. All types derive Serde traits for
//! deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the host application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Config-server client settings.
    pub client: ClientConfig,

    /// Settings handed to the startup hook.
    pub startup: StartupConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:12580").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:12580".to_string(),
        }
    }
}

/// Connection settings for the config server.
///
/// Immutable once handed to a client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Application identifier on the config server (required).
    pub app_id: String,

    /// Environment name.
    pub env: String,

    /// Cluster name.
    pub cluster: String,

    /// Config server base URL.
    pub config_server_url: String,

    /// Pause between the end of one refresh cycle and the start of the next.
    pub refresh_interval_secs: u64,

    /// Per-fetch timeout in seconds.
    pub request_timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` when talking to the config server.
    pub use_system_proxy: bool,
}

impl ClientConfig {
    /// Defaults for everything but the application id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            env: "DEV".to_string(),
            cluster: "default".to_string(),
            config_server_url: "http://localhost:8080".to_string(),
            refresh_interval_secs: 30,
            request_timeout_secs: 6,
            use_system_proxy: true,
        }
    }
}

/// Startup hook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Namespaces tracked by the refresh loop.
    pub namespaces: Vec<String>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            namespaces: vec!["application".to_string()],
        }
    }
}

/// Timeout configuration for the host server.
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

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
