//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeout > 0)
//! - Check that URLs and socket addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{AppConfig, ClientConfig};

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate the whole host configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_client(&config.client) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if config.startup.namespaces.iter().any(|ns| ns.trim().is_empty()) {
        errors.push(ValidationError::new(
            "startup.namespaces",
            "namespace names must not be empty",
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address {:?}", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address {:?}", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the client section on its own.
///
/// Used by the client constructor so embedders that never touch a config
/// file still get the same checks.
pub fn validate_client(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app_id.trim().is_empty() {
        errors.push(ValidationError::new("client.app_id", "is required"));
    }
    if config.env.trim().is_empty() {
        errors.push(ValidationError::new("client.env", "must not be empty"));
    }
    if config.cluster.trim().is_empty() {
        errors.push(ValidationError::new("client.cluster", "must not be empty"));
    }

    match Url::parse(&config.config_server_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "client.config_server_url",
            format!("unsupported scheme {:?}", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "client.config_server_url",
            format!("invalid URL {:?}: {}", config.config_server_url, e),
        )),
    }

    if config.refresh_interval_secs == 0 {
        errors.push(ValidationError::new(
            "client.refresh_interval_secs",
            "must be greater than 0",
        ));
    }
    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "client.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
