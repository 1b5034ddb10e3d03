//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and formats (bind address, override scheme)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidOverrideScheme(String),
    InvalidOverrideHost(String),
    InvalidTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address {addr:?} is not a socket address")
            }
            ValidationError::InvalidOverrideScheme(scheme) => {
                write!(
                    f,
                    "upstream.override_scheme {scheme:?} must be \"http\" or \"https\""
                )
            }
            ValidationError::InvalidOverrideHost(host) => {
                write!(f, "upstream.override_host {host:?} is not a plain host")
            }
            ValidationError::InvalidTimeout => {
                write!(f, "timeouts.request_secs must be greater than zero")
            }
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(scheme) = &config.upstream.override_scheme {
        if scheme != "http" && scheme != "https" {
            errors.push(ValidationError::InvalidOverrideScheme(scheme.clone()));
        }
    }

    if let Some(host) = &config.upstream.override_host {
        if host.is_empty() || host.contains(char::is_whitespace) || host.contains("://") {
            errors.push(ValidationError::InvalidOverrideHost(host.clone()));
        }
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::InvalidTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
