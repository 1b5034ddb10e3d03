//! Configuration loading from disk and the process environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the upstream host override.
pub const ENV_TARGET_HOST: &str = "PROXY_TARGET_HOST";
/// Environment variable naming the upstream scheme override.
pub const ENV_TARGET_SCHEME: &str = "PROXY_TARGET_SCHEME";
/// Environment variable naming the listener bind address.
pub const ENV_BIND_ADDRESS: &str = "PROXY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ProxyConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides on top of a loaded configuration, then
/// re-validate.
///
/// The environment is read once here at startup; the forwarder itself only
/// ever sees the injected config.
pub fn apply_env_overrides(config: &mut ProxyConfig) -> Result<(), ConfigError> {
    if let Ok(host) = env::var(ENV_TARGET_HOST) {
        if !host.is_empty() {
            config.upstream.override_host = Some(host);
        }
    }
    if let Ok(scheme) = env::var(ENV_TARGET_SCHEME) {
        if !scheme.is_empty() {
            config.upstream.override_scheme = Some(scheme);
        }
    }
    if let Ok(addr) = env::var(ENV_BIND_ADDRESS) {
        if !addr.is_empty() {
            config.listener.bind_address = addr;
        }
    }

    validate_config(config).map_err(ConfigError::Validation)
}
