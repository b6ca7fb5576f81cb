//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{parse_package_list, SecretKey, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_PORT: &str = "MATHYD_PORT";
pub const ENV_HMAC_KEY: &str = "MATHYD_HMAC_KEY";
pub const ENV_PACKAGES: &str = "MATHYD_MATHJAX_PACKAGES";
pub const ENV_BIND_ADDRESS: &str = "MATHYD_BIND_ADDRESS";
pub const ENV_RENDER_TIMEOUT: &str = "MATHYD_RENDER_TIMEOUT_SECS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then `MATHYD_*`
/// environment variables. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str::<ServiceConfig>(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the process environment so the mapping can be tested.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_PORT) {
        config.listener.port = raw.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_PORT,
            value: raw.clone(),
        })?;
    }

    if let Some(raw) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = raw;
    }

    // Set-but-empty still overrides: the service then refuses every request.
    if let Some(key) = lookup(ENV_HMAC_KEY) {
        config.hmac.key = SecretKey::new(key);
    }

    if let Some(raw) = lookup(ENV_PACKAGES).filter(|raw| !raw.is_empty()) {
        config.render.packages = parse_package_list(&raw);
    }

    if let Some(raw) = lookup(ENV_RENDER_TIMEOUT) {
        config.render.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_RENDER_TIMEOUT,
            value: raw.clone(),
        })?;
    }

    Ok(())
}
