//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::EchoConfig;
use crate::config::validation::{validate_config, ValidationError};

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

/// Load configuration from an optional TOML file, apply port overrides and validate.
///
/// Without a file the defaults are used.
pub fn load_config(
    path: Option<&Path>,
    http_port: Option<u16>,
    grpc_port: Option<u16>,
) -> Result<EchoConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => EchoConfig::default(),
    };

    apply_port_overrides(&mut config, http_port, grpc_port);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EchoConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Point the listeners at `0.0.0.0:<port>` for each port given.
pub fn apply_port_overrides(config: &mut EchoConfig, http_port: Option<u16>, grpc_port: Option<u16>) {
    if let Some(port) = http_port {
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Some(port) = grpc_port {
        config.grpc.bind_address = format!("0.0.0.0:{}", port);
    }
}
