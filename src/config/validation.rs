//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (intervals > 0, limits > 0)
//! - Detect the two listeners colliding on one address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EchoConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::EchoConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("listener and grpc share bind address {0}")]
    AddressConflict(SocketAddr),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &EchoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let http = parse_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    let grpc = parse_address("grpc.bind_address", &config.grpc.bind_address, &mut errors);
    if let (Some(http), Some(grpc)) = (http, grpc) {
        if http == grpc && http.port() != 0 {
            errors.push(ValidationError::AddressConflict(http));
        }
    }

    if config.observability.metrics_enabled {
        parse_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.sse.interval_ms == 0 {
        errors.push(ValidationError::Zero("sse.interval_ms"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_address(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&EchoConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = EchoConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.sse.interval_ms = 0;
        config.limits.max_body_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero("sse.interval_ms")));
        assert!(errors.contains(&ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: "not-an-address".into(),
        }));
    }

    #[test]
    fn shared_address_conflicts_unless_ephemeral() {
        let mut config = EchoConfig::default();
        config.grpc.bind_address = config.listener.bind_address.clone();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::AddressConflict(_)));

        config.listener.bind_address = "127.0.0.1:0".into();
        config.grpc.bind_address = "127.0.0.1:0".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = EchoConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }
}
