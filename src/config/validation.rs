//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, redirect cap)
//! - Check addresses parse before the listener tries to bind them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{EndpointProfile, RelayConfig};

/// Upper bound on configurable redirect hops.
pub const MAX_REDIRECT_CAP: usize = 20;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }

    if config.upstream.max_redirects > MAX_REDIRECT_CAP {
        errors.push(ValidationError::new(
            "upstream.max_redirects",
            format!("must be at most {}", MAX_REDIRECT_CAP),
        ));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.connect_timeout_secs", "must be greater than 0"));
    }

    let profiles = [
        ("endpoints.proxy", &config.endpoints.proxy),
        ("endpoints.check", &config.endpoints.check),
        ("endpoints.broken", &config.endpoints.broken),
    ];
    for (name, profile) in profiles {
        validate_profile(name, profile, config, &mut errors);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_profile(
    name: &str,
    profile: &EndpointProfile,
    config: &RelayConfig,
    errors: &mut Vec<ValidationError>,
) {
    if profile.timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            format!("{}.timeout_secs", name),
            "must be greater than 0 when set",
        ));
    }
    if profile.spoof_user_agent && config.upstream.user_agent.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{}.spoof_user_agent", name),
            "requires a non-empty upstream.user_agent",
        ));
    }
}
