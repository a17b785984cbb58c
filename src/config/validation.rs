//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("server.metrics_port {0} collides with listen.address")]
    MetricsPortCollision(u16),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let limits = &config.limits;
    for (name, value) in [
        ("outbound_queue", limits.outbound_queue),
        ("event_queue", limits.event_queue),
        ("max_frame_bytes", limits.max_frame_bytes),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    if let Some(port) = config.server.metrics_port
        && port != 0
        && port == config.listen.address.port()
    {
        errors.push(ValidationError::MetricsPortCollision(port));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
