//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas > 0)
//! - Check that the request timeout covers the finality budget
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{FinalityStrategy, RelayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match url::Url::parse(&config.gateway.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "gateway.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("gateway.url", e.to_string())),
    }

    if config.gateway.chain_id.is_empty() {
        errors.push(ValidationError::new("gateway.chain_id", "must not be empty"));
    }
    if config.gateway.address_hrp.is_empty() {
        errors.push(ValidationError::new("gateway.address_hrp", "must not be empty"));
    }
    if config.gateway.gas_limit == 0 {
        errors.push(ValidationError::new("gateway.gas_limit", "must be > 0"));
    }
    if config.gateway.request_timeout_secs == 0 {
        errors.push(ValidationError::new("gateway.request_timeout_secs", "must be > 0"));
    }

    if config.finality.budget_secs == 0 {
        errors.push(ValidationError::new("finality.budget_secs", "must be > 0"));
    }
    if config.finality.strategy == FinalityStrategy::Poll {
        if config.finality.poll_interval_ms == 0 {
            errors.push(ValidationError::new("finality.poll_interval_ms", "must be > 0"));
        } else if config.finality.poll_interval_ms > config.finality.budget_secs.saturating_mul(1000) {
            errors.push(ValidationError::new(
                "finality.poll_interval_ms",
                "must not exceed the finality budget",
            ));
        }
    }

    if config.query.command.is_empty() || config.query.command[0].is_empty() {
        errors.push(ValidationError::new("query.command", "must name a program"));
    }
    if config.query.function.is_empty() {
        errors.push(ValidationError::new("query.function", "must not be empty"));
    }

    // A submission holds its request open for the whole finality wait plus
    // the surrounding gateway calls.
    let minimum = config
        .finality
        .budget_secs
        .saturating_add(config.gateway.request_timeout_secs.saturating_mul(3));
    if config.timeouts.request_secs <= minimum {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!("must exceed finality budget plus gateway calls ({}s)", minimum),
        ));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.gateway.url = "ftp://gateway".to_string();
        config.gateway.gas_limit = 0;
        config.query.command.clear();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["gateway.url", "gateway.gas_limit", "query.command"]);
    }

    #[test]
    fn test_request_timeout_must_cover_finality() {
        let mut config = RelayConfig::default();
        config.finality.budget_secs = 120;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timeouts.request_secs");
    }

    #[test]
    fn test_poll_interval_bounds() {
        let mut config = RelayConfig::default();
        config.finality.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());

        config.finality.strategy = FinalityStrategy::Fixed;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_huge_durations_saturate() {
        let mut config = RelayConfig::default();
        config.finality.budget_secs = u64::MAX;
        config.finality.poll_interval_ms = u64::MAX;
        config.gateway.request_timeout_secs = u64::MAX;
        config.timeouts.request_secs = u64::MAX;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["timeouts.request_secs"]);
        assert!(errors[0].to_string().contains(&u64::MAX.to_string()));

        config.finality.budget_secs = 1;
        config.gateway.request_timeout_secs = 1;
        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["finality.poll_interval_ms"]);
    }
}
