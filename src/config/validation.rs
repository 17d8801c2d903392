//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ListenerOptions → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ListenerOptions;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `bind_address` is not a socket address.
    InvalidBindAddress(String),
    /// `request_timeout_secs` must be positive.
    ZeroTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "bind_address '{}' is not a valid socket address", addr)
            }
            ValidationError::ZeroTimeout => write!(f, "request_timeout_secs must be greater than 0"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check listener options for semantic errors.
pub fn validate_config(config: &ListenerOptions) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.bind_address.clone()));
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
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
    fn default_is_valid() {
        assert!(validate_config(&ListenerOptions::default()).is_ok());
    }

    #[test]
    fn bad_address() {
        let config = ListenerOptions {
            bind_address: "localhost".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidBindAddress("localhost".into())])
        );
    }
}
