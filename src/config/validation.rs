//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject empty names where an app name is required
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Shapes of the mapping tables are checked when the resolution snapshot is
//!   built, since dynamic handlers are only known at that point

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::MultiAppConfig;

/// Extensions of per-app `config/` files that have a parser.
pub const CONFIG_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// A single semantic problem in the configuration.
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

/// Validate a parsed configuration.
pub fn validate_config(config: &MultiAppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.app.default_app.is_empty() {
        errors.push(ValidationError::new("app.default_app", "must not be empty"));
    }

    if !CONFIG_EXTENSIONS.contains(&config.app.config_ext.as_str()) {
        errors.push(ValidationError::new(
            "app.config_ext",
            format!("must be one of {}", CONFIG_EXTENSIONS.join(", ")),
        ));
    }

    if config.app.domain_bind.keys().any(String::is_empty) {
        errors.push(ValidationError::new("app.domain_bind", "keys must not be empty"));
    }

    if config.app.app_map.keys().any(String::is_empty) {
        errors.push(ValidationError::new("app.app_map", "keys must not be empty"));
    }

    if config.lang.default_lang.is_empty() {
        errors.push(ValidationError::new("lang.default_lang", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
