//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MultiAppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and interpretation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A value has a shape the resolver cannot interpret.
    #[error("Malformed configuration at `{key}`: {reason}")]
    Malformed { key: String, reason: String },

    /// An app-map entry names a dynamic handler that was never registered.
    #[error("Unknown dynamic handler `{handler}` referenced by `{key}`")]
    UnknownDynamicHandler { key: String, handler: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MultiAppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MultiAppConfig, ConfigError> {
    let config: MultiAppConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
