//! Configuration loading errors.

use thiserror::Error;

use crate::error::ConfigError;

/// Failure to obtain a usable [`KshetraConfig`](super::KshetraConfig).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigLoadError {
    /// File could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// YAML did not match the schema.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Parsed values are out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}
