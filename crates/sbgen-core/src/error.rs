use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning an input document into operations.
///
/// Every variant is an input error: nothing has been written when one of
/// these is returned.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed YAML or JSON.
    #[error("failed to parse spec: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// The input parsed, but does not have the shape of an OpenAPI document.
    #[error("invalid spec shape: {0}")]
    Shape(String),
}

impl SpecError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        SpecError::Shape(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
