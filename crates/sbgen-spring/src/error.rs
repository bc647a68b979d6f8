use std::path::PathBuf;

use sbgen_core::error::{ConfigError, SpecError};
use thiserror::Error;

/// A template could not be rendered with the given context.
///
/// Always an internal defect: the context is built by this crate.
#[derive(Debug, Error)]
#[error("failed to render template `{template}`: {source}")]
pub struct TemplateError {
    pub template: String,
    #[source]
    pub source: minijinja::Error,
}

/// An artifact could not be written. `written` lists what reached disk first.
#[derive(Debug, Error)]
#[error("failed to write {artifact} to {}: {source}", path.display())]
pub struct WriteError {
    pub artifact: String,
    pub path: PathBuf,
    pub written: Vec<PathBuf>,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl GenerateError {
    /// Process exit code: 2 for input errors, 3 for write errors, 4 for
    /// internal template defects.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenerateError::Spec(_) | GenerateError::Config(_) => 2,
            GenerateError::Write(_) => 3,
            GenerateError::Template(_) => 4,
        }
    }

    /// Paths written before the failure (only non-empty for write errors).
    pub fn written(&self) -> &[PathBuf] {
        match self {
            GenerateError::Write(err) => &err.written,
            _ => &[],
        }
    }
}
