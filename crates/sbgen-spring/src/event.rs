//! JSON request/response contract for running the generator inside a
//! function-as-a-service host.

use std::path::{Path, PathBuf};

use sbgen_core::config::ProjectConfig;
use sbgen_core::error::SpecError;
use sbgen_core::parse;
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::project;

/// One generation request. Exactly one of `spec` and `spec_path` is set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateEvent {
    /// Inline OpenAPI document (YAML or JSON text).
    #[serde(default)]
    pub spec: Option<String>,
    /// Path of a local OpenAPI document.
    #[serde(default)]
    pub spec_path: Option<String>,
    pub output_dir: String,
    #[serde(default)]
    pub project: Option<ProjectConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    InputError,
    WriteError,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateResponse {
    pub status: Status,
    /// Files that reached disk; on a write error, those written before it.
    pub written: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn failed(err: &GenerateError) -> Self {
        let status = match err {
            GenerateError::Spec(_) | GenerateError::Config(_) => Status::InputError,
            GenerateError::Write(_) => Status::WriteError,
            GenerateError::Template(_) => Status::InternalError,
        };
        Self {
            status,
            written: err.written().to_vec(),
            error: Some(err.to_string()),
        }
    }
}

/// Run one generation request. Failures are reported in the response.
pub fn handle(event: &GenerateEvent) -> GenerateResponse {
    match run(event) {
        Ok(written) => GenerateResponse {
            status: Status::Ok,
            written,
            error: None,
        },
        Err(err) => {
            log::error!("{err}");
            GenerateResponse::failed(&err)
        }
    }
}

fn run(event: &GenerateEvent) -> Result<Vec<PathBuf>, GenerateError> {
    let doc = match (&event.spec, &event.spec_path) {
        (Some(text), None) => parse::from_str(text)?,
        (None, Some(path)) => parse::load(Path::new(path))?,
        (Some(_), Some(_)) => {
            return Err(SpecError::Shape(
                "event must set only one of `spec` and `spec_path`".to_string(),
            )
            .into());
        }
        (None, None) => {
            return Err(
                SpecError::Shape("event must set `spec` or `spec_path`".to_string()).into(),
            );
        }
    };

    let config = event.project.clone().unwrap_or_default();
    let report = project::generate_document(&doc, Path::new(&event.output_dir), &config)?;
    Ok(report.written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Status::InputError).unwrap(),
            "\"input_error\""
        );
    }

    #[test]
    fn test_event_requires_exactly_one_source() {
        let dir = tempfile::tempdir().unwrap();
        let event = GenerateEvent {
            spec: None,
            spec_path: None,
            output_dir: dir.path().display().to_string(),
            project: None,
        };
        let response = handle(&event);
        assert_eq!(response.status, Status::InputError);
        assert!(response.written.is_empty());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_event_from_json() {
        let event: GenerateEvent = serde_json::from_str(
            r#"{"spec": "openapi: 3.0.0\npaths: {}\n", "output_dir": "/tmp/out",
                "project": {"package_name": "com.acme.demo"}}"#,
        )
        .unwrap();
        assert!(event.spec_path.is_none());
        let project = event.project.unwrap();
        assert_eq!(project.package_name.as_deref(), Some("com.acme.demo"));
        assert_eq!(project.server_port, 8080);
    }
}
