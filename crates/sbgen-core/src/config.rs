use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.sbgen.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SbgenConfig {
    pub input: String,
    pub output: String,
    pub project: ProjectConfig,
}

impl Default for SbgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "generated-service".to_string(),
            project: ProjectConfig::default(),
        }
    }
}

/// Settings for the generated Spring Boot project.
///
/// Unset identity fields are derived from the spec's `info` block.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Java package, e.g. `com.acme.pets`. Derived from the title when unset.
    pub package_name: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    /// Project version. Falls back to `info.version`, then `1.0.0`.
    pub version: Option<String>,
    pub application_class: String,
    pub controller_class: String,
    pub server_port: u16,
    pub java_version: String,
    pub spring_boot_version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package_name: None,
            group_id: None,
            artifact_id: None,
            version: None,
            application_class: "Application".to_string(),
            controller_class: "Controller".to_string(),
            server_port: 8080,
            java_version: "17".to_string(),
            spring_boot_version: "3.2.1".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Reject settings that would make two artifacts share a path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_class.trim().is_empty() || self.controller_class.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "application_class and controller_class must not be empty".to_string(),
            ));
        }
        if self.application_class == self.controller_class {
            return Err(ConfigError::Invalid(format!(
                "application_class and controller_class are both `{}`",
                self.application_class
            )));
        }
        Ok(())
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".sbgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SbgenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SbgenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.project.validate()?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# sbgen configuration
input: openapi.yaml
output: generated-service

project:
  # package_name: com.acme.pets     # defaults to com.example.<spec title>
  # group_id: com.acme              # defaults to the package minus its last segment
  # artifact_id: pets-service       # defaults to the kebab-cased spec title
  # version: 1.0.0                  # defaults to info.version
  application_class: Application
  controller_class: Controller
  server_port: 8080
  java_version: "17"
  spring_boot_version: 3.2.1
"#
}
