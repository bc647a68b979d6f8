use std::collections::HashSet;

use sbgen_core::config::ProjectConfig;
use sbgen_core::error::ConfigError;
use sbgen_core::ir::{
    HttpMethod, IrSpec, NamedOperation, Parameter, ParameterLocation, SuccessResponse,
};
use sbgen_core::transform::naming;
use serde::Serialize;

use crate::type_mapper::{java_type, needs_list_import};

/// Title used when the spec has none.
pub const DEFAULT_TITLE: &str = "Generated Service";

/// Version used when neither the config nor `info.version` has one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Everything the templates can reference. Built once per run and only read
/// while rendering.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationContext {
    /// Fixed provenance line placed at the top of every artifact.
    pub header: String,
    pub title: String,
    pub description: Option<String>,
    pub package_name: String,
    /// `package_name` as a relative directory, e.g. `com/example/pets`.
    pub package_path: String,
    pub application_class: String,
    pub controller_class: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub java_version: String,
    pub spring_boot_version: String,
    pub server_port: u16,
    pub base_path: Option<String>,
    pub dependencies: Vec<Dependency>,
    pub uses_list: bool,
    pub operations: Vec<OperationContext>,
}

/// A Maven dependency managed by the Spring Boot parent.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    pub group_id: &'static str,
    pub artifact_id: &'static str,
    pub scope: Option<&'static str>,
}

const DEPENDENCIES: [Dependency; 3] = [
    Dependency {
        group_id: "org.springframework.boot",
        artifact_id: "spring-boot-starter-web",
        scope: None,
    },
    Dependency {
        group_id: "org.springframework.boot",
        artifact_id: "spring-boot-starter-validation",
        scope: None,
    },
    Dependency {
        group_id: "org.springframework.boot",
        artifact_id: "spring-boot-starter-test",
        scope: Some("test"),
    },
];

/// One controller method stub.
#[derive(Debug, Clone, Serialize)]
pub struct OperationContext {
    pub method_name: String,
    pub http_method: &'static str,
    pub path: String,
    /// Routing annotation, e.g. `@GetMapping("/pets/{id}")`.
    pub mapping: String,
    /// Javadoc body lines; empty strings are paragraph breaks.
    pub doc_lines: Vec<String>,
    pub deprecated: bool,
    /// Annotated Java parameter declarations.
    pub params: Vec<String>,
    /// Type argument of the returned `ResponseEntity`.
    pub response_type: String,
}

impl GenerationContext {
    pub fn build(ir: &IrSpec, config: &ProjectConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let title = ir
            .info
            .title
            .as_deref()
            .map(single_line)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let package_name =
            naming::package_name(config.package_name.as_deref(), ir.info.title.as_deref());
        let application_class = class_name(&config.application_class, "Application");
        let controller_class = class_name(&config.controller_class, "Controller");
        if application_class == controller_class {
            return Err(ConfigError::Invalid(format!(
                "application and controller classes both resolve to `{application_class}`"
            )));
        }

        let version = config
            .version
            .clone()
            .or_else(|| ir.info.version.as_deref().map(single_line))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let header = match ir.info.version.as_deref() {
            Some(api_version) => format!(
                "Generated by sbgen from {title} {}. Do not edit.",
                single_line(api_version)
            ),
            None => format!("Generated by sbgen from {title}. Do not edit."),
        };

        let uses_list = ir.operations.iter().any(|named| {
            let op = &named.operation;
            op.parameters.iter().any(|p| needs_list_import(&p.type_hint))
                || op
                    .response
                    .as_ref()
                    .and_then(|r| r.body.as_ref())
                    .is_some_and(needs_list_import)
        });

        Ok(Self {
            header,
            description: ir.info.description.clone(),
            package_path: package_name.replace('.', "/"),
            group_id: config
                .group_id
                .clone()
                .unwrap_or_else(|| naming::group_id(&package_name)),
            artifact_id: naming::artifact_id(
                config.artifact_id.as_deref(),
                ir.info.title.as_deref(),
            ),
            version,
            java_version: config.java_version.clone(),
            spring_boot_version: config.spring_boot_version.clone(),
            server_port: config.server_port,
            base_path: ir.base_path.clone(),
            dependencies: DEPENDENCIES.to_vec(),
            uses_list,
            operations: ir.operations.iter().map(operation_context).collect(),
            title,
            package_name,
            application_class,
            controller_class,
        })
    }
}

fn class_name(raw: &str, fallback: &str) -> String {
    naming::java_type_name(raw).unwrap_or_else(|| {
        log::warn!("class name `{raw}` is not usable; using `{fallback}`");
        fallback.to_string()
    })
}

fn operation_context(named: &NamedOperation) -> OperationContext {
    let op = &named.operation;

    let mut doc_lines = Vec::new();
    for text in [&op.summary, &op.description].into_iter().flatten() {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            continue;
        }
        doc_lines.extend(lines.into_iter().map(str::to_string));
        doc_lines.push(String::new());
    }
    if !op.tags.is_empty() {
        doc_lines.push(format!("Tags: {}", op.tags.join(", ")));
    }
    doc_lines.push(format!("{} {}", op.method.as_str(), op.path));

    OperationContext {
        method_name: named.method_name.clone(),
        http_method: op.method.as_str(),
        path: op.path.clone(),
        mapping: mapping_annotation(op.method, &op.path),
        doc_lines,
        deprecated: op.deprecated,
        params: parameter_declarations(&op.parameters),
        response_type: response_type(op.response.as_ref()),
    }
}

/// `Object` when no success response is declared, `Void` when it has no body.
fn response_type(response: Option<&SuccessResponse>) -> String {
    match response {
        None => "Object".to_string(),
        Some(SuccessResponse { body: None, .. }) => "Void".to_string(),
        Some(SuccessResponse {
            body: Some(hint),
            format,
            ..
        }) => java_type(hint, format.as_deref()),
    }
}

fn mapping_annotation(method: HttpMethod, path: &str) -> String {
    let path = java_string(path);
    match method {
        HttpMethod::Get => format!("@GetMapping(\"{path}\")"),
        HttpMethod::Post => format!("@PostMapping(\"{path}\")"),
        HttpMethod::Put => format!("@PutMapping(\"{path}\")"),
        HttpMethod::Patch => format!("@PatchMapping(\"{path}\")"),
        HttpMethod::Delete => format!("@DeleteMapping(\"{path}\")"),
        other => format!(
            "@RequestMapping(path = \"{path}\", method = RequestMethod.{})",
            other.as_str()
        ),
    }
}

/// Render each parameter as an annotated Java declaration with a name that
/// is unique within the method.
fn parameter_declarations(params: &[Parameter]) -> Vec<String> {
    let mut taken = HashSet::new();
    params
        .iter()
        .map(|param| {
            let base = naming::java_identifier(&param.name).unwrap_or_else(|| "param".to_string());
            let name = naming::claim_unique(&mut taken, &base);
            let ty = java_type(&param.type_hint, param.format.as_deref());
            format!("{} {ty} {name}", binding_annotation(param))
        })
        .collect()
}

fn binding_annotation(param: &Parameter) -> String {
    let key = java_string(&param.name);
    match param.location {
        ParameterLocation::Path => format!("@PathVariable(\"{key}\")"),
        ParameterLocation::Query => {
            format!("@RequestParam(value = \"{key}\", required = {})", param.required)
        }
        ParameterLocation::Header => {
            format!("@RequestHeader(value = \"{key}\", required = {})", param.required)
        }
        ParameterLocation::Cookie => {
            format!("@CookieValue(value = \"{key}\", required = {})", param.required)
        }
        ParameterLocation::Body if param.required => "@RequestBody".to_string(),
        ParameterLocation::Body => "@RequestBody(required = false)".to_string(),
    }
}

/// Escape text for use inside a Java string literal.
pub fn java_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn single_line(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
