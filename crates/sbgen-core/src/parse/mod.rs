pub mod spec;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};
use serde_yaml_ng::{Mapping, Value};

use crate::error::SpecError;
use crate::ir::HttpMethod;
use spec::{Info, PathItem, SpecDocument};

/// Path item keys that never name an operation.
const PATH_ITEM_FIELDS: [&str; 5] = ["summary", "description", "servers", "parameters", "$ref"];

/// Load an OpenAPI document (YAML or JSON) from a local file.
pub fn load(path: &Path) -> Result<SpecDocument, SpecError> {
    debug!("loading spec from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| SpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_str(&content)
}

/// Parse an OpenAPI document from text.
pub fn from_str(input: &str) -> Result<SpecDocument, SpecError> {
    let value = parse_value(input)?;
    build_document(value)
}

/// Parse an OpenAPI document from raw bytes.
pub fn from_slice(input: &[u8]) -> Result<SpecDocument, SpecError> {
    match std::str::from_utf8(input) {
        Ok(text) => from_str(text),
        Err(_) => {
            let value: Value = serde_yaml_ng::from_slice(input)?;
            build_document(value)
        }
    }
}

/// JSON is a YAML subset, so one YAML parse covers both. A JSON parse is
/// only attempted when YAML rejects something that looks like JSON.
fn parse_value(input: &str) -> Result<Value, SpecError> {
    match serde_yaml_ng::from_str::<Value>(input) {
        Ok(value) => Ok(value),
        Err(yaml_err) => {
            if input.trim_start().starts_with('{') {
                if let Ok(value) = serde_json::from_str::<Value>(input) {
                    return Ok(value);
                }
            }
            Err(SpecError::Parse(yaml_err))
        }
    }
}

fn build_document(root: Value) -> Result<SpecDocument, SpecError> {
    let root = match root {
        Value::Mapping(map) => map,
        other => {
            return Err(SpecError::shape(format!(
                "document root must be a mapping, found {}",
                describe(&other)
            )));
        }
    };

    validate_version(&root)?;

    let paths = match root.get("paths") {
        None => return Err(SpecError::shape("missing top-level `paths`")),
        Some(Value::Mapping(paths)) => paths,
        Some(other) => {
            return Err(SpecError::shape(format!(
                "`paths` must be a mapping, found {}",
                describe(other)
            )));
        }
    };

    let mut items = IndexMap::with_capacity(paths.len());
    for (key, item) in paths {
        let path = key.as_str().ok_or_else(|| {
            SpecError::shape(format!("path keys must be strings, found {}", describe(key)))
        })?;
        let item = item.as_mapping().ok_or_else(|| {
            SpecError::shape(format!(
                "path item `{path}` must be a mapping, found {}",
                describe(item)
            ))
        })?;

        let path_item = build_path_item(path, item)?;
        if path_item.operations.is_empty() {
            warn!("skipping path `{path}`: it declares no operations");
            continue;
        }
        items.insert(path.to_string(), path_item);
    }

    let document = SpecDocument {
        info: root.get("info").and_then(Value::as_mapping).map(build_info),
        base_path: first_server_path(&root),
        paths: items,
    };
    debug!("loaded spec with {} paths", document.paths.len());
    Ok(document)
}

fn validate_version(root: &Mapping) -> Result<(), SpecError> {
    if root.contains_key("swagger") {
        return Err(SpecError::shape(
            "Swagger 2.0 documents are not supported; convert to OpenAPI 3.x",
        ));
    }
    if let Some(version) = root.get("openapi").and_then(scalar_to_string) {
        if !version.starts_with("3.") {
            return Err(SpecError::shape(format!(
                "unsupported OpenAPI version: {version}"
            )));
        }
    }
    Ok(())
}

fn build_path_item(path: &str, item: &Mapping) -> Result<PathItem, SpecError> {
    let mut parameters = Vec::new();
    let mut operations: Vec<(HttpMethod, Value)> = Vec::new();

    for (key, value) in item {
        let Some(key) = key.as_str() else {
            warn!("ignoring non-string key {} on path `{path}`", describe(key));
            continue;
        };

        if key == "parameters" {
            match value {
                Value::Sequence(seq) => parameters = seq.clone(),
                other => warn!(
                    "ignoring `parameters` on path `{path}`: expected a list, found {}",
                    describe(other)
                ),
            }
            continue;
        }
        if PATH_ITEM_FIELDS.contains(&key) || key.starts_with("x-") {
            continue;
        }

        match HttpMethod::from_key(key) {
            Some(method) => {
                if operations.iter().any(|(m, _)| *m == method) {
                    return Err(SpecError::shape(format!(
                        "duplicate {} operation on path `{path}`",
                        method.as_str()
                    )));
                }
                operations.push((method, value.clone()));
            }
            None => warn!("ignoring unknown key `{key}` on path `{path}`"),
        }
    }

    Ok(PathItem {
        parameters,
        operations,
    })
}

fn build_info(info: &Mapping) -> Info {
    Info {
        title: info.get("title").and_then(scalar_to_string),
        version: info.get("version").and_then(scalar_to_string),
        description: info.get("description").and_then(scalar_to_string),
    }
}

fn first_server_path(root: &Mapping) -> Option<String> {
    let url = root
        .get("servers")?
        .as_sequence()?
        .first()?
        .as_mapping()?
        .get("url")?
        .as_str()?;
    server_base_path(url)
}

/// Extract the path component of a server URL.
///
/// - `https://api.example.com/v1/` → `/v1`
/// - `/api` → `/api`
/// - `https://api.example.com` → none
fn server_base_path(url: &str) -> Option<String> {
    let rest = match url.split_once("://") {
        Some((_, after_scheme)) => &after_scheme[after_scheme.find('/')?..],
        None => url,
    };
    let path = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if path.is_empty() || !path.starts_with('/') || path.contains('{') {
        return None;
    }
    Some(path.to_string())
}

/// Render a scalar as text (`version: 1.0` is a number in YAML).
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short human name for a value's kind, used in shape errors.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
