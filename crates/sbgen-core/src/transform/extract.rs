use log::{debug, warn};
use serde_yaml_ng::{Mapping, Value};

use crate::error::SpecError;
use crate::ir::{HttpMethod, Operation, Parameter, ParameterLocation, SuccessResponse, TypeHint};
use crate::parse::spec::SpecDocument;
use crate::parse::{describe, scalar_to_string};

/// Walk every path in document order and every method in canonical order,
/// producing one `Operation` per (path, method) pair.
pub fn extract(doc: &SpecDocument) -> Result<Vec<Operation>, SpecError> {
    let mut operations = Vec::new();

    for (path, item) in &doc.paths {
        let shared = extract_parameters(path, &item.parameters);

        let mut ordered: Vec<&(HttpMethod, Value)> = item.operations.iter().collect();
        ordered.sort_by_key(|(method, _)| method.canonical_rank());

        for (method, node) in ordered {
            let op = node.as_mapping().ok_or_else(|| {
                SpecError::Shape(format!(
                    "operation `{} {path}` must be an object, found {}",
                    method.as_str(),
                    describe(node)
                ))
            })?;
            operations.push(build_operation(*method, path, op, &shared));
        }
    }

    debug!("extracted {} operations", operations.len());
    Ok(operations)
}

fn build_operation(method: HttpMethod, path: &str, op: &Mapping, shared: &[Parameter]) -> Operation {
    let context = format!("{} {path}", method.as_str());

    let declared = match op.get("parameters") {
        Some(Value::Sequence(seq)) => extract_parameters(&context, seq),
        Some(other) => {
            warn!(
                "{context}: ignoring `parameters`, expected a list, found {}",
                describe(other)
            );
            Vec::new()
        }
        None => Vec::new(),
    };

    let mut parameters = merge_parameters(shared, declared);
    if let Some(body) = op.get("requestBody") {
        parameters.push(request_body_parameter(&context, body));
    }

    Operation {
        method,
        path: path.to_string(),
        operation_id: op
            .get("operationId")
            .and_then(scalar_to_string)
            .filter(|id| !id.trim().is_empty()),
        summary: string_field(op, "summary"),
        description: string_field(op, "description"),
        deprecated: op
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        tags: match op.get("tags") {
            Some(Value::Sequence(tags)) => tags.iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        },
        parameters,
        response: op
            .get("responses")
            .and_then(|responses| success_response(&context, responses)),
    }
}

/// Pick the response that types the stub: `200`, then `201`, then the first
/// other 2xx key in document order.
fn success_response(context: &str, responses: &Value) -> Option<SuccessResponse> {
    let Some(responses) = responses.as_mapping() else {
        warn!("{context}: ignoring `responses`, found {}", describe(responses));
        return None;
    };

    let candidates: Vec<(String, &Value)> = responses
        .iter()
        .filter_map(|(status, response)| Some((scalar_to_string(status)?, response)))
        .filter(|(status, _)| status.starts_with('2'))
        .collect();
    let (status, response) = ["200", "201"]
        .iter()
        .find_map(|preferred| candidates.iter().find(|(status, _)| status.as_str() == *preferred))
        .or_else(|| candidates.first())?;

    let mut success = SuccessResponse {
        status: status.clone(),
        body: None,
        format: None,
    };

    let Some(map) = response.as_mapping().filter(|map| !map.contains_key("$ref")) else {
        warn!("{context}: response `{status}` is not inline; typed as Object");
        success.body = Some(TypeHint::Object);
        return Some(success);
    };

    let schema = map
        .get("content")
        .and_then(Value::as_mapping)
        .and_then(|content| {
            content
                .get("application/json")
                .or_else(|| content.iter().next().map(|(_, media)| media))
        })
        .and_then(Value::as_mapping)
        .and_then(|media| media.get("schema"));

    match schema {
        Some(schema) if is_ref(schema) => success.body = Some(TypeHint::Object),
        Some(schema) => {
            let (hint, format) = schema_hint(schema);
            success.body = Some(object_for_ref_items(schema, hint));
            success.format = format;
        }
        // A media type without a schema still has a body of unknown shape.
        None if map.get("content").and_then(Value::as_mapping).is_some_and(|c| !c.is_empty()) => {
            success.body = Some(TypeHint::Object)
        }
        None => {}
    }
    Some(success)
}

/// Arrays of named schemas are lists of objects in a response.
fn object_for_ref_items(schema: &Value, hint: TypeHint) -> TypeHint {
    let ref_items = schema
        .as_mapping()
        .and_then(|map| map.get("items"))
        .is_some_and(is_ref);
    match hint {
        TypeHint::Array(_) if ref_items => TypeHint::Array(Box::new(TypeHint::Object)),
        other => other,
    }
}

/// Operation-level parameters override path-level ones with the same name
/// and location; new ones are appended.
fn merge_parameters(shared: &[Parameter], declared: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged = shared.to_vec();
    for param in declared {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

fn extract_parameters(context: &str, entries: &[Value]) -> Vec<Parameter> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parameter_from_value(context, index, entry))
        .collect()
}

fn parameter_from_value(context: &str, index: usize, entry: &Value) -> Parameter {
    let positional = || format!("param{}", index + 1);

    let Some(map) = entry.as_mapping() else {
        return fallback_parameter(context, positional(), "entry is not an object");
    };

    if let Some(reference) = string_field(map, "$ref") {
        let name = reference
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(positional);
        return fallback_parameter(context, name, "references are not resolved");
    }

    let name = match string_field(map, "name") {
        Some(name) if !name.is_empty() => name,
        _ => return fallback_parameter(context, positional(), "missing `name`"),
    };

    let location = match string_field(map, "in").as_deref() {
        Some("path") => ParameterLocation::Path,
        Some("query") => ParameterLocation::Query,
        Some("header") => ParameterLocation::Header,
        Some("cookie") => ParameterLocation::Cookie,
        other => {
            let reason = format!("unsupported location {other:?}");
            return fallback_parameter(context, name, &reason);
        }
    };

    let (type_hint, format) = match map.get("schema") {
        Some(schema) if is_ref(schema) => {
            warn!("{context}: parameter `{name}` has a $ref schema; typed as string");
            (TypeHint::String, None)
        }
        Some(schema) => schema_hint(schema),
        None => (TypeHint::String, None),
    };

    Parameter {
        required: location == ParameterLocation::Path
            || map.get("required").and_then(Value::as_bool).unwrap_or(false),
        name,
        location,
        type_hint,
        format,
        description: string_field(map, "description"),
    }
}

/// The deliberate leniency path: any parameter shape we cannot interpret
/// becomes an optional string query parameter instead of failing the run.
pub(crate) fn fallback_parameter(context: &str, name: String, reason: &str) -> Parameter {
    warn!("{context}: parameter `{name}`: {reason}; using an optional string query parameter");
    Parameter {
        name,
        location: ParameterLocation::Query,
        required: false,
        type_hint: TypeHint::String,
        format: None,
        description: None,
    }
}

/// The request body becomes a trailing `body` parameter.
fn request_body_parameter(context: &str, body: &Value) -> Parameter {
    let mut param = Parameter {
        name: "body".to_string(),
        location: ParameterLocation::Body,
        required: false,
        type_hint: TypeHint::String,
        format: None,
        description: None,
    };

    let Some(map) = body.as_mapping() else {
        warn!("{context}: `requestBody` is {}; using a raw string body", describe(body));
        return param;
    };
    if map.contains_key("$ref") {
        warn!("{context}: `requestBody` is a reference; using a raw string body");
        return param;
    }

    param.required = map.get("required").and_then(Value::as_bool).unwrap_or(false);
    param.description = string_field(map, "description");

    let schema = map
        .get("content")
        .and_then(Value::as_mapping)
        .and_then(|content| {
            content
                .get("application/json")
                .or_else(|| content.iter().next().map(|(_, media)| media))
        })
        .and_then(Value::as_mapping)
        .and_then(|media| media.get("schema"));

    match schema {
        // Named schemas are not generated, so the body binds as a generic object.
        Some(schema) if is_ref(schema) => param.type_hint = TypeHint::Object,
        Some(schema) => (param.type_hint, param.format) = schema_hint(schema),
        None => {}
    }
    param
}

fn schema_hint(schema: &Value) -> (TypeHint, Option<String>) {
    let Some(map) = schema.as_mapping() else {
        return (TypeHint::String, None);
    };

    let hint = match map.get("type") {
        Some(Value::String(name)) => type_hint(name, map),
        // OpenAPI 3.1 style: `type: [integer, "null"]`
        Some(Value::Sequence(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null")
            .map(|name| type_hint(name, map))
            .unwrap_or_default(),
        _ if map.contains_key("properties") => TypeHint::Object,
        _ => TypeHint::String,
    };
    (hint, string_field(map, "format"))
}

fn type_hint(name: &str, schema: &Mapping) -> TypeHint {
    match name {
        "integer" => TypeHint::Integer,
        "number" => TypeHint::Number,
        "boolean" => TypeHint::Boolean,
        "object" => TypeHint::Object,
        "array" => {
            let items = schema
                .get("items")
                .filter(|items| !is_ref(items))
                .map(|items| schema_hint(items).0)
                .unwrap_or_default();
            TypeHint::Array(Box::new(items))
        }
        _ => TypeHint::String,
    }
}

fn is_ref(value: &Value) -> bool {
    value
        .as_mapping()
        .is_some_and(|map| map.contains_key("$ref"))
}

fn string_field(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn extract_yaml(yaml: &str) -> Vec<Operation> {
        extract(&parse::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_schema_hint_primitives() {
        let schema: Value = serde_yaml_ng::from_str("type: integer\nformat: int64").unwrap();
        assert_eq!(
            schema_hint(&schema),
            (TypeHint::Integer, Some("int64".to_string()))
        );

        let schema: Value = serde_yaml_ng::from_str("type: [boolean, 'null']").unwrap();
        assert_eq!(schema_hint(&schema).0, TypeHint::Boolean);

        let schema: Value = serde_yaml_ng::from_str("properties: {a: {type: string}}").unwrap();
        assert_eq!(schema_hint(&schema).0, TypeHint::Object);
    }

    #[test]
    fn test_schema_hint_array() {
        let schema: Value = serde_yaml_ng::from_str("type: array\nitems: {type: number}").unwrap();
        assert_eq!(
            schema_hint(&schema).0,
            TypeHint::Array(Box::new(TypeHint::Number))
        );

        let schema: Value =
            serde_yaml_ng::from_str("type: array\nitems: {$ref: '#/components/schemas/Pet'}")
                .unwrap();
        assert_eq!(
            schema_hint(&schema).0,
            TypeHint::Array(Box::new(TypeHint::String))
        );
    }

    #[test]
    fn test_success_response_prefers_200_then_201() {
        let ops = extract_yaml(
            r#"
paths:
  /pets:
    get:
      responses:
        '201':
          content:
            application/json:
              schema: {type: string}
        200:
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Pet'}
        default:
          description: error
    post:
      responses:
        '202':
          content:
            text/plain:
              schema: {type: integer, format: int64}
"#,
        );
        let get = ops[0].response.as_ref().unwrap();
        assert_eq!(get.status, "200");
        assert_eq!(get.body, Some(TypeHint::Array(Box::new(TypeHint::Object))));

        let post = ops[1].response.as_ref().unwrap();
        assert_eq!(post.status, "202");
        assert_eq!(post.body, Some(TypeHint::Integer));
        assert_eq!(post.format.as_deref(), Some("int64"));
    }

    #[test]
    fn test_success_response_shapes() {
        let ops = extract_yaml(
            r#"
paths:
  /a:
    get:
      responses:
        '204': {description: gone}
  /b:
    get:
      responses:
        '200': {$ref: '#/components/responses/Pet'}
  /c:
    get:
      responses:
        '200':
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
  /d:
    get:
      responses:
        '404': {description: missing}
"#,
        );
        let a = ops[0].response.as_ref().unwrap();
        assert_eq!(a.status, "204");
        assert_eq!(a.body, None);
        assert_eq!(ops[1].response.as_ref().unwrap().body, Some(TypeHint::Object));
        assert_eq!(ops[2].response.as_ref().unwrap().body, Some(TypeHint::Object));
        assert!(ops[3].response.is_none());
    }

    #[test]
    fn test_tags_are_carried() {
        let ops = extract_yaml("paths:\n  /a:\n    get:\n      tags: [pets, store]\n");
        assert_eq!(ops[0].tags, ["pets", "store"]);
    }

    #[test]
    fn test_unknown_type_is_string() {
        let schema: Value = serde_yaml_ng::from_str("type: uuid").unwrap();
        assert_eq!(schema_hint(&schema).0, TypeHint::String);
    }

    #[test]
    fn test_path_parameters_are_required() {
        let ops = extract_yaml(
            r#"
paths:
  /pets/{id}:
    get:
      parameters:
        - name: id
          in: path
          schema: {type: integer}
"#,
        );
        let id = &ops[0].parameters[0];
        assert!(id.required);
        assert_eq!(id.location, ParameterLocation::Path);
        assert_eq!(id.type_hint, TypeHint::Integer);
    }

    #[test]
    fn test_operation_parameters_override_path_parameters() {
        let ops = extract_yaml(
            r#"
paths:
  /pets:
    parameters:
      - {name: limit, in: query, schema: {type: string}}
      - {name: X-Trace, in: header}
    get:
      parameters:
        - {name: limit, in: query, required: true, schema: {type: integer}}
"#,
        );
        let params = &ops[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "limit");
        assert_eq!(params[0].type_hint, TypeHint::Integer);
        assert!(params[0].required);
        assert_eq!(params[1].name, "X-Trace");
    }

    #[test]
    fn test_request_body_becomes_body_parameter() {
        let ops = extract_yaml(
            r#"
paths:
  /pets:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema: {$ref: '#/components/schemas/Pet'}
"#,
        );
        let body = ops[0].parameters.last().unwrap();
        assert_eq!(body.name, "body");
        assert_eq!(body.location, ParameterLocation::Body);
        assert!(body.required);
        assert_eq!(body.type_hint, TypeHint::Object);
    }

    #[test]
    fn test_request_body_ref_falls_back_to_string() {
        let ops = extract_yaml(
            r#"
paths:
  /pets:
    post:
      requestBody: {$ref: '#/components/requestBodies/Pet'}
"#,
        );
        let body = &ops[0].parameters[0];
        assert_eq!(body.location, ParameterLocation::Body);
        assert_eq!(body.type_hint, TypeHint::String);
    }

    #[test]
    fn test_fallback_parameter_for_non_object_entry() {
        let ops = extract_yaml(
            r#"
paths:
  /pets:
    get:
      parameters:
        - just-a-string
        - {in: query}
"#,
        );
        let params = &ops[0].parameters;
        assert_eq!(params[0].name, "param1");
        assert_eq!(params[1].name, "param2");
        assert!(params.iter().all(|p| p.type_hint == TypeHint::String));
        assert!(params.iter().all(|p| p.location == ParameterLocation::Query));
    }

    #[test]
    fn test_empty_operation_id_is_absent() {
        let ops = extract_yaml("paths:\n  /a:\n    get: {operationId: '  '}\n");
        assert_eq!(ops[0].operation_id, None);
    }

    #[test]
    fn test_deprecated_and_summary() {
        let ops =
            extract_yaml("paths:\n  /a:\n    get: {summary: List things, deprecated: true}\n");
        assert!(ops[0].deprecated);
        assert_eq!(ops[0].summary.as_deref(), Some("List things"));
    }
}
