use std::collections::HashSet;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase};
use log::debug;

use crate::ir::{HttpMethod, NamedOperation, Operation};

/// Package used when neither the config nor the spec title yields one.
pub const DEFAULT_PACKAGE: &str = "com.example.generated";

/// Artifact id used when the spec has no usable title.
pub const DEFAULT_ARTIFACT_ID: &str = "generated-service";

/// Java keywords and literals that cannot be used as identifiers.
const JAVA_RESERVED: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// `java.lang.Object` methods a controller method must not override or overload.
const OBJECT_METHODS: &[&str] = &[
    "equals", "finalize", "getClass", "hashCode", "notify", "notifyAll", "toString", "wait",
];

/// Give every operation a unique controller method name, in extraction order.
///
/// A usable `operationId` wins; otherwise the name is derived from the route.
/// Collisions get `_2`, `_3`, ... without touching names assigned earlier.
pub fn assign_names(operations: Vec<Operation>) -> Vec<NamedOperation> {
    let mut taken = HashSet::with_capacity(operations.len());

    operations
        .into_iter()
        .map(|operation| {
            let base = operation
                .operation_id
                .as_deref()
                .and_then(java_identifier)
                .unwrap_or_else(|| route_to_name(operation.method, &operation.path));
            let base = avoid_object_methods(base);
            let method_name = claim_unique(&mut taken, &base);
            if method_name != base {
                debug!(
                    "{} {}: `{base}` already taken, using `{method_name}`",
                    operation.method.as_str(),
                    operation.path
                );
            }
            NamedOperation {
                method_name,
                operation,
            }
        })
        .collect()
}

/// Reserve `base` in `taken`, appending `_2`, `_3`, ... until it is free.
pub fn claim_unique(taken: &mut HashSet<String>, base: &str) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}_{counter}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Derive a lowerCamelCase method name from HTTP method + path.
///
/// Examples:
/// - `GET /pets` → `getPets`
/// - `DELETE /pets/{id}` → `deletePetsById`
/// - `GET /users/{userId}/posts` → `getUsersByUserIdPosts`
/// - `GET /files/{a}-{b}` → `getFilesByParam`
/// - `GET /` → `get`
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let mut name = method.as_lower().to_string();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        name.push_str(&segment_to_pascal(segment));
    }
    avoid_reserved(name)
}

fn segment_to_pascal(segment: &str) -> String {
    let mut literal = String::new();
    let mut placeholders = Vec::new();
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        literal.push(' ');
        match rest[open..].find('}') {
            Some(close) => {
                placeholders.push(&rest[open + 1..open + close]);
                rest = &rest[open + close + 1..];
            }
            None => {
                // Unbalanced brace: keep the remainder as plain text.
                literal.push_str(&rest[open + 1..]);
                rest = "";
            }
        }
    }
    literal.push_str(rest);

    let mut out = sanitize_identifier(&literal)
        .map(|s| s.to_pascal_case())
        .unwrap_or_default();

    match placeholders.as_slice() {
        [] => {}
        [single] => {
            out.push_str("By");
            out.push_str(
                &sanitize_identifier(single)
                    .map(|s| s.to_pascal_case())
                    .unwrap_or_else(|| "Param".to_string()),
            );
        }
        _ => out.push_str("ByParam"),
    }
    out
}

/// Turn arbitrary text into a lowerCamelCase Java identifier.
///
/// Returns `None` when the text contains nothing usable.
pub fn java_identifier(raw: &str) -> Option<String> {
    let camel = sanitize_identifier(raw)?.to_lower_camel_case();
    if camel.is_empty() {
        return None;
    }
    Some(avoid_reserved(prefix_leading_digit(camel)))
}

/// Turn arbitrary text into a PascalCase Java type name.
pub fn java_type_name(raw: &str) -> Option<String> {
    let pascal = sanitize_identifier(raw)?.to_pascal_case();
    if pascal.is_empty() {
        return None;
    }
    Some(prefix_leading_digit(pascal))
}

/// Resolve the Java package: an explicit value wins, then the spec title.
///
/// - `Some("com.Acme.pet-store")` → `com.acme.petstore`
/// - title `Pet Store API` → `com.example.petstoreapi`
pub fn package_name(explicit: Option<&str>, title: Option<&str>) -> String {
    if let Some(explicit) = explicit {
        let sanitized = sanitize_package(explicit);
        if !sanitized.is_empty() {
            return sanitized;
        }
        log::warn!("package name `{explicit}` has no usable segments; deriving one instead");
    }

    match title.and_then(package_segment) {
        Some(segment) => format!("com.example.{segment}"),
        None => DEFAULT_PACKAGE.to_string(),
    }
}

/// Default Maven groupId: the package without its last segment.
pub fn group_id(package: &str) -> String {
    match package.rsplit_once('.') {
        Some((group, _)) => group.to_string(),
        None => package.to_string(),
    }
}

/// Resolve the Maven artifact id: explicit value, kebab-cased title, or default.
pub fn artifact_id(explicit: Option<&str>, title: Option<&str>) -> String {
    explicit
        .or(title)
        .map(|raw| {
            raw.to_kebab_case()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .map(|id| id.trim_matches('-').to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_ARTIFACT_ID.to_string())
}

fn sanitize_package(raw: &str) -> String {
    raw.split('.')
        .filter_map(package_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn package_segment(raw: &str) -> Option<String> {
    let segment: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if segment.is_empty() {
        return None;
    }
    Some(avoid_reserved(prefix_leading_digit(segment)))
}

fn prefix_leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Suffix Java keywords and literals with `_`.
pub fn avoid_reserved(name: String) -> String {
    if JAVA_RESERVED.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Suffix names inherited from `java.lang.Object` with `_`.
pub fn avoid_object_methods(name: String) -> String {
    if OBJECT_METHODS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Replace every run of characters outside `[A-Za-z0-9]` with a single `_`.
fn sanitize_identifier(name: &str) -> Option<String> {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() { None } else { Some(result) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(method: HttpMethod, path: &str, operation_id: Option<&str>) -> Operation {
        Operation {
            method,
            path: path.to_string(),
            operation_id: operation_id.map(str::to_string),
            summary: None,
            description: None,
            deprecated: false,
            tags: Vec::new(),
            parameters: Vec::new(),
            response: None,
        }
    }

    #[test]
    fn test_route_to_name_single_placeholder() {
        assert_eq!(route_to_name(HttpMethod::Delete, "/pets/{id}"), "deletePetsById");
        assert_eq!(route_to_name(HttpMethod::Get, "/users/{name}"), "getUsersByName");
    }

    #[test]
    fn test_route_to_name_collection() {
        assert_eq!(route_to_name(HttpMethod::Get, "/pets"), "getPets");
        assert_eq!(route_to_name(HttpMethod::Post, "/pet-owners"), "postPetOwners");
    }

    #[test]
    fn test_route_to_name_nested() {
        assert_eq!(
            route_to_name(HttpMethod::Get, "/users/{userId}/posts"),
            "getUsersByUserIdPosts"
        );
    }

    #[test]
    fn test_route_to_name_multiple_placeholders_in_segment() {
        assert_eq!(route_to_name(HttpMethod::Get, "/files/{a}-{b}"), "getFilesByParam");
    }

    #[test]
    fn test_route_to_name_placeholder_with_suffix() {
        assert_eq!(
            route_to_name(HttpMethod::Get, "/reports/{file}.json"),
            "getReportsJsonByFile"
        );
    }

    #[test]
    fn test_route_to_name_root_and_empty_segments() {
        assert_eq!(route_to_name(HttpMethod::Get, "/"), "get");
        assert_eq!(route_to_name(HttpMethod::Put, "//pets//"), "putPets");
    }

    #[test]
    fn test_java_identifier_normalizes_case() {
        assert_eq!(java_identifier("getPet").as_deref(), Some("getPet"));
        assert_eq!(java_identifier("get_pet").as_deref(), Some("getPet"));
        assert_eq!(java_identifier("GetPet").as_deref(), Some("getPet"));
        assert_eq!(java_identifier("pets.list-all").as_deref(), Some("petsListAll"));
    }

    #[test]
    fn test_java_identifier_leading_digit() {
        assert_eq!(java_identifier("3dModel").as_deref(), Some("_3dModel"));
    }

    #[test]
    fn test_java_identifier_reserved_word() {
        assert_eq!(java_identifier("new").as_deref(), Some("new_"));
        assert_eq!(java_identifier("class").as_deref(), Some("class_"));
    }

    #[test]
    fn test_java_identifier_drops_non_ascii() {
        assert_eq!(java_identifier("\u{663}items").as_deref(), Some("items"));
        assert_eq!(java_identifier("get\u{b2}").as_deref(), Some("get"));
        assert_eq!(java_identifier("caf\u{e9} list").as_deref(), Some("cafList"));
        assert_eq!(java_identifier("\u{663}\u{664}"), None);
    }

    #[test]
    fn test_assign_names_avoids_object_methods() {
        let named = assign_names(vec![
            op(HttpMethod::Get, "/class", None),
            op(HttpMethod::Get, "/a", Some("toString")),
            op(HttpMethod::Get, "/b", Some("hash_code")),
            op(HttpMethod::Post, "/c", Some("equals")),
            op(HttpMethod::Get, "/d", Some("waitFor")),
        ]);
        let names: Vec<_> = named.iter().map(|n| n.method_name.as_str()).collect();
        assert_eq!(names, ["getClass_", "toString_", "hashCode_", "equals_", "waitFor"]);
    }

    #[test]
    fn test_java_identifier_unusable() {
        assert_eq!(java_identifier("!!!"), None);
        assert_eq!(java_identifier(""), None);
    }

    #[test]
    fn test_assign_names_prefers_operation_id() {
        let named = assign_names(vec![
            op(HttpMethod::Get, "/pets/{id}", Some("getPet")),
            op(HttpMethod::Delete, "/pets/{id}", None),
        ]);
        assert_eq!(named[0].method_name, "getPet");
        assert_eq!(named[1].method_name, "deletePetsById");
    }

    #[test]
    fn test_assign_names_unusable_operation_id_falls_back_to_route() {
        let named = assign_names(vec![op(HttpMethod::Get, "/pets", Some("***"))]);
        assert_eq!(named[0].method_name, "getPets");
    }

    #[test]
    fn test_assign_names_collisions_are_suffixed_in_order() {
        let named = assign_names(vec![
            op(HttpMethod::Get, "/a", Some("listPets")),
            op(HttpMethod::Get, "/b", Some("list_pets")),
            op(HttpMethod::Get, "/c", Some("ListPets")),
        ]);
        let names: Vec<_> = named.iter().map(|n| n.method_name.as_str()).collect();
        assert_eq!(names, ["listPets", "listPets_2", "listPets_3"]);
    }

    #[test]
    fn test_claim_unique_skips_taken_suffix() {
        let mut taken = HashSet::new();
        taken.insert("a".to_string());
        taken.insert("a_2".to_string());
        assert_eq!(claim_unique(&mut taken, "a"), "a_3");
    }

    #[test]
    fn test_package_name() {
        assert_eq!(
            package_name(Some("com.Acme.pet-store"), None),
            "com.acme.petstore"
        );
        assert_eq!(
            package_name(None, Some("Pet Store API")),
            "com.example.petstoreapi"
        );
        assert_eq!(package_name(None, None), DEFAULT_PACKAGE);
        assert_eq!(package_name(Some("..."), Some("!!")), DEFAULT_PACKAGE);
        assert_eq!(package_name(Some("org.new.2go"), None), "org.new_._2go");
    }

    #[test]
    fn test_group_id() {
        assert_eq!(group_id("com.example.pets"), "com.example");
        assert_eq!(group_id("pets"), "pets");
    }

    #[test]
    fn test_artifact_id() {
        assert_eq!(artifact_id(None, Some("Pet Store API")), "pet-store-api");
        assert_eq!(artifact_id(Some("custom-svc"), Some("Ignored")), "custom-svc");
        assert_eq!(artifact_id(None, None), DEFAULT_ARTIFACT_ID);
        assert_eq!(artifact_id(None, Some("???")), DEFAULT_ARTIFACT_ID);
    }

    #[test]
    fn test_java_type_name() {
        assert_eq!(java_type_name("pet store").as_deref(), Some("PetStore"));
        assert_eq!(java_type_name("2fa").as_deref(), Some("_2fa"));
        assert_eq!(java_type_name("--"), None);
    }
}
