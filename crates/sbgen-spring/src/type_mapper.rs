use sbgen_core::ir::TypeHint;

/// Map a `TypeHint` (plus schema format) to its boxed Java type.
pub fn java_type(hint: &TypeHint, format: Option<&str>) -> String {
    match hint {
        TypeHint::String => "String".to_string(),
        TypeHint::Integer => match format {
            Some("int64") => "Long".to_string(),
            _ => "Integer".to_string(),
        },
        TypeHint::Number => match format {
            Some("float") => "Float".to_string(),
            _ => "Double".to_string(),
        },
        TypeHint::Boolean => "Boolean".to_string(),
        TypeHint::Object => "Object".to_string(),
        TypeHint::Array(inner) => format!("List<{}>", java_type(inner, None)),
    }
}

/// Whether the Java type needs `java.util.List`.
pub fn needs_list_import(hint: &TypeHint) -> bool {
    matches!(hint, TypeHint::Array(_))
}
