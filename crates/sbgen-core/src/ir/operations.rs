/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    /// Match a path item key, ignoring case.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(key))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Position in the canonical order: GET, POST, PUT, PATCH, DELETE, then
    /// everything else sharing the last slot (a stable sort keeps those in
    /// first-seen order).
    pub fn canonical_rank(&self) -> u8 {
        match self {
            HttpMethod::Get => 0,
            HttpMethod::Post => 1,
            HttpMethod::Put => 2,
            HttpMethod::Patch => 3,
            HttpMethod::Delete => 4,
            HttpMethod::Options | HttpMethod::Head | HttpMethod::Trace => 5,
        }
    }
}

/// Where a parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Body => "body",
        }
    }
}

/// Semantic type of a parameter. Anything unrecognised is `String`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeHint {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array(Box<TypeHint>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub type_hint: TypeHint,
    /// Schema `format`, e.g. `int64`.
    pub format: Option<String>,
    pub description: Option<String>,
}

/// The success response chosen for the stub's return type.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResponse {
    /// Status key as written, e.g. `200` or `2XX`.
    pub status: String,
    /// Body type; `None` when the response declares no content.
    pub body: Option<TypeHint>,
    pub format: Option<String>,
}

/// One (method, path) binding as extracted from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: HttpMethod,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub response: Option<SuccessResponse>,
}

/// An operation with its unique controller method name assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedOperation {
    pub method_name: String,
    pub operation: Operation,
}
