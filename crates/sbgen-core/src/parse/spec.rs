use indexmap::IndexMap;
use serde_yaml_ng::Value;

use crate::ir::HttpMethod;

/// Info object describing the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// The normalized input document.
///
/// Only the parts the generator consumes are typed; operation and parameter
/// bodies stay as raw values and are walked by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    pub info: Option<Info>,
    /// Path component of `servers[0].url`, without a trailing slash.
    pub base_path: Option<String>,
    /// Path pattern to path item, in document order.
    pub paths: IndexMap<String, PathItem>,
}

/// A path item. Holds at least one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    /// Parameters shared by every operation under this path.
    pub parameters: Vec<Value>,
    /// Operations in document order.
    pub operations: Vec<(HttpMethod, Value)>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Value> {
        self.operations
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, op)| op)
    }
}
