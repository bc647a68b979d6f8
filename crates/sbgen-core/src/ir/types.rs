use super::operations::NamedOperation;

/// The generator-ready view of a spec: metadata plus named operations in
/// canonical order.
#[derive(Debug, Clone)]
pub struct IrSpec {
    pub info: IrInfo,
    /// Path component of the first server URL, e.g. `/v1`.
    pub base_path: Option<String>,
    pub operations: Vec<NamedOperation>,
}

/// API metadata, read opportunistically from `info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}
