pub mod extract;
pub mod naming;

use log::debug;

use crate::error::SpecError;
use crate::ir::{IrInfo, IrSpec};
use crate::parse::spec::SpecDocument;

/// Run the extractor and identifier mapper over a loaded document.
pub fn transform(doc: &SpecDocument) -> Result<IrSpec, SpecError> {
    let operations = extract::extract(doc)?;
    let operations = naming::assign_names(operations);
    debug!("named {} operations", operations.len());

    let info = doc
        .info
        .as_ref()
        .map(|info| IrInfo {
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
        })
        .unwrap_or_default();

    Ok(IrSpec {
        info,
        base_path: doc.base_path.clone(),
        operations,
    })
}
