use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use sbgen_core::config::ProjectConfig;
use sbgen_core::ir::IrSpec;
use sbgen_core::parse::spec::SpecDocument;
use sbgen_core::{CodeGenerator, GeneratedFile, parse, transform};

use crate::error::{GenerateError, WriteError};
use crate::generator::SpringBootGenerator;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    /// Files written, in artifact order.
    pub written: Vec<PathBuf>,
    /// Number of controller method stubs emitted.
    pub operations: usize,
}

/// Load a spec from disk and emit the project under `output_dir`.
pub fn generate(
    input: &Path,
    output_dir: &Path,
    config: &ProjectConfig,
) -> Result<GenerationReport, GenerateError> {
    let doc = parse::load(input)?;
    generate_document(&doc, output_dir, config)
}

/// Emit the project for an already loaded document.
///
/// Nothing is written unless extraction and every render succeed.
pub fn generate_document(
    doc: &SpecDocument,
    output_dir: &Path,
    config: &ProjectConfig,
) -> Result<GenerationReport, GenerateError> {
    let ir = transform::transform(doc)?;
    debug!("extracted {} operations", ir.operations.len());

    let files = render_project(&ir, config)?;
    let written = write_artifacts(output_dir, &files)?;

    Ok(GenerationReport {
        output_dir: output_dir.to_path_buf(),
        written,
        operations: ir.operations.len(),
    })
}

/// Render all artifacts in memory.
pub fn render_project(
    ir: &IrSpec,
    config: &ProjectConfig,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    SpringBootGenerator.generate(ir, config)
}

/// Write each file under `root`, creating parent directories and
/// overwriting existing files. Stops at the first failure.
pub fn write_artifacts(root: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let dest = file
            .path
            .split('/')
            .fold(root.to_path_buf(), |acc, part| acc.join(part));

        let result = match dest.parent() {
            Some(parent) => fs::create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|()| fs::write(&dest, &file.content));

        if let Err(source) = result {
            return Err(WriteError {
                artifact: file.path.clone(),
                path: dest,
                written,
                source,
            });
        }
        info!("wrote {}", dest.display());
        written.push(dest);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_write_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c.txt");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "old contents that are longer").unwrap();

        let written = write_artifacts(dir.path(), &[file("a/b/c.txt", "new")]).unwrap();
        assert_eq!(written, [target.clone()]);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_write_error_reports_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("src"), "not a directory").unwrap();

        let err = write_artifacts(
            dir.path(),
            &[file("pom.xml", "<project/>"), file("src/main/App.java", "class App {}")],
        )
        .unwrap_err();
        assert_eq!(err.artifact, "src/main/App.java");
        assert_eq!(err.written, [dir.path().join("pom.xml")]);
        assert!(dir.path().join("pom.xml").is_file());
    }
}
