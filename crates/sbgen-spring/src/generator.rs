use sbgen_core::config::ProjectConfig;
use sbgen_core::ir::IrSpec;
use sbgen_core::{CodeGenerator, GeneratedFile};

use crate::context::GenerationContext;
use crate::error::GenerateError;
use crate::renderer::{self, TemplateRenderer};

/// Spring Boot project skeleton generator.
///
/// Produces, in order: `pom.xml`, the application class, the controller,
/// and `application.properties`. Every artifact is rendered before the
/// caller writes anything.
pub struct SpringBootGenerator;

impl CodeGenerator for SpringBootGenerator {
    type Config = ProjectConfig;
    type Error = GenerateError;

    fn generate(
        &self,
        ir: &IrSpec,
        config: &ProjectConfig,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        let ctx = GenerationContext::build(ir, config)?;
        let renderer = TemplateRenderer::new()?;
        let java_dir = format!("src/main/java/{}", ctx.package_path);

        let plan = [
            ("pom.xml".to_string(), renderer::POM),
            (
                format!("{java_dir}/{}.java", ctx.application_class),
                renderer::APPLICATION,
            ),
            (
                format!("{java_dir}/{}.java", ctx.controller_class),
                renderer::CONTROLLER,
            ),
            (
                "src/main/resources/application.properties".to_string(),
                renderer::PROPERTIES,
            ),
        ];

        let mut files = Vec::with_capacity(plan.len());
        for (path, template) in plan {
            log::debug!("rendering {path}");
            files.push(GeneratedFile {
                content: renderer.render(template, &ctx)?,
                path,
            });
        }
        Ok(files)
    }
}
