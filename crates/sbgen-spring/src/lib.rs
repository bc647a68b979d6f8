pub mod context;
pub mod error;
pub mod event;
pub mod generator;
pub mod project;
pub mod renderer;
pub mod type_mapper;

pub use error::{GenerateError, TemplateError, WriteError};
pub use generator::SpringBootGenerator;
pub use project::{GenerationReport, generate, generate_document, write_artifacts};
