pub mod config;
pub mod generated_file;
pub mod render_context;

pub use crate::domain::DomainError;
pub use config::{ProjectConfig, ProjectConfigBuilder};
pub use generated_file::GeneratedFile;
pub use render_context::RenderContext;
