//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the pipeline needs from external systems.
//! The `fledge-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{CiProvider, GeneratedFile, Platform, ProjectConfig, RenderContext, StateManagement};
use crate::error::FledgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `fledge_adapters::filesystem::LocalFilesystem` (production)
/// - `fledge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Implementations are called from several write workers at once and must be
/// safe to share.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> FledgeResult<()>;

    /// Write content to a file, truncating any existing file.
    fn write_file(&self, path: &Path, content: &str) -> FledgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Fail unless `path` is an existing directory that accepts writes.
    fn ensure_writable(&self, path: &Path) -> FledgeResult<()>;
}

/// What a renderer produces, as declared by the renderer itself.
///
/// Callers that need to know which bundle sits behind a decorator ask for
/// `kind()`; decorators forward their inner renderer's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// A single-platform bundle for one state-management variant.
    Bundle {
        platform: Platform,
        state_management: StateManagement,
    },
    /// The multi-platform renderer.
    Universal,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundle {
                platform,
                state_management,
            } => write!(f, "{platform} bundle ({state_management})"),
            Self::Universal => f.write_str("universal bundle"),
        }
    }
}

/// Port for template rendering.
///
/// Implemented by:
/// - `fledge_adapters::catalog::BundleRenderer` (built-in catalog)
/// - `crate::application::CachingRenderer` (memoizing decorator)
///
/// `render` must be a pure function of the context: equal contexts produce
/// equal file lists.
pub trait TemplateRenderer: Send + Sync {
    /// Registry key. Unique within a registry.
    fn name(&self) -> &str;

    /// One-line human description.
    fn description(&self) -> &str;

    fn kind(&self) -> RendererKind;

    /// Produce the project files for `context`.
    ///
    /// Output is cached on the configuration alone, so content must not
    /// embed [`RenderContext::output_dir`]: a cache hit for another
    /// directory would otherwise carry the first directory's path.
    fn render(&self, context: &RenderContext) -> FledgeResult<Vec<GeneratedFile>>;
}

/// Port for persisting the project manifest after a successful write.
///
/// Implemented by:
/// - `fledge_adapters::manifest::YamlManifestStore`
#[cfg_attr(test, mockall::automock)]
pub trait ManifestStore: Send + Sync {
    /// Persist `config` into `output_dir`. Returns the manifest path.
    fn save(&self, config: &ProjectConfig, output_dir: &Path) -> FledgeResult<PathBuf>;
}

/// Port for emitting CI pipeline definitions.
///
/// Implemented by:
/// - `fledge_adapters::ci::TemplateCiGenerator`
#[cfg_attr(test, mockall::automock)]
pub trait CiGenerator: Send + Sync {
    /// Write the pipeline for `provider`. Returns the written file path.
    fn generate(&self, provider: CiProvider, context: &RenderContext) -> FledgeResult<PathBuf>;
}
