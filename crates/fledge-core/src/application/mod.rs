//! Application layer for Fledge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService)
//! - **Registry, cache, writer**: the pipeline stages the service drives
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Business rules live in `crate::domain`.

pub mod cache;
pub mod error;
pub mod ports;
pub mod registry;
pub mod services;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheStats, CachingRenderer, Fingerprint, RenderCache};
pub use registry::{TemplateRegistry, UNIVERSAL_RENDERER, selection_key};
pub use services::{
    GenerationPlan, GenerationReport, GenerationService, RendererInfo, default_concurrency,
};
pub use writer::{
    OperationOutcome, ParallelFileWriter, WriteFailure, WriteOperation, WriteOutcome, WriteReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CiGenerator, Filesystem, ManifestStore, RendererKind, TemplateRenderer};

pub use error::ApplicationError;

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
