//! Subcommand handlers. Each turns parsed arguments into calls on the
//! generation service and renders the outcome.

use std::sync::Arc;

use fledge_adapters::{LocalFilesystem, builtin_registry};
use fledge_core::application::{GenerationService, RenderCache};

pub mod completions;
pub mod generate;
pub mod list;

/// A service over the built-in catalog and the local disk, without the
/// optional manifest and CI stages.
pub(crate) fn base_service(filesystem: Arc<LocalFilesystem>) -> GenerationService {
    GenerationService::new(
        Arc::new(builtin_registry()),
        filesystem,
        Arc::new(RenderCache::new()),
    )
}
