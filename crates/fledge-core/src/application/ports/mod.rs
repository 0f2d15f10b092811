//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the pipeline
//! needs from the outside world. Adapters in `fledge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the pipeline, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Configuration → generated files
//!   - `ManifestStore`: Manifest persistence after generation
//!   - `CiGenerator`: CI pipeline definitions after generation

pub mod output;

pub use output::{CiGenerator, Filesystem, ManifestStore, RendererKind, TemplateRenderer};

#[cfg(test)]
pub use output::{MockCiGenerator, MockManifestStore};
