//! Infrastructure adapters for Fledge.
//!
//! This crate implements the ports defined in `fledge-core::application::ports`
//! and ships the built-in renderer catalog. All I/O lives here.

pub mod catalog;
pub mod ci;
pub mod filesystem;
pub mod manifest;

// Re-export commonly used adapters
pub use catalog::{BundleRenderer, builtin_registry};
pub use ci::TemplateCiGenerator;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::{MANIFEST_FILE, Manifest, YamlManifestStore};
