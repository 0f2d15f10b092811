//! Fledge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the Fledge
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            fledge-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          GenerationService              │
//! │ validate → select → render → write      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Registry · RenderCache · Writer       │
//! │   Ports: Filesystem, TemplateRenderer,  │
//! │          ManifestStore, CiGenerator     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      fledge-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fledge_core::prelude::*;
//!
//! # fn run(registry: TemplateRegistry, fs: Arc<dyn Filesystem>) -> FledgeResult<()> {
//! let config = ProjectConfig::builder()
//!     .app_name("demo")
//!     .platform(Platform::Mobile)
//!     .state_management(StateManagement::Provider)
//!     .build()?;
//!
//! let service = GenerationService::new(Arc::new(registry), fs, Arc::new(RenderCache::new()));
//! let report = service.generate(config, "./demo")?;
//! assert!(report.is_complete());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CachingRenderer, GenerationReport, GenerationService, RenderCache, TemplateRegistry,
        ports::{CiGenerator, Filesystem, ManifestStore, RendererKind, TemplateRenderer},
    };
    pub use crate::domain::{
        CiProvider, FeatureFlags, GeneratedFile, Platform, ProjectConfig, RenderContext,
        StateManagement,
    };
    pub use crate::error::{FledgeError, FledgeResult, ResultExt};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
