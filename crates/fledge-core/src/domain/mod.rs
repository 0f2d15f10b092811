// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Fledge.
//!
//! This module contains pure data and rules with no I/O. Rendering, caching
//! and writing are orchestrated by the application layer through ports.
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: configuration, contexts and files are values
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    config::{HasName, NoName, ProjectConfig, ProjectConfigBuilder},
    generated_file::{GeneratedFile, validate_relative_path},
    render_context::RenderContext,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{CiProvider, FeatureFlags, Platform, StateManagement};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    // ========================================================================
    // Config → Context
    // ========================================================================

    #[test]
    fn context_shares_the_config() {
        let config = Arc::new(
            ProjectConfig::builder()
                .app_name("demo")
                .platform(Platform::Mobile)
                .build()
                .unwrap(),
        );
        let ctx = RenderContext::new(Arc::clone(&config), "/tmp/demo");

        assert!(Arc::ptr_eq(&ctx.shared_config(), &config));
        assert_eq!(ctx.config().app_name(), "demo");
    }

    #[test]
    fn validator_checks_name_and_platforms() {
        let config = ProjectConfig::builder()
            .app_name("9lives")
            .platform(Platform::Web)
            .build()
            .unwrap();

        assert!(matches!(
            DomainValidator::validate_config(&config),
            Err(DomainError::InvalidAppName { .. })
        ));
    }

    #[test]
    fn categories_separate_user_and_internal_faults() {
        assert_eq!(
            DomainError::EmptyPlatformSet.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            DomainError::InvalidFilePath {
                path: "/x".into(),
                reason: "absolute".into()
            }
            .category(),
            ErrorCategory::Internal
        );
    }
}
