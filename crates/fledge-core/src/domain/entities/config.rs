//! The `ProjectConfig` aggregate root and its typestate builder.
//!
//! A `ProjectConfig` is the declarative description of the application the
//! user wants generated: its name, the platforms it targets, the
//! state-management approach, an optional CI provider, and feature flags.
//!
//! # Typestate builder
//!
//! The builder uses two phantom marker types (`NoName` / `HasName`) to
//! enforce at *compile time* that an application name is set before
//! `build()` is reachable. Runtime validation still runs at `build()` for the
//! invariants the type system cannot express (non-empty platform set).
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{CiProvider, FeatureFlags, Platform, StateManagement},
};

// ── Aggregate root ────────────────────────────────────────────────────────────

/// Declarative configuration of one generation request.
///
/// `platforms` is a `BTreeSet` so iteration order (and therefore every
/// derived key and rendered list) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectConfig {
    app_name: String,
    platforms: BTreeSet<Platform>,
    #[serde(default)]
    state_management: StateManagement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ci_provider: Option<CiProvider>,
    #[serde(default)]
    features: FeatureFlags,
}

impl ProjectConfig {
    /// Start building a new `ProjectConfig`.
    pub fn builder() -> ProjectConfigBuilder<NoName> {
        ProjectConfigBuilder::new()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }
    pub const fn state_management(&self) -> StateManagement {
        self.state_management
    }
    pub const fn ci_provider(&self) -> Option<CiProvider> {
        self.ci_provider
    }
    pub const fn features(&self) -> FeatureFlags {
        self.features
    }

    /// The only platform, when exactly one is targeted.
    pub fn single_platform(&self) -> Option<Platform> {
        match self.platforms.len() {
            1 => self.platforms.iter().next().copied(),
            _ => None,
        }
    }

    /// Whether more than one platform is targeted.
    pub fn is_multi_platform(&self) -> bool {
        self.platforms.len() > 1
    }

    /// Validate this configuration's internal consistency.
    ///
    /// Called automatically by the builder. Available for re-validation after
    /// deserialization (e.g. a manifest loaded from disk).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.platforms.is_empty() {
            return Err(DomainError::EmptyPlatformSet);
        }
        Ok(())
    }

    /// Copy of this configuration under a different application name.
    pub fn renamed(&self, app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let platforms: Vec<&str> = self.platforms.iter().map(Platform::as_str).collect();
        write!(
            f,
            "{} [{}] ({})",
            self.app_name,
            platforms.join(", "),
            self.state_management
        )?;
        if let Some(ci) = self.ci_provider {
            write!(f, " + {ci} CI")?;
        }
        Ok(())
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: application name has not yet been set.
pub struct NoName;
/// Marker: application name has been set; `build()` is available.
pub struct HasName;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`ProjectConfig`].
pub struct ProjectConfigBuilder<N> {
    app_name: Option<String>,
    platforms: BTreeSet<Platform>,
    state_management: StateManagement,
    ci_provider: Option<CiProvider>,
    features: FeatureFlags,
    _marker: PhantomData<N>,
}

impl ProjectConfigBuilder<NoName> {
    pub fn new() -> Self {
        Self {
            app_name: None,
            platforms: BTreeSet::new(),
            state_management: StateManagement::default(),
            ci_provider: None,
            features: FeatureFlags::default(),
            _marker: PhantomData,
        }
    }

    /// Set the application name. This transitions the builder to `HasName`.
    pub fn app_name(self, name: impl Into<String>) -> ProjectConfigBuilder<HasName> {
        ProjectConfigBuilder {
            app_name: Some(name.into()),
            platforms: self.platforms,
            state_management: self.state_management,
            ci_provider: self.ci_provider,
            features: self.features,
            _marker: PhantomData,
        }
    }
}

impl Default for ProjectConfigBuilder<NoName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ProjectConfigBuilder<N> {
    /// Add a target platform. Duplicates collapse.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platforms.insert(platform);
        self
    }

    /// Add several target platforms.
    pub fn platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms.extend(platforms);
        self
    }

    pub fn state_management(mut self, state: StateManagement) -> Self {
        self.state_management = state;
        self
    }

    pub fn ci_provider(mut self, ci: Option<CiProvider>) -> Self {
        self.ci_provider = ci;
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }
}

impl ProjectConfigBuilder<HasName> {
    /// Build and validate the `ProjectConfig`.
    ///
    /// The application name itself is validated by the generation pipeline,
    /// not here, so that a malformed name surfaces as a pipeline validation
    /// failure with no side effects.
    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        let config = ProjectConfig {
            app_name: self.app_name.unwrap_or_default(),
            platforms: self.platforms,
            state_management: self.state_management,
            ci_provider: self.ci_provider,
            features: self.features,
        };

        config.validate()?;
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_a_platform() {
        let result = ProjectConfig::builder().app_name("demo").build();
        assert_eq!(result.unwrap_err(), DomainError::EmptyPlatformSet);
    }

    #[test]
    fn duplicate_platforms_collapse() {
        let config = ProjectConfig::builder()
            .app_name("demo")
            .platform(Platform::Web)
            .platform(Platform::Web)
            .build()
            .unwrap();

        assert_eq!(config.platforms().len(), 1);
        assert_eq!(config.single_platform(), Some(Platform::Web));
        assert!(!config.is_multi_platform());
    }

    #[test]
    fn multi_platform_has_no_single_platform() {
        let config = ProjectConfig::builder()
            .app_name("demo")
            .platforms([Platform::Mobile, Platform::Desktop])
            .build()
            .unwrap();

        assert!(config.is_multi_platform());
        assert_eq!(config.single_platform(), None);
    }

    #[test]
    fn deserialized_config_is_revalidated() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"app_name":"demo","platforms":[]}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn display_lists_platforms_and_state() {
        let config = ProjectConfig::builder()
            .app_name("demo")
            .platforms([Platform::Web, Platform::Mobile])
            .state_management(StateManagement::Riverpod)
            .ci_provider(Some(CiProvider::GitHub))
            .build()
            .unwrap();

        assert_eq!(config.to_string(), "demo [mobile, web] (riverpod) + github CI");
    }
}
