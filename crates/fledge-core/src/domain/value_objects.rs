//! Domain value objects: Platform, StateManagement, CiProvider, FeatureFlags.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `FromStr` arm and the `ALL` entry
//! 3. Register a renderer for the new combinations in the adapter catalog

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Platform ─────────────────────────────────────────────────────────────────

/// A target platform for the generated application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mobile,
    Web,
    Desktop,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Self::Mobile, Self::Web, Self::Desktop];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Web => "web",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobile" | "android" | "ios" => Ok(Self::Mobile),
            "web" => Ok(Self::Web),
            "desktop" => Ok(Self::Desktop),
            other => Err(DomainError::InvalidValue {
                field: "platform",
                value: other.to_string(),
            }),
        }
    }
}

// ── StateManagement ──────────────────────────────────────────────────────────

/// The state-management approach the generated application is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateManagement {
    Provider,
    Riverpod,
    Bloc,
    GetX,
}

impl StateManagement {
    pub const ALL: [StateManagement; 4] = [Self::Provider, Self::Riverpod, Self::Bloc, Self::GetX];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Riverpod => "riverpod",
            Self::Bloc => "bloc",
            Self::GetX => "getx",
        }
    }
}

impl Default for StateManagement {
    fn default() -> Self {
        Self::Provider
    }
}

impl fmt::Display for StateManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateManagement {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "provider" => Ok(Self::Provider),
            "riverpod" => Ok(Self::Riverpod),
            "bloc" | "cubit" => Ok(Self::Bloc),
            "getx" | "get" => Ok(Self::GetX),
            other => Err(DomainError::InvalidValue {
                field: "state management",
                value: other.to_string(),
            }),
        }
    }
}

// ── CiProvider ───────────────────────────────────────────────────────────────

/// A continuous-integration service to emit a pipeline definition for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiProvider {
    GitHub,
    GitLab,
    Bitbucket,
}

impl CiProvider {
    pub const ALL: [CiProvider; 3] = [Self::GitHub, Self::GitLab, Self::Bitbucket];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for CiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CiProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" | "github-actions" | "gh" => Ok(Self::GitHub),
            "gitlab" | "gitlab-ci" => Ok(Self::GitLab),
            "bitbucket" | "bitbucket-pipelines" => Ok(Self::Bitbucket),
            other => Err(DomainError::InvalidValue {
                field: "CI provider",
                value: other.to_string(),
            }),
        }
    }
}

// ── FeatureFlags ─────────────────────────────────────────────────────────────

/// Independent opt-in features. Each flag adds files to the generated app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub theme: bool,
    pub localization: bool,
    pub env: bool,
    pub api_client: bool,
    pub tests: bool,
}

impl FeatureFlags {
    /// Names of the enabled features, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.theme, "theme"),
            (self.localization, "localization"),
            (self.env, "env"),
            (self.api_client, "api-client"),
            (self.tests, "tests"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_aliases() {
        assert_eq!(Platform::from_str("ios").unwrap(), Platform::Mobile);
        assert_eq!(Platform::from_str("WEB").unwrap(), Platform::Web);
        assert!(Platform::from_str("watch").is_err());
    }

    #[test]
    fn state_management_round_trips_through_display() {
        for state in StateManagement::ALL {
            assert_eq!(StateManagement::from_str(&state.to_string()).unwrap(), state);
        }
    }

    #[test]
    fn ci_provider_rejects_unknown() {
        let err = CiProvider::from_str("jenkins").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidValue {
                field: "CI provider",
                value: "jenkins".into()
            }
        );
    }

    #[test]
    fn enabled_features_lists_only_set_flags() {
        let flags = FeatureFlags {
            theme: true,
            tests: true,
            ..FeatureFlags::default()
        };
        assert_eq!(flags.enabled(), vec!["theme", "tests"]);
    }
}
