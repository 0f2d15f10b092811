//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `FLEDGE__*` environment variables, e.g. `FLEDGE__GENERATION__CONCURRENCY=4`
//! 3. TOML config file (`--config`, else [`AppConfig::config_path`])
//! 4. Built-in defaults

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use fledge_core::domain::{Platform, StateManagement};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ENV_PREFIX: &str = "FLEDGE";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    /// Values used when `fledge generate` leaves them unset.
    pub defaults: Defaults,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Parallel write bound. Unset means available parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<NonZeroUsize>,
    pub write_manifest: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            write_manifest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub platforms: Vec<Platform>,
    pub state_management: StateManagement,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            platforms: vec![Platform::Mobile],
            state_management: StateManagement::Provider,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Layer defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        Self::builder(&path, required)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("defaults.platforms"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Defaults plus one file, no environment.
    fn builder(
        path: &Path,
        required: bool,
    ) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults =
            Config::try_from(&Self::default()).context("failed to serialise default configuration")?;

        Ok(Config::builder().add_source(defaults).add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(required),
        ))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.fledge.toml` in the
    /// current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "fledge", "fledge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".fledge.toml"))
    }
}
