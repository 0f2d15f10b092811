//! Project manifest persistence.
//!
//! After a complete write the generator records the configuration it used in
//! `fledge.yaml` at the project root. The same document (YAML, or TOML when
//! the file ends in `.toml`) can be fed back to `fledge generate --from` to
//! regenerate the project.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fledge_core::{
    application::{ApplicationError, ports::{Filesystem, ManifestStore}},
    domain::ProjectConfig,
    error::{FledgeError, FledgeResult},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const MANIFEST_FILE: &str = "fledge.yaml";

/// On-disk manifest document.
///
/// `generator_version` and `generated_at` are stamped on save and optional on
/// load, so a hand-written file only needs the project fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub project: ProjectConfig,
}

impl Manifest {
    /// Stamp `project` with this build's version and the current time.
    pub fn stamped(project: ProjectConfig) -> Self {
        Self {
            generator_version: Some(fledge_core::VERSION.to_string()),
            generated_at: Some(Utc::now()),
            project,
        }
    }

    pub fn from_yaml_str(source: &str) -> FledgeResult<Self> {
        let manifest: Self = serde_yaml_ng::from_str(source).map_err(|e| invalid(&e))?;
        manifest.project.validate()?;
        Ok(manifest)
    }

    pub fn from_toml_str(source: &str) -> FledgeResult<Self> {
        let manifest: Self = toml::from_str(source).map_err(|e| invalid(&e))?;
        manifest.project.validate()?;
        Ok(manifest)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }
}

fn invalid(e: &dyn std::fmt::Display) -> FledgeError {
    FledgeError::Configuration {
        message: format!("invalid manifest: {e}"),
    }
}

/// Writes [`MANIFEST_FILE`] through the [`Filesystem`] port.
#[derive(Clone)]
pub struct YamlManifestStore {
    filesystem: Arc<dyn Filesystem>,
}

impl YamlManifestStore {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Read a manifest from disk. `.toml` files are parsed as TOML, anything
    /// else as YAML.
    #[instrument]
    pub fn load(path: &Path) -> FledgeResult<Manifest> {
        let source = std::fs::read_to_string(path).map_err(|e| FledgeError::Configuration {
            message: format!("cannot read {}: {e}", path.display()),
        })?;

        let manifest = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Manifest::from_toml_str(&source)?,
            _ => Manifest::from_yaml_str(&source)?,
        };
        debug!(app = %manifest.project.app_name(), "Manifest loaded");
        Ok(manifest)
    }
}

impl ManifestStore for YamlManifestStore {
    fn save(&self, config: &ProjectConfig, output_dir: &Path) -> FledgeResult<PathBuf> {
        let path = output_dir.join(MANIFEST_FILE);
        let failed = |reason: String| -> FledgeError {
            ApplicationError::ManifestFailed {
                path: path.clone(),
                reason,
            }
            .into()
        };

        let body = Manifest::stamped(config.clone())
            .to_yaml()
            .map_err(|e| failed(e.to_string()))?;
        self.filesystem
            .write_file(&path, &body)
            .map_err(|e| failed(e.to_string()))?;
        Ok(path)
    }
}
