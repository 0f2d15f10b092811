use std::path::Path;

use crate::domain::{entities::ProjectConfig, error::DomainError};

const MAX_APP_NAME_LEN: usize = 64;

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities. Every
/// check is pure: no filesystem access.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_config(config: &ProjectConfig) -> Result<(), DomainError> {
        Self::validate_app_name(config.app_name())?;
        config.validate()
    }

    /// Application names end up in package names and Dart identifiers.
    pub fn validate_app_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidAppName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > MAX_APP_NAME_LEN {
            return Err(invalid("name is longer than 64 characters"));
        }
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(invalid("name must start with a letter"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(invalid(&format!("character '{bad}' is not allowed")));
        }

        Ok(())
    }

    pub fn validate_output_path(path: &Path) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidOutputPath {
            path: path.display().to_string(),
            reason: reason.to_string(),
        };

        if path.as_os_str().is_empty() {
            return Err(invalid("path cannot be empty"));
        }
        if path.to_string_lossy().contains('\0') {
            return Err(invalid("path contains a NUL byte"));
        }

        Ok(())
    }
}
