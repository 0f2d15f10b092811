// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside write reports and cached results)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid application name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: String, reason: String },

    #[error("At least one target platform is required")]
    EmptyPlatformSet,

    #[error("Invalid generated file path '{path}': {reason}")]
    InvalidFilePath { path: String, reason: String },

    #[error("Unknown {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidAppName { .. } => vec![
                "Application names must start with a letter".into(),
                "Use letters, digits, '_' or '-' only (max 64 characters)".into(),
                "Examples: demo, my_app, shop-client".into(),
            ],
            Self::InvalidOutputPath { .. } => vec![
                "Pass a non-empty output directory with --output".into(),
            ],
            Self::EmptyPlatformSet => vec![
                "Select at least one platform: --platform mobile".into(),
                "Supported platforms: mobile, web, desktop".into(),
            ],
            Self::InvalidValue { field, .. } => vec![format!(
                "Run `fledge generate --help` to see accepted {field} values"
            )],
            Self::InvalidFilePath { .. } => vec![
                "A template produced an unsafe path; please report this issue".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidFilePath { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
