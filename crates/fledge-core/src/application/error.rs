//! Application layer errors.
//!
//! These errors represent failures in orchestration, not domain rules.
//! Domain rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during pipeline orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// No renderer is registered for the requested configuration shape.
    #[error("No renderer registered for platforms [{platforms}] with {state_management}")]
    NoRendererForConfig {
        platforms: String,
        state_management: String,
    },

    /// A renderer failed or panicked while producing content.
    #[error("Renderer '{renderer}' failed: {reason}")]
    RenderingFailed { renderer: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The render cache lock was poisoned by a panicking holder.
    #[error("Render cache is unavailable (lock poisoned)")]
    CacheLock,

    /// The write worker pool could not be started.
    #[error("Could not start write workers: {reason}")]
    WorkerPool { reason: String },

    /// Manifest persistence failed.
    #[error("Failed to persist manifest at {path}: {reason}")]
    ManifestFailed { path: PathBuf, reason: String },

    /// CI configuration could not be generated.
    #[error("Failed to generate {provider} CI configuration: {reason}")]
    CiGenerationFailed { provider: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoRendererForConfig {
                platforms,
                state_management,
            } => vec![
                format!("No template covers [{platforms}] + {state_management}"),
                "Try: fledge list to see available templates".into(),
                "Or pick another --state / --platform combination".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::CacheLock | Self::RenderingFailed { .. } => vec![
                "This appears to be a bug in a template renderer".into(),
                "Please report this issue with the command you ran".into(),
            ],
            Self::WorkerPool { .. } => vec!["Retry with a lower --concurrency".into()],
            Self::ManifestFailed { .. } | Self::CiGenerationFailed { .. } => {
                vec!["Project files were written; only the follow-up step failed".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoRendererForConfig { .. } => ErrorCategory::Selection,
            Self::RenderingFailed { .. } => ErrorCategory::Render,
            Self::FilesystemError { .. }
            | Self::ManifestFailed { .. }
            | Self::CiGenerationFailed { .. } => ErrorCategory::Io,
            Self::CacheLock | Self::WorkerPool { .. } => ErrorCategory::Internal,
        }
    }
}
