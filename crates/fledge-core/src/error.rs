//! Unified error handling for Fledge Core.
//!
//! This module provides the root error type that wraps domain and
//! application errors, plus the result alias every fallible pipeline
//! operation returns.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Fledge Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FledgeError {
    /// Errors from the domain layer (invalid input).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl FledgeError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Fledge".into(),
                "Please report this issue at: https://github.com/fledge-dev/fledge/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories, one per pipeline failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input, caught before any I/O.
    Validation,
    /// No renderer matches the configuration shape.
    Selection,
    /// A renderer failed while producing content.
    Render,
    /// A filesystem operation failed.
    Io,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type FledgeResult<T> = Result<T, FledgeError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> FledgeResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> FledgeResult<T> {
        self.map_err(|e| FledgeError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

/// Exhaustive two-way consumption of a result.
///
/// Both arms must produce the same type, so a caller can never handle one
/// variant and forget the other.
pub trait ResultExt<T, E> {
    fn fold<R>(self, on_ok: impl FnOnce(T) -> R, on_err: impl FnOnce(E) -> R) -> R;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn fold<R>(self, on_ok: impl FnOnce(T) -> R, on_err: impl FnOnce(E) -> R) -> R {
        match self {
            Ok(value) => on_ok(value),
            Err(err) => on_err(err),
        }
    }
}
