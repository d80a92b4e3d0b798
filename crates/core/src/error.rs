// Central Error Type for the Application

use thiserror::Error;

/// Run-level error type
///
/// Only setup failures surface here; per-job generation, upload and publish
/// errors are logged by the worker and the job is skipped.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::port::StorageError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
