use std::io;
use thiserror::Error;

use crate::config::settings::ConfigError;

/// Errors that can occur while preparing or running an svn command
#[derive(Debug, Error)]
pub enum SvnError {
    #[error("Command requirements not met: {0}")]
    RequirementsNotMet(String),

    #[error("Svn command failed: {0}")]
    CommandFailed(String),

    #[error("Svn command timed out after {0}ms")]
    Timeout(u64),

    #[error("Failed to parse svn output: {0}")]
    ParseError(String),

    #[error("Operation not found: {0}")]
    OperationNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level application error that wraps all module-specific errors
///
/// All module errors convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Svn error: {0}")]
    Svn(#[from] SvnError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for svn operations
pub type Result<T> = std::result::Result<T, SvnError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
