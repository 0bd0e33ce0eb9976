use shared::error::AppError;
use thiserror::Error;

/// Startup and serve failures
///
/// Request-level failures never reach this type; handlers speak [`AppError`].
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(#[from] AppError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
