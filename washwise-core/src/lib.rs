pub mod actions;
pub mod context;
pub mod forms;
pub mod repository;
pub mod search;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Session expired. Please login again.")]
    SessionExpired,
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
