use thiserror::Error;
use washwise_core::CoreError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Session expired. Please login again.")]
    SessionExpired,
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SessionExpired => CoreError::SessionExpired,
            StoreError::Api { status: 404, message } => CoreError::NotFound(message),
            StoreError::Api { message, .. } => CoreError::Rejected(message),
            StoreError::Http(e) => CoreError::Transport(e.to_string()),
            other => CoreError::InternalError(other.to_string()),
        }
    }
}
