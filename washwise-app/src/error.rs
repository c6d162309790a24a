use thiserror::Error;
use washwise_catalog::{InventoryError, PricingError};
use washwise_core::forms::FormErrors;
use washwise_core::CoreError;
use washwise_order::RecordError;
use washwise_store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please login to access this resource")]
    NotSignedIn,
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),
    #[error("No registration is waiting for a verification code")]
    NoPendingRegistration,
    #[error(transparent)]
    Form(#[from] FormErrors),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            AppError::Core(CoreError::SessionExpired) | AppError::Store(StoreError::SessionExpired)
        )
    }

    /// Text for the toast shown to the staff member.
    pub fn user_message(&self) -> String {
        match self {
            AppError::CustomerNotFound(_) => "Customer not found".to_string(),
            AppError::Core(CoreError::Transport(msg)) => {
                tracing::error!("Network error: {}", msg);
                "Unable to reach the server. Please try again.".to_string()
            }
            AppError::Core(CoreError::InternalError(msg)) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Store(StoreError::SessionExpired) => CoreError::SessionExpired.to_string(),
            AppError::Store(err) => {
                tracing::error!("Store error: {}", err);
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}
