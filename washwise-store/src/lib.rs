pub mod api_client;
pub mod app_config;
pub mod error;
pub mod memory_repo;

pub use api_client::{ApiClient, LaundryRecordPayload};
pub use app_config::Config;
pub use error::StoreError;
pub use memory_repo::MemoryStore;
