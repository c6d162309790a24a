use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use washwise_catalog::InventoryItem;
use washwise_order::LaundryRecord;
use washwise_shared::{Customer, Masked, ShopSelection};

use crate::context::StaffProfile;
use crate::forms::{PasswordReset, RegistrationDraft};
use crate::CoreResult;

/// Shop lookup by URL slug
#[async_trait]
pub trait ShopDirectory: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> CoreResult<Option<ShopSelection>>;
}

/// Customer directory used for autofill and the customer picker
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn get_customer(&self, customer_id: &str) -> CoreResult<Option<Customer>>;

    async fn list_customers(&self) -> CoreResult<Vec<Customer>>;
}

/// Persistence for laundry records
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn save_record(&self, record: &LaundryRecord) -> CoreResult<()>;
}

/// Persistence for inventory items
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn save_item(&self, item: &InventoryItem) -> CoreResult<()>;

    async fn delete_item(&self, id: Uuid) -> CoreResult<()>;

    async fn list_items(&self) -> CoreResult<Vec<InventoryItem>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub shop_id: String,
    pub email_or_username: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginGrant {
    pub staff: StaffProfile,
    pub token: String,
    pub api_key: Option<String>,
}

/// Staff sign-in and sign-up
#[async_trait]
pub trait StaffAuthenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> CoreResult<LoginGrant>;

    async fn register(&self, shop_id: &str, draft: &RegistrationDraft) -> CoreResult<()>;

    /// Email a one-time code to confirm a new account.
    async fn send_otp(&self, email: &str) -> CoreResult<()>;

    async fn resend_otp(&self, email: &str) -> CoreResult<()>;

    async fn verify_otp(&self, email: &str, otp: &str) -> CoreResult<()>;

    async fn reset_password(&self, reset: &PasswordReset) -> CoreResult<()>;

    /// Forget any credentials held for later requests.
    async fn logout(&self) {}
}
