use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use washwise_catalog::InventoryItem;
use washwise_core::context::StaffProfile;
use washwise_core::forms::{PasswordReset, RegistrationDraft};
use washwise_core::repository::{
    CustomerDirectory, Credentials, InventoryRepository, LoginGrant, RecordRepository, ShopDirectory,
    StaffAuthenticator,
};
use washwise_core::{CoreError, CoreResult};
use washwise_order::LaundryRecord;
use washwise_shared::{Customer, Masked, ShopSelection};

struct StaffAccount {
    shop_id: String,
    profile: StaffProfile,
    password: Masked<String>,
}

/// In-process backing store. Used for inventory, which has no remote endpoint,
/// and as a stand-in for the REST API in tests and offline runs.
#[derive(Default)]
pub struct MemoryStore {
    shops: RwLock<Vec<ShopSelection>>,
    customers: RwLock<Vec<Customer>>,
    records: RwLock<Vec<LaundryRecord>>,
    inventory: RwLock<Vec<InventoryItem>>,
    staff: RwLock<Vec<StaffAccount>>,
    otps: RwLock<HashMap<String, String>>,
    verified: RwLock<HashSet<String>>,
    reset_tokens: RwLock<HashMap<String, String>>,
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_shop(&self, shop: ShopSelection) {
        self.shops.write().await.push(shop);
    }

    pub async fn add_customer(&self, customer: Customer) {
        self.customers.write().await.push(customer);
    }

    pub async fn saved_records(&self) -> Vec<LaundryRecord> {
        self.records.read().await.clone()
    }

    /// The code most recently mailed to `email`, if it has not been used yet.
    pub async fn issued_otp(&self, email: &str) -> Option<String> {
        self.otps.read().await.get(&email_key(email)).cloned()
    }

    pub async fn is_verified(&self, email: &str) -> bool {
        self.verified.read().await.contains(&email_key(email))
    }

    /// Token for the reset link that would be mailed to `email`.
    pub async fn issue_reset_token(&self, email: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.reset_tokens.write().await.insert(token.clone(), email_key(email));
        token
    }
}

#[async_trait]
impl ShopDirectory for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> CoreResult<Option<ShopSelection>> {
        Ok(self.shops.read().await.iter().find(|s| s.slug == slug).cloned())
    }
}

#[async_trait]
impl CustomerDirectory for MemoryStore {
    async fn get_customer(&self, customer_id: &str) -> CoreResult<Option<Customer>> {
        let customer_id = customer_id.trim();
        Ok(self.customers.read().await.iter().find(|c| c.id == customer_id).cloned())
    }

    async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }
}

#[async_trait]
impl RecordRepository for MemoryStore {
    async fn save_record(&self, record: &LaundryRecord) -> CoreResult<()> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for MemoryStore {
    async fn save_item(&self, item: &InventoryItem) -> CoreResult<()> {
        let mut inventory = self.inventory.write().await;
        match inventory.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => inventory.push(item.clone()),
        }
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> CoreResult<()> {
        let mut inventory = self.inventory.write().await;
        let before = inventory.len();
        inventory.retain(|i| i.id != id);
        if inventory.len() == before {
            return Err(CoreError::NotFound(format!("inventory item {}", id)));
        }
        Ok(())
    }

    async fn list_items(&self) -> CoreResult<Vec<InventoryItem>> {
        Ok(self.inventory.read().await.clone())
    }
}

#[async_trait]
impl StaffAuthenticator for MemoryStore {
    async fn login(&self, credentials: &Credentials) -> CoreResult<LoginGrant> {
        let login = credentials.email_or_username.trim();
        let staff = self.staff.read().await;
        let account = staff
            .iter()
            .find(|a| {
                a.shop_id == credentials.shop_id
                    && (a.profile.username == login || a.profile.email.eq_ignore_ascii_case(login))
                    && a.password == credentials.password
            })
            .ok_or_else(|| CoreError::Rejected("Invalid credentials".to_string()))?;

        Ok(LoginGrant {
            staff: account.profile.clone(),
            token: Uuid::new_v4().to_string(),
            api_key: None,
        })
    }

    async fn register(&self, shop_id: &str, draft: &RegistrationDraft) -> CoreResult<()> {
        let mut staff = self.staff.write().await;
        let taken = staff.iter().any(|a| {
            a.shop_id == shop_id
                && (a.profile.username == draft.username || a.profile.email.eq_ignore_ascii_case(&draft.email))
        });
        if taken {
            return Err(CoreError::Rejected("Username or email already registered".to_string()));
        }

        let profile = StaffProfile {
            id: Uuid::new_v4().to_string(),
            username: draft.username.clone(),
            email: draft.email.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            role: "STAFF".to_string(),
        };
        info!(shop_id, username = %profile.username, "staff account registered");
        staff.push(StaffAccount {
            shop_id: shop_id.to_string(),
            profile,
            password: draft.password.clone(),
        });
        Ok(())
    }

    async fn send_otp(&self, email: &str) -> CoreResult<()> {
        let code = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);
        self.otps.write().await.insert(email_key(email), code);
        info!(email, "verification code issued");
        Ok(())
    }

    async fn resend_otp(&self, email: &str) -> CoreResult<()> {
        self.send_otp(email).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> CoreResult<()> {
        let key = email_key(email);
        let mut otps = self.otps.write().await;
        if otps.get(&key).map(String::as_str) != Some(otp) {
            return Err(CoreError::Rejected("Invalid OTP".to_string()));
        }
        otps.remove(&key);
        self.verified.write().await.insert(key);
        Ok(())
    }

    async fn reset_password(&self, reset: &PasswordReset) -> CoreResult<()> {
        let key = email_key(&reset.email);
        let mut tokens = self.reset_tokens.write().await;
        if tokens.get(reset.token.expose()) != Some(&key) {
            return Err(CoreError::Rejected("Invalid or expired reset link".to_string()));
        }
        tokens.remove(reset.token.expose());

        let mut staff = self.staff.write().await;
        let mut updated = 0;
        for account in staff.iter_mut().filter(|a| email_key(&a.profile.email) == key) {
            account.password = reset.new_password.clone();
            updated += 1;
        }
        if updated == 0 {
            return Err(CoreError::NotFound(format!("staff account {}", reset.email)));
        }
        Ok(())
    }
}
