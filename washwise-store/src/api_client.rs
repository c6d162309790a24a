//! Client for the shop's REST API.
//!
//! Every request carries `X-API-KEY`; requests outside `/public/` also carry the
//! staff bearer token. A 401 on an authenticated request drops the stored
//! credentials and surfaces [`StoreError::SessionExpired`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use washwise_catalog::ItemType;
use washwise_core::context::StaffProfile;
use washwise_core::forms::{PasswordReset, RegistrationDraft};
use washwise_core::repository::{
    CustomerDirectory, Credentials, LoginGrant, RecordRepository, ShopDirectory, StaffAuthenticator,
};
use washwise_core::{CoreError, CoreResult};
use washwise_order::LaundryRecord;
use washwise_shared::{ApiEnvelope, Customer, Masked, ShopSelection};

use crate::app_config::ApiConfig;
use crate::error::StoreError;

const USER_AGENT: &str = "washwise-staff/0.1.0";

#[derive(Default)]
struct AuthHeaders {
    token: Option<Masked<String>>,
    api_key: Option<Masked<String>>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth: Arc<RwLock<AuthHeaders>>,
}

/// Body of `POST /api/customers/laundry-record`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LaundryRecordPayload {
    pub cus_id: String,
    pub batch: String,
    pub shirts: u32,
    pub pants: u32,
    pub jeans: u32,
    pub shorts: u32,
    pub towels: u32,
    pub pillow_case: u32,
    pub bed_sheets: u32,
    pub washing: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub kg: Option<Decimal>,
    pub num_items: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl From<&LaundryRecord> for LaundryRecordPayload {
    fn from(record: &LaundryRecord) -> Self {
        let count = |item_type: ItemType| -> u32 {
            record
                .items()
                .iter()
                .filter(|item| item.item_type == item_type)
                .map(|item| item.quantity)
                .sum()
        };

        Self {
            cus_id: record.customer_id.clone(),
            batch: record.batch.clone(),
            shirts: count(ItemType::Shirts),
            pants: count(ItemType::Pants),
            jeans: count(ItemType::Jeans),
            shorts: count(ItemType::Shorts),
            towels: count(ItemType::Towel),
            pillow_case: count(ItemType::PillowCase),
            bed_sheets: count(ItemType::BedSheets),
            washing: record.washing,
            kg: record.weight_kg,
            num_items: record.item_count(),
            total_amount: record.total_amount(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    shop_id: &'a str,
    #[serde(rename = "emailOrUsername")]
    email_or_username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    admin: Option<StaffProfile>,
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    shop_id: &'a str,
    #[serde(rename = "user_fName")]
    first_name: &'a str,
    #[serde(rename = "user_mName")]
    middle_name: &'a str,
    #[serde(rename = "user_lName")]
    last_name: &'a str,
    user_address: &'a str,
    username: &'a str,
    #[serde(rename = "contactNum")]
    contact_number: &'a str,
    email: &'a str,
    role: &'static str,
    status: &'static str,
    password: &'a str,
    registered_by: &'static str,
}

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    otp: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

impl StatusResponse {
    fn into_result(self, fallback: &str) -> CoreResult<()> {
        if self.success {
            return Ok(());
        }
        Err(CoreError::Rejected(self.message.unwrap_or_else(|| fallback.to_string())))
    }
}

fn is_public(path: &str) -> bool {
    path.contains("/public/")
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, StoreError> {
        // `Url::join` drops the last segment unless the base ends in '/'
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let auth = AuthHeaders {
            token: None,
            api_key: config.api_key.clone().map(Masked::new),
        };

        Ok(Self {
            http,
            base_url,
            auth: Arc::new(RwLock::new(auth)),
        })
    }

    /// Use the credentials of a fresh login for later requests.
    pub async fn set_credentials(&self, token: &str, api_key: Option<&str>) {
        let mut auth = self.auth.write().await;
        auth.token = Some(Masked::new(token.to_string()));
        if let Some(key) = api_key {
            auth.api_key = Some(Masked::new(key.to_string()));
        }
    }

    pub async fn clear_token(&self) {
        self.auth.write().await.token = None;
    }

    pub async fn has_token(&self) -> bool {
        self.auth.read().await.token.is_some()
    }

    pub fn url(&self, path: &str) -> Result<Url, StoreError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let url = self.url(path)?;
        let auth = self.auth.read().await;

        let mut builder = self.http.request(method, url);
        if let Some(key) = &auth.api_key {
            builder = builder.header("X-API-KEY", key.expose());
        }
        if !is_public(path) {
            if let Some(token) = &auth.token {
                builder = builder.bearer_auth(token.expose());
            }
        }
        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> Result<T, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "api response");

        if status == StatusCode::UNAUTHORIZED && !is_public(path) {
            warn!(path, "api rejected the session token");
            self.clear_token().await;
            return Err(StoreError::SessionExpired);
        }

        let body: Value = response.json().await?;
        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP Error {}", status.as_u16()));
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_value(body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let builder = self.request(Method::GET, path).await?;
        self.execute(path, builder).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, StoreError> {
        let builder = self.request(Method::POST, path).await?.json(body);
        self.execute(path, builder).await
    }
}

fn envelope_data<T>(envelope: ApiEnvelope<T>) -> CoreResult<T> {
    envelope.into_result().map_err(CoreError::Rejected)
}

#[async_trait]
impl ShopDirectory for ApiClient {
    async fn find_by_slug(&self, slug: &str) -> CoreResult<Option<ShopSelection>> {
        let path = format!("/api/public/shop-slug/{}", slug);
        match self.get::<ApiEnvelope<ShopSelection>>(&path).await {
            Ok(envelope) if envelope.success => Ok(envelope.data),
            Ok(_) => Ok(None),
            Err(StoreError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CustomerDirectory for ApiClient {
    async fn get_customer(&self, customer_id: &str) -> CoreResult<Option<Customer>> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Ok(None);
        }

        let path = format!("/api/customers/{}", customer_id);
        let customer = match self.get::<ApiEnvelope<Customer>>(&path).await {
            Ok(envelope) => envelope_data(envelope)?,
            Err(StoreError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if !customer.is_complete() {
            return Err(CoreError::Rejected("Invalid customer data received".to_string()));
        }
        Ok(Some(customer))
    }

    async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
        let envelope = self.get::<ApiEnvelope<Vec<Customer>>>("/api/customers").await?;
        envelope_data(envelope)
    }
}

#[async_trait]
impl RecordRepository for ApiClient {
    async fn save_record(&self, record: &LaundryRecord) -> CoreResult<()> {
        let payload = LaundryRecordPayload::from(record);
        let response: StatusResponse = self.post("/api/customers/laundry-record", &payload).await?;
        response.into_result("Failed to save laundry record")?;
        info!(record_id = %record.id, customer_id = %record.customer_id, "laundry record saved");
        Ok(())
    }
}

#[async_trait]
impl StaffAuthenticator for ApiClient {
    async fn login(&self, credentials: &Credentials) -> CoreResult<LoginGrant> {
        let request = LoginRequest {
            shop_id: &credentials.shop_id,
            email_or_username: &credentials.email_or_username,
            password: credentials.password.expose(),
        };
        let response: LoginResponse = self.post("/api/public/staff/login", &request).await?;

        let (Some(token), Some(staff)) = (response.token, response.admin) else {
            return Err(CoreError::Rejected("Invalid response from server".to_string()));
        };
        let token = token.strip_prefix("Bearer ").unwrap_or(&token).to_string();

        self.set_credentials(&token, response.api_key.as_deref()).await;
        Ok(LoginGrant {
            staff,
            token,
            api_key: response.api_key,
        })
    }

    async fn register(&self, shop_id: &str, draft: &RegistrationDraft) -> CoreResult<()> {
        let request = RegisterRequest {
            shop_id,
            first_name: &draft.first_name,
            middle_name: &draft.middle_name,
            last_name: &draft.last_name,
            user_address: &draft.address,
            username: &draft.username,
            contact_number: &draft.contact_number,
            email: &draft.email,
            role: "STAFF",
            status: "ACTIVE",
            password: draft.password.expose(),
            registered_by: "STAFF",
        };
        let response: StatusResponse = self.post("/api/public/register", &request).await?;
        response.into_result("Failed to register")?;
        info!(username = %draft.username, "staff account registered");
        Ok(())
    }

    async fn send_otp(&self, email: &str) -> CoreResult<()> {
        let request = OtpRequest { email, otp: None };
        let response: StatusResponse = self.post("/api/public/send-otp", &request).await?;
        response.into_result("Failed to send OTP. Please try again.")
    }

    async fn resend_otp(&self, email: &str) -> CoreResult<()> {
        let request = OtpRequest { email, otp: None };
        let response: StatusResponse = self.post("/api/auth/send-otp", &request).await?;
        response.into_result("Failed to resend OTP")
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> CoreResult<()> {
        let request = OtpRequest { email, otp: Some(otp) };
        let response: StatusResponse = self.post("/api/public/verify-otp", &request).await?;
        if !response.success {
            return Err(CoreError::Rejected("Invalid OTP".to_string()));
        }
        Ok(())
    }

    async fn reset_password(&self, reset: &PasswordReset) -> CoreResult<()> {
        let response: StatusResponse = self.post("/api/public/reset-password", reset).await?;
        response.into_result("Reset password failed!")?;
        info!(email = %reset.email, "password reset");
        Ok(())
    }

    async fn logout(&self) {
        self.clear_token().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use washwise_catalog::PricingEngine;
    use washwise_order::RecordDraft;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            api_key: Some("key-1".to_string()),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_urls_keep_base_path() {
        let client = client("https://api.example.com/v1");
        assert_eq!(
            client.url("/api/customers").unwrap().as_str(),
            "https://api.example.com/v1/api/customers"
        );
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public("/api/public/shop-slug/abc"));
        assert!(!is_public("/api/customers"));
    }

    #[tokio::test]
    async fn test_credentials_are_replaced_and_cleared() {
        let client = client("http://localhost:3000");
        assert!(!client.has_token().await);

        client.set_credentials("abc", Some("key-2")).await;
        assert!(client.has_token().await);
        assert_eq!(
            client.auth.read().await.api_key.as_ref().map(|k| k.expose().clone()),
            Some("key-2".to_string())
        );

        client.clear_token().await;
        assert!(!client.has_token().await);
        assert!(client.auth.read().await.api_key.is_some());
    }

    #[test]
    fn test_record_payload_shape() {
        let engine = PricingEngine::default();
        let draft = RecordDraft {
            customer_id: "C-0015".to_string(),
            customer_name: "Alexa Cruz".to_string(),
            service: "Wash + Fold".to_string(),
            batch: "B1".to_string(),
            items: engine
                .line_items_from_quantities(&[(ItemType::Shirts, 2), (ItemType::Towel, 3)])
                .unwrap(),
            weight_kg: Some(dec!(4.5)),
            washing: true,
        };
        let record = LaundryRecord::new("25-0001".to_string(), draft, &engine);

        let payload = LaundryRecordPayload::from(&record);
        assert_eq!(payload.towels, 3);
        assert_eq!(payload.jeans, 0);
        assert_eq!(payload.num_items, 5);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["cus_id"], "C-0015");
        assert_eq!(json["total_amount"], 66.0);
        assert_eq!(json["kg"], 4.5);
        assert_eq!(json["shirts"], 2);
    }
}
