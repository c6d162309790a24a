use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use washwise_catalog::{InventoryError, InventoryItem, InventoryManager, PricingEngine};
use washwise_core::actions::StaffAction;
use washwise_core::context::{AppContext, StaffProfile};
use washwise_core::forms::{
    parse_otp, FormErrors, FormField, InsertRecordForm, RegistrationDraft, RegistrationForm, ResetPasswordForm,
};
use washwise_core::repository::{
    Credentials, CustomerDirectory, InventoryRepository, RecordRepository, ShopDirectory, StaffAuthenticator,
};
use washwise_core::search::{fields, filter, RecordFilter};
use washwise_core::{CoreError, CoreResult};
use washwise_order::{LaundryRecord, PaymentStatus, RecordManager, RecordStatus};
use washwise_shared::models::events::ActivityEvent;
use washwise_shared::{Customer, ShopSelection};
use washwise_store::{ApiClient, MemoryStore};

use crate::dashboard::QuickStats;
use crate::error::AppError;
use crate::search_box::SearchBox;
use crate::seed;

#[derive(Clone)]
pub struct Repositories {
    pub shops: Arc<dyn ShopDirectory>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub records: Arc<dyn RecordRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub auth: Arc<dyn StaffAuthenticator>,
}

impl Repositories {
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            shops: store.clone(),
            customers: store.clone(),
            records: store.clone(),
            inventory: store.clone(),
            auth: store,
        }
    }

    /// Shop API for everything it serves. Inventory has no endpoint and stays local.
    pub fn remote(client: Arc<ApiClient>, local: Arc<MemoryStore>) -> Self {
        Self {
            shops: client.clone(),
            customers: client.clone(),
            records: client.clone(),
            inventory: local,
            auth: client,
        }
    }
}

/// Which record list a screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordView {
    All,
    Pending,
    Ongoing,
    ReadyForPickup,
    History,
    PendingPayments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    RecordSaved { record_id: String, total: Decimal },
    RecordUpdated { record_id: String, status: RecordStatus },
    PaymentUpdated { record_id: String, status: PaymentStatus },
    ReceiptAttached { record_id: String },
    InventoryUpdated(InventoryItem),
    InventoryRemoved { id: Uuid },
    Navigate(String),
    LoggedOut,
}

pub struct AppState {
    context: AppContext,
    records: RecordManager,
    inventory: InventoryManager,
    repos: Repositories,
    search_delay: Duration,
    pending_registration: Option<RegistrationDraft>,
}

impl AppState {
    pub fn new(engine: PricingEngine, repos: Repositories) -> Self {
        Self {
            context: AppContext::default(),
            records: RecordManager::new(engine),
            inventory: InventoryManager::new(),
            repos,
            search_delay: Duration::from_millis(300),
            pending_registration: None,
        }
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn engine(&self) -> &PricingEngine {
        self.records.engine()
    }

    pub fn records(&self) -> &RecordManager {
        &self.records
    }

    pub fn inventory(&self) -> &InventoryManager {
        &self.inventory
    }

    pub fn search_box(&self) -> SearchBox {
        SearchBox::new(self.search_delay)
    }

    /// Clear local credentials when the API reports the session gone.
    fn guard<T>(&mut self, result: CoreResult<T>) -> Result<T, AppError> {
        if let Err(CoreError::SessionExpired) = &result {
            self.context.expire_session();
        }
        result.map_err(AppError::from)
    }

    pub async fn open_shop(&mut self, slug: Option<&str>) -> &ShopSelection {
        self.context.resolve_shop(slug, self.repos.shops.as_ref()).await
    }

    pub async fn login(&mut self, email_or_username: &str, password: &str) -> Result<&StaffProfile, AppError> {
        let mut errors = FormErrors::default();
        if email_or_username.trim().is_empty() {
            errors.push(FormField::Username, "Email or username is required");
        }
        if password.is_empty() {
            errors.push(FormField::Password, "Password is required");
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let credentials = Credentials {
            shop_id: self.context.shop().shop_id.clone(),
            email_or_username: email_or_username.trim().to_string(),
            password: password.into(),
        };
        let grant = self.repos.auth.login(&credentials).await?;

        self.context
            .session_mut()
            .login(grant.staff, &grant.token, grant.api_key);
        self.context.session().staff().ok_or(AppError::NotSignedIn)
    }

    /// Validate the sign-up form and mail a verification code to its email.
    pub async fn start_registration(&mut self, form: &RegistrationForm) -> Result<(), AppError> {
        let draft = form.validate()?;
        self.repos.auth.send_otp(&draft.email).await?;
        tracing::info!(username = %draft.username, "verification code requested");
        self.pending_registration = Some(draft);
        Ok(())
    }

    pub async fn resend_otp(&mut self) -> Result<(), AppError> {
        let email = self
            .pending_registration
            .as_ref()
            .map(|draft| draft.email.clone())
            .ok_or(AppError::NoPendingRegistration)?;
        self.repos.auth.resend_otp(&email).await?;
        Ok(())
    }

    /// Check the emailed code, then create the account.
    pub async fn confirm_registration(&mut self, otp: &str) -> Result<(), AppError> {
        let otp = parse_otp(otp)?;
        let draft = self
            .pending_registration
            .clone()
            .ok_or(AppError::NoPendingRegistration)?;

        self.repos.auth.verify_otp(&draft.email, &otp).await?;
        let shop_id = self.context.shop().shop_id.clone();
        self.repos.auth.register(&shop_id, &draft).await?;
        self.pending_registration = None;
        Ok(())
    }

    pub fn has_pending_registration(&self) -> bool {
        self.pending_registration.is_some()
    }

    pub async fn reset_password(&mut self, form: &ResetPasswordForm) -> Result<(), AppError> {
        let reset = form.validate()?;
        self.repos.auth.reset_password(&reset).await?;
        Ok(())
    }

    pub async fn logout(&mut self) {
        self.repos.auth.logout().await;
        self.context.session_mut().logout();
    }

    /// Load stored inventory; an empty store gets the starter supplies.
    pub async fn load_inventory(&mut self) -> Result<usize, AppError> {
        let stored = self.repos.inventory.list_items().await;
        let stored = self.guard(stored)?;

        if stored.is_empty() {
            for draft in seed::starter_inventory() {
                let item = self.inventory.add(draft)?.clone();
                let saved = self.repos.inventory.save_item(&item).await;
                self.guard(saved)?;
            }
            tracing::info!(items = self.inventory.items().len(), "inventory seeded");
        } else {
            for item in stored {
                self.inventory.import(item)?;
            }
        }
        Ok(self.inventory.items().len())
    }

    /// Fill the customer block of a record form from the directory.
    pub async fn autofill_customer(&mut self, form: &mut InsertRecordForm) -> Result<Customer, AppError> {
        let customer_id = form.customer_id.trim().to_string();
        if customer_id.is_empty() {
            form.clear_customer();
            return Err(AppError::CustomerNotFound(customer_id));
        }

        let found = self.repos.customers.get_customer(&customer_id).await;
        match self.guard(found)? {
            Some(customer) => {
                form.autofill(&customer);
                Ok(customer)
            }
            None => {
                form.clear_customer();
                Err(AppError::CustomerNotFound(customer_id))
            }
        }
    }

    /// Customer picker contents for `query`.
    pub async fn search_customers(&mut self, query: &str) -> Result<Vec<Customer>, AppError> {
        let listed = self.repos.customers.list_customers().await;
        let customers = self.guard(listed)?;
        Ok(filter(&customers, query, &fields::CUSTOMERS).iter().cloned().collect())
    }

    pub fn search_inventory(&self, query: &str) -> Vec<&InventoryItem> {
        filter(self.inventory.items(), query, &fields::INVENTORY).to_vec()
    }

    pub fn search_records(&self, view: RecordView, query: &str) -> Vec<&LaundryRecord> {
        let list: Vec<&LaundryRecord> = match view {
            RecordView::All => self.records.records().iter().collect(),
            RecordView::Pending => self.records.pending(),
            RecordView::Ongoing => self.records.ongoing(),
            RecordView::ReadyForPickup => self.records.ready_for_pickup(),
            RecordView::History => self.records.history(),
            RecordView::PendingPayments => self.records.pending_payments(),
        };
        let matcher = RecordFilter::new(self.records.records(), query, &fields::RECORDS);
        list.into_iter().filter(|record| matcher.matches(record)).collect()
    }

    /// Newest activity first.
    pub fn recent_activity(&self, limit: usize) -> Vec<&ActivityEvent> {
        let mut events: Vec<&ActivityEvent> = self.records.activity().iter().collect();
        events.sort_by_key(|event| std::cmp::Reverse(event.at()));
        events.truncate(limit);
        events
    }

    pub fn quick_stats(&self) -> QuickStats {
        QuickStats::collect(&self.records, &self.inventory, Utc::now().date_naive())
    }

    pub async fn dispatch(&mut self, action: StaffAction) -> Result<ActionOutcome, AppError> {
        if !action.is_navigation() && !self.context.session().is_authenticated() {
            return Err(AppError::NotSignedIn);
        }
        tracing::debug!(action = action.name(), "dispatching staff action");

        match action {
            StaffAction::InsertRecord(form) => self.insert_record(&form).await,
            StaffAction::AdvanceRecord { record_id } => {
                let status = self.records.advance(&record_id)?;
                Ok(ActionOutcome::RecordUpdated { record_id, status })
            }
            StaffAction::MarkReadyForPickup { record_id } => {
                self.records.mark_ready_for_pickup(&record_id)?;
                Ok(ActionOutcome::RecordUpdated {
                    record_id,
                    status: RecordStatus::ReadyForPickup,
                })
            }
            StaffAction::MarkPickedUp { record_id } => {
                self.records.mark_picked_up(&record_id)?;
                Ok(ActionOutcome::RecordUpdated {
                    record_id,
                    status: RecordStatus::PickedUp,
                })
            }
            StaffAction::RecordPayment {
                record_id,
                amount,
                method,
            } => {
                let status = self.records.record_payment(&record_id, amount, method)?;
                Ok(ActionOutcome::PaymentUpdated { record_id, status })
            }
            StaffAction::MarkPaid { record_id, method } => {
                let status = self.records.mark_paid(&record_id, method)?;
                Ok(ActionOutcome::PaymentUpdated { record_id, status })
            }
            StaffAction::AttachReceipt {
                record_id,
                receipt_url,
            } => {
                self.records.attach_receipt(&record_id, receipt_url)?;
                Ok(ActionOutcome::ReceiptAttached { record_id })
            }
            StaffAction::AddInventoryItem(form) => {
                let draft = form.validate()?;
                let item = self.inventory.add(draft)?.clone();
                let saved = self.repos.inventory.save_item(&item).await;
                if let Err(e) = self.guard(saved) {
                    self.inventory.remove(&item.id)?;
                    return Err(e);
                }
                Ok(ActionOutcome::InventoryUpdated(item))
            }
            StaffAction::EditInventoryItem { id, form } => {
                let edit = form.validate()?;
                let previous = self.previous_item(&id)?;
                let item = self.inventory.edit(&id, edit)?.clone();
                self.persist_item(item, previous).await
            }
            StaffAction::RestockItem { id, quantity } => {
                let previous = self.previous_item(&id)?;
                let item = self.inventory.restock(&id, quantity)?.clone();
                self.persist_item(item, previous).await
            }
            StaffAction::ConsumeItem { id, quantity } => {
                let previous = self.previous_item(&id)?;
                let item = self.inventory.consume(&id, quantity)?.clone();
                self.persist_item(item, previous).await
            }
            StaffAction::RemoveItem { id } => {
                let deleted = self.repos.inventory.delete_item(id).await;
                self.guard(deleted)?;
                self.inventory.remove(&id)?;
                Ok(ActionOutcome::InventoryRemoved { id })
            }
            StaffAction::OpenTile(tile) => Ok(ActionOutcome::Navigate(self.context.route(tile.page()))),
            StaffAction::Logout => {
                self.logout().await;
                Ok(ActionOutcome::LoggedOut)
            }
        }
    }

    async fn insert_record(&mut self, form: &InsertRecordForm) -> Result<ActionOutcome, AppError> {
        let draft = form.validate(self.records.engine())?;
        let record = self.records.create_record(draft)?.clone();

        let saved = self.repos.records.save_record(&record).await;
        if let Err(e) = self.guard(saved) {
            self.records.discard_record(&record.id);
            return Err(e);
        }

        Ok(ActionOutcome::RecordSaved {
            record_id: record.id.clone(),
            total: record.total_amount(),
        })
    }

    fn previous_item(&self, id: &Uuid) -> Result<InventoryItem, AppError> {
        self.inventory
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(id.to_string()).into())
    }

    /// Save a locally changed item, restoring `previous` if the store refuses it.
    async fn persist_item(&mut self, item: InventoryItem, previous: InventoryItem) -> Result<ActionOutcome, AppError> {
        let saved = self.repos.inventory.save_item(&item).await;
        if let Err(e) = self.guard(saved) {
            self.inventory.import(previous)?;
            return Err(e);
        }
        Ok(ActionOutcome::InventoryUpdated(item))
    }
}
