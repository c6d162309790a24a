use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use washwise_catalog::{LineItem, PricingEngine};

use crate::payment::PaymentState;

/// Where a laundry record is in the shop's workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Pending,
    Sorting,
    Drying,
    ReadyForPickup,
    PickedUp,
}

impl RecordStatus {
    /// The only status a record may move to from this one.
    pub fn next(&self) -> Option<RecordStatus> {
        match self {
            RecordStatus::Pending => Some(RecordStatus::Sorting),
            RecordStatus::Sorting => Some(RecordStatus::Drying),
            RecordStatus::Drying => Some(RecordStatus::ReadyForPickup),
            RecordStatus::ReadyForPickup => Some(RecordStatus::PickedUp),
            RecordStatus::PickedUp => None,
        }
    }

    /// Being worked on in the shop.
    pub fn is_ongoing(&self) -> bool {
        matches!(self, RecordStatus::Sorting | RecordStatus::Drying)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "Pending",
            RecordStatus::Sorting => "Sorting",
            RecordStatus::Drying => "Drying",
            RecordStatus::ReadyForPickup => "Ready for Pick-up",
            RecordStatus::PickedUp => "Picked Up",
        }
    }
}

/// Validated contents of the insert-record form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordDraft {
    pub customer_id: String,
    pub customer_name: String,
    pub service: String,
    pub batch: String,
    pub items: Vec<LineItem>,
    pub weight_kg: Option<Decimal>,
    pub washing: bool,
}

/// A customer's laundry drop-off and the receipt issued for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaundryRecord {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub service: String,
    pub batch: String,
    items: Vec<LineItem>,
    total_amount: Decimal,
    item_count: u64,
    pub weight_kg: Option<Decimal>,
    pub washing: bool,
    status: RecordStatus,
    pub payment: PaymentState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LaundryRecord {
    pub fn new(id: String, draft: RecordDraft, engine: &PricingEngine) -> Self {
        let now = Utc::now();
        let items = snapshot_prices(draft.items, engine);
        let totals = engine.compute_total(&items);
        Self {
            id,
            customer_id: draft.customer_id,
            customer_name: draft.customer_name,
            service: draft.service,
            batch: draft.batch,
            items,
            total_amount: totals.total,
            item_count: totals.count,
            weight_kg: draft.weight_kg,
            washing: draft.washing,
            status: RecordStatus::Pending,
            payment: PaymentState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    /// Replace the receipt rows; totals are recomputed from them.
    pub fn set_items(&mut self, items: Vec<LineItem>, engine: &PricingEngine) {
        let items = snapshot_prices(items, engine);
        let totals = engine.compute_total(&items);
        self.items = items;
        self.total_amount = totals.total;
        self.item_count = totals.count;
        self.updated_at = Utc::now();
    }

    pub(crate) fn update_status(&mut self, status: RecordStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Amount still owed on this record.
    pub fn balance(&self) -> Decimal {
        self.payment.balance(self.total_amount)
    }
}

/// Stamp each row with the shop's current unit price so row amounts add up to the record total.
fn snapshot_prices(mut items: Vec<LineItem>, engine: &PricingEngine) -> Vec<LineItem> {
    for item in items.iter_mut() {
        item.unit_price = engine.table().price_of(item.item_type);
    }
    items
}
