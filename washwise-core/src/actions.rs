use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use washwise_order::PaymentMethod;

use crate::forms::{InsertRecordForm, InventoryEditForm, InventoryItemForm};

/// Quick-stat tiles on the staff dashboard. Each opens a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTile {
    ReadyForPickup,
    PendingPayments,
    PendingLaundry,
    PaidThisMonth,
    Inventory,
    OnProcess,
}

impl DashboardTile {
    pub const ALL: [DashboardTile; 6] = [
        DashboardTile::ReadyForPickup,
        DashboardTile::PendingPayments,
        DashboardTile::PendingLaundry,
        DashboardTile::PaidThisMonth,
        DashboardTile::Inventory,
        DashboardTile::OnProcess,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTile::ReadyForPickup => "Ready for Pickup",
            DashboardTile::PendingPayments => "Pending Payments",
            DashboardTile::PendingLaundry => "Pending Laundry",
            DashboardTile::PaidThisMonth => "Total Paid This Month",
            DashboardTile::Inventory => "Inventory Items",
            DashboardTile::OnProcess => "Laundry On Process",
        }
    }

    /// Page the tile links to, relative to the shop slug.
    pub fn page(&self) -> &'static str {
        match self {
            DashboardTile::ReadyForPickup => "laundry/ready-for-pickup",
            DashboardTile::PendingPayments => "payments/pending",
            DashboardTile::PendingLaundry => "laundry/pending",
            DashboardTile::PaidThisMonth => "payments/history",
            DashboardTile::Inventory => "inventory",
            DashboardTile::OnProcess => "laundry/ongoing",
        }
    }
}

/// Everything a staff member can do from the console.
#[derive(Debug, Clone)]
pub enum StaffAction {
    InsertRecord(InsertRecordForm),
    AdvanceRecord { record_id: String },
    MarkReadyForPickup { record_id: String },
    MarkPickedUp { record_id: String },
    RecordPayment {
        record_id: String,
        amount: Decimal,
        method: PaymentMethod,
    },
    MarkPaid { record_id: String, method: PaymentMethod },
    AttachReceipt { record_id: String, receipt_url: String },
    AddInventoryItem(InventoryItemForm),
    EditInventoryItem { id: Uuid, form: InventoryEditForm },
    RestockItem { id: Uuid, quantity: u32 },
    ConsumeItem { id: Uuid, quantity: u32 },
    RemoveItem { id: Uuid },
    OpenTile(DashboardTile),
    Logout,
}

impl StaffAction {
    /// Actions that change nothing and need no signed-in session.
    pub fn is_navigation(&self) -> bool {
        matches!(self, StaffAction::OpenTile(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            StaffAction::InsertRecord(_) => "insert_record",
            StaffAction::AdvanceRecord { .. } => "advance_record",
            StaffAction::MarkReadyForPickup { .. } => "mark_ready_for_pickup",
            StaffAction::MarkPickedUp { .. } => "mark_picked_up",
            StaffAction::RecordPayment { .. } => "record_payment",
            StaffAction::MarkPaid { .. } => "mark_paid",
            StaffAction::AttachReceipt { .. } => "attach_receipt",
            StaffAction::AddInventoryItem(_) => "add_inventory_item",
            StaffAction::EditInventoryItem { .. } => "edit_inventory_item",
            StaffAction::RestockItem { .. } => "restock_item",
            StaffAction::ConsumeItem { .. } => "consume_item",
            StaffAction::RemoveItem { .. } => "remove_item",
            StaffAction::OpenTile(_) => "open_tile",
            StaffAction::Logout => "logout",
        }
    }
}
