use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use washwise_catalog::{InventoryManager, PricingEngine};
use washwise_core::actions::DashboardTile;
use washwise_order::RecordManager;

/// Numbers on the dashboard quick-stat tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickStats {
    pub ready_for_pickup: usize,
    pub pending_payments: usize,
    pub pending_laundry: usize,
    pub paid_this_month: Decimal,
    pub inventory_items: usize,
    pub on_process: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub tile: DashboardTile,
    pub label: &'static str,
    pub value: String,
}

impl QuickStats {
    pub fn collect(records: &RecordManager, inventory: &InventoryManager, today: NaiveDate) -> Self {
        Self {
            ready_for_pickup: records.ready_for_pickup().len(),
            pending_payments: records.pending_payments().len(),
            pending_laundry: records.pending().len(),
            paid_this_month: records.revenue_for_month(today.year(), today.month()),
            inventory_items: inventory.items().len(),
            on_process: records.ongoing().len(),
        }
    }

    pub fn value(&self, tile: DashboardTile, engine: &PricingEngine) -> String {
        match tile {
            DashboardTile::ReadyForPickup => self.ready_for_pickup.to_string(),
            DashboardTile::PendingPayments => self.pending_payments.to_string(),
            DashboardTile::PendingLaundry => self.pending_laundry.to_string(),
            DashboardTile::PaidThisMonth => engine.format_amount(self.paid_this_month),
            DashboardTile::Inventory => self.inventory_items.to_string(),
            DashboardTile::OnProcess => self.on_process.to_string(),
        }
    }

    pub fn tiles(&self, engine: &PricingEngine) -> Vec<TileView> {
        DashboardTile::ALL
            .iter()
            .map(|&tile| TileView {
                tile,
                label: tile.label(),
                value: self.value(tile, engine),
            })
            .collect()
    }
}
