pub mod item_type;
pub mod pricing;
pub mod inventory;

pub use item_type::ItemType;
pub use pricing::{
    compute_total, round_currency, LineItem, LoadQuote, PriceTable, PricingConfig, PricingEngine, PricingError, Totals,
};
pub use inventory::{
    derive_status, InventoryEdit, InventoryError, InventoryItem, InventoryManager, InventorySummary, NewInventoryItem,
    StockStatus,
};
