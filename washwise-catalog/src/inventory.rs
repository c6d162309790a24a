use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock level relative to the reorder threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

/// Status of an item holding `quantity` units with the given reorder level.
///
/// First match wins: empty is out of stock, at or below the reorder level is
/// low stock, anything above is in stock.
pub fn derive_status(quantity: i64, reorder_level: i64) -> Result<StockStatus, InventoryError> {
    if quantity < 0 {
        return Err(InventoryError::InvalidArgument(format!(
            "quantity must not be negative, got {}",
            quantity
        )));
    }
    if reorder_level < 0 {
        return Err(InventoryError::InvalidArgument(format!(
            "reorder level must not be negative, got {}",
            reorder_level
        )));
    }

    Ok(if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= reorder_level {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    })
}

/// A shop supply tracked in inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub price: Decimal,
    pub reorder_level: u32,
    pub status: StockStatus,
    pub date_added: NaiveDate,
    pub last_restocked: NaiveDate,
    pub last_updated: NaiveDate,
}

impl InventoryItem {
    /// Value of the units on hand at the item's unit price.
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    fn refresh_status(&mut self) -> Result<(), InventoryError> {
        self.status = derive_status(i64::from(self.quantity), i64::from(self.reorder_level))?;
        Ok(())
    }
}

/// Validated input for a new inventory item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub price: Decimal,
    pub reorder_level: u32,
    pub date_added: NaiveDate,
    pub last_restocked: NaiveDate,
}

/// Field changes from the inventory edit row; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<u32>,
    pub unit: Option<String>,
    pub price: Option<Decimal>,
    pub reorder_level: Option<u32>,
}

/// Counts shown above the inventory list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventorySummary {
    pub total_items: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

/// In-memory inventory, kept in insertion order
#[derive(Debug, Default)]
pub struct InventoryManager {
    items: Vec<InventoryItem>,
}

impl InventoryManager {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item; its status is derived from the submitted quantity and reorder level.
    pub fn add(&mut self, draft: NewInventoryItem) -> Result<&InventoryItem, InventoryError> {
        let status = derive_status(i64::from(draft.quantity), i64::from(draft.reorder_level))?;
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: draft.name,
            category: draft.category,
            quantity: draft.quantity,
            unit: draft.unit,
            price: draft.price,
            reorder_level: draft.reorder_level,
            status,
            date_added: draft.date_added,
            last_restocked: draft.last_restocked,
            last_updated: today(),
        };

        tracing::info!(item = %item.name, quantity = item.quantity, status = ?item.status, "inventory item added");
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Load a stored item, replacing any item with the same id. The stored status is not trusted.
    pub fn import(&mut self, mut item: InventoryItem) -> Result<&InventoryItem, InventoryError> {
        item.refresh_status()?;
        match self.items.iter().position(|existing| existing.id == item.id) {
            Some(index) => {
                self.items[index] = item;
                Ok(&self.items[index])
            }
            None => {
                self.items.push(item);
                Ok(&self.items[self.items.len() - 1])
            }
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Apply an edit. The status is recomputed before the item is stored.
    pub fn edit(&mut self, id: &Uuid, edit: InventoryEdit) -> Result<&InventoryItem, InventoryError> {
        let item = self.get_mut(id)?;
        let mut updated = item.clone();

        if let Some(name) = edit.name {
            updated.name = name;
        }
        if let Some(category) = edit.category {
            updated.category = category;
        }
        if let Some(quantity) = edit.quantity {
            updated.quantity = quantity;
        }
        if let Some(unit) = edit.unit {
            updated.unit = unit;
        }
        if let Some(price) = edit.price {
            if price < Decimal::ZERO {
                return Err(InventoryError::InvalidArgument(format!(
                    "price must not be negative, got {}",
                    price
                )));
            }
            updated.price = price;
        }
        if let Some(reorder_level) = edit.reorder_level {
            updated.reorder_level = reorder_level;
        }

        updated.refresh_status()?;
        updated.last_updated = today();

        tracing::debug!(item = %updated.name, status = ?updated.status, "inventory item edited");
        *item = updated;
        Ok(&*item)
    }

    /// Receive new stock.
    pub fn restock(&mut self, id: &Uuid, quantity: u32) -> Result<&InventoryItem, InventoryError> {
        let item = self.get_mut(id)?;

        item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
            InventoryError::InvalidArgument(format!("restocking {} units overflows {}", quantity, item.name))
        })?;
        item.refresh_status()?;
        item.last_restocked = today();
        item.last_updated = item.last_restocked;

        tracing::info!(item = %item.name, quantity = item.quantity, "inventory restocked");
        Ok(&*item)
    }

    /// Take units out of stock for use.
    pub fn consume(&mut self, id: &Uuid, quantity: u32) -> Result<&InventoryItem, InventoryError> {
        let item = self.get_mut(id)?;

        if item.quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available: item.quantity,
            });
        }

        item.quantity -= quantity;
        item.refresh_status()?;
        item.last_updated = today();

        if item.status != StockStatus::InStock {
            tracing::warn!(item = %item.name, quantity = item.quantity, status = ?item.status, "inventory below reorder level");
        }
        Ok(&*item)
    }

    pub fn remove(&mut self, id: &Uuid) -> Result<InventoryItem, InventoryError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == *id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn summary(&self) -> InventorySummary {
        self.items.iter().fold(
            InventorySummary {
                total_items: self.items.len(),
                ..InventorySummary::default()
            },
            |mut summary, item| {
                match item.status {
                    StockStatus::InStock => summary.in_stock += 1,
                    StockStatus::LowStock => summary.low_stock += 1,
                    StockStatus::OutOfStock => summary.out_of_stock += 1,
                }
                summary
            },
        )
    }

    /// Items at or below their reorder level, in list order.
    pub fn needs_reorder(&self) -> Vec<&InventoryItem> {
        self.items
            .iter()
            .filter(|item| item.status != StockStatus::InStock)
            .collect()
    }

    pub fn total_stock_value(&self) -> Decimal {
        self.items.iter().map(InventoryItem::stock_value).sum()
    }

    fn get_mut(&mut self, id: &Uuid) -> Result<&mut InventoryItem, InventoryError> {
        self.items
            .iter_mut()
            .find(|item| item.id == *id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Inventory item not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        requested: u32,
        available: u32,
    },
}
