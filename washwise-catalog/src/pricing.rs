use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::item_type::ItemType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Round a currency amount to centavos, half away from zero, always two places.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// One row of a laundry receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_type: ItemType,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    /// Build a line item from raw form input. Negative quantities and prices are rejected.
    pub fn new(item_type: ItemType, quantity: i64, unit_price: Decimal) -> Result<Self, PricingError> {
        let quantity = u32::try_from(quantity).map_err(|_| {
            PricingError::InvalidArgument(format!("quantity for {} must be a non-negative integer, got {}", item_type, quantity))
        })?;

        if unit_price < Decimal::ZERO {
            return Err(PricingError::InvalidArgument(format!(
                "unit price for {} must not be negative, got {}",
                item_type, unit_price
            )));
        }

        Ok(Self {
            item_type,
            quantity,
            unit_price,
        })
    }

    /// Amount at the line's own unit price, unrounded.
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Unit price per item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    prices: HashMap<ItemType, Decimal>,
}

impl PriceTable {
    pub fn empty() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn set_price(&mut self, item_type: ItemType, price: Decimal) -> Result<(), PricingError> {
        if price < Decimal::ZERO {
            return Err(PricingError::InvalidArgument(format!(
                "price for {} must not be negative, got {}",
                item_type, price
            )));
        }
        self.prices.insert(item_type, price);
        Ok(())
    }

    pub fn with_price(mut self, item_type: ItemType, price: Decimal) -> Result<Self, PricingError> {
        self.set_price(item_type, price)?;
        Ok(self)
    }

    /// Apply overrides keyed by form/payload names, e.g. `{"pillowCase": 12.50}`.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, Decimal>) -> Result<(), PricingError> {
        for (key, price) in overrides {
            let item_type = key
                .parse::<ItemType>()
                .map_err(|e| PricingError::InvalidArgument(e.to_string()))?;
            self.set_price(item_type, *price)?;
        }
        Ok(())
    }

    /// Unknown item types price at zero.
    pub fn price_of(&self, item_type: ItemType) -> Decimal {
        self.prices.get(&item_type).copied().unwrap_or(Decimal::ZERO)
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        let prices = HashMap::from([
            (ItemType::Shirts, dec!(15.00)),
            (ItemType::Pants, dec!(20.00)),
            (ItemType::Jeans, dec!(25.00)),
            (ItemType::Shorts, dec!(18.00)),
            (ItemType::Towel, dec!(12.00)),
            (ItemType::PillowCase, dec!(10.00)),
            (ItemType::BedSheets, dec!(30.00)),
        ]);
        Self { prices }
    }
}

/// Derived totals of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total: Decimal,
    pub count: u64,
}

impl Totals {
    pub fn zero() -> Self {
        Self {
            total: round_currency(Decimal::ZERO),
            count: 0,
        }
    }
}

/// Sum quantity × table price over the items.
///
/// Accumulation is exact; the total is rounded once at the end.
pub fn compute_total(items: &[LineItem], price_table: &PriceTable) -> Totals {
    let (amount, count) = items.iter().fold((Decimal::ZERO, 0u64), |(amount, count), item| {
        (
            amount + Decimal::from(item.quantity) * price_table.price_of(item.item_type),
            count + u64::from(item.quantity),
        )
    });

    Totals {
        total: round_currency(amount),
        count,
    }
}

/// Weight-based quote for the per-load price list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadQuote {
    pub loads: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Prefix used when rendering amounts
    pub currency_symbol: String,

    /// Capacity of one machine load in kilograms
    pub kg_per_load: Decimal,

    /// Flat price charged per load
    pub price_per_load: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₱".to_string(),
            kg_per_load: dec!(7),
            price_per_load: dec!(140.00),
        }
    }
}

/// Receipt pricing for one shop
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    table: PriceTable,
}

impl PricingEngine {
    pub fn new(config: PricingConfig, table: PriceTable) -> Self {
        Self { config, table }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn compute_total(&self, items: &[LineItem]) -> Totals {
        compute_total(items, &self.table)
    }

    /// Line item priced from this shop's table.
    pub fn line_item(&self, item_type: ItemType, quantity: i64) -> Result<LineItem, PricingError> {
        LineItem::new(item_type, quantity, self.table.price_of(item_type))
    }

    /// Build receipt rows from per-type quantities, in receipt order, dropping zero rows.
    pub fn line_items_from_quantities(&self, quantities: &[(ItemType, i64)]) -> Result<Vec<LineItem>, PricingError> {
        let mut items = Vec::with_capacity(quantities.len());
        for item_type in ItemType::ALL {
            if quantities.iter().any(|(t, q)| *t == item_type && *q < 0) {
                return Err(PricingError::InvalidArgument(format!(
                    "quantity for {} must be a non-negative integer",
                    item_type
                )));
            }
            let quantity: i64 = quantities
                .iter()
                .filter(|(t, _)| *t == item_type)
                .map(|(_, q)| *q)
                .sum();
            if quantity > 0 {
                items.push(self.line_item(item_type, quantity)?);
            }
        }
        tracing::trace!(rows = items.len(), "built receipt rows");
        Ok(items)
    }

    /// Quote by weight: every started load is charged in full.
    pub fn quote_by_weight(&self, weight_kg: Decimal) -> Result<LoadQuote, PricingError> {
        if weight_kg < Decimal::ZERO {
            return Err(PricingError::InvalidArgument(format!(
                "weight must not be negative, got {}",
                weight_kg
            )));
        }
        if self.config.kg_per_load <= Decimal::ZERO {
            return Err(PricingError::InvalidArgument("kg per load must be positive".to_string()));
        }

        let loads = (weight_kg / self.config.kg_per_load)
            .ceil()
            .to_u32()
            .ok_or_else(|| PricingError::InvalidArgument(format!("weight {} kg is out of range", weight_kg)))?;

        Ok(LoadQuote {
            loads,
            amount: round_currency(Decimal::from(loads) * self.config.price_per_load),
        })
    }

    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{}{}", self.config.currency_symbol, round_currency(amount))
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default(), PriceTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_type: ItemType, quantity: i64, price: Decimal) -> LineItem {
        LineItem::new(item_type, quantity, price).unwrap()
    }

    #[test]
    fn test_receipt_total() {
        let table = PriceTable::default();
        let items = vec![
            item(ItemType::Shirts, 2, dec!(15)),
            item(ItemType::Towel, 3, dec!(12)),
        ];

        let totals = compute_total(&items, &table);
        assert_eq!(totals.total, dec!(66.00));
        assert_eq!(totals.total.to_string(), "66.00");
        assert_eq!(totals.count, 5);
    }

    #[test]
    fn test_empty_receipt() {
        let totals = compute_total(&[], &PriceTable::default());
        assert_eq!(totals, Totals::zero());
        assert_eq!(totals.total.to_string(), "0.00");
        assert_eq!(totals.count, 0);
    }

    #[test]
    fn test_unknown_type_prices_at_zero() {
        let table = PriceTable::empty().with_price(ItemType::Shirts, dec!(15)).unwrap();
        let items = vec![
            item(ItemType::Shirts, 1, dec!(15)),
            item(ItemType::Jeans, 4, dec!(25)),
        ];

        let totals = compute_total(&items, &table);
        assert_eq!(totals.total, dec!(15.00));
        assert_eq!(totals.count, 5);
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let result = LineItem::new(ItemType::Pants, -1, dec!(20));
        assert!(matches!(result, Err(PricingError::InvalidArgument(_))));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut table = PriceTable::default();
        assert!(table.set_price(ItemType::Pants, dec!(-0.01)).is_err());
        assert_eq!(table.price_of(ItemType::Pants), dec!(20));
    }

    #[test]
    fn test_rounding_happens_once_at_the_end() {
        // 3 × 0.335 = 1.005 exactly; per-line rounding would give 1.02
        let table = PriceTable::empty().with_price(ItemType::PillowCase, dec!(0.335)).unwrap();
        let items = vec![
            item(ItemType::PillowCase, 1, dec!(0.335)),
            item(ItemType::PillowCase, 1, dec!(0.335)),
            item(ItemType::PillowCase, 1, dec!(0.335)),
        ];
        assert_eq!(compute_total(&items, &table).total, dec!(1.01));
    }

    #[test]
    fn test_total_is_monotonic_in_quantity() {
        let table = PriceTable::default();
        let mut previous = Decimal::ZERO;
        for quantity in 0..50 {
            let items = vec![
                item(ItemType::Jeans, 2, dec!(25)),
                item(ItemType::BedSheets, quantity, dec!(30)),
            ];
            let totals = compute_total(&items, &table);
            assert!(totals.total >= previous);
            previous = totals.total;
        }
    }

    #[test]
    fn test_compute_total_is_idempotent() {
        let engine = PricingEngine::default();
        let items = engine
            .line_items_from_quantities(&[(ItemType::Shirts, 3), (ItemType::Jeans, 1)])
            .unwrap();
        assert_eq!(engine.compute_total(&items), engine.compute_total(&items));
    }

    #[test]
    fn test_line_items_follow_receipt_order_and_skip_zero_rows() {
        let engine = PricingEngine::default();
        let items = engine
            .line_items_from_quantities(&[
                (ItemType::BedSheets, 1),
                (ItemType::Shorts, 0),
                (ItemType::Shirts, 2),
            ])
            .unwrap();

        let types: Vec<ItemType> = items.iter().map(|i| i.item_type).collect();
        assert_eq!(types, vec![ItemType::Shirts, ItemType::BedSheets]);
        assert_eq!(items[1].unit_price, dec!(30.00));

        let negative = engine.line_items_from_quantities(&[(ItemType::Shirts, -2)]);
        assert!(negative.is_err());
    }

    #[test]
    fn test_quote_by_weight() {
        let engine = PricingEngine::default();

        let quote = engine.quote_by_weight(dec!(7)).unwrap();
        assert_eq!(quote, LoadQuote { loads: 1, amount: dec!(140.00) });

        let quote = engine.quote_by_weight(dec!(7.5)).unwrap();
        assert_eq!(quote.loads, 2);
        assert_eq!(quote.amount, dec!(280.00));

        assert_eq!(engine.quote_by_weight(Decimal::ZERO).unwrap().loads, 0);
        assert!(engine.quote_by_weight(dec!(-1)).is_err());
    }

    #[test]
    fn test_price_overrides() {
        let mut table = PriceTable::default();
        let overrides = HashMap::from([("pillowCase".to_string(), dec!(12.50))]);
        table.apply_overrides(&overrides).unwrap();
        assert_eq!(table.price_of(ItemType::PillowCase), dec!(12.50));

        let bad = HashMap::from([("socks".to_string(), dec!(5))]);
        assert!(table.apply_overrides(&bad).is_err());
    }

    #[test]
    fn test_format_amount() {
        let engine = PricingEngine::default();
        assert_eq!(engine.format_amount(dec!(66)), "₱66.00");
    }
}
