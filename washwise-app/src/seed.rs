use chrono::NaiveDate;
use rust_decimal::Decimal;
use washwise_catalog::NewInventoryItem;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn item(
    name: &str,
    category: &str,
    quantity: u32,
    unit: &str,
    price: i64,
    reorder_level: u32,
    date_added: NaiveDate,
    last_restocked: NaiveDate,
) -> NewInventoryItem {
    NewInventoryItem {
        name: name.to_string(),
        category: category.to_string(),
        quantity,
        unit: unit.to_string(),
        price: Decimal::from(price),
        reorder_level,
        date_added,
        last_restocked,
    }
}

/// Supplies a new shop starts with when its inventory is empty.
pub fn starter_inventory() -> Vec<NewInventoryItem> {
    vec![
        item("Detergent Premium", "Cleaning Supplies", 45, "liters", 350, 20, date(2024, 11, 1), date(2024, 12, 5)),
        item("Fabric Softener", "Cleaning Supplies", 32, "liters", 280, 15, date(2024, 11, 5), date(2024, 12, 3)),
        item("Bleach", "Cleaning Supplies", 8, "liters", 220, 25, date(2024, 10, 15), date(2024, 11, 28)),
        item("Starch Spray", "Finishing", 15, "bottles", 180, 10, date(2024, 11, 10), date(2024, 12, 2)),
        item("Oxygen Cleaner", "Cleaning Supplies", 0, "kg", 450, 5, date(2024, 10, 20), date(2024, 11, 15)),
        item("Dryer Sheets", "Drying", 120, "sheets", 95, 50, date(2024, 11, 12), date(2024, 12, 4)),
        item("Perfume Enhancer", "Finishing", 22, "bottles", 320, 12, date(2024, 11, 8), date(2024, 12, 1)),
        item("Laundry Bags", "Supplies", 5, "boxes", 1200, 15, date(2024, 9, 15), date(2024, 10, 20)),
    ]
}
