use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Garment categories counted on a laundry receipt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Shirts,
    Pants,
    Jeans,
    Shorts,
    Towel,
    PillowCase,
    BedSheets,
}

impl ItemType {
    /// Receipt order.
    pub const ALL: [ItemType; 7] = [
        ItemType::Shirts,
        ItemType::Pants,
        ItemType::Jeans,
        ItemType::Shorts,
        ItemType::Towel,
        ItemType::PillowCase,
        ItemType::BedSheets,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Shirts => "Shirts",
            ItemType::Pants => "Pants",
            ItemType::Jeans => "Jeans",
            ItemType::Shorts => "Shorts",
            ItemType::Towel => "Towel",
            ItemType::PillowCase => "Pillow Case",
            ItemType::BedSheets => "Bed Sheets",
        }
    }

    /// Key used by the record endpoint payload.
    pub fn payload_key(&self) -> &'static str {
        match self {
            ItemType::Shirts => "shirts",
            ItemType::Pants => "pants",
            ItemType::Jeans => "jeans",
            ItemType::Shorts => "shorts",
            ItemType::Towel => "towels",
            ItemType::PillowCase => "pillow_case",
            ItemType::BedSheets => "bed_sheets",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown item type: {0}")]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    /// Accepts form keys (`pillowCase`), payload keys (`pillow_case`) and labels (`Pillow Case`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "shirt" | "shirts" => Ok(ItemType::Shirts),
            "pant" | "pants" => Ok(ItemType::Pants),
            "jean" | "jeans" => Ok(ItemType::Jeans),
            "short" | "shorts" => Ok(ItemType::Shorts),
            "towel" | "towels" => Ok(ItemType::Towel),
            "pillowcase" | "pillowcases" => Ok(ItemType::PillowCase),
            "bedsheet" | "bedsheets" => Ok(ItemType::BedSheets),
            _ => Err(UnknownItemType(s.to_string())),
        }
    }
}
