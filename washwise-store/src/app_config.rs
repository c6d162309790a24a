use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use washwise_catalog::{PriceTable, PricingConfig, PricingEngine, PricingError};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as `X-API-KEY` until a login hands out a per-staff key
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ShopConfig {
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    /// Per-item overrides of the default price table, keyed by item name
    #[serde(default)]
    pub prices: HashMap<String, Decimal>,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
    #[serde(default = "default_kg_per_load")]
    pub kg_per_load: Decimal,
    #[serde(default = "default_price_per_load")]
    pub price_per_load: Decimal,
}

fn default_currency() -> String {
    PricingConfig::default().currency_symbol
}

fn default_kg_per_load() -> Decimal {
    PricingConfig::default().kg_per_load
}

fn default_price_per_load() -> Decimal {
    PricingConfig::default().price_per_load
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            prices: HashMap::new(),
            currency_symbol: default_currency(),
            kg_per_load: default_kg_per_load(),
            price_per_load: default_price_per_load(),
        }
    }
}

impl PricingSettings {
    /// Build the shop's pricing engine: default table plus configured overrides.
    pub fn engine(&self) -> Result<PricingEngine, PricingError> {
        if self.kg_per_load <= Decimal::ZERO {
            return Err(PricingError::InvalidArgument(format!(
                "kg_per_load must be positive, got {}",
                self.kg_per_load
            )));
        }
        if self.price_per_load < Decimal::ZERO {
            return Err(PricingError::InvalidArgument(format!(
                "price_per_load must not be negative, got {}",
                self.price_per_load
            )));
        }

        let mut table = PriceTable::default();
        table.apply_overrides(&self.prices)?;

        let config = PricingConfig {
            currency_symbol: self.currency_symbol.clone(),
            kg_per_load: self.kg_per_load,
            price_per_load: self.price_per_load,
        };
        Ok(PricingEngine::new(config, table))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load layered configuration from `root/config`.
    pub fn load_from(root: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let dir = root.join("config");
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            // e.g. `WASHWISE__API__BASE_URL=https://api.example.com`
            .add_source(config::Environment::with_prefix("WASHWISE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
