use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use washwise_app::{AppState, Repositories};
use washwise_store::{ApiClient, Config, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "washwise_app=debug,washwise_store=info,washwise_order=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("failed to load config")?;
    tracing::info!("Starting Wash Wise staff console against {}", config.api.base_url);

    let engine = config.pricing.engine().context("invalid pricing configuration")?;
    let client = Arc::new(ApiClient::new(&config.api).context("failed to build API client")?);
    let repos = Repositories::remote(client, Arc::new(MemoryStore::new()));

    let mut app = AppState::new(engine, repos).with_search_delay(Duration::from_millis(config.search.debounce_ms));

    let shop = app.open_shop(config.shop.slug.as_deref()).await;
    tracing::info!(shop = %shop.shop_name, shop_id = %shop.shop_id, "shop selected");

    let items = app.load_inventory().await.context("failed to load inventory")?;
    let summary = app.inventory().summary();
    tracing::info!(
        items,
        in_stock = summary.in_stock,
        low_stock = summary.low_stock,
        out_of_stock = summary.out_of_stock,
        "inventory ready"
    );
    for item in app.inventory().needs_reorder() {
        tracing::warn!(item = %item.name, quantity = item.quantity, status = item.status.label(), "reorder needed");
    }

    let stats = app.quick_stats();
    for tile in stats.tiles(app.engine()) {
        tracing::info!(
            tile = tile.label,
            value = %tile.value,
            route = %app.context().route(tile.tile.page()),
            "dashboard"
        );
    }

    Ok(())
}
