//! Mandi oracle bootstrap
//!
//! Loads configuration, installs logging, builds the shared service and runs
//! a warm-up aggregation for each configured commodity, printing JSON lines.

use anyhow::{Context, Result};
use tracing::info;

use mandi_oracle::config::AppConfig;
use mandi_oracle::logging::init_tracing;
use mandi_oracle::{Location, OracleService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;
    config.validate()?;

    info!(config = %config, "🌾 Mandi oracle starting");

    let service = OracleService::from_config(&config).context("Failed to build oracle service")?;
    let location = Location::new(&config.service.warmup_state, None)?;

    for commodity in &config.service.warmup_commodities {
        let aggregation = service
            .aggregate_prices(commodity, &location)
            .await
            .with_context(|| format!("Warm-up aggregation failed for {}", commodity))?;

        info!(
            commodity = %aggregation.commodity,
            samples = aggregation.sample_size,
            demo = aggregation.is_demo,
            "{}",
            service.get_price_range_message(&aggregation)
        );
        println!("{}", serde_json::to_string(&aggregation)?);
    }

    info!(
        known_commodities = service.list_known_commodities().len(),
        "✅ Self-check complete"
    );

    Ok(())
}
