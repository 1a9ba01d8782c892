//! Configuration management for the price oracle
//!
//! Loads from optional config files + environment variables via .env

mod types;

pub use types::*;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub synthetic: SyntheticConfig,
    pub comparison: ComparisonConfig,
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Oracle defaults
            .set_default("oracle.source_timeout_ms", 1500)?
            .set_default("oracle.registered_market_enabled", true)?
            .set_default("oracle.regional_board_enabled", true)?
            .set_default("oracle.crowd_sourced_enabled", true)?
            // Synthetic fallback defaults
            .set_default("synthetic.sample_count", 5)?
            .set_default("synthetic.jitter_pct", 0.10)?
            // Comparison defaults
            .set_default("comparison.fair_band_pct", 5.0)?
            .set_default("comparison.alert_band_pct", 10.0)?
            .set_default("comparison.currency_symbol", "Rs.")?
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Self-check defaults
            .set_default("service.warmup_commodities", vec!["tomato", "onion"])?
            .set_default("service.warmup_state", "Maharashtra")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (MANDI_ORACLE__*)
            .add_source(
                Environment::with_prefix("MANDI_ORACLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Check cross-field constraints of every section
    pub fn validate(&self) -> Result<()> {
        self.oracle.validate()?;
        self.synthetic.validate()?;
        self.comparison.validate()?;

        if self.service.warmup_state.trim().is_empty() {
            bail!("service.warmup_state must not be empty");
        }

        Ok(())
    }

    /// Generate a one-line digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "timeout_ms={} sources=[market:{} board:{} crowd:{}] synthetic_n={} jitter={:.2} bands={:.1}/{:.1}",
            self.oracle.source_timeout_ms,
            self.oracle.registered_market_enabled,
            self.oracle.regional_board_enabled,
            self.oracle.crowd_sourced_enabled,
            self.synthetic.sample_count,
            self.synthetic.jitter_pct,
            self.comparison.fair_band_pct,
            self.comparison.alert_band_pct
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
