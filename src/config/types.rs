//! Configuration sections
//!
//! Every section has a `Default` matching the loader defaults, so components
//! can be built without going through `AppConfig::load`.

use serde::Deserialize;
use std::time::Duration;

use crate::oracle::{OracleError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Per-source fetch timeout in milliseconds
    pub source_timeout_ms: u64,
    /// Query the national electronic market network
    pub registered_market_enabled: bool,
    /// Query state mandi-board feeds
    pub regional_board_enabled: bool,
    /// Query user-submitted price reports
    pub crowd_sourced_enabled: bool,
}

impl OracleConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_timeout_ms == 0 {
            return Err(OracleError::Config(
                "oracle.source_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            source_timeout_ms: 1500,
            registered_market_enabled: true,
            regional_board_enabled: true,
            crowd_sourced_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticConfig {
    /// Observations generated per fallback
    pub sample_count: usize,
    /// Maximum relative jitter per observation (0.10 = ±10%)
    pub jitter_pct: f64,
    /// Fixed RNG seed; unset draws fresh entropy per call
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_count == 0 {
            return Err(OracleError::Config(
                "synthetic.sample_count must be at least 1".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.jitter_pct) {
            return Err(OracleError::Config(format!(
                "synthetic.jitter_pct must be in [0, 0.5), got {}",
                self.jitter_pct
            )));
        }
        Ok(())
    }
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            sample_count: 5,
            jitter_pct: 0.10,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonConfig {
    /// |pct| at or below this is fair
    pub fair_band_pct: f64,
    /// |pct| above this is high/low; between the two bands is slightly high/low
    pub alert_band_pct: f64,
    /// Prefix for prices in rendered messages
    pub currency_symbol: String,
}

impl ComparisonConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fair_band_pct.is_finite() || self.fair_band_pct < 0.0 {
            return Err(OracleError::Config(format!(
                "comparison.fair_band_pct must be non-negative, got {}",
                self.fair_band_pct
            )));
        }
        if !self.alert_band_pct.is_finite() || self.alert_band_pct < self.fair_band_pct {
            return Err(OracleError::Config(format!(
                "comparison.alert_band_pct ({}) must not be below fair_band_pct ({})",
                self.alert_band_pct, self.fair_band_pct
            )));
        }
        Ok(())
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            fair_band_pct: 5.0,
            alert_band_pct: 10.0,
            currency_symbol: "Rs.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Commodities queried by the startup self-check
    pub warmup_commodities: Vec<String>,
    /// State used for the startup self-check
    pub warmup_state: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            warmup_commodities: vec!["tomato".to_string(), "onion".to_string()],
            warmup_state: "Maharashtra".to_string(),
        }
    }
}
