//! Price Comparison Engine - Quote fairness verdicts
//!
//! Classifies a trader's quote by its percentage distance from the market
//! average and renders sentences for display and voice output.
//!
//! Bands (defaults):
//! - |pct| <= 5        fair
//! - 5 < pct <= 10     slightly high
//! - -10 <= pct < -5   slightly low
//! - pct > 10          high
//! - pct < -10         low

use crate::config::ComparisonConfig;
use crate::oracle::{OracleError, Result};
use crate::types::{normalize_commodity, PriceAggregation, PriceAnalysis, Verdict};

#[derive(Debug, Clone)]
pub struct PriceComparisonEngine {
    config: ComparisonConfig,
}

impl PriceComparisonEngine {
    pub fn new(config: ComparisonConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Verdict for a percentage difference from the market average
    pub fn classify(&self, pct: f64) -> Verdict {
        let fair = self.config.fair_band_pct;
        let alert = self.config.alert_band_pct;

        if pct.abs() <= fair {
            Verdict::Fair
        } else if pct > alert {
            Verdict::High
        } else if pct < -alert {
            Verdict::Low
        } else if pct > 0.0 {
            Verdict::SlightlyHigh
        } else {
            Verdict::SlightlyLow
        }
    }

    /// Compare a quoted price against an aggregation of the same commodity
    pub fn analyze_quote(
        &self,
        commodity: &str,
        quoted_price: f64,
        aggregation: &PriceAggregation,
    ) -> Result<PriceAnalysis> {
        let commodity = normalize_commodity(commodity);
        if commodity.is_empty() {
            return Err(OracleError::Validation(
                "commodity must not be empty".to_string(),
            ));
        }
        validate_quote(quoted_price)?;
        if commodity != aggregation.commodity {
            return Err(OracleError::Validation(format!(
                "quote for {} cannot be compared against {} prices",
                commodity, aggregation.commodity
            )));
        }

        let market_average = aggregation.average_price;
        if !market_average.is_finite() || market_average <= 0.0 {
            return Err(OracleError::Validation(format!(
                "market average must be positive, got {}",
                market_average
            )));
        }

        let percentage_difference = (quoted_price - market_average) / market_average * 100.0;
        let verdict = self.classify(percentage_difference);
        let message = self.render_verdict(
            &commodity,
            quoted_price,
            market_average,
            percentage_difference,
            verdict,
        );

        tracing::debug!(
            commodity = %commodity,
            quoted = quoted_price,
            average = market_average,
            pct = percentage_difference,
            verdict = %verdict,
            "Quote analysed"
        );

        Ok(PriceAnalysis {
            commodity,
            quoted_price,
            market_average,
            percentage_difference,
            verdict,
            message,
        })
    }

    /// Sentence with the commodity and the min, max and average figures.
    /// Prices print with two decimals so the serialized field text (`28.0`)
    /// and the plain figure (`28`) both appear verbatim.
    pub fn get_price_range_message(&self, aggregation: &PriceAggregation) -> String {
        let sym = &self.config.currency_symbol;
        let markets = if aggregation.sample_size == 1 {
            "market"
        } else {
            "markets"
        };

        let mut message = format!(
            "Current {} prices in {} range from {}{:.2} to {}{:.2}, with an average of {}{:.2} across {} {}.",
            aggregation.commodity,
            aggregation.location,
            sym,
            aggregation.min_price,
            sym,
            aggregation.max_price,
            sym,
            aggregation.average_price,
            aggregation.sample_size,
            markets
        );
        if aggregation.is_demo {
            message.push_str(" These are estimated demo prices, not live market data.");
        }
        message
    }

    fn render_verdict(
        &self,
        commodity: &str,
        quoted_price: f64,
        market_average: f64,
        pct: f64,
        verdict: Verdict,
    ) -> String {
        let sym = &self.config.currency_symbol;
        let direction = if pct >= 0.0 { "above" } else { "below" };

        let advice = match verdict {
            Verdict::Fair => "This is a reasonable deal.",
            Verdict::SlightlyHigh => "There may be some room to negotiate.",
            Verdict::SlightlyLow => "This is a little under the usual rate.",
            Verdict::High => "Consider negotiating a lower price.",
            Verdict::Low => "This is well under the usual rate; check quality and terms.",
        };

        format!(
            "The quoted price of {}{:.2} for {} is {}: {:.1}% {} the market average of {}{:.2}. {}",
            sym,
            quoted_price,
            commodity,
            verdict,
            pct.abs(),
            direction,
            sym,
            market_average,
            advice
        )
    }
}

impl Default for PriceComparisonEngine {
    fn default() -> Self {
        Self {
            config: ComparisonConfig::default(),
        }
    }
}

/// A quote must be a positive finite amount
pub fn validate_quote(quoted_price: f64) -> Result<()> {
    if !quoted_price.is_finite() || quoted_price <= 0.0 {
        return Err(OracleError::Validation(format!(
            "quoted price must be a positive amount, got {}",
            quoted_price
        )));
    }
    Ok(())
}
